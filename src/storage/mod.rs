//! Storage layer.
//!
//! Everything aipad persists is a plain file:
//! - **Session record**: `.aipad/state.json`, pretty JSON
//! - **Scratchpad**: `.aipad/scratchpad.md`, append-only Markdown log
//! - **Custom targets**: `providers.json`, project-local or user-level
//!
//! Writes go through [`fs::atomic_write`] so a crash never leaves a
//! half-written file behind.

pub mod fs;
mod paths;
mod provider_store;
mod session_store;

pub use paths::{
    AIPAD_DIR_NAME, PROVIDERS_FILE_NAME, PathManager, RULES_SCRATCHPAD_NAME, SCRATCHPAD_FILE_NAME,
    STATE_FILE_NAME,
};
pub use provider_store::{ProviderStore, ProvidersFile};
pub use session_store::SessionStore;
