//! Data models for aipad.
//!
//! This module contains the core data structures shared by the services and
//! the stores: the session record, sync targets, scratchpad entries and
//! capture request/outcome types.

mod capture;
mod entry;
mod session;
pub mod target;

pub use capture::{CaptureOutcome, CaptureRequest};
pub use entry::ScratchpadEntry;
pub use session::{SESSION_FORMAT_VERSION, SessionRecord};
pub use target::{
    BUILTIN_TARGETS, CustomTarget, TargetConfig, TargetRegistry, builtin_targets, is_builtin,
    merge_targets,
};
