//! Business logic services.
//!
//! Services orchestrate the stores and provide the high-level operations
//! behind each CLI command.

mod capture;
pub mod deduplication;
pub mod export;
pub mod managed_block;
pub mod scratchpad;
mod sync;

pub use capture::CaptureService;
pub use export::{ExportFormat, ExportSummary, export_to};
pub use managed_block::SpliceOutcome;
pub use sync::{
    AGENT_AWARENESS_INSTRUCTIONS, CleanReport, SESSION_CONTEXT_HEADING, SyncReport, SyncSelection,
    SyncService, TargetReport, build_block,
};
