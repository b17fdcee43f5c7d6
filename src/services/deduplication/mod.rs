//! Deduplication engine for scratchpad entries.
//!
//! Two tiers, evaluated in order with short-circuit:
//! 1. **Exact match**: normalized SHA-256 fingerprint in the session history
//! 2. **Similar content**: Levenshtein similarity ratio against existing
//!    entries, first match at or above the threshold wins
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │             DeduplicationService             │
//! │  ┌─────────────────┐  ┌───────────────────┐  │
//! │  │ ContentHasher   │  │ is_similar        │  │
//! │  │                 │  │                   │  │
//! │  │ trim+lowercase  │  │ 1 - lev / maxlen  │  │
//! │  │ SHA-256 hex     │  │ threshold 0.80    │  │
//! │  └─────────────────┘  └───────────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```

mod config;
mod hasher;
mod service;
mod similarity;
mod types;

pub use config::DeduplicationConfig;
pub(crate) use config::parse_bool;
pub use hasher::ContentHasher;
pub use service::DeduplicationService;
pub use similarity::{
    DEFAULT_SIMILARITY_THRESHOLD, SimilarMatch, is_similar, levenshtein, similarity,
};
pub use types::{DuplicateCheckResult, DuplicateReason};
