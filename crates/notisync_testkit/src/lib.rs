//! # NotiSync Testkit
//!
//! Test utilities for NotiSync.
//!
//! This crate provides:
//! - Topic catalog and notification fixtures
//! - A state store that fails on demand
//! - File-backed stores in temporary directories
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use notisync_testkit::prelude::*;
//!
//! let topics = mixed_catalog();
//! assert_eq!(topics.len(), 4);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
