//! # Warden Platform
//!
//! Core platform types and traits shared by the Warden IKE crates.
//!
//! This crate provides:
//! - Unified error types (`WardenError`, `WardenResult`)
//! - The task contract driven by a per-session scheduler (`Task`, `TaskStatus`)
//!
//! # Examples
//!
//! ```
//! use warden_platform::{TaskStatus, WardenError, WardenResult};
//!
//! fn step(done: bool) -> WardenResult<TaskStatus> {
//!     if done {
//!         Ok(TaskStatus::Success)
//!     } else {
//!         Ok(TaskStatus::NeedMore)
//!     }
//! }
//!
//! # fn main() -> WardenResult<()> {
//! assert_eq!(step(true)?, TaskStatus::Success);
//! assert!(matches!(
//!     WardenError::NotImplemented("x".into()),
//!     WardenError::NotImplemented(_)
//! ));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod error;
pub mod traits;

pub use error::{WardenError, WardenResult};
pub use traits::{Task, TaskStatus};

/// Platform version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
