//! # herdbell-core
//!
//! Core crate for HerdBell. Contains configuration schemas, typed
//! identifiers, the clock abstraction used by every time-dependent
//! component, and the unified error system.
//!
//! This crate has **no** internal dependencies on other HerdBell crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
