//! Core type definitions used across the HerdBell workspace.

pub mod id;

pub use id::*;
