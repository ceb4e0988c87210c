//! # herdbell-entity
//!
//! Domain entity models for HerdBell: notification records and their
//! lifecycle, per-category delivery settings, user roles, and the herd
//! facts the detectors read.

pub mod herd;
pub mod notification;
pub mod user;
