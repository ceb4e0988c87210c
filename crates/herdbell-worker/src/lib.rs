//! Recurring re-evaluation for HerdBell.
//!
//! This crate provides:
//! - The re-evaluation tick: detect, group, reconcile, hand off, sweep
//! - An interval runner that drives the tick until cancelled
//! - A cron scheduler for calendar-based triggers

pub mod runner;
pub mod scheduler;
pub mod tick;

pub use runner::TickRunner;
pub use scheduler::CronScheduler;
pub use tick::{ReevaluationTick, TickReport};
