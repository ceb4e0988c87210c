//! Per-category delivery settings: role defaults, overrides, quiet hours.

pub mod defaults;
pub mod quiet;
pub mod resolver;
pub mod service;

pub use defaults::role_defaults;
pub use quiet::is_quiet_now;
pub use resolver::{SettingsResolver, resolve};
pub use service::SettingsService;
