//! CLI command implementations

mod config;
mod list;
mod settings;
mod share;
mod status;

pub use config::{config, ConfigArgs};
pub use list::list_sources;
pub use settings::{settings, SettingsArgs};
pub use share::{share, ShareArgs};
pub use status::status;
