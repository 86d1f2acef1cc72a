//! Core library for the `pollen-notify` tool.
//!
//! This crate defines:
//! - The pollen forecast client and its data model
//! - Discord webhook payloads and delivery
//! - Settings file and credentials handling
//!
//! It is used by `pollen-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod date;
pub mod error;
pub mod forecast;
pub mod model;
pub mod notify;

pub use config::{Config, Credentials, LocationConfig};
pub use date::format_date;
pub use error::{Error, Result, SendError};
pub use forecast::{ForecastClient, ForecastQuery};
pub use model::{DailyInfo, Date, ForecastResponse, IndexInfo, PollenTypeInfo};
pub use notify::{DiscordNotifier, Webhook, build_payload};
