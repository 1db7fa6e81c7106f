//! Core library for the `weatherbot` chat bot.
//!
//! This crate defines:
//! - The clothing advisor and unit conversions
//! - OpenWeather lookups (current, forecast, air quality) behind a provider trait
//! - Rich message rendering and the platform-neutral command layer
//! - Configuration, message sinks and the daily alert
//!
//! It is used by `weatherbot-cli`, but can also back other chat front-ends.

pub mod advisor;
pub mod command;
pub mod config;
pub mod convert;
pub mod error;
pub mod message;
pub mod model;
pub mod provider;
pub mod scheduler;
pub mod sink;

pub use advisor::{Advisory, RecommendationInput, recommend};
pub use command::{Command, CommandHandler, Outcome};
pub use config::{AlertConfig, Config};
pub use error::{LookupError, LookupResult};
pub use message::{Embed, Reply};
pub use model::{AirQualitySnapshot, AqiLevel, ForecastEntry, ForecastSnapshot, WeatherSnapshot};
pub use provider::{WeatherProvider, provider_from_config};
pub use scheduler::DailyAlert;
pub use sink::{MessageSink, sink_from_config};
