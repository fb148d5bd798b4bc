//! Core library for the `skyglance` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The current-weather fetcher over the OpenWeatherMap API
//! - Condition-icon resolution with a flat on-disk cache
//! - Location and rendering seams, and the refresh pipeline tying them together
//!
//! It is used by `skyglance-cli`, but any front-end can implement
//! [`Renderer`] and [`LocationProvider`] and drive a [`WeatherPipeline`].

pub mod cache;
pub mod config;
pub mod error;
pub mod icon;
pub mod location;
pub mod model;
pub mod pipeline;
pub mod provider;

pub use cache::IconCache;
pub use config::Config;
pub use error::FetchError;
pub use icon::{IconImage, IconResolver, IconSource};
pub use location::{FixedLocation, LocationProvider, Place, PresetCity};
pub use model::{Coordinates, TemperatureUnit, WeatherRecord};
pub use pipeline::{Renderer, WeatherPipeline};
pub use provider::{WeatherProvider, provider_from_config};
