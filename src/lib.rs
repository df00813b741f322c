//! Admin client for the company-site content backend.
//!
//! Each resource view is a [`controller::FeatureController`]: a remote collection with
//! client-side search, a draft form with nested list fields, a submission pipeline that
//! switches to multipart when files are attached, and a confirmation gate around deletes.

pub mod api;
pub mod catalog;
pub mod config;
pub mod confirm;
pub mod controller;
pub mod display;
pub mod errors;
pub mod form;
pub mod models;
pub mod search;
pub mod store;
pub mod submit;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};

/// Install the global tracing subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
