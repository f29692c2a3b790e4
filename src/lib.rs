// src/lib.rs

pub mod db;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod repository;
pub mod service;
pub mod sync;
pub mod test_utils;

/// Initialize logging with tracing_subscriber.
///
/// The `tracing-log` bridge routes `log::` macro output (used throughout
/// the services) into the subscriber.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sqlx=warn".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .compact()
        .with_target(false)
        .with_ansi(true)
        .init();
}
