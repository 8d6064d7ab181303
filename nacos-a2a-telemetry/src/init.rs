//! Telemetry initialization and configuration

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Default filter when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize console logging for a registration process.
///
/// Safe to call more than once; only the first call installs a subscriber.
/// If another subscriber is already installed globally the call is a no-op.
///
/// # Example
/// ```
/// use nacos_a2a_telemetry::init_telemetry;
/// init_telemetry("weather-agent").expect("Failed to initialize telemetry");
/// ```
pub fn init_telemetry(service_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    INIT.call_once(|| {
        let installed = tracing_subscriber::registry()
            .with(env_filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true),
            )
            .try_init()
            .is_ok();

        if installed {
            tracing::info!(service.name = service_name, "Telemetry initialized");
        }
    });

    Ok(())
}

/// Same as [`init_telemetry`] but emits one JSON object per line, for log shippers.
pub fn init_json_telemetry(service_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    INIT.call_once(|| {
        let installed = tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
            .is_ok();

        if installed {
            tracing::info!(service.name = service_name, "Telemetry initialized (json)");
        }
    });

    Ok(())
}
