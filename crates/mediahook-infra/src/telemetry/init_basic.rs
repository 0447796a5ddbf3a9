use mediahook_core::LogFormat;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "mediahook=debug,info".into())
}

/// Initialize the global tracing subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry(format: LogFormat) -> Result<(), TryInitError> {
    let json = format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(default_filter())
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_current_span(true)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_ansi(false)))
        .try_init()?;

    tracing::debug!(format = ?format, "Tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // Either this call or another test installed the subscriber first.
        let _ = init_telemetry(LogFormat::Text);
        assert!(init_telemetry(LogFormat::Json).is_err());
    }
}
