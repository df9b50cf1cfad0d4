use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "MANELOCA_LOG";

/// Installs the global fmt subscriber, writing to stderr.
///
/// `MANELOCA_LOG` wins over `fallback_filter`. Calling this twice is harmless.
pub fn init_tracing(fallback_filter: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(fallback_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing("debug");
        init_tracing("not a valid [filter");
        tracing::info!("still logging");
    }
}
