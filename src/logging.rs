use tracing_subscriber::EnvFilter;

/// Installs the `fmt` subscriber. `RUST_LOG` wins over `filter`; `verbose`
/// raises the fallback to `debug`. Calling it twice is harmless.
pub fn init(verbose: bool, filter: &str) {
    let fallback = if verbose { "debug" } else { filter };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("logging already initialised");
    }
}
