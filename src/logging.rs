use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins over the verbosity flag when it is set.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "slides_dl=debug" } else { "slides_dl=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
