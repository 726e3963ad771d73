use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `--debug` turns on debug output for this crate (including every SQL
/// statement); otherwise `RUST_LOG` is honoured, falling back to `warn`.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::new(format!("{}=debug", env!("CARGO_CRATE_NAME")))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
