// Log setup. Logs go to stderr so they never interleave with status lines on stdout.
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_LEVEL: &str = "warn";

pub fn init_tracing() {
    // Prefer RUST_LOG from env, otherwise stay quiet below warnings.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    // Fails only when a global subscriber is already set; the first one stays.
    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
