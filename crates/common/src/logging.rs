use tracing_subscriber::{fmt, EnvFilter};

/// HTTP client internals are noisy at debug level; keep them at warn unless
/// `RUST_LOG` asks otherwise.
const QUIET_TARGETS: &str = "hyper=warn,reqwest=warn,h2=warn";

pub fn init_logging(default_level: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},{QUIET_TARGETS}")));

    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
