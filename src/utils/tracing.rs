#[cfg(feature = "debug-tracing")]
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber filtered by `RUST_LOG`.
///
/// Without `RUST_LOG` the switcher's own crates log at `debug`.
#[cfg(feature = "debug-tracing")]
pub fn init_tracing() {
    const DEFAULT_FILTER: &str = "layout_switcher=debug,layout_switcher_core=debug";

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::env::var_os("NO_COLOR").is_none())
        .with_level(true)
        .with_target(true);

    if subscriber.try_init().is_ok() {
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "tracing initialized");
    }
}

#[cfg(not(feature = "debug-tracing"))]
pub fn init_tracing() {}
