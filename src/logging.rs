use tracing_subscriber::EnvFilter;

/// Directives used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVES: &str = "info";

/// Installs a stderr subscriber filtered by `RUST_LOG` and bridges the `log`
/// records emitted by the layers into it, so `RUST_LOG=debug` shows
/// activation maps, pooled volumes, and scores.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    install(filter)
}

/// Like [`init_logging`], with explicit filter directives such as
/// `"ferrite_cnn=debug"`.
pub fn init_logging_with(directives: &str) -> bool {
    install(EnvFilter::new(directives))
}

fn install(filter: EnvFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
