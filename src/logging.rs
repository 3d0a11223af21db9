use tracing_subscriber::{fmt, EnvFilter};

/// Install the stderr subscriber shared by the binaries. Stdout is left to
/// the tools' own output.
pub fn init() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
