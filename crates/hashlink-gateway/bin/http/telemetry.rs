use crate::cli::LogFormatArg;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` and falls back to `info`.
pub fn init(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}
