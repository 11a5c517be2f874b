use tracing_subscriber::EnvFilter;
use crate::config::{LogFormat, LoggingSettings};

/// Build the level filter, falling back to `info` for a bad directive
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|e| {
        eprintln!("Invalid log level '{}' ({}), using info", level, e);
        EnvFilter::new("info")
    })
}

/// Install the global tracing subscriber described by `settings`
pub fn init_tracing(settings: &LoggingSettings) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&settings.level))
        .with_target(false)
        .with_level(true);

    match settings.format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Text => subscriber.init(),
    }
}
