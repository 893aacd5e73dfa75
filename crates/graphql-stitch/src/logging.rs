const DEFAULT_LOG_LEVEL: tracing::Level = tracing::Level::INFO;

/// Installs the global `tracing` subscriber. `--verbose` wins over the
/// `LOG_LEVEL` environment variable.
pub(crate) fn init(verbose: bool) {
    let env_level = std::env::var("LOG_LEVEL").ok();
    let (log_level, warning) = match (verbose, env_level.as_deref()) {
        (true, _) => (tracing::Level::DEBUG, None),
        (false, None) => (DEFAULT_LOG_LEVEL, None),
        (false, Some(value)) => match parse_log_level(value) {
            Some(level) => (level, None),
            None => (
                DEFAULT_LOG_LEVEL,
                Some(format!("Invalid `LOG_LEVEL` environment variable value: `{value}`")),
            ),
        },
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();
    log::trace!("Logging level set to `{log_level}`.");

    if let Some(warning) = warning {
        log::warn!("{warning}");
    }
}

fn parse_log_level(value: &str) -> Option<tracing::Level> {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(tracing::Level::TRACE),
        "debug" | "verbose" => Some(tracing::Level::DEBUG),
        "info" => Some(tracing::Level::INFO),
        "warn" => Some(tracing::Level::WARN),
        "error" => Some(tracing::Level::ERROR),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::parse_log_level;

    #[test]
    fn log_level_names_are_case_insensitive() {
        assert_eq!(parse_log_level("DEBUG"), Some(tracing::Level::DEBUG));
        assert_eq!(parse_log_level(" trace "), Some(tracing::Level::TRACE));
        assert_eq!(parse_log_level("Verbose"), Some(tracing::Level::DEBUG));
        assert_eq!(parse_log_level("loud"), None);
    }
}
