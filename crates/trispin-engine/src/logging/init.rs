use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "trispin_engine=debug,glutin=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Filter precedence: `config.env_filter`, then `RUST_LOG`, then `info`.
/// Subsequent calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = logger_builder(&config, std::env::var("RUST_LOG").ok());

        // `try_init` so a logger installed by a test harness is left alone.
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}

fn logger_builder(config: &LoggingConfig, rust_log: Option<String>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();

    match config.env_filter.as_deref().or(rust_log.as_deref()) {
        Some(filter) => builder.parse_filters(filter),
        None => builder.filter_level(log::LevelFilter::Info),
    };

    builder.write_style(config.write_style);
    builder
}
