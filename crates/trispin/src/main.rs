use std::path::PathBuf;

use anyhow::Context;
use trispin_engine::config::AppConfig;
use trispin_engine::logging::{init_logging, LoggingConfig};
use trispin_engine::shader::ShaderPair;
use trispin_engine::window::{Runtime, RuntimeConfig};

/// Usage: `trispin [config.toml]`
fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::resolve(config_path.as_deref())?;

    init_logging(LoggingConfig {
        env_filter: config.logging.filter.clone(),
        ..Default::default()
    });

    // Read both sources before any window exists: without them there is nothing to draw.
    let shaders = ShaderPair::load(&config.shaders.vertex, &config.shaders.fragment)
        .context("cannot start without both shader sources")?;

    log::info!(
        "starting {}x{} {}",
        config.window.width,
        config.window.height,
        if config.window.fullscreen { "fullscreen" } else { "windowed" },
    );

    Runtime::run(RuntimeConfig::from(&config), shaders)
}
