use std::path::PathBuf;

use anyhow::{Context, Result};

use issuedigest_core::config::Config;

pub fn print_effective(config_path: Option<PathBuf>) -> Result<()> {
    let config = Config::load_effective(config_path.as_deref()).context("load config")?;
    let output = config.to_toml_string()?;
    println!("{}", output);
    Ok(())
}
