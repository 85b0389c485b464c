use {anyhow::Result, clap::Subcommand};

use glimpse_config::{GlimpseConfig, find_or_default_config_path, save_config};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the path of the active (or default) config file.
    Path,
    /// Write a default config file, unless one already exists.
    Init,
}

pub fn handle_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => {
            println!("{}", find_or_default_config_path().display());
            Ok(())
        },
        ConfigAction::Init => init(),
    }
}

fn init() -> Result<()> {
    let path = find_or_default_config_path();
    if path.exists() {
        eprintln!("config already exists at {}", path.display());
        return Ok(());
    }
    let written = save_config(&GlimpseConfig::default())?;
    eprintln!("wrote default config to {}", written.display());
    Ok(())
}
