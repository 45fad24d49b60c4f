use anyhow::{Context, Result};

use crate::config::{Config, CONFIG_KEYS};

pub fn handle_get_command(key: String) -> Result<()> {
    let config = Config::load()?;

    match config.get(&key) {
        Some(value) => println!("{value}"),
        None if is_known_key(&key) => println!("(not set)"),
        None => anyhow::bail!(
            "Unknown config key: {key}. Available keys: {}",
            CONFIG_KEYS.join(", ")
        ),
    }

    Ok(())
}

pub fn handle_set_command(key: String, value: String) -> Result<()> {
    let mut config = Config::load()?;
    config.set(&key, value)?;
    config.save().context("Failed to save config")?;

    println!("Set {key}");
    Ok(())
}

pub fn handle_unset_command(key: String) -> Result<()> {
    let mut config = Config::load()?;
    config.unset(&key)?;
    config.save().context("Failed to save config")?;

    println!("Unset {key}");
    Ok(())
}

pub fn handle_list_command() -> Result<()> {
    let config = Config::load()?;
    let items = config.list();

    if items.is_empty() {
        println!("No configuration values set.");
        println!("Config file: {}", Config::get_config_path()?.display());
        return Ok(());
    }

    for (key, value) in items {
        println!("{key} = {value}");
    }

    Ok(())
}

fn is_known_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase().replace('_', "-");
    CONFIG_KEYS.contains(&normalized.as_str())
}
