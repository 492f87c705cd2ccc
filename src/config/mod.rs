mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<StoreConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: StoreConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    expand_base_dir(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<StoreConfig> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./imagestore.toml", "~/.config/imagestore/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(StoreConfig::default())
}

fn expand_base_dir(config: &mut StoreConfig) {
    let raw = config.base_dir.to_string_lossy().into_owned();
    let expanded = shellexpand::tilde(&raw);
    config.base_dir = PathBuf::from(expanded.as_ref());
}

/// Validate configuration
fn validate_config(config: &StoreConfig) -> Result<()> {
    let entries = [
        ("database", &config.database),
        ("images_dir", &config.images_dir),
        ("examples_dir", &config.examples_dir),
        ("schema_file", &config.schema_file),
    ];
    for (name, path) in entries {
        if path.as_os_str().is_empty() {
            anyhow::bail!("Config entry '{}' cannot be empty", name);
        }
    }

    if config.images_path() == config.examples_path() {
        anyhow::bail!("images_dir and examples_dir must be different directories");
    }

    // purge_images clears the live directory, it must not hold the database
    if config.database_path().parent() == Some(config.images_path().as_path()) {
        anyhow::bail!("The database cannot live inside images_dir");
    }

    Ok(())
}
