//! `trander config`: inspect or change settings

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;
use std::path::Path;

#[derive(Args)]
pub struct ConfigArgs {
    /// Dotted key, e.g. "search.provider"
    pub key: Option<String>,

    /// New value for KEY
    pub value: Option<String>,

    /// Print the config file location and exit
    #[arg(long)]
    pub path: bool,

    /// Overwrite the config file with defaults
    #[arg(long, conflicts_with_all = ["key", "value"])]
    pub reset: bool,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        println!("{}", Config::config_path()?.display());
        return Ok(());
    }

    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let Some(key) = args.key.as_deref() else {
        print!("{}", render(&Config::load()?));
        return Ok(());
    };

    match args.value.as_deref() {
        None => println!("{}", read_value(&Config::load()?, key)?),
        Some(value) => println!("{}", set_value(&Config::config_path()?, key, value)?),
    }

    Ok(())
}

/// Current value of one key, secrets masked
fn read_value(config: &Config, key: &str) -> Result<String> {
    let value = config.get(key).ok_or_else(|| unknown_key(key))?;
    Ok(display_value(key, &value))
}

/// Change one key in the stored file
///
/// Works on the file as stored so environment keys never reach the disk.
fn set_value(path: &Path, key: &str, value: &str) -> Result<String> {
    let mut config = Config::load_from(path)?;
    config.set(key, value)?;
    config.save_to(path)?;
    Ok(format!("{} = {}", key, display_value(key, value)))
}

fn unknown_key(key: &str) -> Error {
    Error::Config(format!(
        "Unknown config key: {}\nAvailable keys: {}",
        key,
        Config::available_keys().join(", ")
    ))
}

/// Secrets are never echoed back
fn display_value(key: &str, value: &str) -> String {
    if !key.starts_with("api_keys.") {
        return value.to_string();
    }
    if value.is_empty() {
        "\"\" # not configured".to_string()
    } else {
        "\"***\" # configured".to_string()
    }
}

/// All settings as TOML-ish sections
fn render(config: &Config) -> String {
    let mut out = String::new();
    let mut current = "";

    for key in Config::available_keys() {
        let (section, field) = key.split_once('.').unwrap_or(("", key));
        if section != current {
            if !current.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("[{}]\n", section));
            current = section;
        }
        let value = config.get(key).unwrap_or_default();
        out.push_str(&format!("{} = {}\n", field, display_value(key, &value)));
    }

    let mut providers: Vec<_> = config.url.providers.iter().collect();
    providers.sort();
    out.push_str("\n[url.providers]\n");
    for (name, template) in providers {
        out.push_str(&format!("{} = \"{}\"\n", name, template));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_api_keys_are_masked() {
        assert_eq!(display_value("api_keys.google", "AIza-secret"), "\"***\" # configured");
        assert_eq!(display_value("api_keys.geodb", ""), "\"\" # not configured");
        assert_eq!(display_value("search.provider", "google"), "google");
    }

    #[test]
    fn test_render_groups_sections() {
        let mut config = Config::default();
        config.api_keys.google = "AIza-secret".to_string();

        let out = render(&config);
        assert!(out.contains("[search]\n"));
        assert!(out.contains("[api_keys]\n"));
        assert!(out.contains("[url.providers]\n"));
        assert!(out.contains("google = \"***\" # configured"));
        assert!(!out.contains("AIza-secret"));
    }

    #[test]
    fn test_unknown_key_lists_choices() {
        let message = unknown_key("search.nope").to_string();
        assert!(message.contains("search.nope"));
        assert!(message.contains("search.provider"));
    }

    #[test]
    fn test_read_value_masks_api_keys() {
        let mut config = Config::default();
        config.api_keys.google = "AIza-secret".to_string();

        assert_eq!(read_value(&config, "api_keys.google").unwrap(), "\"***\" # configured");
        assert_eq!(read_value(&config, "search.provider").unwrap(), "google");
        assert!(read_value(&config, "search.nope").is_err());
    }

    #[test]
    fn test_set_value_keeps_env_keys_off_disk() {
        std::env::set_var("TRANDER_GEODB_API_KEY", "ENV-ONLY-GEODB-KEY");
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let echoed = set_value(&path, "search.max_types", "4").unwrap();
        assert_eq!(echoed, "search.max_types = 4");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("ENV-ONLY-GEODB-KEY"));
        assert_eq!(Config::load_from(&path).unwrap().search.max_types, 4);
        std::env::remove_var("TRANDER_GEODB_API_KEY");
    }

    #[test]
    fn test_set_value_echo_masks_secret() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let echoed = set_value(&path, "api_keys.geoapify", "geo-secret").unwrap();
        assert_eq!(echoed, "api_keys.geoapify = \"***\" # configured");
        assert_eq!(Config::load_from(&path).unwrap().api_keys.geoapify, "geo-secret");
    }
}
