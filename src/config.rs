use crate::consts::*;
use anyhow::{Context, Result, bail};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub(crate) fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("oxidetap")
        .join("config.yml")
}

/// Loads the settings file. Only the default location is created when
/// missing, a path given on the command line has to exist. Not validated
/// yet, see [`Config::with_overrides`].
pub(crate) fn config(explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => read(path)?,
        None => {
            let path = default_config_path();
            if path.exists() {
                read(&path)?
            } else {
                let config = Config::default();
                write_default(&path, &config)?;
                config
            }
        }
    };

    debug!("Config: {:#?}", config);

    Ok(config)
}

fn read(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))
}

fn write_default(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let serialized = serde_yaml::to_string(config)?;
    fs::write(path, serialized)?;
    info!("Default config written to {}", path.display());
    Ok(())
}

fn default_tap_timeout() -> u64 {
    ARTIFICIAL_TIMEOUT
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL
}

fn default_no_emit() -> bool {
    false
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Config {
    /// Longest hold in milliseconds that still counts as a tap.
    #[serde(default = "default_tap_timeout")]
    pub tap_timeout_ms: u64,
    /// Sleep between two polls of the input devices.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Decide taps but only log them.
    #[serde(default = "default_no_emit")]
    pub no_emit: bool,
    /// Device names to watch, every keyboard and pointer when empty.
    #[serde(default)]
    pub devices: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tap_timeout_ms: default_tap_timeout(),
            poll_interval_ms: default_poll_interval(),
            no_emit: default_no_emit(),
            devices: Vec::new(),
        }
    }
}

impl Config {
    /// Command line values win over the file, then the result is checked.
    pub fn with_overrides(mut self, timeout: Option<u64>, dry_run: bool) -> Result<Self> {
        if let Some(timeout) = timeout {
            self.tap_timeout_ms = timeout;
        }
        self.no_emit |= dry_run;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tap_timeout_ms == 0 {
            bail!("tap_timeout_ms must be greater than 0");
        }
        if !(MIN_POLL_INTERVAL..=MAX_POLL_INTERVAL).contains(&self.poll_interval_ms) {
            bail!(
                "poll_interval_ms must be between {MIN_POLL_INTERVAL} and {MAX_POLL_INTERVAL}, got {}",
                self.poll_interval_ms
            );
        }
        Ok(())
    }

    pub fn tap_timeout(&self) -> Duration {
        Duration::from_millis(self.tap_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tap_timeout(), Duration::from_millis(600));
        assert_eq!(config.poll_interval(), Duration::from_millis(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file() {
        let config: Config = serde_yaml::from_str(
            "tap_timeout_ms: 250\ndevices:\n  - AT Translated Set 2 keyboard\n",
        )
        .unwrap();
        assert_eq!(config.tap_timeout_ms, 250);
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL);
        assert_eq!(config.devices, vec!["AT Translated Set 2 keyboard"]);
    }

    #[test]
    fn test_poll_interval_bounds() {
        for (interval, ok) in [(0, false), (1, true), (100, true), (101, false)] {
            let config = Config {
                poll_interval_ms: interval,
                ..Default::default()
            };
            assert_eq!(config.validate().is_ok(), ok, "interval {interval}");
        }
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = Config {
            tap_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_command_line_overrides_before_validation() {
        let dir = std::env::temp_dir().join(format!("oxidetap-override-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yml");
        fs::write(&path, "tap_timeout_ms: 0\n").unwrap();

        let loaded = config(Some(path.as_path())).unwrap();
        assert!(loaded.clone().with_overrides(None, false).is_err());

        let config = loaded.with_overrides(Some(300), true).unwrap();
        assert_eq!(config.tap_timeout_ms, 300);
        assert!(config.no_emit);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_default_round_trips() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("oxidetap-does-not-exist").join("config.yml");
        assert!(config(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_reads_explicit_file() {
        let dir = std::env::temp_dir().join(format!("oxidetap-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yml");
        fs::write(&path, "poll_interval_ms: 5\nno_emit: true\n").unwrap();

        let config = config(Some(path.as_path())).unwrap();
        assert_eq!(config.poll_interval_ms, 5);
        assert!(config.no_emit);

        fs::remove_dir_all(&dir).unwrap();
    }
}
