//! Layout configuration.
//!
//! Every knob of the engine lives in [`LayoutConfig`]. The defaults reproduce
//! the reference calendar; a `~/.config/calgrid/config.toml` file or
//! `CALGRID_*` environment variables can override any of them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Weekday;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::columns::ColumnMode;
use crate::error::{CalGridError, CalGridResult};
use crate::hour_range::{HourRange, MAX_HOUR, MIDNIGHT_CARRY_LIMIT};

static DEFAULT_CONFIG_PATH: &str = "~/.config/calgrid/config.toml";

/// Tunables for every layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Window shown for a day without timed events.
    pub fallback_min_hour: i32,
    pub fallback_max_hour: i32,
    /// Smallest number of hours a timeline shows.
    pub min_span_hours: i32,
    /// End hours below this on a later day are read as 24 + hour.
    pub midnight_carry_cutoff: u32,
    /// Shortest height an event is drawn with, in hours.
    pub min_height_hours: f64,
    pub month_max_per_day: usize,
    pub day_cell_max_per_day: usize,
    pub column_mode: ColumnMode,
    pub week_start: Weekday,
    pub snap_minutes: u32,
    /// How often callers should refresh the current-time marker (humantime, e.g. "60s").
    pub now_refresh: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            fallback_min_hour: 8,
            fallback_max_hour: 18,
            min_span_hours: 8,
            midnight_carry_cutoff: 6,
            min_height_hours: 0.5,
            month_max_per_day: 2,
            day_cell_max_per_day: 3,
            column_mode: ColumnMode::DayWide,
            week_start: Weekday::Sun,
            snap_minutes: 15,
            now_refresh: "60s".to_string(),
        }
    }
}

impl LayoutConfig {
    pub fn config_path() -> CalGridResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalGridError::Config("Could not determine config directory".into()))?
            .join("calgrid");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default config path, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> CalGridResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from an explicit path (`~` is expanded). The file is optional;
    /// `CALGRID_*` environment variables override file values.
    pub fn load_from(path: &Path) -> CalGridResult<Self> {
        let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());

        let config: LayoutConfig = Config::builder()
            .add_source(File::from(expanded.as_path()).required(false))
            .add_source(Environment::with_prefix("CALGRID").try_parsing(true))
            .build()
            .map_err(|e| CalGridError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalGridError::Config(e.to_string()))?;

        config.validate()?;
        tracing::debug!(path = %expanded.display(), "loaded layout config");

        Ok(config)
    }

    /// Save to `path` as TOML.
    pub fn save(&self, path: &Path) -> CalGridResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| CalGridError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| CalGridError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalGridResult<()> {
        let defaults = LayoutConfig::default();
        let contents = format!(
            "\
# calgrid layout configuration ({DEFAULT_CONFIG_PATH})

# Hours shown for a day without timed events:
# fallback_min_hour = {}
# fallback_max_hour = {}

# Smallest visible span of a timeline, in hours:
# min_span_hours = {}

# Shortest drawn event height, in hours:
# min_height_hours = {}

# Events shown per cell before \"+N more\":
# month_max_per_day = {}
# day_cell_max_per_day = {}

# \"day-wide\" or \"per-cluster\":
# column_mode = \"day-wide\"

# week_start = \"Sun\"
# snap_minutes = {}
# now_refresh = \"{}\"
",
            defaults.fallback_min_hour,
            defaults.fallback_max_hour,
            defaults.min_span_hours,
            defaults.min_height_hours,
            defaults.month_max_per_day,
            defaults.day_cell_max_per_day,
            defaults.snap_minutes,
            defaults.now_refresh,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalGridError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalGridError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn validate(&self) -> CalGridResult<()> {
        if self.min_span_hours <= 0 || self.min_span_hours > MAX_HOUR {
            return Err(CalGridError::Config(format!(
                "min_span_hours must be between 1 and {MAX_HOUR}, got {}",
                self.min_span_hours
            )));
        }
        if self.fallback_min_hour < 0
            || self.fallback_max_hour > MAX_HOUR
            || self.fallback_min_hour >= self.fallback_max_hour
        {
            return Err(CalGridError::Config(format!(
                "fallback window {}..{} is not a valid hour range",
                self.fallback_min_hour, self.fallback_max_hour
            )));
        }
        if self.midnight_carry_cutoff > MIDNIGHT_CARRY_LIMIT {
            return Err(CalGridError::Config(format!(
                "midnight_carry_cutoff must be at most {MIDNIGHT_CARRY_LIMIT}, got {}",
                self.midnight_carry_cutoff
            )));
        }
        if self.min_height_hours.is_nan() || self.min_height_hours <= 0.0 {
            return Err(CalGridError::Config(format!(
                "min_height_hours must be positive, got {}",
                self.min_height_hours
            )));
        }
        if self.snap_minutes == 0 || 60 % self.snap_minutes != 0 {
            return Err(CalGridError::Config(format!(
                "snap_minutes must divide an hour, got {}",
                self.snap_minutes
            )));
        }
        self.now_refresh_interval()?;

        Ok(())
    }

    pub fn fallback_range(&self) -> HourRange {
        HourRange::new(self.fallback_min_hour, self.fallback_max_hour)
    }

    pub fn now_refresh_interval(&self) -> CalGridResult<Duration> {
        humantime::parse_duration(&self.now_refresh).map_err(|e| {
            CalGridError::Config(format!("Invalid now_refresh '{}': {e}", self.now_refresh))
        })
    }
}
