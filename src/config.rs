use std::{fs, path::Path, path::PathBuf};

use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;

use crate::gui::Color;

/// How the loop advances the rendering core's clock.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum TickMode {
    /// Real time elapsed between two idle iterations.
    Elapsed,
    /// A constant number of milliseconds per idle iteration.
    Fixed { ms: u32 },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("resolution {0}x{1} must be positive")]
    Resolution(i32, i32),
    #[error("vdb_size {vdb_size} is smaller than one row of {hor_res} pixels")]
    BufferTooSmall { vdb_size: usize, hor_res: i32 },
    #[error("{0} must be greater than zero")]
    ZeroPeriod(&'static str),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    title: String,
    hor_res: i32,
    ver_res: i32,
    vdb_size: usize,
    gpu: bool,
    tick: TickMode,
    indev_read_period: u32,
    refresh_period: u32,
    idle_sleep_ms: u64,
    background: Color,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            title: "lvgl win demo".into(),
            hor_res: 320,
            ver_res: 240,
            vdb_size: 20 * 320,
            gpu: true,
            tick: TickMode::Elapsed,
            indev_read_period: 50,
            refresh_period: 30,
            idle_sleep_ms: 1,
            background: Color::WHITE,
        }
    }
}

impl Config {
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn resolution(&self) -> (i32, i32) {
        (self.hor_res, self.ver_res)
    }

    pub fn vdb_size(&self) -> usize {
        self.vdb_size
    }

    pub fn gpu(&self) -> bool {
        self.gpu
    }

    pub fn tick(&self) -> TickMode {
        self.tick
    }

    pub fn indev_read_period(&self) -> u32 {
        self.indev_read_period
    }

    pub fn refresh_period(&self) -> u32 {
        self.refresh_period
    }

    pub fn idle_sleep_ms(&self) -> u64 {
        self.idle_sleep_ms
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Where the config file is looked up.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("GdiBridge").join("config.json"))
    }

    /// Reads the config at `path`, or returns the defaults if there is none.
    /// The boolean tells whether a file was read.
    pub fn read_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<(Config, bool)> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok((Config::default(), false));
        }
        let config_json = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config = serde_json::from_str::<Config>(&config_json)
            .with_context(|| format!("cannot parse config file {}", path.display()))?;
        Ok((config, true))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hor_res <= 0 || self.ver_res <= 0 {
            return Err(ConfigError::Resolution(self.hor_res, self.ver_res));
        }
        if self.vdb_size != 0 && self.vdb_size < self.hor_res as usize {
            return Err(ConfigError::BufferTooSmall {
                vdb_size: self.vdb_size,
                hor_res: self.hor_res,
            });
        }
        if self.indev_read_period == 0 {
            return Err(ConfigError::ZeroPeriod("indev_read_period"));
        }
        if self.refresh_period == 0 {
            return Err(ConfigError::ZeroPeriod("refresh_period"));
        }
        if self.tick == (TickMode::Fixed { ms: 0 }) {
            return Err(ConfigError::ZeroPeriod("tick.ms"));
        }
        Ok(())
    }
}
