use std::{
    fs,
    io::{ErrorKind, Write},
    path::PathBuf,
    time::Duration,
};

use crate::{error::Error, result::Result};

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug)]
pub struct Config {
    pub monitor: MonitorConfig,
    pub model: ModelConfig,
    pub camera: CameraConfig,
    pub upload: UploadConfig,
    pub gui: GuiConfig,
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Copy, Debug)]
pub struct MonitorConfig {
    pub tick_interval_ms: u64,
    /// Horizontal nose offset from the eye midpoint, in frame pixels.
    pub head_turn_threshold: f32,
    pub turned_confirm_ms: u64,
    pub no_face_confirm_ms: u64,
    pub multiple_people_confirm_ms: u64,
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Copy, Debug)]
pub struct ModelConfig {
    pub cuda: bool,
    pub score_threshold: f32,
    pub nms_threshold: f32,
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Copy, Debug)]
pub struct CameraConfig {
    pub index: i32,
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug)]
pub struct UploadConfig {
    /// POST endpoint for captures. When absent, captures land in `capture_dir`.
    pub endpoint: Option<String>,
    pub capture_dir: String,
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Copy, Debug)]
pub struct GuiConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            model: ModelConfig {
                cuda: false,
                score_threshold: 0.5,
                nms_threshold: 0.4,
            },
            camera: CameraConfig { index: 0 },
            upload: UploadConfig {
                endpoint: None,
                capture_dir: "captures".into(),
            },
            gui: GuiConfig {
                width: 480.,
                height: 420.,
            },
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            head_turn_threshold: 15.,
            turned_confirm_ms: 3000,
            no_face_confirm_ms: 5000,
            multiple_people_confirm_ms: 3000,
        }
    }
}

impl MonitorConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn turned_confirm(&self) -> Duration {
        Duration::from_millis(self.turned_confirm_ms)
    }

    pub fn no_face_confirm(&self) -> Duration {
        Duration::from_millis(self.no_face_confirm_ms)
    }

    pub fn multiple_people_confirm(&self) -> Duration {
        Duration::from_millis(self.multiple_people_confirm_ms)
    }
}

impl Config {
    pub fn get() -> Result<Config> {
        let config_dir = Self::get_config_dir()?;

        let config_str = match fs::read_to_string(config_dir.clone()) {
            Ok(config) => config,
            Err(err) => {
                if err.kind() == ErrorKind::NotFound {
                    return Self::upsert_new(config_dir);
                }
                return Ok(Self::default());
            }
        };

        match config::Config::builder()
            .add_source(config::File::from_str(
                &config_str,
                config::FileFormat::Json,
            ))
            .build()
            .map_err(Error::ConfigError)?
            .try_deserialize::<Config>()
        {
            Ok(cfg) => Ok(cfg),
            Err(_) => Self::upsert_new(config_dir),
        }
    }

    pub fn update_config_file(&mut self) -> Result<()> {
        let config_dir = Self::get_config_dir()?;
        let _ = Self::upsert_config_file(config_dir, self);
        Ok(())
    }

    fn get_config_dir() -> Result<PathBuf> {
        Ok(std::env::current_dir()
            .map_err(|_| Error::UnknownError("failed to get current directory".into()))?
            .join("config.json"))
    }

    fn upsert_new(config_dir: PathBuf) -> Result<Config> {
        let config = Self::default();
        Self::upsert_config_file(config_dir, &config)?;
        Ok(config)
    }

    fn upsert_config_file(config_dir: PathBuf, config: &Config) -> Result<()> {
        fs::File::create(config_dir)
            .map_err(|err| Error::UnknownError(Box::new(err)))?
            .write_all(
                serde_json::to_string(config)
                    .map_err(|err| Error::UnknownError(Box::new(err)))?
                    .as_bytes(),
            )
            .map_err(|err| Error::UnknownError(Box::new(err)))
    }
}

#[cfg(test)]
mod test {
    use super::Config;

    #[test]
    fn default_config_survives_serde_round_trip() {
        let default = Config::default();
        let json = serde_json::to_string(&default).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.monitor.tick_interval_ms, 1000);
        assert_eq!(parsed.monitor.no_face_confirm_ms, 5000);
        assert_eq!(parsed.monitor.turned_confirm_ms, 3000);
        assert_eq!(parsed.monitor.multiple_people_confirm_ms, 3000);
        assert_eq!(parsed.upload.capture_dir, default.upload.capture_dir);
        assert!(parsed.upload.endpoint.is_none());
    }

    #[test]
    fn no_face_window_is_longer_than_turned_window() {
        let monitor = Config::default().monitor;
        assert!(monitor.no_face_confirm() > monitor.turned_confirm());
    }
}
