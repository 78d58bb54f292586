use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use crate::core::synth::SynthConfig;

const APP_DIR: &str = "keytheorem";
const SETTINGS_FILE: &str = "settings.json";

/// Persisted application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppSettings {
    pub synth: SynthConfig,
    pub selected_midi_port: Option<String>,
    pub selected_output_device: Option<String>,
}

impl AppSettings {
    pub fn settings_dir() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        path.push(APP_DIR);
        Ok(path)
    }

    pub fn settings_path() -> Result<PathBuf> {
        Ok(Self::settings_dir()?.join(SETTINGS_FILE))
    }

    /// Settings from the config dir, defaults when absent or unreadable
    pub fn load_or_default() -> Self {
        let loaded = Self::settings_path().and_then(|path| {
            if path.exists() {
                Self::load_from(&path)
            } else {
                log::info!("no settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
        });
        loaded.unwrap_or_else(|err| {
            log::warn!("failed to load settings: {:#}", err);
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        let dir = Self::settings_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        self.save_to(&dir.join(SETTINGS_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::oscillator::WaveformKind;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("keytheorem-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn saves_and_loads() {
        let path = temp_path("roundtrip");
        let mut settings = AppSettings::default();
        settings.synth.waveform = WaveformKind::Square;
        settings.synth.volume = 0.3;
        settings.selected_midi_port = Some("Keystation 49".to_string());

        settings.save_to(&path).unwrap();
        let loaded = AppSettings::load_from(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn garbage_files_are_errors() {
        let path = temp_path("garbage");
        fs::write(&path, "not json").unwrap();
        let result = AppSettings::load_from(&path);
        fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{ "selected_output_device": "pipewire" }"#).unwrap();
        assert_eq!(settings.selected_output_device.as_deref(), Some("pipewire"));
        assert_eq!(settings.synth, SynthConfig::default());
    }
}
