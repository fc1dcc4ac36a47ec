use std::path::PathBuf;

use super::types::{DisplayMode, VISIBLE_STEPS};

#[derive(serde::Serialize, serde::Deserialize, Default, Clone)]
pub(super) struct AppConfig {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub transport: TransportConfig,
}

#[derive(serde::Serialize, serde::Deserialize, Clone)]
pub(super) struct ViewConfig {
    #[serde(default = "default_visible_steps")]
    pub visible_steps: usize,
    #[serde(default)]
    pub mode: DisplayMode,
    /// Page the view along with the playhead while playing
    #[serde(default = "default_follow")]
    pub follow_playhead: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            visible_steps: default_visible_steps(),
            mode: DisplayMode::default(),
            follow_playhead: default_follow(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone)]
pub(super) struct TransportConfig {
    #[serde(default = "default_bpm")]
    pub bpm: u32,
    #[serde(default = "default_max_bpm")]
    pub max_bpm: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { bpm: default_bpm(), max_bpm: default_max_bpm() }
    }
}

impl AppConfig {
    /// Pull hand-edited values back into what the UI can show
    fn sanitized(mut self) -> Self {
        self.view.visible_steps = self
            .view
            .visible_steps
            .clamp(*VISIBLE_STEPS.start(), *VISIBLE_STEPS.end());
        self
    }
}

fn default_visible_steps() -> usize {
    20
}

fn default_follow() -> bool {
    true
}

fn default_bpm() -> u32 {
    90
}

fn default_max_bpm() -> u32 {
    120
}

pub(super) fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("drumstaff")
        .join("config.toml")
}

pub(super) fn load_config() -> AppConfig {
    let path = config_path();
    std::fs::read_to_string(&path)
        .ok()
        .map(|s| parse_config(&s))
        .unwrap_or_default()
}

fn parse_config(s: &str) -> AppConfig {
    match toml::from_str::<AppConfig>(s) {
        Ok(config) => config.sanitized(),
        Err(e) => {
            tracing::warn!("Ignoring unreadable config: {}", e);
            AppConfig::default()
        }
    }
}

pub(super) fn save_config(config: &AppConfig) {
    let path = config_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(s) = toml::to_string_pretty(config) else { return };
    if let Err(e) = std::fs::write(&path, s) {
        tracing::warn!("Failed to save config to {}: {}", path.display(), e);
    }
}
