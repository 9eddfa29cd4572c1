use merge_engine::{ConflictStyle, MergerConfig, RenderOptions, DEFAULT_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub merge: MergeSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeSettings {
    #[serde(default)]
    pub conflict_style: ConflictStyle,
    #[serde(default = "default_placeholder")]
    pub conflict_placeholder: String,
    /// Prefix output lines with their source tag and index.
    #[serde(default)]
    pub diagnostic: bool,
    #[serde(default = "default_parallel_diff")]
    pub parallel_diff: bool,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            conflict_style: ConflictStyle::default(),
            conflict_placeholder: default_placeholder(),
            diagnostic: false,
            parallel_diff: default_parallel_diff(),
        }
    }
}

impl MergeSettings {
    pub fn to_merger_config(&self) -> MergerConfig {
        MergerConfig {
            parallel_diff: self.parallel_diff,
            render: RenderOptions {
                diagnostic: self.diagnostic,
                conflict_style: self.conflict_style,
                placeholder: self.conflict_placeholder.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,
    /// Directory for `linemerge.log`. No file logging when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.into()
}
fn default_parallel_diff() -> bool {
    true
}
fn default_level() -> String {
    "warn".into()
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Like [`Settings::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
