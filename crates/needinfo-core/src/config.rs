use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::escalation::Thresholds;

/// Project-level configuration stored at `.needinfo/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub labels: LabelConfig,
    #[serde(default)]
    pub automation: AutomationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default = "default_needs_info_label")]
    pub needs_info: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            needs_info: default_needs_info_label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationConfig {
    /// Bot logins. Their events never toggle needs-info, and only their
    /// comments count as posted boilerplate.
    #[serde(default = "default_automation_identities")]
    pub identities: Vec<String>,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            identities: default_automation_identities(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

/// Validation failures for an otherwise well-formed config.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("warn_days ({warn_days}) must be lower than expire_days ({expire_days})")]
    InvalidThresholds { warn_days: u32, expire_days: u32 },

    #[error("labels.needs_info must not be empty")]
    EmptyLabel,
}

/// Validated runtime settings for an evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageSettings {
    pub thresholds: Thresholds,
    pub label: String,
    pub automation: HashSet<String>,
}

impl Default for TriageSettings {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            label: default_needs_info_label(),
            automation: default_automation_identities().into_iter().collect(),
        }
    }
}

impl ProjectConfig {
    /// Validate and convert into [`TriageSettings`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when thresholds are inverted or the label is blank.
    pub fn settings(&self) -> Result<TriageSettings, ConfigError> {
        let Thresholds {
            warn_days,
            expire_days,
        } = self.thresholds;
        if warn_days >= expire_days {
            return Err(ConfigError::InvalidThresholds {
                warn_days,
                expire_days,
            });
        }

        let label = self.labels.needs_info.trim();
        if label.is_empty() {
            return Err(ConfigError::EmptyLabel);
        }

        Ok(TriageSettings {
            thresholds: self.thresholds,
            label: label.to_string(),
            automation: self.automation.identities.iter().cloned().collect(),
        })
    }
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".needinfo/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("needinfo/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load project and user config. `resolved_output` is the output mode the
/// caller settled on after applying flags and environment.
pub fn resolve_config(
    project_root: &Path,
    resolved_output: impl Into<String>,
) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output: resolved_output.into(),
    })
}

fn default_needs_info_label() -> String {
    "needs_info".to_string()
}

fn default_automation_identities() -> Vec<String> {
    vec!["ansibot".to_string(), "ansibotdev".to_string()]
}
