use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::PaperListError;
use crate::pipeline::{ChoicePosition, GroupBy};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub owner: Option<OwnerConfig>,
    pub data: Option<DataConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnerConfig {
    /// Name that gets emphasized and drives the first-author filter.
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// `"comma"` or `"period"` after the last author.
    pub author_separator: Option<String>,
    /// `"first"` or `"last"` for the synthetic first-author filter.
    pub first_author_choice: Option<String>,
    pub page_title: Option<String>,
    /// `"venue-type"` or `"year"`.
    pub group_by: Option<String>,
    pub sort_descending: Option<bool>,
}

impl ConfigFile {
    pub fn owner_name(&self) -> Option<&str> {
        self.owner.as_ref().and_then(|o| o.name.as_deref())
    }

    pub fn data_path(&self) -> Option<PathBuf> {
        self.data
            .as_ref()
            .and_then(|d| d.path.as_deref())
            .map(PathBuf::from)
    }

    /// Configured choice position; unparseable values are logged and ignored.
    pub fn choice_position(&self) -> ChoicePosition {
        self.display
            .as_ref()
            .and_then(|d| d.first_author_choice.as_deref())
            .and_then(|s| {
                s.parse::<ChoicePosition>()
                    .inspect_err(|e| tracing::warn!(error = %e, "ignoring display.first_author_choice"))
                    .ok()
            })
            .unwrap_or_default()
    }

    pub fn group_by(&self) -> Option<GroupBy> {
        self.display
            .as_ref()
            .and_then(|d| d.group_by.as_deref())
            .and_then(|s| {
                s.parse::<GroupBy>()
                    .inspect_err(|e| tracing::warn!(error = %e, "ignoring display.group_by"))
                    .ok()
            })
    }

    pub fn sort_descending(&self) -> Option<bool> {
        self.display.as_ref().and_then(|d| d.sort_descending)
    }
}

/// Platform config directory path: `<config_dir>/paperlist/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("paperlist").join("config.toml"))
}

/// Load config by cascading CWD `.paperlist.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".paperlist.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config");
            Some(config)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let pick = |o: Option<String>, b: Option<String>| o.or(b);
    let (base_owner, base_data, base_display) = (
        base.owner.unwrap_or_default(),
        base.data.unwrap_or_default(),
        base.display.unwrap_or_default(),
    );
    let (over_owner, over_data, over_display) = (
        overlay.owner.unwrap_or_default(),
        overlay.data.unwrap_or_default(),
        overlay.display.unwrap_or_default(),
    );

    ConfigFile {
        owner: Some(OwnerConfig {
            name: pick(over_owner.name, base_owner.name),
        }),
        data: Some(DataConfig {
            path: pick(over_data.path, base_data.path),
        }),
        display: Some(DisplayConfig {
            author_separator: pick(over_display.author_separator, base_display.author_separator),
            first_author_choice: pick(
                over_display.first_author_choice,
                base_display.first_author_choice,
            ),
            page_title: pick(over_display.page_title, base_display.page_title),
            group_by: pick(over_display.group_by, base_display.group_by),
            sort_descending: over_display.sort_descending.or(base_display.sort_descending),
        }),
    }
}

/// Save the config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, PaperListError> {
    let path = config_path()
        .ok_or_else(|| PaperListError::Config("could not determine config directory".into()))?;
    save_to_path(config, &path)?;
    Ok(path)
}

/// Write `config` as pretty TOML, creating parent directories as needed.
pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), PaperListError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| PaperListError::Config(format!("failed to serialize config: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_round_trip_toml() {
        let config = ConfigFile {
            owner: Some(OwnerConfig {
                name: Some("Jane Roe".to_string()),
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.owner_name(), Some("Jane Roe"));
    }

    #[test]
    fn partial_display_section_parses() {
        let toml_str = "[display]\nauthor_separator = \"comma\"\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let display = parsed.display.clone().unwrap();
        assert_eq!(display.author_separator.as_deref(), Some("comma"));
        assert!(display.page_title.is_none());
        assert!(parsed.owner_name().is_none());
        assert_eq!(parsed.choice_position(), ChoicePosition::Last);
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            owner: Some(OwnerConfig {
                name: Some("Base".to_string()),
            }),
            display: Some(DisplayConfig {
                group_by: Some("year".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            owner: Some(OwnerConfig {
                name: Some("Overlay".to_string()),
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        assert_eq!(merged.owner_name(), Some("Overlay"));
        // Fields absent from the overlay fall back to base.
        assert_eq!(merged.group_by(), Some(GroupBy::Year));
    }

    #[test]
    fn merge_base_only_sort_flag() {
        let base = ConfigFile {
            display: Some(DisplayConfig {
                sort_descending: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.sort_descending(), Some(false));
    }

    #[test]
    fn invalid_choice_position_falls_back() {
        let toml_str = "[display]\nfirst_author_choice = \"middle\"\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(parsed.choice_position(), ChoicePosition::Last);

        let toml_str = "[display]\nfirst_author_choice = \"first\"\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(parsed.choice_position(), ChoicePosition::First);
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ConfigFile {
            data: Some(DataConfig {
                path: Some("data/publications.json".to_string()),
            }),
            ..Default::default()
        };
        save_to_path(&config, &path).unwrap();
        let loaded = load_from_path(&path).unwrap();
        assert_eq!(
            loaded.data_path(),
            Some(PathBuf::from("data/publications.json"))
        );
    }

    #[test]
    fn unparseable_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "owner = [").unwrap();
        assert!(load_from_path(&path).is_none());
    }
}
