use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::fs;

pub const CONFIG_DIR: &str = ".markspace";
pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Light,
    Dark,
    Sepia,
    Custom,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<ColorScheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_colors: Option<BTreeMap<String, String>>,
}

impl ThemeOverrides {
    /// Field-by-field overlay: values set in `over` win.
    pub fn merged(self, over: ThemeOverrides) -> ThemeOverrides {
        ThemeOverrides {
            font_family: over.font_family.or(self.font_family),
            font_size: over.font_size.or(self.font_size),
            line_height: over.line_height.or(self.line_height),
            color_scheme: over.color_scheme.or(self.color_scheme),
            accent_color: over.accent_color.or(self.accent_color),
            interface_font: over.interface_font.or(self.interface_font),
            editor_font: over.editor_font.or(self.editor_font),
            custom_colors: over.custom_colors.or(self.custom_colors),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_wrap: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_numbers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_mode: Option<bool>,
}

impl EditorOverrides {
    pub fn merged(self, over: EditorOverrides) -> EditorOverrides {
        EditorOverrides {
            tab_size: over.tab_size.or(self.tab_size),
            word_wrap: over.word_wrap.or(self.word_wrap),
            line_numbers: over.line_numbers.or(self.line_numbers),
            focus_mode: over.focus_mode.or(self.focus_mode),
        }
    }
}

// Per-workspace settings stored under .markspace/config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub theme: ThemeOverrides,
    #[serde(default)]
    pub editor: EditorOverrides,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<Vec<String>>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            theme: ThemeOverrides {
                font_size: Some(14.0),
                line_height: Some(1.5),
                color_scheme: Some(ColorScheme::Dark),
                accent_color: Some("#e5a84b".to_string()),
                interface_font: Some("Inter".to_string()),
                ..Default::default()
            },
            editor: EditorOverrides {
                tab_size: Some(2),
                word_wrap: Some(true),
                line_numbers: Some(false),
                ..Default::default()
            },
            ignore: Some(vec![
                "node_modules".to_string(),
                ".git".to_string(),
                ".DS_Store".to_string(),
            ]),
        }
    }
}

impl WorkspaceConfig {
    /// Deep-merges `over` onto `self`: `theme` and `editor` field by field,
    /// other keys replaced when set.
    pub fn merged(self, over: WorkspaceConfig) -> WorkspaceConfig {
        WorkspaceConfig {
            theme: self.theme.merged(over.theme),
            editor: self.editor.merged(over.editor),
            ignore: over.ignore.or(self.ignore),
        }
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore
            .as_ref()
            .is_some_and(|names| names.iter().any(|n| n == name))
    }
}

pub fn config_path(root: &str) -> String {
    Path::new(root)
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
        .to_string_lossy()
        .into_owned()
}

/// Reads the workspace config file merged onto `base`. `Ok(None)` when the
/// workspace has no config.
pub fn try_load_config(root: &str, base: &WorkspaceConfig) -> Result<Option<WorkspaceConfig>> {
    let path = config_path(root);
    if !fs::exists(&path)? {
        return Ok(None);
    }

    let content = fs::read_file(&path)?;
    let user: WorkspaceConfig = serde_json::from_str(&content)?;
    Ok(Some(base.clone().merged(user)))
}

/// Like [`try_load_config`], but falls back to `base` on any failure.
pub fn load_config(root: &str, base: &WorkspaceConfig) -> WorkspaceConfig {
    match try_load_config(root, base) {
        Ok(Some(config)) => config,
        Ok(None) => base.clone(),
        Err(e) => {
            log::warn!("Failed to load config for {}: {}", root, e);
            base.clone()
        }
    }
}

pub fn save_config(root: &str, config: &WorkspaceConfig) -> Result<()> {
    let dir = Path::new(root).join(CONFIG_DIR).to_string_lossy().into_owned();
    if !fs::exists(&dir)? {
        fs::create_directory(&dir)?;
    }
    let content = serde_json::to_string_pretty(config)?;
    fs::write_file(&config_path(root), &content)
}
