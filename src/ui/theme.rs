//! The small flat theme struct (spec §1 non-goals: "styling/theming beyond
//! a small flat theme struct" is the explicit ceiling) plus a TOML loader,
//! following the corpus's config-loading idiom (`toml` + `serde`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiTheme {
    pub font_size: f32,
    pub background: Color,
    pub panel: Color,
    pub accent: Color,
    pub accent_hover: Color,
    pub accent_active: Color,
    pub text: Color,
    pub border: Color,
    pub splitter_thickness: f32,
    pub splitter_hover_thickness: f32,
    pub corner_radius: f32,
}

impl Default for UiTheme {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            background: Color::rgb(30, 30, 34),
            panel: Color::rgb(45, 45, 50),
            accent: Color::rgb(70, 110, 200),
            accent_hover: Color::rgb(90, 130, 220),
            accent_active: Color::rgb(55, 90, 170),
            text: Color::rgb(225, 225, 230),
            border: Color::rgb(20, 20, 24),
            splitter_thickness: 2.0,
            splitter_hover_thickness: 6.0,
            corner_radius: 3.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to read theme file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse theme TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

impl UiTheme {
    pub fn from_toml(path: impl AsRef<std::path::Path>) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ThemeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_toml() {
        let theme = UiTheme::default();
        let encoded = toml::to_string(&theme).expect("serialize theme");
        let decoded: UiTheme = toml::from_str(&encoded).expect("parse theme");
        assert_eq!(decoded, theme);
    }

    #[test]
    fn from_toml_reports_missing_file() {
        let err = UiTheme::from_toml("/nonexistent/theme.toml").unwrap_err();
        assert!(matches!(err, ThemeError::Io { .. }));
    }

    #[test]
    fn from_toml_loads_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("theme.toml");
        std::fs::write(&path, toml::to_string(&UiTheme::default()).unwrap()).unwrap();
        let loaded = UiTheme::from_toml(&path).expect("load theme");
        assert_eq!(loaded, UiTheme::default());
    }
}
