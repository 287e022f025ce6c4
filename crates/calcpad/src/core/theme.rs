//! Light/dark theme preference

use serde::{Deserialize, Serialize};

/// Color theme, persisted as `"dark"` or `"light"`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark background (default)
    #[default]
    Dark,
    /// Light background
    Light,
}

impl Theme {
    /// Returns the other theme
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Stored form of the theme
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parses the stored form; anything else is `None`
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Icon class shown on the theme toggle
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Dark => "fa-moon",
            Self::Light => "fa-sun",
        }
    }

    /// Class added to `body`, if any
    #[must_use]
    pub const fn body_class(self) -> Option<&'static str> {
        match self {
            Self::Dark => None,
            Self::Light => Some("light-theme"),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
