use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

use crate::errors::{CalculatorError, Result};

/// ui colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(CalculatorError::UnknownTheme {
                value: other.to_string(),
            }),
        }
    }
}

/// persistence collaborator for the theme preference
pub trait PreferenceStore {
    fn load_theme(&self) -> Option<String>;
    fn save_theme(&self, theme: &str);
}

/// in-process store
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    theme: RefCell<Option<String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(value: &str) -> Self {
        Self {
            theme: RefCell::new(Some(value.to_string())),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load_theme(&self) -> Option<String> {
        self.theme.borrow().clone()
    }

    fn save_theme(&self, theme: &str) {
        *self.theme.borrow_mut() = Some(theme.to_string());
    }
}

/// current theme, passed explicitly to whatever renders
pub struct ThemeContext<'a> {
    theme: Theme,
    store: &'a dyn PreferenceStore,
}

impl<'a> ThemeContext<'a> {
    /// load the saved preference, falling back to light
    pub fn load(store: &'a dyn PreferenceStore) -> Self {
        let theme = match store.load_theme() {
            Some(saved) => saved.parse::<Theme>().unwrap_or_else(|e| {
                warn!("ignoring saved theme: {}", e);
                Theme::default()
            }),
            None => Theme::default(),
        };
        Self { theme, store }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// persist first, then switch
    pub fn set(&mut self, theme: Theme) {
        self.store.save_theme(theme.as_str());
        self.theme = theme;
        debug!("theme set to {}", theme);
    }

    pub fn toggle(&mut self) -> Theme {
        self.set(self.theme.toggled());
        self.theme
    }
}

impl fmt::Debug for ThemeContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeContext").field("theme", &self.theme).finish()
    }
}
