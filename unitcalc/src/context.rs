//! Application context
//!
//! Holds what the converter window keeps between events: the active tab, the
//! light/dark theme flag and the calculator session. The conversion engine
//! itself stays stateless.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use unitcalc_calc::Session;
use unitcalc_core::CalcError;
use unitcalc_units::Category;
use crate::EngineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tab {
    Welcome,
    Area,
    Weight,
    Length,
    Temperature,
    Calculator,
}

impl Tab {
    /// Tabs in window order
    pub const ALL: [Tab; 6] = [
        Tab::Welcome,
        Tab::Area,
        Tab::Weight,
        Tab::Length,
        Tab::Temperature,
        Tab::Calculator,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tab::Welcome => "Welcome",
            Tab::Area => "Area",
            Tab::Weight => "Weight",
            Tab::Length => "Length",
            Tab::Temperature => "Temperature",
            Tab::Calculator => "Calculator",
        }
    }

    /// The linear category a converter tab works on
    pub fn category(&self) -> Option<Category> {
        match self {
            Tab::Area => Some(Category::Area),
            Tab::Weight => Some(Category::Weight),
            Tab::Length => Some(Category::Length),
            _ => None,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Tab {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Tab::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CalcError::invalid_input(format!("unknown tab '{}'", wanted)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Per-window interaction state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppContext {
    active_tab: Tab,
    theme: Theme,
    calculator: Session,
}

impl AppContext {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            active_tab: Tab::Welcome,
            theme: Theme::default(),
            calculator: Session::new().with_error_marker(config.calc_error_marker.clone()),
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flip between dark and light, returning the new theme
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn calculator(&self) -> &Session {
        &self.calculator
    }

    pub fn calculator_mut(&mut self) -> &mut Session {
        &mut self.calculator
    }

    /// Press a calculator button by label; `None` for an unknown label
    pub fn press(&mut self, label: &str) -> Option<&str> {
        self.calculator.press_label(label)
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
