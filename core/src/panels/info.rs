use crate::panels::climate::ClimatePanel;
use crate::prelude::DashboardError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const PAGE_TITLE: &str = "Sistema de Selección de PG en Perú";
pub const PAGE_SUBTITLE: &str = "Evaluación de Pavimentos Asfálticos - Perú";
pub const FOOTER: &str =
    "© 2024 Sistema de Selección de PG en Perú | Evaluación de Pavimentos Asfálticos";
/// Mode line printed under the map regardless of the selector.
pub const POINT_MODE_LINE: &str = "1_Estacion";

/// Tabs of the right-hand column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Pavement,
    Climate,
    Charts,
    ShrpLtpp,
    Rdm,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Pavement, Tab::Climate, Tab::Charts, Tab::ShrpLtpp, Tab::Rdm];

    pub fn key(self) -> &'static str {
        match self {
            Tab::Pavement => "pavement",
            Tab::Climate => "climate",
            Tab::Charts => "charts",
            Tab::ShrpLtpp => "shrp_ltpp",
            Tab::Rdm => "rdm",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Tab::Pavement => "🛣️",
            Tab::Climate => "🌡️",
            Tab::Charts => "📊",
            Tab::ShrpLtpp => "⚙️",
            Tab::Rdm => "📈",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Pavement => "Pavimento",
            Tab::Climate => "Clima",
            Tab::Charts => "Gráficas",
            Tab::ShrpLtpp => "SHRP/LTPP",
            Tab::Rdm => "RDM",
        }
    }

    pub fn title(self) -> String {
        format!("{} {}", self.icon(), self.label())
    }
}

impl FromStr for Tab {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.key() == s)
            .ok_or_else(|| DashboardError::UnknownTab(s.to_string()))
    }
}

/// Tab that only carries a heading and one informational note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderPanel {
    pub tab: Tab,
    pub heading: String,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sidebar {
    pub guide_title: String,
    pub guide_steps: Vec<String>,
    pub about_title: String,
    pub about: String,
    pub version: String,
    pub audience: String,
}

impl Default for Sidebar {
    fn default() -> Self {
        Self {
            guide_title: "Guía de uso".into(),
            guide_steps: vec![
                "Seleccione el modo de interpolación".into(),
                "Ingrese los parámetros del pavimento".into(),
                "Verifique la ubicación en el mapa".into(),
                "Presione 'Guardar y Calcular'".into(),
                "Revise los resultados y gráficas".into(),
            ],
            about_title: "Acerca de".into(),
            about: "Sistema de evaluación y selección de Performance Grade para pavimentos \
                    asfálticos en Perú."
                .into(),
            version: "1.0".into(),
            audience: "Evaluación de Pavimentos".into(),
        }
    }
}

/// All non-interactive content of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticPanels {
    pub title: String,
    pub subtitle: String,
    pub climate: ClimatePanel,
    pub placeholders: Vec<PlaceholderPanel>,
    pub sidebar: Sidebar,
    pub point_mode: String,
    pub footer: String,
}

impl StaticPanels {
    pub fn new() -> Self {
        Self {
            title: PAGE_TITLE.into(),
            subtitle: PAGE_SUBTITLE.into(),
            climate: ClimatePanel::placeholder(),
            placeholders: vec![
                PlaceholderPanel {
                    tab: Tab::Charts,
                    heading: "Gráficas".into(),
                    note: "Esta sección mostrará gráficas de temperaturas, distribución de \
                           cargas y análisis de desempeño."
                        .into(),
                },
                PlaceholderPanel {
                    tab: Tab::ShrpLtpp,
                    heading: "SHRP/LTPP".into(),
                    note: "Esta sección mostrará datos del programa Strategic Highway Research \
                           Program y Long-Term Pavement Performance."
                        .into(),
                },
                PlaceholderPanel {
                    tab: Tab::Rdm,
                    heading: "RDM".into(),
                    note: "Esta sección mostrará el análisis de Diseño de Mezcla Resiliente."
                        .into(),
                },
            ],
            sidebar: Sidebar::default(),
            point_mode: POINT_MODE_LINE.into(),
            footer: FOOTER.into(),
        }
    }

    pub fn placeholder(&self, tab: Tab) -> Option<&PlaceholderPanel> {
        self.placeholders.iter().find(|panel| panel.tab == tab)
    }
}

impl Default for StaticPanels {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_informational_tab_has_a_placeholder() {
        let panels = StaticPanels::new();
        for tab in [Tab::Charts, Tab::ShrpLtpp, Tab::Rdm] {
            assert!(panels.placeholder(tab).is_some(), "{:?}", tab);
        }
        assert!(panels.placeholder(Tab::Pavement).is_none());
        assert_eq!(panels.sidebar.guide_steps.len(), 5);
    }

    #[test]
    fn tab_keys_parse_back() {
        for tab in Tab::ALL {
            assert_eq!(tab.key().parse::<Tab>().unwrap(), tab);
        }
        assert!("weather".parse::<Tab>().is_err());
    }
}
