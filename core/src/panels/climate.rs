use serde::{Deserialize, Serialize};

/// Direction of a metric's change indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub trend: Trend,
    pub amount: String,
}

impl MetricDelta {
    pub fn arrow(&self) -> &'static str {
        match self.trend {
            Trend::Up => "↑",
            Trend::Down => "↓",
        }
    }

    pub fn display(&self) -> String {
        format!("{} {}", self.arrow(), self.amount)
    }
}

/// Fixed label/value pair shown on the climate tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimateMetric {
    pub label: String,
    pub value: String,
    pub delta: Option<MetricDelta>,
}

impl ClimateMetric {
    fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            delta: None,
        }
    }

    fn with_delta(mut self, trend: Trend, amount: &str) -> Self {
        self.delta = Some(MetricDelta {
            trend,
            amount: amount.into(),
        });
        self
    }
}

/// Placeholder climate figures, laid out in two columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimatePanel {
    pub title: String,
    pub columns: [Vec<ClimateMetric>; 2],
}

impl ClimatePanel {
    /// These values are not looked up; they do not depend on the location.
    pub fn placeholder() -> Self {
        Self {
            title: "Datos Climáticos".into(),
            columns: [
                vec![
                    ClimateMetric::new("Temperatura Máxima", "35°C").with_delta(Trend::Up, "2°C"),
                    ClimateMetric::new("Temperatura Mínima", "22°C")
                        .with_delta(Trend::Down, "1°C"),
                    ClimateMetric::new("Humedad Relativa", "75%"),
                ],
                vec![
                    ClimateMetric::new("Precipitación Anual", "2,500 mm"),
                    ClimateMetric::new("Velocidad del Viento", "15 km/h"),
                    ClimateMetric::new("Radiación Solar", "850 W/m²"),
                ],
            ],
        }
    }

    pub fn metrics(&self) -> impl Iterator<Item = &ClimateMetric> {
        self.columns.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_has_six_metrics_with_two_deltas() {
        let panel = ClimatePanel::placeholder();
        assert_eq!(panel.metrics().count(), 6);
        let deltas: Vec<String> = panel
            .metrics()
            .filter_map(|metric| metric.delta.as_ref().map(MetricDelta::display))
            .collect();
        assert_eq!(deltas, vec!["↑ 2°C", "↓ 1°C"]);
    }
}
