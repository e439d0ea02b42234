use crate::prelude::{DashboardError, DashboardResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric controls of the pavement panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    RutDepth,
    Esal,
    TrafficSpeed,
    LayerDepth,
    Reliability,
}

/// How a numeric control is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    NumberInput,
    Slider,
}

/// Static description of one numeric control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub field: InputField,
    pub label: &'static str,
    pub unit: &'static str,
    pub min: u32,
    pub max: u32,
    pub default: u32,
    pub step: u32,
    pub widget: WidgetKind,
}

impl FieldSpec {
    pub fn clamp(&self, value: i64) -> u32 {
        value.clamp(i64::from(self.min), i64::from(self.max)) as u32
    }

    /// Echo line shown under the control, e.g. `35 mill.`.
    pub fn echo(&self, value: u32) -> String {
        format!("{} {}", value, self.unit)
    }
}

const FIELD_SPECS: [FieldSpec; 5] = [
    FieldSpec {
        field: InputField::RutDepth,
        label: "Profundidad de rodera",
        unit: "mm",
        min: 0,
        max: 100,
        default: 12,
        step: 1,
        widget: WidgetKind::NumberInput,
    },
    FieldSpec {
        field: InputField::Esal,
        label: "ESAL",
        unit: "mill.",
        min: 0,
        max: 1000,
        default: 35,
        step: 1,
        widget: WidgetKind::NumberInput,
    },
    FieldSpec {
        field: InputField::TrafficSpeed,
        label: "Velocidad de tráfico",
        unit: "km/h",
        min: 0,
        max: 200,
        default: 40,
        step: 1,
        widget: WidgetKind::NumberInput,
    },
    FieldSpec {
        field: InputField::LayerDepth,
        label: "Profundidad de capa",
        unit: "mm",
        min: 0,
        max: 500,
        default: 70,
        step: 1,
        widget: WidgetKind::NumberInput,
    },
    FieldSpec {
        field: InputField::Reliability,
        label: "Confiabilidad",
        unit: "%",
        min: 0,
        max: 100,
        default: 98,
        step: 1,
        widget: WidgetKind::Slider,
    },
];

impl InputField {
    pub const ALL: [InputField; 5] = [
        InputField::RutDepth,
        InputField::Esal,
        InputField::TrafficSpeed,
        InputField::LayerDepth,
        InputField::Reliability,
    ];

    pub fn spec(self) -> &'static FieldSpec {
        match self {
            InputField::RutDepth => &FIELD_SPECS[0],
            InputField::Esal => &FIELD_SPECS[1],
            InputField::TrafficSpeed => &FIELD_SPECS[2],
            InputField::LayerDepth => &FIELD_SPECS[3],
            InputField::Reliability => &FIELD_SPECS[4],
        }
    }

    /// Wire and form key.
    pub fn key(self) -> &'static str {
        match self {
            InputField::RutDepth => "rut_depth",
            InputField::Esal => "esal",
            InputField::TrafficSpeed => "traffic_speed",
            InputField::LayerDepth => "layer_depth",
            InputField::Reliability => "reliability",
        }
    }
}

impl FromStr for InputField {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InputField::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| DashboardError::UnknownField(s.to_string()))
    }
}

/// All numeric control descriptors in panel order.
pub fn field_specs() -> &'static [FieldSpec] {
    &FIELD_SPECS
}

/// Climate interpolation strategy offered by the selector.
///
/// No code path consults the selection; it is echoed back only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    #[default]
    NearestStation,
    Linear,
    Idw,
}

impl InterpolationMode {
    pub const ALL: [InterpolationMode; 3] = [
        InterpolationMode::NearestStation,
        InterpolationMode::Linear,
        InterpolationMode::Idw,
    ];

    pub fn key(self) -> &'static str {
        match self {
            InterpolationMode::NearestStation => "nearest_station",
            InterpolationMode::Linear => "linear",
            InterpolationMode::Idw => "idw",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InterpolationMode::NearestStation => "Estación más cercana (rápido)",
            InterpolationMode::Linear => "Interpolación lineal",
            InterpolationMode::Idw => "Interpolación IDW",
        }
    }
}

impl fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InterpolationMode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InterpolationMode::ALL
            .into_iter()
            .find(|mode| mode.key() == s)
            .ok_or_else(|| DashboardError::UnknownMode(s.to_string()))
    }
}

/// Result of applying one numeric edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    pub field: InputField,
    pub requested: i64,
    pub stored: u32,
}

impl EditOutcome {
    pub fn was_clamped(&self) -> bool {
        self.requested != i64::from(self.stored)
    }
}

/// Pavement parameters entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PavementInputs {
    pub rut_depth: u32,
    pub esal: u32,
    pub traffic_speed: u32,
    pub layer_depth: u32,
    pub reliability: u32,
    pub mode: InterpolationMode,
}

impl Default for PavementInputs {
    fn default() -> Self {
        Self {
            rut_depth: InputField::RutDepth.spec().default,
            esal: InputField::Esal.spec().default,
            traffic_speed: InputField::TrafficSpeed.spec().default,
            layer_depth: InputField::LayerDepth.spec().default,
            reliability: InputField::Reliability.spec().default,
            mode: InterpolationMode::default(),
        }
    }
}

impl PavementInputs {
    pub fn get(&self, field: InputField) -> u32 {
        match field {
            InputField::RutDepth => self.rut_depth,
            InputField::Esal => self.esal,
            InputField::TrafficSpeed => self.traffic_speed,
            InputField::LayerDepth => self.layer_depth,
            InputField::Reliability => self.reliability,
        }
    }

    /// Stores `value` clamped to the field's inclusive bounds.
    pub fn set(&mut self, field: InputField, value: i64) -> EditOutcome {
        let stored = field.spec().clamp(value);
        let slot = match field {
            InputField::RutDepth => &mut self.rut_depth,
            InputField::Esal => &mut self.esal,
            InputField::TrafficSpeed => &mut self.traffic_speed,
            InputField::LayerDepth => &mut self.layer_depth,
            InputField::Reliability => &mut self.reliability,
        };
        *slot = stored;
        EditOutcome {
            field,
            requested: value,
            stored,
        }
    }

    pub fn set_mode(&mut self, mode: InterpolationMode) {
        self.mode = mode;
    }

    /// Parses a raw form value and stores it.
    pub fn set_raw(&mut self, field: InputField, raw: &str) -> DashboardResult<EditOutcome> {
        let value = parse_saturating(raw).ok_or_else(|| DashboardError::InvalidNumber {
            field: field.key().to_string(),
            value: raw.to_string(),
        })?;
        Ok(self.set(field, value))
    }

    pub fn echo(&self, field: InputField) -> String {
        field.spec().echo(self.get(field))
    }
}

/// Parses an integer entry. Digit strings too long for `i64` saturate, so they
/// clamp like any other out-of-range value instead of failing.
pub fn parse_saturating(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_field_specs() {
        let inputs = PavementInputs::default();
        assert_eq!(inputs.rut_depth, 12);
        assert_eq!(inputs.esal, 35);
        assert_eq!(inputs.traffic_speed, 40);
        assert_eq!(inputs.layer_depth, 70);
        assert_eq!(inputs.reliability, 98);
        assert_eq!(inputs.mode, InterpolationMode::NearestStation);
    }

    #[test]
    fn in_range_edit_reads_back() {
        let mut inputs = PavementInputs::default();
        for field in InputField::ALL {
            let spec = field.spec();
            for value in [spec.min, spec.max, (spec.min + spec.max) / 2] {
                let outcome = inputs.set(field, i64::from(value));
                assert!(!outcome.was_clamped());
                assert_eq!(inputs.get(field), value);
            }
        }
    }

    #[test]
    fn out_of_range_edit_clamps_to_nearest_bound() {
        let mut inputs = PavementInputs::default();
        for field in InputField::ALL {
            let spec = field.spec();
            let high = inputs.set(field, i64::from(spec.max) + 17);
            assert!(high.was_clamped());
            assert_eq!(inputs.get(field), spec.max);

            inputs.set(field, -5);
            assert_eq!(inputs.get(field), spec.min);
        }
    }

    #[test]
    fn edit_touches_only_one_field() {
        let mut inputs = PavementInputs::default();
        inputs.set(InputField::Esal, 500);
        let expected = PavementInputs {
            esal: 500,
            ..PavementInputs::default()
        };
        assert_eq!(inputs, expected);
    }

    #[test]
    fn raw_edit_rejects_non_numeric_text() {
        let mut inputs = PavementInputs::default();
        let err = inputs.set_raw(InputField::LayerDepth, "seventy").unwrap_err();
        assert!(matches!(err, DashboardError::InvalidNumber { .. }));
        assert_eq!(inputs.layer_depth, 70);

        inputs.set_raw(InputField::LayerDepth, " 600 ").unwrap();
        assert_eq!(inputs.layer_depth, 500);
    }

    #[test]
    fn overlong_digit_strings_clamp_instead_of_failing() {
        let mut inputs = PavementInputs::default();
        let high = inputs
            .set_raw(InputField::RutDepth, "99999999999999999999")
            .unwrap();
        assert!(high.was_clamped());
        assert_eq!(inputs.rut_depth, 100);

        inputs
            .set_raw(InputField::TrafficSpeed, "-99999999999999999999")
            .unwrap();
        assert_eq!(inputs.traffic_speed, 0);

        assert_eq!(parse_saturating("+42"), Some(42));
        assert_eq!(parse_saturating("12.5"), None);
        assert_eq!(parse_saturating("-"), None);
        assert_eq!(parse_saturating("9e99"), None);
    }

    #[test]
    fn keys_round_trip_through_from_str() {
        for field in InputField::ALL {
            assert_eq!(field.key().parse::<InputField>().unwrap(), field);
        }
        assert_eq!(
            "idw".parse::<InterpolationMode>().unwrap(),
            InterpolationMode::Idw
        );
        assert!("kriging".parse::<InterpolationMode>().is_err());
    }

    #[test]
    fn echo_appends_unit() {
        let inputs = PavementInputs::default();
        assert_eq!(inputs.echo(InputField::Esal), "35 mill.");
        assert_eq!(inputs.echo(InputField::Reliability), "98 %");
    }
}
