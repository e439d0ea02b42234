use pgcore::map::MapView;
use pgcore::session::{field_specs, FieldSpec, InputField, PavementInputs, ViewState};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Everything the clients need to draw the session-bound regions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub view: ViewState,
    pub inputs: PavementInputs,
    pub map: MapView,
    #[serde(skip_deserializing, default = "field_specs")]
    pub fields: &'static [FieldSpec],
}

/// Single control edit sent by the page script or the desktop client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputEdit {
    Field { field: String, value: Number },
    Mode { mode: String },
}

/// Integer value of a JSON number. Magnitudes past `i64` saturate so the
/// field clamps them; fractional values have no integer reading.
pub fn saturating_int(number: &Number) -> Option<i64> {
    if let Some(value) = number.as_i64() {
        return Some(value);
    }
    if number.as_u64().is_some() {
        return Some(i64::MAX);
    }
    let value = number.as_f64()?;
    // Float-to-int casts saturate at the i64 bounds.
    (value.fract() == 0.0).then_some(value as i64)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditReply {
    pub status: String,
    pub clamped: bool,
    pub inputs: PavementInputs,
}

/// Urlencoded body of the page's calculate form. Absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculateForm {
    pub rut_depth: Option<String>,
    pub esal: Option<String>,
    pub traffic_speed: Option<String>,
    pub layer_depth: Option<String>,
    pub reliability: Option<String>,
    pub mode: Option<String>,
}

impl CalculateForm {
    pub fn value(&self, field: InputField) -> Option<&str> {
        let value = match field {
            InputField::RutDepth => &self.rut_depth,
            InputField::Esal => &self.esal,
            InputField::TrafficSpeed => &self.traffic_speed,
            InputField::LayerDepth => &self.layer_depth,
            InputField::Reliability => &self.reliability,
        };
        value.as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub tab: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReply {
    pub status: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_edit_accepts_both_shapes() {
        let field: InputEdit = serde_json::from_str(r#"{"field": "esal", "value": 80}"#).unwrap();
        match field {
            InputEdit::Field { value, .. } => assert_eq!(saturating_int(&value), Some(80)),
            other => panic!("unexpected edit {other:?}"),
        }

        let mode: InputEdit = serde_json::from_str(r#"{"mode": "idw"}"#).unwrap();
        assert!(matches!(mode, InputEdit::Mode { .. }));
    }

    #[test]
    fn oversized_json_numbers_saturate() {
        let edit: InputEdit =
            serde_json::from_str(r#"{"field": "esal", "value": 99999999999999999999}"#).unwrap();
        let InputEdit::Field { value, .. } = edit else {
            panic!("expected a field edit");
        };
        assert_eq!(saturating_int(&value), Some(i64::MAX));

        let negative: Number = serde_json::from_str("-99999999999999999999").unwrap();
        assert_eq!(saturating_int(&negative), Some(i64::MIN));
        let huge_unsigned: Number = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(saturating_int(&huge_unsigned), Some(i64::MAX));
        let fractional: Number = serde_json::from_str("12.5").unwrap();
        assert_eq!(saturating_int(&fractional), None);
    }
}
