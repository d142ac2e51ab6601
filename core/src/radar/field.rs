use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// A moment field, ray by gate, with CF-style attributes. Missing gates are NaN.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldData {
    #[serde(with = "missing_as_null")]
    pub data: Array2<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_max: Option<f64>,
}

impl FieldData {
    pub fn new(data: Array2<f64>) -> Self {
        Self {
            data,
            units: None,
            standard_name: None,
            long_name: None,
            valid_min: None,
            valid_max: None,
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn with_standard_name(mut self, name: impl Into<String>) -> Self {
        self.standard_name = Some(name.into());
        self
    }

    pub fn with_long_name(mut self, name: impl Into<String>) -> Self {
        self.long_name = Some(name.into());
        self
    }

    pub fn with_valid_range(mut self, min: f64, max: f64) -> Self {
        self.valid_min = Some(min);
        self.valid_max = Some(max);
        self
    }

    /// Standard name, then long name, then the supplied key.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.standard_name
            .as_deref()
            .or(self.long_name.as_deref())
            .unwrap_or(key)
    }
}

/// Missing gates travel as `null`, since JSON has no NaN.
mod missing_as_null {
    use ndarray::Array2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(data: &Array2<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        data.mapv(|value| value.is_finite().then_some(value))
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Array2<f64>, D::Error> {
        let data = Array2::<Option<f64>>::deserialize(deserializer)?;
        Ok(data.mapv(|value| value.unwrap_or(f64::NAN)))
    }
}
