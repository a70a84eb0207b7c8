//! Tunable boundary conditions of the photocatalytic reactor
//!
//! The four parameters are owned by the host form and read by the kinetics
//! on every tick. Slider input is clamped; bulk replacement is validated.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Documented range of a single parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterRange {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub unit: &'static str,
}

impl ParameterRange {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterName {
    UvIntensity,      // W/m²
    CatalystLoading,  // g/L
    PhLevel,          // dimensionless
    Temperature,      // °C, inert in the rate formula
}

impl ParameterName {
    pub const ALL: [ParameterName; 4] = [
        ParameterName::UvIntensity,
        ParameterName::CatalystLoading,
        ParameterName::PhLevel,
        ParameterName::Temperature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterName::UvIntensity => "uv_intensity",
            ParameterName::CatalystLoading => "catalyst_loading",
            ParameterName::PhLevel => "ph_level",
            ParameterName::Temperature => "temperature",
        }
    }

    pub fn range(&self) -> ParameterRange {
        match self {
            ParameterName::UvIntensity => ParameterRange {
                label: "UV intensity",
                min: 0.0,
                max: 200.0,
                step: 1.0,
                unit: "W/m²",
            },
            ParameterName::CatalystLoading => ParameterRange {
                label: "Catalyst loading",
                min: 0.1,
                max: 5.0,
                step: 0.1,
                unit: "g/L",
            },
            ParameterName::PhLevel => ParameterRange {
                label: "pH",
                min: 3.0,
                max: 11.0,
                step: 0.1,
                unit: "",
            },
            ParameterName::Temperature => ParameterRange {
                label: "System temperature",
                min: 15.0,
                max: 60.0,
                step: 1.0,
                unit: "°C",
            },
        }
    }
}

impl std::str::FromStr for ParameterName {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "uv_intensity" | "uvIntensity" => Ok(ParameterName::UvIntensity),
            "catalyst_loading" | "catalystLoading" => Ok(ParameterName::CatalystLoading),
            "ph_level" | "phLevel" => Ok(ParameterName::PhLevel),
            "temperature" => Ok(ParameterName::Temperature),
            other => Err(SimulationError::Config(format!("unknown parameter '{}'", other))),
        }
    }
}

/// Reactor boundary conditions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub uv_intensity: f64,      // [W/m²]
    pub catalyst_loading: f64,  // [g/L]
    pub ph_level: f64,
    pub temperature: f64,       // [°C]
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            uv_intensity: 80.0,
            catalyst_loading: 1.5,
            ph_level: 7.0,
            temperature: 25.0,
        }
    }
}

impl SimulationParameters {
    pub fn get(&self, name: ParameterName) -> f64 {
        match name {
            ParameterName::UvIntensity => self.uv_intensity,
            ParameterName::CatalystLoading => self.catalyst_loading,
            ParameterName::PhLevel => self.ph_level,
            ParameterName::Temperature => self.temperature,
        }
    }

    /// Store a slider value, clamped to the parameter's range.
    ///
    /// Returns the value actually stored. NaN and infinities are rejected
    /// since there is nothing sensible to clamp them to.
    pub fn set(&mut self, name: ParameterName, value: f64) -> Result<f64> {
        let range = name.range();
        if !value.is_finite() {
            return Err(SimulationError::InvalidParameter {
                name: name.as_str(),
                value,
                min: range.min,
                max: range.max,
            });
        }

        let clamped = value.clamp(range.min, range.max);
        let slot = match name {
            ParameterName::UvIntensity => &mut self.uv_intensity,
            ParameterName::CatalystLoading => &mut self.catalyst_loading,
            ParameterName::PhLevel => &mut self.ph_level,
            ParameterName::Temperature => &mut self.temperature,
        };
        *slot = clamped;
        Ok(clamped)
    }

    /// Strict range check, used for programmatic replacement and config files
    pub fn validate(&self) -> Result<()> {
        for name in ParameterName::ALL {
            let range = name.range();
            let value = self.get(name);
            if !range.contains(value) {
                return Err(SimulationError::InvalidParameter {
                    name: name.as_str(),
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SimulationParameters::default().validate().is_ok());
    }

    #[test]
    fn test_set_clamps_to_range() {
        let mut params = SimulationParameters::default();

        assert_eq!(params.set(ParameterName::UvIntensity, 500.0), Ok(200.0));
        assert_eq!(params.set(ParameterName::CatalystLoading, 0.0), Ok(0.1));
        assert_eq!(params.set(ParameterName::PhLevel, 14.0), Ok(11.0));
        assert_eq!(params.set(ParameterName::Temperature, -5.0), Ok(15.0));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_set_rejects_nan() {
        let mut params = SimulationParameters::default();
        let err = params.set(ParameterName::PhLevel, f64::NAN).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter { name: "ph_level", .. }));
        assert_eq!(params.ph_level, 7.0);
    }

    #[test]
    fn test_validate_reports_offending_parameter() {
        let params = SimulationParameters {
            ph_level: 12.5,
            ..Default::default()
        };
        match params.validate() {
            Err(SimulationError::InvalidParameter { name, min, max, .. }) => {
                assert_eq!(name, "ph_level");
                assert_eq!((min, max), (3.0, 11.0));
            }
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("phLevel".parse::<ParameterName>(), Ok(ParameterName::PhLevel));
        assert_eq!("uv_intensity".parse::<ParameterName>(), Ok(ParameterName::UvIntensity));
        assert!("pressure".parse::<ParameterName>().is_err());
    }
}
