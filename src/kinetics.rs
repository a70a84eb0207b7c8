//! First-order photocatalytic decay kinetics
//!
//! The rate constant is a closed-form function of UV intensity, catalyst
//! loading and pH. Temperature is carried in the parameters but does not
//! enter the rate formula.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::parameters::SimulationParameters;

/// Kinetic constants
pub mod constants {
    /// Base rate constant at 100 W/m², 1 g/L, neutral pH [1/min]
    pub const BASE_RATE_PER_MIN: f64 = 0.05;
    /// Reference UV intensity [W/m²]
    pub const REFERENCE_UV: f64 = 100.0;
    pub const NEUTRAL_PH: f64 = 7.0;
    /// Rate loss per pH unit away from neutral
    pub const PH_PENALTY_PER_UNIT: f64 = 0.1;
    /// Intermediate species decay constant [1/min]
    pub const INTERMEDIATE_DECAY_PER_MIN: f64 = 0.1;
}

/// Concentrations at one instant, relative to the initial pollutant load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KineticsPoint {
    pub concentration_ratio: f64,  // C/C0
    pub intermediate_ratio: f64,
}

/// pH efficiency factor, floored at zero so k never goes negative
pub fn ph_factor(ph_level: f64) -> f64 {
    (1.0 - (ph_level - constants::NEUTRAL_PH).abs() * constants::PH_PENALTY_PER_UNIT).max(0.0)
}

/// Instantaneous rate constant k [1/min]
pub fn rate_constant(params: &SimulationParameters) -> Result<f64> {
    let k = constants::BASE_RATE_PER_MIN
        * (params.uv_intensity / constants::REFERENCE_UV)
        * params.catalyst_loading
        * ph_factor(params.ph_level);

    if !k.is_finite() {
        return Err(SimulationError::NonFiniteResult {
            quantity: "rate constant",
            time_minutes: 0.0,
        });
    }
    Ok(k)
}

/// Evaluate C/C0 and the intermediate ratio at `time_minutes` for rate `k`
pub fn evaluate(k: f64, time_minutes: f64) -> Result<KineticsPoint> {
    let concentration_ratio = (-k * time_minutes).exp();
    if !concentration_ratio.is_finite() {
        return Err(SimulationError::NonFiniteResult {
            quantity: "concentration ratio",
            time_minutes,
        });
    }

    let intermediate_ratio = (1.0 - concentration_ratio)
        * (-constants::INTERMEDIATE_DECAY_PER_MIN * time_minutes).exp();
    if !intermediate_ratio.is_finite() {
        return Err(SimulationError::NonFiniteResult {
            quantity: "intermediate ratio",
            time_minutes,
        });
    }

    Ok(KineticsPoint {
        concentration_ratio,
        intermediate_ratio,
    })
}

/// Recompute k from the current parameters and evaluate at `time_minutes`
pub fn sample_at(params: &SimulationParameters, time_minutes: f64) -> Result<KineticsPoint> {
    let k = rate_constant(params)?;
    evaluate(k, time_minutes)
}

/// Predicted C/C0 curve over a time grid, for what-if overlays
pub fn predict_curve(params: &SimulationParameters, times: &Array1<f64>) -> Result<Array1<f64>> {
    let k = rate_constant(params)?;
    Ok(times.mapv(|t| (-k * t).exp()))
}

/// Time for C/C0 to halve [min]; None when nothing degrades
pub fn half_life_minutes(k: f64) -> Option<f64> {
    if k > 0.0 {
        Some(std::f64::consts::LN_2 / k)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterName;

    fn reference_params() -> SimulationParameters {
        SimulationParameters {
            uv_intensity: 100.0,
            catalyst_loading: 1.0,
            ph_level: 7.0,
            temperature: 25.0,
        }
    }

    #[test]
    fn test_reference_rate_constant() {
        let k = rate_constant(&reference_params()).unwrap();
        assert!((k - 0.05).abs() < 1e-12);

        let point = evaluate(k, 60.0).unwrap();
        assert!((point.concentration_ratio - (-3.0f64).exp()).abs() < 1e-3);
        assert!((point.concentration_ratio - 0.0498).abs() < 1e-3);
    }

    #[test]
    fn test_ph_sensitivity() {
        let params = SimulationParameters {
            ph_level: 9.0,
            ..reference_params()
        };
        assert!((ph_factor(9.0) - 0.8).abs() < 1e-12);

        let k = rate_constant(&params).unwrap();
        assert!((k - 0.04).abs() < 1e-12);

        let point = evaluate(k, 60.0).unwrap();
        assert!((point.concentration_ratio - 0.0907).abs() < 1e-3);
    }

    #[test]
    fn test_ph_factor_never_negative() {
        assert_eq!(ph_factor(20.0), 0.0);
        assert_eq!(ph_factor(-10.0), 0.0);
        assert!((ph_factor(3.0) - 0.6).abs() < 1e-12);
        assert!((ph_factor(11.0) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_temperature_is_inert() {
        let cold = reference_params();
        let mut hot = cold;
        hot.set(ParameterName::Temperature, 60.0).unwrap();
        assert_eq!(rate_constant(&cold).unwrap(), rate_constant(&hot).unwrap());
    }

    #[test]
    fn test_ratios_bounded_over_parameter_corners() {
        let corners = [
            (0.0, 0.1, 3.0),
            (200.0, 5.0, 7.0),
            (200.0, 5.0, 11.0),
            (1.0, 0.1, 11.0),
            (80.0, 1.5, 7.0),
        ];
        for (uv, catalyst, ph) in corners {
            let params = SimulationParameters {
                uv_intensity: uv,
                catalyst_loading: catalyst,
                ph_level: ph,
                temperature: 25.0,
            };
            let k = rate_constant(&params).unwrap();
            for step in 0..=120 {
                let t = step as f64 * 0.5;
                let point = evaluate(k, t).unwrap();
                assert!(point.concentration_ratio > 0.0 && point.concentration_ratio <= 1.0);
                assert!(point.intermediate_ratio >= 0.0 && point.intermediate_ratio < 1.0);
            }
        }
    }

    #[test]
    fn test_seed_point() {
        let point = sample_at(&SimulationParameters::default(), 0.0).unwrap();
        assert_eq!(point.concentration_ratio, 1.0);
        assert_eq!(point.intermediate_ratio, 0.0);
    }

    #[test]
    fn test_non_finite_rate_is_rejected() {
        let params = SimulationParameters {
            uv_intensity: f64::INFINITY,
            ..reference_params()
        };
        assert!(matches!(
            rate_constant(&params),
            Err(SimulationError::NonFiniteResult { .. })
        ));
    }

    #[test]
    fn test_predict_curve_matches_pointwise() {
        let params = reference_params();
        let times = Array1::linspace(0.0, 60.0, 13);
        let curve = predict_curve(&params, &times).unwrap();

        assert_eq!(curve.len(), 13);
        assert_eq!(curve[0], 1.0);
        for (t, c) in times.iter().zip(curve.iter()) {
            let point = sample_at(&params, *t).unwrap();
            assert!((point.concentration_ratio - c).abs() < 1e-12);
        }
    }

    #[test]
    fn test_half_life() {
        let half = half_life_minutes(0.05).unwrap();
        assert!((evaluate(0.05, half).unwrap().concentration_ratio - 0.5).abs() < 1e-12);
        assert_eq!(half_life_minutes(0.0), None);
    }
}
