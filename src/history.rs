//! Sampled concentration time series plotted by the host chart

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// One plotted point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub time_minutes: f64,
    pub concentration_ratio: f64,  // C/C0
    pub intermediate_ratio: f64,
}

impl SamplePoint {
    /// Initial state of every run: full pollutant load, no intermediate
    pub const SEED: SamplePoint = SamplePoint {
        time_minutes: 0.0,
        concentration_ratio: 1.0,
        intermediate_ratio: 0.0,
    };
}

/// Append-only, chronologically ordered sample sequence.
///
/// Never empty: the seed sample is always the first element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleHistory {
    samples: Vec<SamplePoint>,
}

impl Default for SampleHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleHistory {
    pub fn new() -> Self {
        Self {
            samples: vec![SamplePoint::SEED],
        }
    }

    /// Truncate back to the seed sample
    pub fn reset(&mut self) {
        self.samples.truncate(1);
        self.samples[0] = SamplePoint::SEED;
    }

    pub fn latest(&self) -> &SamplePoint {
        // Non-empty by construction
        &self.samples[self.samples.len() - 1]
    }

    /// Append if the sample lies strictly after the latest one.
    ///
    /// Returns false (and drops the sample) when it would break chronology.
    pub fn push(&mut self, sample: SamplePoint) -> bool {
        if sample.time_minutes <= self.latest().time_minutes {
            log::debug!(
                "[history] dropping out-of-order sample at t={:.3} (latest t={:.3})",
                sample.time_minutes,
                self.latest().time_minutes
            );
            return false;
        }
        self.samples.push(sample);
        true
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Never true: the seed sample is always present
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[SamplePoint] {
        &self.samples
    }

    /// Read-only copy handed to the renderer
    pub fn snapshot(&self) -> Vec<SamplePoint> {
        self.samples.clone()
    }

    /// `n × 3` matrix of (time, C/C0, intermediate) rows for chart export
    pub fn to_array(&self) -> Array2<f64> {
        let mut data = Array2::<f64>::zeros((self.samples.len(), 3));
        for (mut row, sample) in data.rows_mut().into_iter().zip(&self.samples) {
            row[0] = sample.time_minutes;
            row[1] = sample.concentration_ratio;
            row[2] = sample.intermediate_ratio;
        }
        data
    }
}
