//! Detection data model.

use crate::constants::detection::SWEEP_DECIMALS;
use crate::dsp;
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Mono audio samples at a fixed rate, kept at their raw integer scale.
#[derive(Debug, Clone)]
pub struct AudioSegment {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl AudioSegment {
    /// Create a segment from samples and their sample rate.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Sample values.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the segment holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Waveform template of one species' call, used as the matched-filter kernel.
#[derive(Debug, Clone)]
pub struct ReferenceCall {
    species: String,
    samples: Vec<f64>,
    sample_rate: u32,
}

impl ReferenceCall {
    /// Create a reference call for `species`.
    pub fn new(species: impl Into<String>, samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            species: species.into(),
            samples,
            sample_rate,
        }
    }

    /// Species identifier.
    pub fn species(&self) -> &str {
        &self.species
    }

    /// Template samples in natural time order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample rate of the template in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Smoothed correlation energy, shorter than its segment by `window - 1` samples.
#[derive(Debug, Clone)]
pub struct Envelope {
    values: Vec<f64>,
}

impl Envelope {
    /// Wrap precomputed envelope values.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Envelope values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the envelope is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean of the envelope.
    pub fn mean(&self) -> f64 {
        dsp::mean(&self.values)
    }

    /// Population standard deviation of the envelope.
    pub fn std_dev(&self) -> f64 {
        dsp::std_dev(&self.values)
    }
}

/// A sensitivity multiplier, in standard deviations.
///
/// Totally ordered so it can key a [`DetectionTable`].
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct Threshold(f64);

impl Threshold {
    /// Wrap a multiplier.
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// The multiplier.
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Threshold {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Threshold {}

impl PartialOrd for Threshold {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Threshold {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Threshold {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| format!("'{s}' is not a valid threshold"))?;
        if !value.is_finite() {
            return Err(format!("threshold must be finite, got {value}"));
        }
        Ok(Self(value))
    }
}

/// Ordered set of thresholds; one detection pass runs per value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdSweep {
    values: Vec<Threshold>,
}

impl ThresholdSweep {
    /// A sweep with a single threshold.
    pub fn single(value: f64) -> Self {
        Self {
            values: vec![Threshold(value)],
        }
    }

    /// Evenly spaced thresholds from `start` up to but excluding `stop`.
    pub fn range(start: f64, stop: f64, step: f64) -> Result<Self> {
        if !(start.is_finite() && stop.is_finite() && step.is_finite()) || step <= 0.0 {
            return Err(Error::InvalidParameter {
                message: format!("sweep needs finite bounds and a positive step, got {start}:{stop}:{step}"),
            });
        }
        if stop <= start {
            return Err(Error::InvalidParameter {
                message: format!("sweep stop ({stop}) must be greater than start ({start})"),
            });
        }

        // tolerance keeps 0.005 / 0.0001 from rounding up to 51 steps
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = ((stop - start) / step - 1e-9).ceil() as usize;
        let scale = 10f64.powi(SWEEP_DECIMALS);

        #[allow(clippy::cast_precision_loss)]
        let values = (0..count)
            .map(|i| Threshold((step.mul_add(i as f64, start) * scale).round() / scale))
            .collect();
        Ok(Self { values })
    }

    /// Build a sweep from explicit values, sorted and deduplicated.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(Error::InvalidParameter {
                message: format!("threshold must be finite, got {bad}"),
            });
        }
        let mut values: Vec<Threshold> = values.iter().copied().map(Threshold).collect();
        values.sort();
        values.dedup();
        if values.is_empty() {
            return Err(Error::InvalidParameter {
                message: "threshold sweep is empty".to_string(),
            });
        }
        Ok(Self { values })
    }

    /// Thresholds in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Threshold> + '_ {
        self.values.iter().copied()
    }

    /// Number of thresholds.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the sweep is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One detection of one species at one threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionEvent {
    /// Species identifier.
    pub species: String,
    /// Threshold that produced the detection.
    pub threshold: Threshold,
    /// Absolute time of the detection.
    pub timestamp: NaiveDateTime,
}

/// Detections for one species and one run, keyed by threshold.
///
/// Each sequence is in increasing time order. A threshold that produced no
/// peaks maps to an empty sequence.
#[derive(Debug, Clone, Default)]
pub struct DetectionTable {
    species: String,
    columns: BTreeMap<Threshold, Vec<NaiveDateTime>>,
}

impl DetectionTable {
    /// Empty table for `species`.
    pub fn new(species: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            columns: BTreeMap::new(),
        }
    }

    /// Species identifier.
    pub fn species(&self) -> &str {
        &self.species
    }

    /// Record the detections for `threshold`, replacing any previous column.
    pub fn insert(&mut self, threshold: Threshold, timestamps: Vec<NaiveDateTime>) {
        self.columns.insert(threshold, timestamps);
    }

    /// Detections for `threshold`; empty if the threshold was never run.
    pub fn get(&self, threshold: Threshold) -> &[NaiveDateTime] {
        self.columns.get(&threshold).map_or(&[], Vec::as_slice)
    }

    /// Thresholds present, ascending.
    pub fn thresholds(&self) -> impl Iterator<Item = Threshold> + '_ {
        self.columns.keys().copied()
    }

    /// `(threshold, detections)` pairs, ascending by threshold.
    pub fn iter(&self) -> impl Iterator<Item = (Threshold, &[NaiveDateTime])> {
        self.columns.iter().map(|(t, ts)| (*t, ts.as_slice()))
    }

    /// Every detection as a [`DetectionEvent`].
    pub fn events(&self) -> impl Iterator<Item = DetectionEvent> + '_ {
        self.columns.iter().flat_map(move |(threshold, timestamps)| {
            timestamps.iter().map(move |timestamp| DetectionEvent {
                species: self.species.clone(),
                threshold: *threshold,
                timestamp: *timestamp,
            })
        })
    }

    /// Total detections over all thresholds.
    pub fn detection_count(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    /// Number of thresholds recorded.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no threshold has been recorded.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
