//! Matched filtering of a recording against a reference call.

use crate::detect::{AudioSegment, Envelope, ReferenceCall};
use crate::dsp::{ConvolveMode, fft_convolve};
use crate::error::{Error, Result};

/// Correlate `segment` with `call` and return the smoothed energy envelope.
///
/// The call is time-reversed and convolved with the segment ("same" length),
/// so the output peaks where the segment matches the call's shape. The
/// correlation is squared and passed through a `window`-sample moving
/// average, keeping only fully overlapped samples: the envelope is
/// `segment.len() - window + 1` samples long.
pub fn correlate(segment: &AudioSegment, call: &ReferenceCall, window: usize) -> Result<Envelope> {
    if window == 0 {
        return Err(Error::InvalidParameter {
            message: "smoothing window must be at least 1 sample".to_string(),
        });
    }
    if call.samples().is_empty() {
        return Err(Error::InvalidParameter {
            message: format!("reference call '{}' has no samples", call.species()),
        });
    }
    if segment.len() < window {
        return Err(Error::SegmentTooShort {
            samples: segment.len(),
            window,
        });
    }

    let reversed: Vec<f64> = call.samples().iter().rev().copied().collect();
    let correlation = fft_convolve(segment.samples(), &reversed, ConvolveMode::Same);

    let energy: Vec<f64> = correlation.iter().map(|c| c * c).collect();

    #[allow(clippy::cast_precision_loss)]
    let kernel = vec![1.0 / window as f64; window];
    let smoothed = fft_convolve(&energy, &kernel, ConvolveMode::Valid);

    Ok(Envelope::new(smoothed))
}
