//! WAV decoding using hound.

use crate::detect::{AudioSegment, ReferenceCall};
use crate::error::{Error, Result};
use hound::{SampleFormat, WavReader};
use std::path::Path;

/// Decoded first-channel samples of a WAV file.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Samples at their stored scale (integer PCM is not normalized).
    pub samples: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channels in the source file.
    pub channels: u16,
}

/// Decode a WAV file, keeping only the first channel.
///
/// Integer PCM keeps its raw amplitude so decision floors expressed in
/// 16-bit units stay meaningful.
pub fn decode_wav(path: &Path) -> Result<DecodedAudio> {
    let open_err = |source| Error::AudioOpen {
        path: path.to_path_buf(),
        source,
    };

    let reader = WavReader::open(path).map_err(open_err)?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let samples = match spec.sample_format {
        SampleFormat::Int => reader
            .into_samples::<i32>()
            .step_by(channels)
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>(),
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .step_by(channels)
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>(),
    }
    .map_err(open_err)?;

    if samples.is_empty() {
        return Err(Error::EmptyAudio {
            path: path.to_path_buf(),
        });
    }

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Load a recording as an [`AudioSegment`].
pub fn load_segment(path: &Path) -> Result<AudioSegment> {
    let decoded = decode_wav(path)?;
    Ok(AudioSegment::new(decoded.samples, decoded.sample_rate))
}

/// Load a reference call; the species id is the file stem.
pub fn load_reference_call(path: &Path) -> Result<ReferenceCall> {
    let species = species_from_path(path)?;
    let decoded = decode_wav(path)?;
    Ok(ReferenceCall::new(species, decoded.samples, decoded.sample_rate))
}

/// Species id for a reference call file (its stem).
pub fn species_from_path(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidParameter {
            message: format!("cannot derive species name from '{}'", path.display()),
        })
}
