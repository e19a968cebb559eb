//! Error types for birdcorr.

/// Result type alias for birdcorr operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for birdcorr.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// A computation parameter was rejected before any work was done.
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Description of the rejected parameter.
        message: String,
    },

    /// No valid audio files found.
    #[error("no valid audio files found in the provided paths")]
    NoValidAudioFiles,

    /// No reference calls found.
    #[error("no reference calls found in '{path}'")]
    NoReferenceCalls {
        /// Directory or file that was searched.
        path: std::path::PathBuf,
    },

    /// Failed to open or decode a WAV file.
    #[error("failed to read audio file '{path}'")]
    AudioOpen {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying decoder error.
        #[source]
        source: hound::Error,
    },

    /// Audio file decoded to zero samples.
    #[error("audio file '{path}' contains no samples")]
    EmptyAudio {
        /// Path to the audio file.
        path: std::path::PathBuf,
    },

    /// Recording is too short for the smoothing window.
    #[error("segment of {samples} samples is shorter than the {window}-sample smoothing window")]
    SegmentTooShort {
        /// Number of samples in the segment.
        samples: usize,
        /// Smoothing window length.
        window: usize,
    },

    /// Failed to read a ground-truth log.
    #[error("failed to read ground-truth log '{path}'")]
    GroundTruthRead {
        /// Path to the ground-truth log.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Ground-truth log has no reference marker row.
    #[error("ground-truth log for '{species}' has no reference marker")]
    MissingAnchor {
        /// Species the log belongs to.
        species: String,
    },

    /// Failed to read a persisted detection file.
    #[error("failed to parse detection file '{path}'")]
    DetectionParse {
        /// Path to the detection file.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A timestamp field could not be parsed.
    #[error("'{path}' line {line}: invalid timestamp '{value}'")]
    TimestampParse {
        /// File containing the timestamp.
        path: std::path::PathBuf,
        /// One-based line number.
        line: usize,
        /// The offending value.
        value: String,
        /// Underlying parse error.
        #[source]
        source: chrono::ParseError,
    },

    /// No species could be processed for a stream block.
    #[error("all {species} species failed for stream block '{path}'")]
    StreamBlock {
        /// Path to the block.
        path: std::path::PathBuf,
        /// Number of species attempted.
        species: usize,
    },

    /// Timestamp arithmetic left the representable range.
    #[error("timestamp out of range for sample {index}")]
    TimestampOverflow {
        /// Sample index being converted.
        index: usize,
    },

    /// A derived rate had a zero denominator.
    #[error("{rate} undefined for '{species}' at threshold {threshold}: zero denominator")]
    UndefinedRate {
        /// Name of the rate (TPR or FAR).
        rate: &'static str,
        /// Species being scored.
        species: String,
        /// Threshold being scored.
        threshold: String,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreateFailed {
        /// Path to the output directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a CSV output file.
    #[error("failed to write CSV file '{path}'")]
    CsvWrite {
        /// Path to the CSV file.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON output")]
    JsonWrite {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}
