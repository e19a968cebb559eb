//! CSV detection writers.
//!
//! Detection files hold one timestamp per line with no header.

use crate::constants::extensions;
use crate::detect::{DetectionTable, Threshold};
use crate::error::{Error, Result};
use crate::output::DetectionWriter;
use crate::utils::time::format_timestamp;
use chrono::NaiveDateTime;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Create `path` and its parents.
pub(crate) fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| Error::OutputDirCreateFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn write_timestamps(
    writer: &mut csv::Writer<File>,
    path: &Path,
    timestamps: &[NaiveDateTime],
) -> Result<()> {
    let csv_err = |source| Error::CsvWrite {
        path: path.to_path_buf(),
        source,
    };
    for ts in timestamps {
        writer
            .write_record([format_timestamp(*ts)])
            .map_err(csv_err)?;
    }
    writer.flush()?;
    Ok(())
}

/// Batch-mode writer: one `<threshold>.csv` per threshold in a species directory.
pub struct BatchCsvWriter {
    species_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl BatchCsvWriter {
    /// Create the writer, creating `<run_dir>/<species>` if needed.
    pub fn new(run_dir: &Path, species: &str) -> Result<Self> {
        let species_dir = run_dir.join(species);
        ensure_dir(&species_dir)?;
        Ok(Self {
            species_dir,
            written: Vec::new(),
        })
    }

    /// Directory the threshold files are written to.
    pub fn species_dir(&self) -> &Path {
        &self.species_dir
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Path of the file for `threshold`.
    pub fn threshold_path(&self, threshold: Threshold) -> PathBuf {
        self.species_dir
            .join(format!("{threshold}.{}", extensions::CSV))
    }
}

impl DetectionWriter for BatchCsvWriter {
    fn write_detections(&mut self, threshold: Threshold, timestamps: &[NaiveDateTime]) -> Result<()> {
        let path = self.threshold_path(threshold);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .map_err(|source| Error::CsvWrite {
                path: path.clone(),
                source,
            })?;
        write_timestamps(&mut writer, &path, timestamps)?;
        self.written.push(path);
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Stream-mode writer: appends to a single `<species>.csv`.
pub struct StreamCsvWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl StreamCsvWriter {
    /// Open (or create) the species file under `output_dir` for appending.
    pub fn open(output_dir: &Path, species: &str) -> Result<Self> {
        ensure_dir(output_dir)?;
        let path = output_dir.join(format!("{species}.{}", extensions::CSV));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        Ok(Self { path, writer })
    }

    /// Path of the growing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DetectionWriter for StreamCsvWriter {
    fn write_detections(&mut self, _threshold: Threshold, timestamps: &[NaiveDateTime]) -> Result<()> {
        write_timestamps(&mut self.writer, &self.path, timestamps)
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Write every threshold of `table` through `writer`.
pub fn write_table(writer: &mut dyn DetectionWriter, table: &DetectionTable) -> Result<()> {
    for (threshold, timestamps) in table.iter() {
        writer.write_detections(threshold, timestamps)?;
    }
    writer.finalize()
}
