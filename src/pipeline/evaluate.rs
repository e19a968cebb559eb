//! ROC evaluation of a persisted batch run.

use crate::constants::extensions;
use crate::dataset::{read_ground_truth, read_species_run};
use crate::error::Result;
use crate::output::write_roc_dataset;
use crate::pipeline::coordinator::species_from_dir_name;
use crate::scoring::{RocRow, ScoreParams, score_table};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// ROC result for one species of a run.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesEvaluation {
    /// Species identifier.
    pub species: String,
    /// Written ROC dataset.
    pub roc_path: PathBuf,
    /// Rows, ordered by threshold.
    pub rows: Vec<RocRow>,
    /// Thresholds that could not be scored.
    pub failed_thresholds: Vec<f64>,
}

/// ROC results for one run directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationSummary {
    /// Run directory evaluated.
    pub run_dir: PathBuf,
    /// Species scored.
    pub species: Vec<SpeciesEvaluation>,
    /// Species directories that failed, with the reason.
    pub failed_species: Vec<(String, String)>,
}

/// Score every species directory of `run_dir` against its ground-truth log
/// in `truth_dir`, writing one ROC dataset per species to `roc_dir`.
///
/// A species whose ground truth or detections cannot be read is logged and
/// skipped.
pub fn evaluate_run(
    run_dir: &Path,
    truth_dir: &Path,
    roc_dir: &Path,
    params: &ScoreParams,
) -> Result<EvaluationSummary> {
    params.validate()?;

    let mut species_dirs: Vec<PathBuf> = std::fs::read_dir(run_dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    species_dirs.retain(|p| p.is_dir());
    species_dirs.sort();

    let mut summary = EvaluationSummary {
        run_dir: run_dir.to_path_buf(),
        ..EvaluationSummary::default()
    };

    for dir in &species_dirs {
        let dir_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let species = species_from_dir_name(&dir_name).to_string();

        match evaluate_species(dir, &species, truth_dir, roc_dir, params) {
            Ok(evaluation) => {
                info!(
                    "{species}: {} threshold(s) scored -> {}",
                    evaluation.rows.len(),
                    evaluation.roc_path.display()
                );
                summary.species.push(evaluation);
            }
            Err(e) => {
                error!("{species}: {e}");
                summary.failed_species.push((species, e.to_string()));
            }
        }
    }

    Ok(summary)
}

fn evaluate_species(
    dir: &Path,
    species: &str,
    truth_dir: &Path,
    roc_dir: &Path,
    params: &ScoreParams,
) -> Result<SpeciesEvaluation> {
    let truth_path = truth_dir.join(format!("{species}.{}", extensions::CSV));
    let truth = read_ground_truth(&truth_path, species)?;
    let table = read_species_run(dir, species)?;

    let dataset = score_table(&table, &truth, params);
    let roc_path = write_roc_dataset(roc_dir, &dataset)?;

    Ok(SpeciesEvaluation {
        species: species.to_string(),
        roc_path,
        failed_thresholds: dataset.failed.iter().map(|t| t.value()).collect(),
        rows: dataset.rows,
    })
}
