//! Input discovery and run naming.

use crate::audio::load_reference_call;
use crate::constants::{RUN_NAME_PREFIX, RUN_NAME_TIMESTAMP_FORMAT, SPECIES_DIR_SEPARATOR, extensions};
use crate::detect::ReferenceCall;
use crate::error::{Error, Result};
use crate::utils::time::debug_epoch;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Collect WAV files from paths (files and directories).
///
/// Explicit files keep their given order; directory contents are visited in
/// name order.
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_wav_file(path) {
                files.push(path.clone());
            } else {
                warn!("Skipping non-WAV file: {}", path.display());
            }
        } else if path.is_dir() {
            collect_wav_files_recursive(path, &mut files)?;
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    Ok(files)
}

/// Recursively collect WAV files from a directory.
fn collect_wav_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_wav_files_recursive(&path, files)?;
        } else if is_wav_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Check if a file has a `.wav` extension.
fn is_wav_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extensions::WAV))
}

/// Load reference calls from files or directories (top level only).
///
/// Calls that fail to load are logged and skipped.
pub fn load_reference_calls(paths: &[PathBuf]) -> Result<Vec<ReferenceCall>> {
    let mut candidates = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in std::fs::read_dir(path)? {
                let entry_path = entry?.path();
                if entry_path.is_file() && is_wav_file(&entry_path) {
                    candidates.push(entry_path);
                }
            }
        } else if is_wav_file(path) {
            candidates.push(path.clone());
        } else {
            warn!("Skipping non-WAV reference call: {}", path.display());
        }
    }
    candidates.sort();

    let mut calls = Vec::with_capacity(candidates.len());
    for path in &candidates {
        match load_reference_call(path) {
            Ok(call) => calls.push(call),
            Err(e) => error!("Skipping reference call {}: {e}", path.display()),
        }
    }

    if calls.is_empty() {
        return Err(Error::NoReferenceCalls {
            path: paths.first().cloned().unwrap_or_default(),
        });
    }
    info!("Loaded {} reference call(s)", calls.len());
    Ok(calls)
}

/// Name of the run directory for one input recording.
///
/// Without an explicit name: `Correlation <stem> <started>`. With one, the
/// name is used as-is for a single input and suffixed with the stem when
/// several inputs share it.
pub fn run_name_for(
    input: &Path,
    explicit: Option<&str>,
    multiple_inputs: bool,
    started: NaiveDateTime,
) -> String {
    let stem = input
        .file_stem()
        .map_or_else(|| std::borrow::Cow::Borrowed("recording"), |s| s.to_string_lossy());

    match explicit {
        Some(name) if multiple_inputs => format!("{name} {stem}"),
        Some(name) => name.to_string(),
        None => format!(
            "{RUN_NAME_PREFIX} {stem} {}",
            started.format(RUN_NAME_TIMESTAMP_FORMAT)
        ),
    }
}

/// Species id of a run sub-directory: the part after the last `--`.
pub fn species_from_dir_name(name: &str) -> &str {
    name.rsplit(SPECIES_DIR_SEPARATOR).next().unwrap_or(name)
}

/// Base time for timestamps: the debug epoch or the given wall-clock time.
pub fn base_time(use_debug_epoch: bool, now: NaiveDateTime) -> NaiveDateTime {
    if use_debug_epoch { debug_epoch() } else { now }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn started() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(6, 30, 5)
            .unwrap()
    }

    #[test]
    fn test_default_run_name() {
        let name = run_name_for(Path::new("/data/dawn.wav"), None, false, started());
        assert_eq!(name, "Correlation dawn 2024-05-01_06-30-05");
    }

    #[test]
    fn test_explicit_run_name() {
        let input = Path::new("/data/dawn.wav");
        assert_eq!(run_name_for(input, Some("trial"), false, started()), "trial");
        assert_eq!(run_name_for(input, Some("trial"), true, started()), "trial dawn");
    }

    #[test]
    fn test_species_from_dir_name() {
        assert_eq!(species_from_dir_name("site-a--wren"), "wren");
        assert_eq!(species_from_dir_name("a--b--Northern Cardinal"), "Northern Cardinal");
        assert_eq!(species_from_dir_name("wren"), "wren");
    }

    #[test]
    fn test_is_wav_file() {
        assert!(is_wav_file(Path::new("call.wav")));
        assert!(is_wav_file(Path::new("CALL.WAV")));
        assert!(is_wav_file(Path::new("ääni.wav")));
        assert!(!is_wav_file(Path::new("call.flac")));
    }

    #[test]
    fn test_collect_input_files_keeps_explicit_order() {
        let dir = TempDir::new().unwrap();
        let late = dir.path().join("b.wav");
        let early = dir.path().join("a.wav");
        fs::write(&late, b"").unwrap();
        fs::write(&early, b"").unwrap();

        let files = collect_input_files(&[late.clone(), early.clone()]).unwrap();
        assert_eq!(files, vec![late, early]);
    }

    #[test]
    fn test_collect_input_files_recursive_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("day2")).unwrap();
        fs::write(dir.path().join("day2").join("b.wav"), b"").unwrap();
        fs::write(dir.path().join("a.wav"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let files = collect_input_files(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.wav"));
    }

    #[test]
    fn test_no_reference_calls() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_reference_calls(&[dir.path().to_path_buf()]),
            Err(Error::NoReferenceCalls { .. })
        ));
    }
}
