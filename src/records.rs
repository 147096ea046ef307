//! Typed run artifacts and their JSON persistence.
//!
//! Benchmark and reconstitution records keep their entries sorted by
//! generator count, both when built and when read back, so consumers never
//! sort.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scaling_fit::ScalingModel;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to (de)serialize {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Timing statistics for one generator count
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimingEntry {
    pub generator_count: usize,
    pub mean_seconds: f64,
    pub std_seconds: f64,
    pub repeats: usize,
}

/// Mean and standard deviation of construction time per generator count
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(from = "BenchmarkRecordFile")]
pub struct BenchmarkRecord {
    engine: String,
    entries: Vec<TimingEntry>,
}

#[derive(Deserialize)]
struct BenchmarkRecordFile {
    engine: String,
    entries: Vec<TimingEntry>,
}

impl From<BenchmarkRecordFile> for BenchmarkRecord {
    fn from(file: BenchmarkRecordFile) -> Self {
        BenchmarkRecord::new(file.engine, file.entries)
    }
}

impl BenchmarkRecord {
    /// Sorts by generator count; for repeated counts the last entry wins
    pub fn new(engine: impl Into<String>, mut entries: Vec<TimingEntry>) -> Self {
        entries.reverse();
        entries.sort_by_key(|e| e.generator_count);
        entries.dedup_by_key(|e| e.generator_count);
        Self {
            engine: engine.into(),
            entries,
        }
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn entries(&self) -> &[TimingEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn generator_counts(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.generator_count as f64).collect()
    }

    pub fn mean_times(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.mean_seconds).collect()
    }

    pub fn entry_for(&self, generator_count: usize) -> Option<&TimingEntry> {
        self.entries
            .binary_search_by_key(&generator_count, |e| e.generator_count)
            .ok()
            .map(|i| &self.entries[i])
    }
}

/// Reconstituted area for one generator count
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReconstitutionEntry {
    pub generator_count: usize,
    pub percent_reconstituted: f64,
    /// Regions that fell back to the sentinel area
    pub degenerate_polygons: usize,
}

/// Percentage of the theoretical sphere area recovered, per generator count
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(from = "ReconstitutionRecordFile")]
pub struct ReconstitutionRecord {
    engine: String,
    radius: f64,
    entries: Vec<ReconstitutionEntry>,
}

#[derive(Deserialize)]
struct ReconstitutionRecordFile {
    engine: String,
    radius: f64,
    entries: Vec<ReconstitutionEntry>,
}

impl From<ReconstitutionRecordFile> for ReconstitutionRecord {
    fn from(file: ReconstitutionRecordFile) -> Self {
        ReconstitutionRecord::new(file.engine, file.radius, file.entries)
    }
}

impl ReconstitutionRecord {
    pub fn new(engine: impl Into<String>, radius: f64, mut entries: Vec<ReconstitutionEntry>) -> Self {
        entries.sort_by_key(|e| e.generator_count);
        Self {
            engine: engine.into(),
            radius,
            entries,
        }
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn entries(&self) -> &[ReconstitutionEntry] {
        &self.entries
    }

    pub fn generator_counts(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.generator_count).collect()
    }

    pub fn percentages(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.percent_reconstituted).collect()
    }
}

/// Best-fit constant of one scaling model
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ModelFit {
    pub model: ScalingModel,
    pub k: f64,
    /// Variance estimate of `k`; absent when it cannot be estimated
    pub k_variance: Option<f64>,
    pub residual_sum_squares: f64,
    pub converged: bool,
}

/// Fitted scaling models sampled over an extended range
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FitRecord {
    pub engine: String,
    pub fits: Vec<ModelFit>,
    pub sample_x: Vec<f64>,
    pub loglinear: Vec<f64>,
    pub linear: Vec<f64>,
    pub quadratic: Vec<f64>,
}

impl FitRecord {
    pub fn fit_for(&self, model: ScalingModel) -> Option<&ModelFit> {
        self.fits.iter().find(|f| f.model == model)
    }
}

/// Write `record` as pretty-printed JSON, creating parent directories
pub fn save_record<T: Serialize, P: AsRef<Path>>(record: &T, path: P) -> Result<(), RecordError> {
    let path = path.as_ref();
    let io_err = |source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, record).map_err(|source| RecordError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_err)?;

    tracing::debug!(path = %path.display(), "record written");
    Ok(())
}

/// Read a record written by [`save_record`]
pub fn load_record<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, RecordError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| RecordError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(generator_count: usize, mean_seconds: f64) -> TimingEntry {
        TimingEntry {
            generator_count,
            mean_seconds,
            std_seconds: 0.0,
            repeats: 1,
        }
    }

    #[test]
    fn test_benchmark_record_sorted_and_deduplicated() {
        let record = BenchmarkRecord::new(
            "qhull",
            vec![entry(1000, 0.3), entry(10, 0.1), entry(100, 0.2), entry(10, 0.15)],
        );
        assert_eq!(record.generator_counts(), vec![10.0, 100.0, 1000.0]);
        assert_eq!(record.entry_for(10).unwrap().mean_seconds, 0.15);
        assert!(record.entry_for(11).is_none());
    }

    #[test]
    fn test_unsorted_file_is_sorted_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.json");
        fs::write(
            &path,
            r#"{"engine": "legacy", "entries": [
                {"generator_count": 500, "mean_seconds": 2.0, "std_seconds": 0.1, "repeats": 5},
                {"generator_count": 50, "mean_seconds": 1.0, "std_seconds": 0.1, "repeats": 5}
            ]}"#,
        )
        .unwrap();

        let record: BenchmarkRecord = load_record(&path).unwrap();
        assert_eq!(record.engine(), "legacy");
        assert_eq!(record.generator_counts(), vec![50.0, 500.0]);
        assert_eq!(record.mean_times(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_reconstitution_record_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("area.json");
        let record = ReconstitutionRecord::new(
            "qhull",
            1.0,
            vec![
                ReconstitutionEntry {
                    generator_count: 100,
                    percent_reconstituted: 99.9999,
                    degenerate_polygons: 0,
                },
                ReconstitutionEntry {
                    generator_count: 10,
                    percent_reconstituted: 100.0,
                    degenerate_polygons: 1,
                },
            ],
        );
        save_record(&record, &path).unwrap();

        let loaded: ReconstitutionRecord = load_record(&path).unwrap();
        assert_eq!(loaded, record);
        assert_eq!(loaded.generator_counts(), vec![10, 100]);
        assert_eq!(loaded.percentages(), vec![100.0, 99.9999]);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result: Result<BenchmarkRecord, _> = load_record("/path/that/does/not/exist.json");
        assert!(matches!(result, Err(RecordError::Io { .. })));
    }

    #[test]
    fn test_malformed_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, r#"{"engine": "x", "entries": ["#).unwrap();
        let result: Result<BenchmarkRecord, _> = load_record(&path);
        assert!(matches!(result, Err(RecordError::Json { .. })));
    }
}
