use crate::error::DatasetError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One pre-generated simulation, identified by its numeric id.
///
/// Companion assets live next to the descriptor and follow the dataset
/// naming convention: `sim_<id>_initial.png` holds the initial frame and
/// `sim_<id>_results.json` the simulated outcome.
#[derive(Debug, Clone)]
pub struct SimulationCase {
    pub id: u32,
    pub descriptor: PathBuf,
}

impl SimulationCase {
    pub fn image_path(&self) -> PathBuf {
        self.descriptor
            .with_file_name(format!("sim_{}_initial.png", self.id))
    }

    pub fn results_path(&self) -> PathBuf {
        self.descriptor
            .with_file_name(format!("sim_{}_results.json", self.id))
    }
}

#[derive(Deserialize)]
struct SimResults {
    #[serde(rename = "finalBucket")]
    final_bucket: u8,
}

/// Scan a data directory for `sim_<id>.json` descriptors, ordered by id
pub fn discover_cases(data_dir: &Path) -> Result<Vec<SimulationCase>, DatasetError> {
    let entries = fs::read_dir(data_dir).map_err(|e| DatasetError::ReadDir {
        path: data_dir.to_path_buf(),
        source: e,
    })?;

    let mut cases = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DatasetError::ReadDir {
            path: data_dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with("_results.json") {
            continue;
        }
        let Some(id) = name
            .strip_prefix("sim_")
            .and_then(|s| s.strip_suffix(".json"))
        else {
            continue;
        };
        match id.parse::<u32>() {
            Ok(id) => cases.push(SimulationCase {
                id,
                descriptor: path,
            }),
            Err(_) => debug!("ignoring descriptor with non-numeric id: {}", name),
        }
    }

    if cases.is_empty() {
        return Err(DatasetError::NoCases(data_dir.to_path_buf()));
    }

    cases.sort_by_key(|c| c.id);
    Ok(cases)
}

/// Read the ground-truth bucket out of a case's results file
pub fn load_final_bucket(path: &Path) -> Result<u8, DatasetError> {
    let content = fs::read_to_string(path).map_err(|e| DatasetError::ReadResults {
        path: path.to_path_buf(),
        source: e,
    })?;
    let results: SimResults =
        serde_json::from_str(&content).map_err(|e| DatasetError::ParseResults {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(results.final_bucket)
}
