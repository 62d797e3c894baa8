//! File I/O: container and inventory loaders, the JSONL event log, and the
//! solution writer.
//!
//! Loaders validate shape and identity before anything reaches the core:
//! a container file must parse, declare the FCC lattice, and carry a CID
//! that matches recomputation. The engines themselves assume well-formed
//! input.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canonical::cid_sha256;
use crate::container::Container;
use crate::events::SolveEvent;
use crate::inventory::PieceCounts;
use crate::lattice::Cell;
use crate::solution::SolutionRecord;

/// Errors raised by the loader layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported lattice {0:?}, expected \"fcc\"")]
    UnsupportedLattice(String),
    #[error("container has no coordinates")]
    EmptyCoordinates,
    #[error("duplicate container cell {0:?}")]
    DuplicateCell(Cell),
    #[error("container CID {stored} does not match recomputed {computed}")]
    CidMismatch { stored: String, computed: String },
    #[error("unknown piece label {0:?}, expected a single letter A..Y")]
    UnknownPiece(String),
    #[error("invalid inventory token {0:?}, expected NAME=COUNT")]
    BadInventoryToken(String),
}

/// Designer metadata carried by container files. Opaque to the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Designer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// On-disk container document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerFile {
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default, alias = "lattice_type")]
    pub lattice: Option<String>,
    pub coordinates: Vec<[i32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid_sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designer: Option<Designer>,
}

/// Parses and validates a container document.
pub fn parse_container(json: &str) -> Result<Container, LoadError> {
    let file: ContainerFile = serde_json::from_str(json)?;
    container_from_file(file)
}

/// Loads and validates a container from a file path.
pub fn load_container(path: &Path) -> Result<Container, LoadError> {
    parse_container(&std::fs::read_to_string(path)?)
}

fn container_from_file(file: ContainerFile) -> Result<Container, LoadError> {
    if let Some(lattice) = &file.lattice {
        if lattice != "fcc" {
            return Err(LoadError::UnsupportedLattice(lattice.clone()));
        }
    }
    if file.coordinates.is_empty() {
        return Err(LoadError::EmptyCoordinates);
    }

    let mut cells: Vec<Cell> = file
        .coordinates
        .iter()
        .map(|&[i, j, k]| (i, j, k))
        .collect();
    let mut sorted = cells.clone();
    sorted.sort_unstable();
    if let Some(dup) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(LoadError::DuplicateCell(dup[0]));
    }
    cells.sort_unstable();

    if let Some(stored) = &file.cid_sha256 {
        let computed = cid_sha256(&cells);
        if *stored != computed {
            return Err(LoadError::CidMismatch {
                stored: stored.clone(),
                computed,
            });
        }
    }
    Ok(Container::new(cells))
}

/// On-disk inventory document: `{"pieces": {"A": 1, ...}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryFile {
    #[serde(default)]
    pub pieces: BTreeMap<String, u32>,
}

/// Parses an inventory document.
pub fn parse_inventory(json: &str) -> Result<PieceCounts, LoadError> {
    let file: InventoryFile = serde_json::from_str(json)?;
    PieceCounts::from_map(file.pieces.iter().map(|(k, &v)| (k.as_str(), v)))
}

/// Loads an inventory from a file path.
pub fn load_inventory(path: &Path) -> Result<PieceCounts, LoadError> {
    parse_inventory(&std::fs::read_to_string(path)?)
}

/// Append-only JSONL event log: one JSON object per event.
pub struct EventLog {
    out: BufWriter<File>,
}

impl EventLog {
    pub fn create(path: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            out: BufWriter::new(File::create(path)?),
        })
    }

    pub fn write(&mut self, event: &SolveEvent) -> Result<(), LoadError> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), LoadError> {
        self.out.flush()?;
        Ok(())
    }
}

/// Solver provenance stored alongside a solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverMeta {
    pub engine: String,
    pub seed: u64,
}

/// On-disk solution document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionFile {
    pub version: u32,
    #[serde(flatten)]
    pub record: SolutionRecord,
    pub solver: SolverMeta,
}

/// Writes a solution record with provenance to a file.
pub fn write_solution(
    path: &Path,
    record: &SolutionRecord,
    meta: &SolverMeta,
) -> Result<(), LoadError> {
    let payload = SolutionFile {
        version: 1,
        record: record.clone(),
        solver: meta.clone(),
    };
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut out, &payload)?;
    out.flush()?;
    Ok(())
}

/// Reads a solution document back.
pub fn load_solution(path: &Path) -> Result<SolutionFile, LoadError> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}
