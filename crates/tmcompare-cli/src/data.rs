use crate::error::{CliError, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tmcompare::core::io::pdb;
use tmcompare::core::models::structure::Structure;
use tracing::{debug, info};

const STRUCTURE_EXTENSION: &str = "pdb";

/// Enumerates the structure files of a dataset directory. Files are
/// sorted by name so load order (and logs) are stable; the workflow sorts
/// by identifier again before enumeration.
pub fn scan_dataset(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CliError::Argument(format!(
            "dataset directory '{}' does not exist",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_structure = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(STRUCTURE_EXTENSION));
        if path.is_file() && is_structure {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Loads every structure of a dataset through the reduced-atom reader.
/// The structure identifier is the file stem.
pub fn load_structures(dir: &Path) -> Result<Vec<Structure>> {
    let files = scan_dataset(dir)?;
    info!("Found {} structure file(s) in {:?}", files.len(), dir);

    let mut structures = Vec::with_capacity(files.len());
    for path in files {
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                CliError::Argument(format!("unusable file name: {}", path.display()))
            })?
            .to_string();

        let mut reader = BufReader::new(File::open(&path)?);
        let structure = pdb::read_structure(&id, &mut reader).map_err(|e| {
            CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            }
        })?;
        debug!(id = %structure.id, residues = structure.len(), "loaded structure");
        structures.push(structure);
    }
    Ok(structures)
}
