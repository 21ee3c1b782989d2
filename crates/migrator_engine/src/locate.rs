use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use migrator_core::ResourceName;

/// Result of searching the export's upload directory for a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalMatch {
    Unique(PathBuf),
    /// Several files fit equally well; `chosen` is the first of `candidates`.
    Ambiguous {
        chosen: PathBuf,
        candidates: Vec<PathBuf>,
    },
    NotFound,
}

/// Finds the original upload for `name` among the files directly inside `source_dir`.
///
/// Candidates must match the extension and contain the stem; failing that,
/// the file name merely has to contain the stem. Several candidates are
/// narrowed to those containing the full short name. A missing directory
/// counts as no match.
pub fn find_local_resource(source_dir: &Path, name: &ResourceName) -> io::Result<LocalMatch> {
    let files = match list_files(source_dir) {
        Ok(files) => files,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(LocalMatch::NotFound),
        Err(err) => return Err(err),
    };

    let mut candidates: Vec<&PathBuf> = files
        .iter()
        .filter(|path| {
            let extension = path.extension().and_then(|e| e.to_str());
            name.extension_matches(extension) && name.stem_matches(&file_stem(path))
        })
        .collect();
    if candidates.is_empty() {
        candidates = files
            .iter()
            .filter(|path| name.stem_matches(&file_name(path)))
            .collect();
    }

    match candidates.as_slice() {
        [] => Ok(LocalMatch::NotFound),
        [only] => Ok(LocalMatch::Unique((*only).clone())),
        several => {
            let narrowed: Vec<&&PathBuf> = several
                .iter()
                .filter(|path| file_name(path).contains(&name.name))
                .collect();
            if let [only] = narrowed.as_slice() {
                return Ok(LocalMatch::Unique((**only).clone()));
            }
            let candidates: Vec<PathBuf> = several.iter().map(|p| (*p).clone()).collect();
            Ok(LocalMatch::Ambiguous {
                chosen: candidates[0].clone(),
                candidates,
            })
        }
    }
}

fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .collect();
    files.sort();
    Ok(files)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
