//! Loads Turing machine programs from files or in-memory strings, and scans
//! a directory of `.tur` files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TurError;
use crate::parser::parse;
use crate::program::Program;

/// Stateless namespace for program-loading entry points.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Reads and parses a single `.tur` file.
    pub fn load_program(path: &Path) -> Result<Program, TurError> {
        tracing::debug!(path = %path.display(), "loading program");

        let content = fs::read_to_string(path)
            .map_err(|e| TurError::Io(format!("failed to read {}: {e}", path.display())))?;

        Self::load_program_from_string(&content)
    }

    /// Parses program source held in memory, e.g. piped from stdin.
    pub fn load_program_from_string(content: &str) -> Result<Program, TurError> {
        parse(content)
    }

    /// Loads every `.tur` file directly inside `directory`, skipping
    /// subdirectories and other extensions. Each entry's outcome is reported
    /// independently so one malformed file doesn't hide the rest.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), TurError>> {
        if !directory.exists() {
            return vec![Err(TurError::Io(format!(
                "directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TurError::Io(format!(
                    "failed to read directory {}: {e}",
                    directory.display()
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => return Some(Err(TurError::Io(format!("failed to read directory entry: {e}")))),
                };

                let path = entry.path();
                if path.is_dir() || path.extension().is_none_or(|ext| ext != "tur") {
                    return None;
                }

                match Self::load_program(&path) {
                    Ok(program) => Some(Ok((path, program))),
                    Err(e) => Some(Err(TurError::Io(format!(
                        "failed to load program from {}: {e}",
                        path.display()
                    )))),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const VALID: &str = "
name: Valid.
inputs: 0.
init: scan.
scan:
  blank -> right, halt.
";

    #[test]
    fn loads_valid_program_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.tur");
        File::create(&file_path).unwrap().write_all(VALID.as_bytes()).unwrap();

        let program = ProgramLoader::load_program(&file_path).unwrap();
        assert_eq!(program.name(), "Valid");
    }

    #[test]
    fn reports_parse_error_for_invalid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.tur");
        File::create(&file_path).unwrap().write_all(b"this is not a program").unwrap();

        assert!(ProgramLoader::load_program(&file_path).is_err());
    }

    #[test]
    fn reports_io_error_for_missing_file() {
        let missing = Path::new("/nonexistent/path/to/a.tur");
        assert!(matches!(ProgramLoader::load_program(missing), Err(TurError::Io(_))));
    }

    #[test]
    fn loads_only_tur_files_from_directory() {
        let dir = tempdir().unwrap();

        File::create(dir.path().join("valid.tur")).unwrap().write_all(VALID.as_bytes()).unwrap();
        File::create(dir.path().join("invalid.tur")).unwrap().write_all(b"garbage").unwrap();
        File::create(dir.path().join("ignored.txt")).unwrap().write_all(b"garbage").unwrap();

        let results = ProgramLoader::load_programs(dir.path());
        assert_eq!(results.len(), 2);

        let (ok, err): (Vec<_>, Vec<_>) = results.into_iter().partition(|r| r.is_ok());
        assert_eq!(ok.len(), 1);
        assert_eq!(err.len(), 1);
    }

    #[test]
    fn reports_io_error_for_missing_directory() {
        let results = ProgramLoader::load_programs(Path::new("/nonexistent/dir"));
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(TurError::Io(_))));
    }
}
