//! This module provides the `AutomatonLoader` struct, responsible for loading automaton
//! specifications from files, directories and strings.

use crate::parser::parse;
use crate::types::{Automaton, AutomatonError};
use std::fs;
use std::path::{Path, PathBuf};

/// The file extension of automaton specifications.
pub const EXTENSION: &str = "fa";

/// `AutomatonLoader` is a utility struct for loading automaton specifications.
pub struct AutomatonLoader;

impl AutomatonLoader {
    /// Loads a single automaton from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Automaton)` if the file is successfully read, parsed and validated.
    /// * `Err(AutomatonError::FileError)` if the file cannot be read.
    /// * `Err(AutomatonError::ParseError)` or `Err(AutomatonError::ValidationError)` if the
    ///   content is not a valid specification.
    pub fn load(path: &Path) -> Result<Automaton, AutomatonError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AutomatonError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        parse(&content)
    }

    /// Loads a single automaton from the provided string content, e.g. piped user input.
    pub fn load_from_string(content: &str) -> Result<Automaton, AutomatonError> {
        parse(content)
    }

    /// Loads every `.fa` file in a directory.
    ///
    /// Subdirectories and other files are skipped. Each loaded file yields its own result, so one
    /// malformed specification does not hide the others.
    pub fn load_dir(directory: &Path) -> Vec<Result<(PathBuf, Automaton), AutomatonError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(AutomatonError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let path = match entry {
                    Ok(entry) => entry.path(),
                    Err(e) => {
                        return Some(Err(AutomatonError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                if path.is_dir() || path.extension().is_none_or(|ext| ext != EXTENSION) {
                    return None;
                }

                match Self::load(&path) {
                    Ok(automaton) => Some(Ok((path, automaton))),
                    Err(e) => Some(Err(AutomatonError::FileError(format!(
                        "Failed to load automaton from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect();

        // Directory order is platform dependent
        results.sort_by_key(|result| result.as_ref().ok().map(|(path, _)| path.clone()));
        results
    }
}
