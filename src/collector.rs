//! Enumeration of fragment files under a conversation directory.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ConvoError, Result};

/// Returns every regular file below `root`, recursively.
///
/// No filtering by name or extension is done: every file is treated as a
/// fragment. Entries are visited in file-name order within each directory,
/// so repeated runs over the same snapshot see the same sequence. Callers
/// must not assume this order is chronological.
///
/// # Errors
///
/// [`ConvoError::DirectoryNotFound`] if `root` does not exist or is not a
/// directory, [`ConvoError::Io`] if walking fails part way.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ConvoError::directory_not_found(root));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_collects_recursively() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("message_2.json"), "{}").unwrap();
        fs::write(dir.path().join("message_1.json"), "{}").unwrap();
        fs::create_dir(dir.path().join("photos")).unwrap();
        fs::write(dir.path().join("photos").join("notes.txt"), "x").unwrap();

        let files = collect_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("message_1.json"),
                PathBuf::from("message_2.json"),
                PathBuf::from("photos").join("notes.txt"),
            ]
        );
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(collect_files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let err = collect_files(&dir.path().join("nope")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("message_1.json");
        fs::write(&file, "{}").unwrap();
        assert!(collect_files(&file).unwrap_err().is_not_found());
    }
}
