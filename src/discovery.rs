//! Discovers Java source files for batch runs.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::{contextless, ErrorKind};
use crate::DeclassifyError;

/// Recursively scans a directory for `.java` files.
///
/// Fails fast when `root` is not a directory - no file is touched in that
/// case. The returned list is sorted to ensure deterministic batch order.
pub fn discover_java_files<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>, DeclassifyError> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(contextless(ErrorKind::NotADirectory {
            path: root.to_path_buf(),
        }));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| {
            contextless(ErrorKind::WalkFailed {
                detail: e.to_string(),
            })
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if !is_java_file(entry.path()) {
            continue;
        }
        files.push(entry.path().to_path_buf());
    }
    files.sort();
    Ok(files)
}

/// Returns true if the given path has a .java extension.
pub fn is_java_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "java")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;

    #[test]
    fn java_extension_check() {
        assert!(is_java_file(Path::new("src/Shape.java")));
        assert!(!is_java_file(Path::new("src/Shape.class")));
        assert!(!is_java_file(Path::new("java")));
    }

    #[test]
    fn non_directory_root_fails_fast_as_input_error() {
        let err = discover_java_files("/definitely/not/a/real/dir").unwrap_err();
        assert_eq!(err.kind.category(), ErrorCategory::Input);
    }
}
