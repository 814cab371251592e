//! Application execution modes for rtedit.
//!
//! rtedit runs headless: commands come from `-e`, `-f` or standard input
//! and drive one editing session over an optional `.rte` document.

mod script;

use std::path::{Path, PathBuf};

pub use script::run_script_mode;

/// Validate and canonicalize file paths to prevent directory traversal and block device files.
pub fn validate_file_path(path: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let canonical = match path.canonicalize() {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            // Document doesn't exist yet - validate the parent directory
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                let canonical_parent = parent
                    .canonicalize()
                    .map_err(|_| "Invalid parent directory")?;
                if let Some(filename) = path.file_name() {
                    canonical_parent.join(filename)
                } else {
                    return Err("Invalid file path: missing filename".into());
                }
            } else {
                let current_dir =
                    std::env::current_dir().map_err(|_| "Cannot determine current directory")?;
                current_dir.join(path)
            }
        }
        Err(e) => return Err(format!("Invalid path: {}", e).into()),
    };

    // Block special file types that could hang or crash a load
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if let Ok(metadata) = std::fs::metadata(&canonical) {
            let ft = metadata.file_type();
            if ft.is_char_device() {
                return Err("Cannot open character device files (e.g., /dev/null)".into());
            }
            if ft.is_block_device() {
                return Err("Cannot open block device files".into());
            }
            if ft.is_fifo() {
                return Err("Cannot open FIFO/named pipe files".into());
            }
            if ft.is_socket() {
                return Err("Cannot open socket files".into());
            }
        }
    }

    // Windows: block named pipes
    #[cfg(windows)]
    {
        let path_str = canonical.to_string_lossy();
        if path_str.starts_with(r"\\.\pipe\") || path_str.starts_with(r"\\?\pipe\") {
            return Err("Cannot open Windows named pipes".into());
        }
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_new_file_in_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.rte");
        let validated = validate_file_path(&path).unwrap();
        assert_eq!(validated.file_name(), path.file_name());
        assert!(validated.is_absolute());
    }

    #[test]
    fn test_validate_rejects_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("doc.rte");
        assert!(validate_file_path(&path).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_rejects_devices() {
        assert!(validate_file_path(Path::new("/dev/null")).is_err());
    }
}
