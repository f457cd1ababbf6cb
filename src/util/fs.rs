//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a source file permissively.
///
/// Strips a UTF-8 BOM if present and lossy-decodes the rest; source files
/// saved by Windows editors in legacy codepages still yield usable text for
/// the substring heuristics.
pub fn read_source_text(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read source: {}", path.display()))?;

    let bytes = bytes
        .strip_prefix(&[0xEF, 0xBB, 0xBF][..])
        .unwrap_or(&bytes);

    Ok(String::from_utf8_lossy(bytes).into_owned())
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents)
        .with_context(|| format!("failed to write file: {}", path.display()))
}

/// Find the first `*.exe` in a directory, sorted for determinism.
pub fn first_exe_in(dir: &Path) -> Result<Option<PathBuf>> {
    let pattern = dir.join("*.exe");
    let pattern_str = pattern.to_string_lossy();

    let mut matches: Vec<PathBuf> = glob(&pattern_str)
        .with_context(|| format!("invalid glob pattern: {}", pattern_str))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();

    matches.sort();
    Ok(matches.into_iter().next())
}

/// Copy a produced binary to the user's requested output path, creating the
/// destination directory if needed.
pub fn copy_artifact(produced: &Path, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        ensure_dir(parent)?;
    }
    fs::copy(produced, output).with_context(|| {
        format!(
            "failed to copy {} to {}",
            produced.display(),
            output.display()
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_source_strips_bom() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bom.cs");
        fs::write(&path, b"\xEF\xBB\xBFclass P {}").unwrap();

        assert_eq!(read_source_text(&path).unwrap(), "class P {}");
    }

    #[test]
    fn test_read_source_lossy_decode() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("latin1.cs");
        // 0xFC is u-umlaut in latin-1, invalid as UTF-8
        fs::write(&path, b"// gr\xFC\xDF\nclass P {}").unwrap();

        let text = read_source_text(&path).unwrap();
        assert!(text.contains("class P {}"));
    }

    #[test]
    fn test_read_source_missing_file() {
        assert!(read_source_text(Path::new("/nonexistent/x.cs")).is_err());
    }

    #[test]
    fn test_first_exe_in() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.exe"), b"x").unwrap();
        fs::write(tmp.path().join("a.exe"), b"x").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"x").unwrap();

        let found = first_exe_in(tmp.path()).unwrap().unwrap();
        assert_eq!(found.file_name().unwrap(), "a.exe");
    }

    #[test]
    fn test_first_exe_in_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(first_exe_in(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn test_copy_artifact_creates_parent() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("app.exe");
        fs::write(&src, b"binary").unwrap();

        let dst = tmp.path().join("deep").join("nested").join("out.exe");
        copy_artifact(&src, &dst).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"binary");
    }
}
