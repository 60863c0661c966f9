// intake-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Write content to a file atomically using a temporary file in the same
/// directory, then renaming it over the target. Parent directories are
/// created on demand.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    // Same directory so the rename never crosses filesystems
    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Resolves a configured path against the project root. Absolute paths are
/// returned untouched.
pub fn resolve(project_dir: &Path, configured: &str) -> PathBuf {
    let candidate = Path::new(configured);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        project_dir.join(candidate)
    }
}

/// Joins `relative` under `root` lexically, returning `None` when the result
/// would escape `root` (absolute input or too many `..`).
pub fn contained_join(root: &Path, relative: &str) -> Option<PathBuf> {
    let mut depth: usize = 0;
    let mut joined = root.to_path_buf();

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => {
                joined.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                depth = depth.checked_sub(1)?;
                joined.pop();
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    (depth > 0).then_some(joined)
}
