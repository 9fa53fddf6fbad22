use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{RelocateError, RelocateResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveMethod {
    Rename,
    Copy,
}

impl MoveMethod {
    pub fn as_str(&self) -> &str {
        match self {
            MoveMethod::Rename => "rename",
            MoveMethod::Copy => "copy",
        }
    }
}

// The caller makes sure `to` does not exist.
pub fn move_path(from: &Path, to: &Path) -> RelocateResult<MoveMethod> {
    match fs::rename(from, to) {
        Ok(()) => Ok(MoveMethod::Rename),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            copy_then_remove(from, to)?;
            Ok(MoveMethod::Copy)
        }
        Err(source) => Err(RelocateError::Io {
            op: "rename",
            path: from.to_path_buf(),
            source,
        }),
    }
}

// On error `from` is untouched and nothing is left at `to`. The source is
// renamed aside within its own volume before deletion, so a failed delete
// can never leave it half-removed.
pub(crate) fn copy_then_remove(from: &Path, to: &Path) -> RelocateResult<()> {
    let cross_volume = |source: io::Error| RelocateError::CrossVolume {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    let tombstone = tempfile::Builder::new()
        .prefix(".lwoss-removed-")
        .tempdir_in(parent_dir(from))
        .map_err(cross_volume)?;
    let staging = tempfile::Builder::new()
        .prefix(".lwoss-staging-")
        .tempdir_in(parent_dir(to))
        .map_err(cross_volume)?;
    let staged = staging.path().join("artifact");

    copy_tree(from, &staged).map_err(cross_volume)?;
    fs::rename(&staged, to).map_err(cross_volume)?;

    if let Err(e) = fs::rename(from, tombstone.path().join("artifact")) {
        let _ = remove_path(to);
        return Err(cross_volume(e));
    }

    // the move is complete here; a leftover tombstone is only litter
    let _ = tombstone.close();
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn remove_path(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    if !fs::symlink_metadata(from)?.is_dir() {
        fs::copy(from, to)?;
        return Ok(());
    }

    for entry in WalkDir::new(from) {
        let entry = entry?;
        let rel_path = entry.path().strip_prefix(from).map_err(io::Error::other)?;
        let dest = to.join(rel_path);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&dest)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &dest)?;
        } else {
            // fs::copy carries the permission bits, so executables stay executable
            fs::copy(entry.path(), &dest)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    let target = fs::read_link(src)?;
    std::os::unix::fs::symlink(target, dest)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(src, dest).map(|_| ())
}
