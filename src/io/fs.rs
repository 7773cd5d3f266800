//! Atomic output files.

use std::{fs::{self, File}, io::Write, path::{Path, PathBuf}};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Write-then-rename wrapper so a failed render never leaves a half-written
/// output next to a previous good one.
pub struct PendingWrite {
    target: PathBuf,
    tmp: NamedTempFile,
}

impl PendingWrite {
    /// Open a temporary file beside `target`. Refuses to clobber an existing
    /// file unless `force` is set.
    pub fn open(target: &Path, force: bool) -> Result<Self> {
        let parent = target.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        fs::create_dir_all(parent)?;
        if !force && target.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("refusing to overwrite existing file: {} (use --force)", target.display()),
            )));
        }
        let tmp = NamedTempFile::new_in(parent)?;
        Ok(Self { target: target.to_path_buf(), tmp })
    }

    /// Sync and move the temporary file into place.
    pub fn finalize(self) -> Result<()> {
        self.tmp.as_file().sync_all().ok(); // best-effort fsync file
        self.tmp.persist(&self.target).map_err(|e| e.error)?;
        if let Some(dir) = self.target.parent() {
            let _ = File::open(dir).and_then(|f| f.sync_all());
        }
        Ok(())
    }
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.tmp.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.tmp.flush() }
}

/// Atomically write `contents` to `target`.
pub fn write_atomic(target: &Path, contents: &[u8], force: bool) -> Result<()> {
    let mut pending = PendingWrite::open(target, force)?;
    pending.write_all(contents)?;
    pending.finalize()
}

/// Atomically write a set of files that belong together. Every target is
/// opened (and checked against `force`) before any of them is written, so a
/// refusal leaves all previous files untouched.
pub fn write_atomic_all<P: AsRef<Path>, C: AsRef<[u8]>>(files: &[(P, C)], force: bool) -> Result<()> {
    let mut pending = files.iter()
        .map(|(target, _)| PendingWrite::open(target.as_ref(), force))
        .collect::<Result<Vec<_>>>()?;
    for (writer, (_, contents)) in pending.iter_mut().zip(files) {
        writer.write_all(contents.as_ref())?;
    }
    pending.into_iter().try_for_each(PendingWrite::finalize)
}
