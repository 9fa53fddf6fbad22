use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use xz2::write::XzEncoder;

use crate::config::{FRONTEND_DEST_NAME, RelocationConfig};
use crate::error::RelocateError;
use crate::platform::{ExecutableNaming, PlatformFamily};
use crate::relocation::ArtifactKind;

const XZ_LEVEL: u32 = 6;

pub struct ArchivePacker {
    config: RelocationConfig,
    naming: ExecutableNaming,
    os_name: Option<String>,
}

impl ArchivePacker {
    pub fn new(config: RelocationConfig) -> Self {
        Self {
            config,
            naming: ExecutableNaming::new(),
            os_name: None,
        }
    }

    pub fn os_name(mut self, os_name: impl Into<String>) -> Self {
        self.os_name = Some(os_name.into());
        self
    }

    // host OS name when packing for the host's family, else the family name
    fn os_label(&self) -> String {
        if let Some(name) = &self.os_name {
            return name.clone();
        }
        if self.config.platform == PlatformFamily::host() {
            std::env::consts::OS.to_string()
        } else {
            self.config.platform.as_str().to_string()
        }
    }

    pub fn default_output(&self) -> Result<PathBuf> {
        let base_name = self
            .config
            .backend_source
            .file_name()
            .ok_or_else(|| RelocateError::InvalidBackendPath {
                path: self.config.backend_source.clone(),
            })?
            .to_string_lossy()
            .into_owned();

        Ok(self
            .config
            .deployment_root
            .join(format!("{}-{}.tar.xz", base_name, self.os_label())))
    }

    /// Refuses to replace an existing file; a failed write leaves nothing behind.
    pub fn pack(&self, output: Option<&Path>) -> Result<PathBuf> {
        let output = match output {
            Some(path) => path.to_path_buf(),
            None => self.default_output()?,
        };

        let frontend = &self.config.frontend_source;
        if !frontend.is_dir() {
            return Err(RelocateError::MissingSource {
                kind: ArtifactKind::FrontendBundle,
                path: frontend.clone(),
            }
            .into());
        }

        let backend = self.config.backend_source_path(&self.naming);
        if !backend.is_file() {
            return Err(RelocateError::MissingSource {
                kind: ArtifactKind::BackendExecutable,
                path: backend,
            }
            .into());
        }

        if fs::symlink_metadata(&output).is_ok() {
            bail!(
                "Release archive {} already exists; refusing to overwrite",
                output.display()
            );
        }

        let parent = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

        let staged = tempfile::NamedTempFile::new_in(&parent)
            .with_context(|| format!("Failed to create temporary archive in {}", parent.display()))?;

        let encoder = XzEncoder::new(staged.as_file(), XZ_LEVEL);
        let mut builder = tar::Builder::new(encoder);

        builder
            .append_dir_all(FRONTEND_DEST_NAME, frontend)
            .with_context(|| format!("Failed to archive {}", frontend.display()))?;

        let backend_name = self.config.backend_file_name(&self.naming)?;
        builder
            .append_path_with_name(&backend, &backend_name)
            .with_context(|| format!("Failed to archive {}", backend.display()))?;

        builder
            .into_inner()
            .and_then(|encoder| encoder.finish())
            .context("Failed to finish xz stream")?;

        staged
            .persist_noclobber(&output)
            .with_context(|| format!("Failed to write archive to {}", output.display()))?;

        Ok(output)
    }
}
