use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::config::RelocationConfig;
use crate::error::{RelocateError, RelocateResult};
use crate::fs_move::move_path;
use crate::platform::ExecutableNaming;
use crate::report::RelocationReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    FrontendBundle,
    BackendExecutable,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &str {
        match self {
            ArtifactKind::FrontendBundle => "frontend bundle",
            ArtifactKind::BackendExecutable => "backend executable",
        }
    }

    fn source_is_valid(&self, metadata: &fs::Metadata) -> bool {
        match self {
            ArtifactKind::FrontendBundle => metadata.is_dir(),
            ArtifactKind::BackendExecutable => metadata.is_file(),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub kind: ArtifactKind,
    pub source: PathBuf,
    pub destination: PathBuf,
}

pub struct ArtifactRelocator {
    config: RelocationConfig,
    naming: ExecutableNaming,
    verbose: bool,
}

impl ArtifactRelocator {
    pub fn new(config: RelocationConfig) -> Self {
        Self {
            config,
            naming: ExecutableNaming::new(),
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn plan(&self) -> RelocateResult<Vec<PlannedMove>> {
        let frontend = PlannedMove {
            kind: ArtifactKind::FrontendBundle,
            source: self.config.frontend_source.clone(),
            destination: self.config.frontend_destination(),
        };
        let backend = PlannedMove {
            kind: ArtifactKind::BackendExecutable,
            source: self.config.backend_source_path(&self.naming),
            destination: self.config.backend_destination(&self.naming)?,
        };

        // e.g. a backend named `web` would land on top of the bundle
        if frontend.destination == backend.destination {
            return Err(RelocateError::DestinationConflict {
                kind: backend.kind,
                path: backend.destination,
            });
        }

        Ok(vec![frontend, backend])
    }

    // every source present and every destination free, before anything moves
    pub fn preflight(&self, plan: &[PlannedMove]) -> RelocateResult<()> {
        for planned in plan {
            let present = fs::metadata(&planned.source)
                .map(|metadata| planned.kind.source_is_valid(&metadata))
                .unwrap_or(false);
            if !present {
                return Err(RelocateError::MissingSource {
                    kind: planned.kind,
                    path: planned.source.clone(),
                });
            }

            if fs::symlink_metadata(&planned.destination).is_ok() {
                return Err(RelocateError::DestinationConflict {
                    kind: planned.kind,
                    path: planned.destination.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn relocate(&self) -> RelocateResult<RelocationReport> {
        let plan = self.plan()?;
        self.preflight(&plan)?;

        fs::create_dir_all(&self.config.deployment_root)
            .map_err(RelocateError::io("create directory", &self.config.deployment_root))?;

        let mut report = RelocationReport::new(self.config.platform, &self.config.deployment_root);

        for planned in plan {
            let method = move_path(&planned.source, &planned.destination)?;

            if self.verbose {
                println!(
                    "Relocated {} ({}): {} -> {}",
                    planned.kind,
                    method.as_str(),
                    planned.source.display(),
                    planned.destination.display()
                );
            }

            report.record(planned, method);
        }

        Ok(report)
    }
}
