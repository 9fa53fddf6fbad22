use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::fs_move::MoveMethod;
use crate::platform::PlatformFamily;
use crate::relocation::{ArtifactKind, PlannedMove};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelocationReport {
    pub platform: PlatformFamily,
    pub deployment_root: PathBuf,
    pub artifacts: Vec<RelocatedArtifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelocatedArtifact {
    pub kind: ArtifactKind,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub method: MoveMethod,
}

impl RelocationReport {
    pub fn new(platform: PlatformFamily, deployment_root: impl AsRef<Path>) -> Self {
        Self {
            platform,
            deployment_root: deployment_root.as_ref().to_path_buf(),
            artifacts: Vec::new(),
        }
    }

    pub fn record(&mut self, planned: PlannedMove, method: MoveMethod) {
        self.artifacts.push(RelocatedArtifact {
            kind: planned.kind,
            source: planned.source,
            destination: planned.destination,
            method,
        });
    }

    pub fn artifact(&self, kind: ArtifactKind) -> Option<&RelocatedArtifact> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize relocation report to JSON")
    }
}
