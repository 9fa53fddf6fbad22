use anyhow::{Context, Result, anyhow};
use cargo_metadata::{Metadata, MetadataCommand};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BuildProfile {
    Debug,
    #[default]
    Release,
}

impl BuildProfile {
    pub fn as_str(&self) -> &str {
        match self {
            BuildProfile::Debug => "debug",
            BuildProfile::Release => "release",
        }
    }
}

pub struct BackendLocator {
    manifest_path: PathBuf,
    profile: BuildProfile,
}

impl BackendLocator {
    pub fn new(manifest_path: impl AsRef<Path>) -> Self {
        Self {
            manifest_path: manifest_path.as_ref().to_path_buf(),
            profile: BuildProfile::Release,
        }
    }

    pub fn profile(mut self, profile: BuildProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn locate(&self) -> Result<PathBuf> {
        let mut cmd = MetadataCommand::new();
        cmd.manifest_path(&self.manifest_path).no_deps();

        let metadata = cmd.exec().context("Failed to execute cargo metadata")?;

        self.backend_path(&metadata)
    }

    fn backend_path(&self, metadata: &Metadata) -> Result<PathBuf> {
        let manifest_path_canonical = self.manifest_path.canonicalize().with_context(|| {
            format!("Failed to canonicalize manifest path: {}", self.manifest_path.display())
        })?;

        let package = metadata
            .packages
            .iter()
            .find(|pkg| {
                pkg.manifest_path
                    .as_std_path()
                    .canonicalize()
                    .map(|path| path == manifest_path_canonical)
                    .unwrap_or(false)
            })
            .ok_or_else(|| {
                anyhow!("Could not find package for manifest path: {}", self.manifest_path.display())
            })?;

        let bins: Vec<&str> = package
            .targets
            .iter()
            .filter(|target| target.kind.iter().any(|k| k == "bin"))
            .map(|target| target.name.as_str())
            .collect();

        let bin = select_binary(&package.name, &bins)?;

        Ok(metadata
            .target_directory
            .as_std_path()
            .join(self.profile.as_str())
            .join(bin))
    }
}

fn select_binary<'a>(package_name: &str, bins: &[&'a str]) -> Result<&'a str> {
    match bins {
        [] => Err(anyhow!("Package '{}' has no binary target", package_name)),
        [only] => Ok(*only),
        _ => bins
            .iter()
            .copied()
            .find(|name| *name == package_name)
            .ok_or_else(|| {
                anyhow!(
                    "Package '{}' has several binary targets ({}); pass --backend-source-path instead",
                    package_name,
                    bins.join(", ")
                )
            }),
    }
}
