use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RelocateError, RelocateResult};
use crate::platform::{ExecutableNaming, PlatformFamily};

pub const DEFAULT_FRONTEND_SOURCE: &str = "web/build";
pub const DEFAULT_BACKEND_SOURCE: &str = "target/release/lwoss";
pub const DEFAULT_DEPLOYMENT_ROOT: &str = "deploy";

pub const FRONTEND_DEST_NAME: &str = "web";

pub const CONFIG_FILE_NAME: &str = "lwoss-deploy.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationConfig {
    pub frontend_source: PathBuf,
    /// Executable path without any platform suffix.
    pub backend_source: PathBuf,
    pub deployment_root: PathBuf,
    pub platform: PlatformFamily,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ConfigLayer {
    pub frontend_source_path: Option<PathBuf>,
    pub backend_source_path: Option<PathBuf>,
    pub deployment_root: Option<PathBuf>,
    pub platform: Option<PlatformFamily>,
}

impl RelocationConfig {
    pub fn rooted_at(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            frontend_source: base.join(DEFAULT_FRONTEND_SOURCE),
            backend_source: base.join(DEFAULT_BACKEND_SOURCE),
            deployment_root: base.join(DEFAULT_DEPLOYMENT_ROOT),
            platform: PlatformFamily::host(),
        }
    }

    pub fn platform(mut self, platform: PlatformFamily) -> Self {
        self.platform = platform;
        self
    }

    pub fn apply(mut self, layer: ConfigLayer) -> Self {
        if let Some(path) = layer.frontend_source_path {
            self.frontend_source = path;
        }
        if let Some(path) = layer.backend_source_path {
            self.backend_source = path;
        }
        if let Some(path) = layer.deployment_root {
            self.deployment_root = path;
        }
        if let Some(platform) = layer.platform {
            self.platform = platform;
        }
        self
    }

    pub fn frontend_destination(&self) -> PathBuf {
        self.deployment_root.join(FRONTEND_DEST_NAME)
    }

    pub fn backend_source_path(&self, naming: &ExecutableNaming) -> PathBuf {
        naming.executable_path(&self.backend_source, self.platform)
    }

    pub fn backend_file_name(&self, naming: &ExecutableNaming) -> RelocateResult<PathBuf> {
        let name = self
            .backend_source
            .file_name()
            .ok_or_else(|| RelocateError::InvalidBackendPath {
                path: self.backend_source.clone(),
            })?;
        Ok(naming.executable_path(Path::new(name), self.platform))
    }

    pub fn backend_destination(&self, naming: &ExecutableNaming) -> RelocateResult<PathBuf> {
        Ok(self.deployment_root.join(self.backend_file_name(naming)?))
    }
}

impl Default for RelocationConfig {
    fn default() -> Self {
        Self::rooted_at("")
    }
}

pub fn load_layer(path: &Path) -> Result<ConfigLayer> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

// explicit file, else lwoss-deploy.toml in `dir` if present, else empty
pub fn discover_layer(explicit: Option<&Path>, dir: &Path) -> Result<ConfigLayer> {
    if let Some(path) = explicit {
        return load_layer(path);
    }

    let candidate = dir.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        load_layer(&candidate)
    } else {
        Ok(ConfigLayer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = RelocationConfig::default();

        assert_eq!(config.frontend_source, PathBuf::from("web/build"));
        assert_eq!(config.backend_source, PathBuf::from("target/release/lwoss"));
        assert_eq!(config.deployment_root, PathBuf::from("deploy"));
        assert_eq!(config.frontend_destination(), PathBuf::from("deploy/web"));
    }

    #[test]
    fn test_backend_paths_follow_platform() {
        let naming = ExecutableNaming::new();

        let unix = RelocationConfig::default().platform(PlatformFamily::Unix);
        assert_eq!(unix.backend_source_path(&naming), PathBuf::from("target/release/lwoss"));
        assert_eq!(unix.backend_destination(&naming).unwrap(), PathBuf::from("deploy/lwoss"));

        let windows = RelocationConfig::default().platform(PlatformFamily::Windows);
        assert_eq!(
            windows.backend_source_path(&naming),
            PathBuf::from("target/release/lwoss.exe")
        );
        assert_eq!(
            windows.backend_destination(&naming).unwrap(),
            PathBuf::from("deploy/lwoss.exe")
        );
    }

    #[test]
    fn test_backend_without_file_name() {
        let naming = ExecutableNaming::new();
        let config = RelocationConfig::default().apply(ConfigLayer {
            backend_source_path: Some(PathBuf::from("..")),
            ..Default::default()
        });

        assert!(matches!(
            config.backend_destination(&naming),
            Err(RelocateError::InvalidBackendPath { .. })
        ));
    }

    #[test]
    fn test_layer_overrides_only_given_fields() {
        let config = RelocationConfig::default().apply(ConfigLayer {
            deployment_root: Some(PathBuf::from("dist")),
            ..Default::default()
        });

        assert_eq!(config.deployment_root, PathBuf::from("dist"));
        assert_eq!(config.frontend_source, PathBuf::from("web/build"));
    }

    #[test]
    fn test_parse_kebab_case_keys() {
        let layer: ConfigLayer = toml::from_str(
            r#"
frontend-source-path = "ui/dist"
backend-source-path = "out/server"
deployment-root = "release"
platform = "windows"
"#,
        )
        .unwrap();

        assert_eq!(layer.frontend_source_path, Some(PathBuf::from("ui/dist")));
        assert_eq!(layer.backend_source_path, Some(PathBuf::from("out/server")));
        assert_eq!(layer.deployment_root, Some(PathBuf::from("release")));
        assert_eq!(layer.platform, Some(PlatformFamily::Windows));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<ConfigLayer, _> = toml::from_str("frontend = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_discover_layer() {
        let temp = tempdir().unwrap();
        assert_eq!(discover_layer(None, temp.path()).unwrap(), ConfigLayer::default());

        fs::write(temp.path().join(CONFIG_FILE_NAME), "deployment-root = \"out\"\n").unwrap();
        let layer = discover_layer(None, temp.path()).unwrap();
        assert_eq!(layer.deployment_root, Some(PathBuf::from("out")));

        let missing = temp.path().join("other.toml");
        assert!(discover_layer(Some(&missing), temp.path()).is_err());
    }
}
