use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFamily {
    Windows,
    Unix,
}

impl PlatformFamily {
    pub fn host() -> Self {
        match std::env::consts::FAMILY {
            "windows" => PlatformFamily::Windows,
            _ => PlatformFamily::Unix,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PlatformFamily::Windows => "windows",
            PlatformFamily::Unix => "unix",
        }
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ExecutableNaming {
    suffixes: HashMap<PlatformFamily, String>,
}

impl ExecutableNaming {
    pub fn new() -> Self {
        let mut suffixes = HashMap::new();

        suffixes.insert(PlatformFamily::Windows, ".exe".to_string());
        suffixes.insert(PlatformFamily::Unix, String::new());

        Self { suffixes }
    }

    pub fn suffix_for(&self, family: PlatformFamily) -> &str {
        self.suffixes.get(&family).map(|s| s.as_str()).unwrap_or("")
    }

    pub fn executable_path(&self, base: &Path, family: PlatformFamily) -> PathBuf {
        let mut name = base.as_os_str().to_os_string();
        name.push(self.suffix_for(family));
        PathBuf::from(name)
    }

    pub fn entries(&self) -> Vec<(PlatformFamily, &str)> {
        let mut entries: Vec<_> = self
            .suffixes
            .iter()
            .map(|(family, suffix)| (*family, suffix.as_str()))
            .collect();
        entries.sort_by_key(|(family, _)| family.as_str().to_string());
        entries
    }
}

impl Default for ExecutableNaming {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_table() {
        let naming = ExecutableNaming::new();

        assert_eq!(naming.suffix_for(PlatformFamily::Windows), ".exe");
        assert_eq!(naming.suffix_for(PlatformFamily::Unix), "");
    }

    #[test]
    fn test_executable_path() {
        let naming = ExecutableNaming::new();
        let base = Path::new("target/release/lwoss");

        assert_eq!(
            naming.executable_path(base, PlatformFamily::Windows),
            PathBuf::from("target/release/lwoss.exe")
        );
        assert_eq!(
            naming.executable_path(base, PlatformFamily::Unix),
            PathBuf::from("target/release/lwoss")
        );
    }

    #[test]
    fn test_host_family() {
        let host = PlatformFamily::host();
        if cfg!(windows) {
            assert_eq!(host, PlatformFamily::Windows);
        } else {
            assert_eq!(host, PlatformFamily::Unix);
        }
    }

    #[test]
    fn test_entries_cover_every_family() {
        let naming = ExecutableNaming::new();
        let entries = naming.entries();

        assert_eq!(
            entries,
            vec![(PlatformFamily::Unix, ""), (PlatformFamily::Windows, ".exe")]
        );
    }

    #[test]
    fn test_family_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            platform: PlatformFamily,
        }

        let parsed: Wrapper = toml::from_str("platform = \"windows\"").unwrap();
        assert_eq!(parsed.platform, PlatformFamily::Windows);
    }
}
