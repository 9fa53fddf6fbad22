use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::archive::ArchivePacker;
use crate::cargo_integration::{BackendLocator, BuildProfile};
use crate::config::{self, ConfigLayer, RelocationConfig};
use crate::platform::{ExecutableNaming, PlatformFamily};
use crate::relocation::ArtifactRelocator;

#[derive(Parser)]
#[command(name = "lwoss-deploy")]
#[command(about = "Move the lwoss web bundle and server executable into a deployment directory")]
#[command(version)]
pub struct Cli {
    /// Defaults to `relocate` with the built-in paths
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Move the build outputs into the deployment directory
    Relocate {
        #[command(flatten)]
        paths: PathArgs,

        /// Print each move as it happens
        #[arg(long, short)]
        verbose: bool,

        /// Print a JSON report after a successful run
        #[arg(long)]
        json: bool,
    },

    /// Pack the build outputs into a .tar.xz without moving them
    Archive {
        #[command(flatten)]
        paths: PathArgs,

        /// Archive path (defaults to <deployment-root>/lwoss-<os>.tar.xz)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show the executable naming table and the detected host platform
    Platforms,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// TOML config file (defaults to ./lwoss-deploy.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Frontend build output directory
    #[arg(long)]
    pub frontend_source_path: Option<PathBuf>,

    /// Backend executable path, without any platform suffix
    #[arg(long)]
    pub backend_source_path: Option<PathBuf>,

    /// Deployment directory
    #[arg(long)]
    pub deployment_root: Option<PathBuf>,

    /// Override the detected platform family
    #[arg(long, value_enum)]
    pub platform: Option<PlatformFamily>,

    /// Derive the backend path from this Cargo.toml via cargo metadata
    #[arg(long, conflicts_with = "backend_source_path")]
    pub manifest_path: Option<PathBuf>,

    /// Cargo profile directory used with --manifest-path
    #[arg(long, value_enum, default_value_t = BuildProfile::Release)]
    pub profile: BuildProfile,
}

impl PathArgs {
    pub fn resolve(&self, working_dir: &Path) -> Result<RelocationConfig> {
        let file_layer = config::discover_layer(self.config.as_deref(), working_dir)?;

        let backend_source_path = match &self.manifest_path {
            Some(manifest_path) => Some(
                BackendLocator::new(manifest_path)
                    .profile(self.profile)
                    .locate()
                    .context("Failed to locate backend executable")?,
            ),
            None => self.backend_source_path.clone(),
        };

        let flag_layer = ConfigLayer {
            frontend_source_path: self.frontend_source_path.clone(),
            backend_source_path,
            deployment_root: self.deployment_root.clone(),
            platform: self.platform,
        };

        Ok(RelocationConfig::default().apply(file_layer).apply(flag_layer))
    }
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Relocate {
        paths: PathArgs::default(),
        verbose: false,
        json: false,
    });

    match command {
        Commands::Relocate { paths, verbose, json } => relocate_command(paths, verbose, json),
        Commands::Archive { paths, output } => archive_command(paths, output),
        Commands::Platforms => platforms_command(),
    }
}

fn relocate_command(paths: PathArgs, verbose: bool, json: bool) -> Result<()> {
    let working_dir = std::env::current_dir().context("Failed to read working directory")?;
    let config = paths.resolve(&working_dir)?;

    if verbose {
        println!(
            "Relocating build outputs into {} (platform: {})",
            config.deployment_root.display(),
            config.platform
        );
    }

    let report = ArtifactRelocator::new(config)
        .verbose(verbose)
        .relocate()
        .context("Relocation failed")?;

    if json {
        println!("{}", report.to_json()?);
    }

    Ok(())
}

fn archive_command(paths: PathArgs, output: Option<PathBuf>) -> Result<()> {
    let working_dir = std::env::current_dir().context("Failed to read working directory")?;
    let config = paths.resolve(&working_dir)?;

    let archive_path = ArchivePacker::new(config)
        .pack(output.as_deref())
        .context("Failed to create release archive")?;

    println!("Archive path: {}", archive_path.display());

    Ok(())
}

fn platforms_command() -> Result<()> {
    let naming = ExecutableNaming::new();

    println!("Executable naming:");
    for (family, suffix) in naming.entries() {
        let suffix = if suffix.is_empty() { "(none)" } else { suffix };
        println!("  {} -> {}", family, suffix);
    }

    println!("\nHost platform: {}", PlatformFamily::host());

    Ok(())
}
