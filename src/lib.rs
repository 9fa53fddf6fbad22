pub mod platform;
pub mod config;
pub mod error;
pub mod fs_move;
pub mod relocation;
pub mod report;
pub mod archive;
pub mod cargo_integration;
pub mod cli;

pub use config::RelocationConfig;
pub use error::{RelocateError, RelocateResult};
pub use relocation::ArtifactRelocator;
