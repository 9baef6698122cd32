//! FODMAPP Images - Slot Resolution with Graceful Degradation
//!
//! # The Two Rules
//! 1. Resolution Never Fails (every slot carries a default)
//! 2. A Failed Image Stays Failed (per mounted instance)

pub mod slots;
pub mod sources;
pub mod resolver;
pub mod manifest;
pub mod presenter;

pub use slots::{Slot, SlotError};
pub use sources::{ConfigError, ConfigSource, EnvConvention, EnvSnapshot, EnvSource, GlobalImages, Reference, SourceKind};
pub use resolver::{resolve, Resolution, Resolver};
pub use manifest::{canonical_json, compute_fingerprint, ResolutionManifest};
pub use presenter::{LoadFailure, Loading, RenderOutput, RenderState, SmartImage};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
