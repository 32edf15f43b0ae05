//! Inventory Codes Core - EAN-13, Code128 and QR Generator
//!
//! # Generation Contract
//! 1. Validation Runs First, On The Raw Text
//! 2. Prefixes Belong To QR Profiles Only
//! 3. Rejected Input Never Reaches The Engine
//! 4. One Artifact, One Path, Reported Verbatim
//! 5. Failures Are Terminal (No Retries)

pub mod profiles;
pub mod validation;
pub mod naming;
pub mod engine;
pub mod storage;
pub mod pipeline;
pub mod input;
pub mod logging;

pub use profiles::{parse_profile, Symbology, GenerationProfile, QrOptions, ErrorCorrection, ProfileRegistry, ConfigError};
pub use validation::{validate, ValidationResult, ValidationRule, Validator};
pub use naming::{name_for, NamingPolicy, OutputDescriptor};
pub use engine::{EncodedArtifact, EncodingEngine, EngineError, LinearRaster, RasterEngine, RenderOptions};
pub use storage::{ArtifactStore, FsStore};
pub use pipeline::{GeneratedCode, GenerationError, GenerationPipeline, GenerationRequest, SymbologyOptions};
pub use input::{read_valid_input, InputSource, StdinSource};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
