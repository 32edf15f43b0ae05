//! Generation Pipeline - Single Entry Point
//!
//! generate MUST validate the raw text before anything is encoded. Every
//! failure is terminal for the request: no retries, nothing swallowed.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::engine::{EncodingEngine, RasterEngine, RenderOptions};
use crate::naming::NamingPolicy;
use crate::profiles::{GenerationProfile, Symbology};
use crate::storage::{ArtifactStore, FsStore};
use crate::validation::{ValidationResult, Validator};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("I/O failed: {0}")]
    IoFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbologyOptions {
    Ean13,
    Code128,
    Qr(GenerationProfile),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    options: SymbologyOptions,
    raw_text: String,
}

impl GenerationRequest {
    pub fn ean13(raw_text: impl Into<String>) -> Self {
        Self { options: SymbologyOptions::Ean13, raw_text: raw_text.into() }
    }

    pub fn code128(raw_text: impl Into<String>) -> Self {
        Self { options: SymbologyOptions::Code128, raw_text: raw_text.into() }
    }

    pub fn qr(raw_text: impl Into<String>, profile: GenerationProfile) -> Self {
        Self { options: SymbologyOptions::Qr(profile), raw_text: raw_text.into() }
    }

    pub fn symbology(&self) -> Symbology {
        match self.options {
            SymbologyOptions::Ean13 => Symbology::Ean13,
            SymbologyOptions::Code128 => Symbology::Code128,
            SymbologyOptions::Qr(_) => Symbology::Qr,
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn options(&self) -> &SymbologyOptions {
        &self.options
    }

    /// Prefix applied before encoding. Only QR profiles carry one.
    pub fn prefix(&self) -> Option<&str> {
        match &self.options {
            SymbologyOptions::Qr(profile) => Some(&profile.prefix),
            _ => None,
        }
    }

    fn payload(&self, normalized: &str) -> String {
        match self.prefix() {
            Some(prefix) => format!("{}{}", prefix, normalized),
            None => normalized.to_string(),
        }
    }

    fn render_options(&self) -> RenderOptions {
        match &self.options {
            SymbologyOptions::Qr(profile) => RenderOptions::Qr(profile.render),
            _ => RenderOptions::Linear,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCode {
    pub symbology: Symbology,
    pub payload: String,
    pub path: PathBuf,
}

/// The generation pipeline - validate, encode, name, persist
pub struct GenerationPipeline {
    validator: Validator,
    engine: Box<dyn EncodingEngine>,
    store: Box<dyn ArtifactStore>,
    naming: NamingPolicy,
}

impl GenerationPipeline {
    pub fn new(
        engine: Box<dyn EncodingEngine>,
        store: Box<dyn ArtifactStore>,
        naming: NamingPolicy,
    ) -> Self {
        Self {
            validator: Validator::new(),
            engine,
            store,
            naming,
        }
    }

    /// Raster engine and filesystem store writing under `root`
    pub fn with_output_root(root: impl Into<PathBuf>) -> Self {
        Self::new(
            Box::new(RasterEngine::default()),
            Box::new(FsStore),
            NamingPolicy::new(root),
        )
    }

    pub fn output_root(&self) -> &Path {
        self.naming.root()
    }

    pub fn validate(&self, symbology: Symbology, raw_text: &str) -> ValidationResult {
        self.validator.validate(symbology, raw_text)
    }

    /// Generate one code, named after the current local time
    pub fn generate(&self, request: &GenerationRequest) -> Result<GeneratedCode, GenerationError> {
        self.generate_at(request, Local::now().naive_local())
    }

    pub fn generate_at(
        &self,
        request: &GenerationRequest,
        when: NaiveDateTime,
    ) -> Result<GeneratedCode, GenerationError> {
        let symbology = request.symbology();
        let result = self.run(request, symbology, when);
        match &result {
            Ok(code) => tracing::info!(%symbology, path = %code.path.display(), "code generated"),
            Err(e) => tracing::warn!(%symbology, error = %e, "generation failed"),
        }
        result
    }

    fn run(
        &self,
        request: &GenerationRequest,
        symbology: Symbology,
        when: NaiveDateTime,
    ) -> Result<GeneratedCode, GenerationError> {
        // MANDATORY: validation runs on the raw text, before any prefix.
        let normalized = match self.validator.validate(symbology, request.raw_text()) {
            ValidationResult::Accepted(text) => text,
            ValidationResult::Rejected(reason) => return Err(GenerationError::InvalidInput(reason)),
        };

        let payload = request.payload(&normalized);
        tracing::debug!(%symbology, payload_len = payload.len(), "encoding payload");
        let artifact = self
            .engine
            .encode(symbology, &payload, &request.render_options())
            .map_err(|e| GenerationError::EncodingFailed(e.to_string()))?;

        let descriptor = self.naming.name_for(symbology, when);
        self.store
            .ensure_directory(&descriptor.directory)
            .map_err(|e| io_failed(&descriptor.directory, e))?;

        let path = descriptor.path();
        tracing::debug!(path = %path.display(), "writing artifact");
        self.store
            .write_image(&artifact, &path)
            .map_err(|e| io_failed(&path, e))?;

        Ok(GeneratedCode { symbology, payload, path })
    }
}

fn io_failed(path: &Path, e: std::io::Error) -> GenerationError {
    GenerationError::IoFailed(format!("{}: {}", path.display(), e))
}

impl Default for GenerationPipeline {
    fn default() -> Self {
        Self::with_output_root(crate::naming::DEFAULT_OUTPUT_ROOT)
    }
}
