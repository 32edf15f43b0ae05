//! Symbologies and QR Generation Profiles
//!
//! A profile is the per-deployment QR configuration: a fixed payload prefix
//! plus the render options handed to the encoding engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbology {
    Ean13,
    Code128,
    Qr,
}

impl Symbology {
    /// Tag used as the filename stem prefix.
    ///
    /// EAN-13 keeps the generic "barcode" tag while Code128 gets its own.
    pub fn tag(&self) -> &'static str {
        match self {
            Symbology::Ean13 => "barcode",
            Symbology::Code128 => "code128",
            Symbology::Qr => "qrcode",
        }
    }

    /// Output subdirectory. Both linear symbologies share "barcode".
    pub fn category(&self) -> &'static str {
        match self {
            Symbology::Ean13 | Symbology::Code128 => "barcode",
            Symbology::Qr => "qrcode",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Symbology::Ean13 => "EAN-13",
            Symbology::Code128 => "Code128",
            Symbology::Qr => "QR",
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCorrection {
    L,
    M,
    Q,
    H,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read profile {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid profile JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid QR options in profile '{profile}': {reason}")]
    InvalidOptions { profile: String, reason: &'static str },
}

pub const MAX_BOX_SIZE: u32 = 50;
pub const MAX_BORDER: u32 = 40;

/// QR render options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrOptions {
    pub version: u8,
    pub error_correction: ErrorCorrection,
    pub box_size: u32,
    pub border: u32,
}

impl QrOptions {
    pub fn new(
        version: u8,
        error_correction: ErrorCorrection,
        box_size: u32,
        border: u32,
    ) -> Result<Self, &'static str> {
        let options = Self { version, error_correction, box_size, border };
        options.check()?;
        Ok(options)
    }

    pub fn check(&self) -> Result<(), &'static str> {
        if !(1..=40).contains(&self.version) {
            return Err("version must be between 1 and 40");
        }
        if !(1..=MAX_BOX_SIZE).contains(&self.box_size) {
            return Err("box size must be between 1 and 50 pixels");
        }
        if self.border > MAX_BORDER {
            return Err("border must be at most 40 modules");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationProfile {
    pub name: String,
    #[serde(default)]
    pub prefix: String,
    pub render: QrOptions,
}

impl GenerationProfile {
    pub const ISSUER: &'static str = "issuer";
    pub const COMPACT: &'static str = "compact";

    /// Tags every payload as issued by this inventory deployment.
    pub fn issuer() -> Self {
        Self {
            name: Self::ISSUER.to_string(),
            prefix: "inv_jorge_el_curioso_".to_string(),
            render: QrOptions {
                version: 10,
                error_correction: ErrorCorrection::H,
                box_size: 10,
                border: 4,
            },
        }
    }

    /// Smallest symbol, no prefix. Holds at most 17 bytes.
    pub fn compact() -> Self {
        Self {
            name: Self::COMPACT.to_string(),
            prefix: String::new(),
            render: QrOptions {
                version: 1,
                error_correction: ErrorCorrection::L,
                box_size: 10,
                border: 4,
            },
        }
    }
}

/// Profile registry - built-ins plus profiles loaded from disk
pub struct ProfileRegistry {
    profiles: BTreeMap<String, GenerationProfile>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self { profiles: BTreeMap::new() }
    }

    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(GenerationProfile::issuer());
        registry.register(GenerationProfile::compact());
        registry
    }

    /// Loads every `*.json` profile in `dir` on top of the built-ins.
    ///
    /// Files that are not profiles are skipped. Profiles with out of range
    /// render options are an error.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let mut registry = Self::builtin();
        if !dir.exists() {
            return Ok(registry);
        }

        let io_err = |source| ConfigError::Io { path: dir.display().to_string(), source };
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.extension().map_or(true, |e| e != "json") {
                continue;
            }
            let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
            match parse_profile(&content) {
                Ok(profile) => {
                    tracing::debug!(profile = %profile.name, path = %path.display(), "loaded profile");
                    registry.register(profile);
                }
                Err(ConfigError::Parse(e)) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable profile");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&GenerationProfile> {
        self.profiles.get(name)
    }

    pub fn list(&self) -> Vec<&GenerationProfile> {
        self.profiles.values().collect()
    }

    pub fn register(&mut self, profile: GenerationProfile) {
        self.profiles.insert(profile.name.clone(), profile);
    }
}

/// Parses one JSON profile and checks its render options
pub fn parse_profile(json: &str) -> Result<GenerationProfile, ConfigError> {
    let profile: GenerationProfile = serde_json::from_str(json)?;
    profile.render.check().map_err(|reason| ConfigError::InvalidOptions {
        profile: profile.name.clone(),
        reason,
    })?;
    Ok(profile)
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
