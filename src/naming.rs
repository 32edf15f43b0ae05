//! Naming Policy - Timestamped Output Paths
//!
//! `{root}/{category}/{tag}_{YYYY.MM.DD-HH.MM.SS}.png`
//!
//! Uniqueness is only per second and per tag. Two codes of the same tag
//! generated within one second resolve to the same path.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::profiles::Symbology;

pub const DEFAULT_OUTPUT_ROOT: &str = "output";
pub const TIMESTAMP_FORMAT: &str = "%Y.%m.%d-%H.%M.%S";
pub const IMAGE_EXTENSION: &str = "png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDescriptor {
    pub directory: PathBuf,
    pub file_stem: String,
    pub extension: String,
}

impl OutputDescriptor {
    pub fn path(&self) -> PathBuf {
        self.directory.join(format!("{}.{}", self.file_stem, self.extension))
    }
}

#[derive(Debug, Clone)]
pub struct NamingPolicy {
    root: PathBuf,
}

impl NamingPolicy {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name_for(&self, symbology: Symbology, when: NaiveDateTime) -> OutputDescriptor {
        OutputDescriptor {
            directory: self.root.join(symbology.category()),
            file_stem: format!("{}_{}", symbology.tag(), when.format(TIMESTAMP_FORMAT)),
            extension: IMAGE_EXTENSION.to_string(),
        }
    }
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_ROOT)
    }
}

/// Descriptor under the default `output` root
pub fn name_for(symbology: Symbology, when: NaiveDateTime) -> OutputDescriptor {
    NamingPolicy::default().name_for(symbology, when)
}
