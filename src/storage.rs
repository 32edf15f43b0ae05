//! Artifact Store - Filesystem Persistence

use image::ImageFormat;
use std::fs;
use std::io;
use std::path::Path;

use crate::engine::EncodedArtifact;

pub trait ArtifactStore {
    /// Creates `dir` and its parents. Succeeds if it already exists.
    fn ensure_directory(&self, dir: &Path) -> io::Result<()>;

    /// Writes a PNG at `path`, replacing any existing file.
    fn write_image(&self, artifact: &EncodedArtifact, path: &Path) -> io::Result<()>;
}

/// Plain filesystem store. Writes are not atomic.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl ArtifactStore for FsStore {
    fn ensure_directory(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }

    fn write_image(&self, artifact: &EncodedArtifact, path: &Path) -> io::Result<()> {
        artifact
            .image()
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| match e {
                image::ImageError::IoError(io) => io,
                other => io::Error::new(io::ErrorKind::Other, other),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_ensure_directory_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("output").join("qrcode");
        FsStore.ensure_directory(&nested).unwrap();
        FsStore.ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_write_image_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.png");

        let black = EncodedArtifact::new(GrayImage::from_pixel(4, 4, Luma([0])));
        let white = EncodedArtifact::new(GrayImage::from_pixel(2, 2, Luma([255])));
        FsStore.write_image(&black, &path).unwrap();
        FsStore.write_image(&white, &path).unwrap();

        let saved = image::open(&path).unwrap().to_luma8();
        assert_eq!(saved.dimensions(), (2, 2));
        assert_eq!(saved.get_pixel(0, 0), &Luma([255]));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("code.png");
        let artifact = EncodedArtifact::new(GrayImage::from_pixel(1, 1, Luma([0])));
        assert!(FsStore.write_image(&artifact, &path).is_err());
    }
}
