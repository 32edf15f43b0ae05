//! Encoding Engine - Symbology Encoding and Rasterisation
//!
//! Colors are fixed: black modules on a white background.

use barcoders::sym::code128::Code128;
use barcoders::sym::ean13::EAN13;
use image::{GrayImage, Luma};
use qrcode::{Color, EcLevel, QrCode, Version};
use thiserror::Error;

use crate::profiles::{ErrorCorrection, QrOptions, Symbology};

const FILL: Luma<u8> = Luma([0u8]);
const BACKGROUND: Luma<u8> = Luma([255u8]);

/// Code128 character set B selector (ASCII letters, digits, punctuation).
const CODE128_SET_B: char = 'Ɓ';

#[derive(Debug, Error)]
#[error("{symbology} encoding failed: {message}")]
pub struct EngineError {
    pub symbology: Symbology,
    pub message: String,
}

impl EngineError {
    fn new(symbology: Symbology, message: impl Into<String>) -> Self {
        Self { symbology, message: message.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOptions {
    Linear,
    Qr(QrOptions),
}

/// Rendered code, ready to be persisted
#[derive(Debug, Clone)]
pub struct EncodedArtifact {
    image: GrayImage,
}

impl EncodedArtifact {
    pub fn new(image: GrayImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

pub trait EncodingEngine {
    fn encode(
        &self,
        symbology: Symbology,
        payload: &str,
        options: &RenderOptions,
    ) -> Result<EncodedArtifact, EngineError>;
}

/// Raster geometry for EAN-13 and Code128
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearRaster {
    pub module_width: u32,
    pub bar_height: u32,
    pub quiet_zone: u32,
    pub margin: u32,
}

impl Default for LinearRaster {
    fn default() -> Self {
        Self {
            module_width: 3,
            bar_height: 150,
            quiet_zone: 10,
            margin: 10,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RasterEngine {
    linear: LinearRaster,
}

impl RasterEngine {
    pub fn new(linear: LinearRaster) -> Self {
        Self { linear }
    }

    fn encode_linear(&self, symbology: Symbology, payload: &str) -> Result<Vec<u8>, EngineError> {
        if let Some(c) = payload.chars().find(|c| !c.is_ascii()) {
            return Err(EngineError::new(symbology, format!("character {:?} cannot be encoded", c)));
        }

        let fail = |e: barcoders::error::Error| EngineError::new(symbology, e.to_string());
        match symbology {
            Symbology::Ean13 => Ok(EAN13::new(payload.to_string()).map_err(fail)?.encode()),
            Symbology::Code128 => {
                let data = format!("{}{}", CODE128_SET_B, payload);
                Ok(Code128::new(data).map_err(fail)?.encode())
            }
            Symbology::Qr => Err(EngineError::new(symbology, "QR is not a linear symbology")),
        }
    }

    fn render_linear(&self, modules: &[u8]) -> GrayImage {
        let g = self.linear;
        let width = (modules.len() as u32 + 2 * g.quiet_zone) * g.module_width;
        let height = g.bar_height + 2 * g.margin;
        let mut img = GrayImage::from_pixel(width, height, BACKGROUND);

        for (i, _) in modules.iter().enumerate().filter(|(_, m)| **m == 1) {
            let x0 = (i as u32 + g.quiet_zone) * g.module_width;
            for x in x0..x0 + g.module_width {
                for y in g.margin..g.margin + g.bar_height {
                    img.put_pixel(x, y, FILL);
                }
            }
        }
        img
    }

    fn render_qr(&self, payload: &str, options: &QrOptions) -> Result<GrayImage, EngineError> {
        options.check().map_err(|reason| EngineError::new(Symbology::Qr, reason))?;

        let code = QrCode::with_version(
            payload.as_bytes(),
            Version::Normal(options.version as i16),
            ec_level(options.error_correction),
        )
        .map_err(|e| {
            EngineError::new(
                Symbology::Qr,
                format!("{} (version {}, level {:?})", e, options.version, options.error_correction),
            )
        })?;

        let modules = code.to_colors();
        let module_count = code.width() as u32;
        let scale = options.box_size;
        let size = options
            .border
            .checked_mul(2)
            .and_then(|b| b.checked_add(module_count))
            .and_then(|m| m.checked_mul(scale))
            .ok_or_else(|| EngineError::new(Symbology::Qr, "image size overflows"))?;
        let mut img = GrayImage::from_pixel(size, size, BACKGROUND);

        for (i, color) in modules.iter().enumerate() {
            if *color != Color::Dark {
                continue;
            }
            let x = (i as u32) % module_count + options.border;
            let y = (i as u32) / module_count + options.border;
            for dx in 0..scale {
                for dy in 0..scale {
                    img.put_pixel(x * scale + dx, y * scale + dy, FILL);
                }
            }
        }
        Ok(img)
    }
}

impl EncodingEngine for RasterEngine {
    fn encode(
        &self,
        symbology: Symbology,
        payload: &str,
        options: &RenderOptions,
    ) -> Result<EncodedArtifact, EngineError> {
        let image = match (symbology, options) {
            (Symbology::Qr, RenderOptions::Qr(qr)) => self.render_qr(payload, qr)?,
            (Symbology::Qr, RenderOptions::Linear) => {
                return Err(EngineError::new(symbology, "QR requires QR render options"));
            }
            (_, RenderOptions::Linear) => {
                let modules = self.encode_linear(symbology, payload)?;
                self.render_linear(&modules)
            }
            (_, RenderOptions::Qr(_)) => {
                return Err(EngineError::new(symbology, "QR render options given for a linear symbology"));
            }
        };
        Ok(EncodedArtifact::new(image))
    }
}

fn ec_level(level: ErrorCorrection) -> EcLevel {
    match level {
        ErrorCorrection::L => EcLevel::L,
        ErrorCorrection::M => EcLevel::M,
        ErrorCorrection::Q => EcLevel::Q,
        ErrorCorrection::H => EcLevel::H,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::GenerationProfile;

    fn qr(options: QrOptions) -> RenderOptions {
        RenderOptions::Qr(options)
    }

    #[test]
    fn test_ean13_raster_geometry() {
        let engine = RasterEngine::default();
        let artifact = engine.encode(Symbology::Ean13, "123456789012", &RenderOptions::Linear).unwrap();
        // 95 modules + 2 * 10 quiet zone, 3 px each
        assert_eq!(artifact.dimensions(), (345, 170));
        let img = artifact.image();
        assert_eq!(img.get_pixel(0, 0), &BACKGROUND);
        // left guard bar starts right after the quiet zone
        assert_eq!(img.get_pixel(30, 20), &FILL);
    }

    #[test]
    fn test_custom_linear_geometry() {
        let engine = RasterEngine::new(LinearRaster { module_width: 1, bar_height: 40, quiet_zone: 0, margin: 0 });
        let artifact = engine.encode(Symbology::Ean13, "400638133393", &RenderOptions::Linear).unwrap();
        assert_eq!(artifact.dimensions(), (95, 40));
        // guard bars 101 on both ends
        let img = artifact.image();
        assert_eq!(img.get_pixel(0, 0), &FILL);
        assert_eq!(img.get_pixel(1, 0), &BACKGROUND);
        assert_eq!(img.get_pixel(94, 39), &FILL);
    }

    #[test]
    fn test_code128_renders() {
        let engine = RasterEngine::default();
        let artifact = engine.encode(Symbology::Code128, "ABC123", &RenderOptions::Linear).unwrap();
        let (w, h) = artifact.dimensions();
        assert!(w > 60 * 3);
        assert_eq!(h, 170);
        assert!(artifact.image().pixels().any(|p| *p == FILL));
    }

    #[test]
    fn test_qr_size_follows_version_and_border() {
        let engine = RasterEngine::default();
        let profile = GenerationProfile::issuer();
        let artifact = engine.encode(Symbology::Qr, "inv_jorge_el_curioso_x", &qr(profile.render)).unwrap();
        // version 10 is 57 modules wide
        assert_eq!(artifact.dimensions(), ((57 + 8) * 10, (57 + 8) * 10));
        assert_eq!(artifact.image().get_pixel(0, 0), &BACKGROUND);
        // top-left finder pattern corner
        assert_eq!(artifact.image().get_pixel(40, 40), &FILL);
    }

    #[test]
    fn test_qr_over_capacity_fails() {
        let engine = RasterEngine::default();
        let compact = GenerationProfile::compact();
        assert!(engine.encode(Symbology::Qr, "seventeen_bytes!!", &qr(compact.render)).is_ok());
        let err = engine
            .encode(Symbology::Qr, "eighteen_bytes!!!!", &qr(compact.render))
            .unwrap_err();
        assert_eq!(err.symbology, Symbology::Qr);
    }

    #[test]
    fn test_oversized_qr_options_fail_without_panic() {
        let engine = RasterEngine::default();
        let huge = QrOptions { version: 1, error_correction: ErrorCorrection::L, box_size: 10, border: u32::MAX };
        assert!(engine.encode(Symbology::Qr, "hi", &qr(huge)).is_err());
        let huge = QrOptions { box_size: u32::MAX, border: 4, ..huge };
        assert!(engine.encode(Symbology::Qr, "hi", &qr(huge)).is_err());
    }

    #[test]
    fn test_non_ascii_linear_payload_fails() {
        let engine = RasterEngine::default();
        let err = engine.encode(Symbology::Code128, "ñandú", &RenderOptions::Linear).unwrap_err();
        assert_eq!(err.symbology, Symbology::Code128);
        assert!(err.message.contains("'ñ'"));
        assert!(engine.encode(Symbology::Ean13, "１２３４５６７８９０１２", &RenderOptions::Linear).is_err());
    }

    #[test]
    fn test_mismatched_options_fail() {
        let engine = RasterEngine::default();
        assert!(engine.encode(Symbology::Qr, "x", &RenderOptions::Linear).is_err());
        let options = qr(GenerationProfile::compact().render);
        assert!(engine.encode(Symbology::Ean13, "123456789012", &options).is_err());
    }

    #[test]
    fn test_engine_rejects_bad_ean13_alphabet() {
        let engine = RasterEngine::default();
        assert!(engine.encode(Symbology::Ean13, "12345678901x", &RenderOptions::Linear).is_err());
    }
}
