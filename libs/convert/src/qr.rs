//! QR code rendering and scanning.

use std::fmt;
use std::str::FromStr;

use image::{ExtendedColorType, ImageEncoder, Luma};
use qrcode::render::svg;
use qrcode::render::unicode::Dense1x2;
use qrcode::QrCode;
use rqrr::PreparedImage;
use serde::{Deserialize, Serialize};

use crate::ConvertError;

pub const DEFAULT_SIZE: u32 = 256;
pub const MAX_SIZE: u32 = 2048;

/// Error-correction level, from 7% (`L`) to 30% (`H`) recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EcLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl EcLevel {
    fn to_qrcode(self) -> qrcode::EcLevel {
        match self {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

impl fmt::Display for EcLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EcLevel::L => "L",
            EcLevel::M => "M",
            EcLevel::Q => "Q",
            EcLevel::H => "H",
        };
        f.write_str(s)
    }
}

impl FromStr for EcLevel {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(EcLevel::L),
            "M" => Ok(EcLevel::M),
            "Q" => Ok(EcLevel::Q),
            "H" => Ok(EcLevel::H),
            _ => Err(ConvertError::UnknownUnit {
                kind: "error-correction level",
                name: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrOptions {
    pub ec_level: EcLevel,
    /// Minimum edge length in pixels for SVG and PNG output.
    pub size: u32,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::default(),
            size: DEFAULT_SIZE,
        }
    }
}

impl QrOptions {
    fn edge(&self) -> u32 {
        self.size.clamp(21, MAX_SIZE)
    }
}

/// One code found in a scanned image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrPayload {
    pub content: String,
    pub version: usize,
    pub ec_level: u16,
}

fn encode(text: &str, opts: &QrOptions) -> Result<QrCode, ConvertError> {
    QrCode::with_error_correction_level(text.as_bytes(), opts.ec_level.to_qrcode())
        .map_err(|e| ConvertError::QrEncode(e.to_string()))
}

/// Renders with half-height block characters, two modules per line.
pub fn render_terminal(text: &str, opts: &QrOptions) -> Result<String, ConvertError> {
    let code = encode(text, opts)?;
    Ok(code
        .render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .build())
}

pub fn render_svg(text: &str, opts: &QrOptions) -> Result<String, ConvertError> {
    let code = encode(text, opts)?;
    let edge = opts.edge();
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(edge, edge)
        .build())
}

/// Encodes a greyscale PNG.
pub fn render_png(text: &str, opts: &QrOptions) -> Result<Vec<u8>, ConvertError> {
    let code = encode(text, opts)?;
    let edge = opts.edge();
    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(edge, edge)
        .build();

    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::L8,
        )
        .map_err(|e| ConvertError::Image(e.to_string()))?;
    Ok(png)
}

/// Finds and decodes every QR code in an encoded image (PNG).
pub fn decode_image(bytes: &[u8]) -> Result<Vec<QrPayload>, ConvertError> {
    if bytes.is_empty() {
        return Err(ConvertError::Image("image is empty".to_string()));
    }
    let luma = image::load_from_memory(bytes)
        .map_err(|e| ConvertError::Image(e.to_string()))?
        .to_luma8();

    let (width, height) = (luma.width() as usize, luma.height() as usize);
    let mut prepared = PreparedImage::prepare_from_greyscale(width, height, |x, y| {
        luma.get_pixel(x as u32, y as u32).0[0]
    });

    let grids = prepared.detect_grids();
    if grids.is_empty() {
        return Err(ConvertError::NoQrCode);
    }

    grids
        .into_iter()
        .map(|grid| {
            let (meta, content) = grid
                .decode()
                .map_err(|e| ConvertError::Image(format!("decode failed: {e}")))?;
            Ok(QrPayload {
                content,
                version: meta.version.0,
                ec_level: meta.ecc_level,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_round_trip() {
        let png = render_png("https://example.com/devbox", &QrOptions::default()).unwrap();
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);

        let payloads = decode_image(&png).unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].content, "https://example.com/devbox");
    }

    #[test]
    fn test_png_honors_minimum_size() {
        let opts = QrOptions {
            size: 400,
            ec_level: EcLevel::H,
        };
        let png = render_png("hello", &opts).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert!(decoded.width() >= 400);
    }

    #[test]
    fn test_svg_output() {
        let svg = render_svg("hello", &QrOptions::default()).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_terminal_output_uses_block_characters() {
        let art = render_terminal("hello", &QrOptions::default()).unwrap();
        assert!(art.lines().count() > 10);
        assert!(art.chars().any(|c| matches!(c, '█' | '▀' | '▄')));
    }

    #[test]
    fn test_blank_image_has_no_code() {
        let blank = image::GrayImage::from_pixel(64, 64, Luma([255u8]));
        let mut png = Vec::new();
        image::codecs::png::PngEncoder::new(&mut png)
            .write_image(blank.as_raw(), 64, 64, ExtendedColorType::L8)
            .unwrap();
        assert_eq!(decode_image(&png), Err(ConvertError::NoQrCode));
    }

    #[test]
    fn test_rejects_non_image_bytes() {
        assert!(matches!(decode_image(b"not a png"), Err(ConvertError::Image(_))));
        assert!(matches!(decode_image(&[]), Err(ConvertError::Image(_))));
    }

    #[test]
    fn test_payload_too_large() {
        let text = "x".repeat(8_000);
        assert!(matches!(
            render_png(&text, &QrOptions::default()),
            Err(ConvertError::QrEncode(_))
        ));
    }

    #[test]
    fn test_ec_level_names() {
        assert_eq!("h".parse::<EcLevel>().unwrap(), EcLevel::H);
        assert!("z".parse::<EcLevel>().is_err());
    }
}
