//! Blueprint ingestion: upload validation, data URLs and dimension probing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageReader;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use thiserror::Error;

/// Largest upload accepted by default (10 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Blueprint ingestion errors.
#[derive(Debug, Error)]
pub enum BlueprintError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },
    #[error("File is empty")]
    Empty,
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Accepted blueprint file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlueprintFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
    Pdf,
}

impl BlueprintFormat {
    /// Match an allow-listed MIME type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(BlueprintFormat::Jpeg),
            "image/png" => Some(BlueprintFormat::Png),
            "image/gif" => Some(BlueprintFormat::Gif),
            "image/webp" => Some(BlueprintFormat::Webp),
            "application/pdf" => Some(BlueprintFormat::Pdf),
            _ => None,
        }
    }

    /// Match an allow-listed file extension.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(BlueprintFormat::Jpeg),
            "png" => Some(BlueprintFormat::Png),
            "gif" => Some(BlueprintFormat::Gif),
            "webp" => Some(BlueprintFormat::Webp),
            "pdf" => Some(BlueprintFormat::Pdf),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            BlueprintFormat::Jpeg => "image/jpeg",
            BlueprintFormat::Png => "image/png",
            BlueprintFormat::Gif => "image/gif",
            BlueprintFormat::Webp => "image/webp",
            BlueprintFormat::Pdf => "application/pdf",
        }
    }

    /// Check if the format can be probed for pixel dimensions.
    pub fn is_raster(&self) -> bool {
        !matches!(self, BlueprintFormat::Pdf)
    }
}

/// Validate an upload against the allow-list and size cap.
///
/// An empty `mime` falls back to the file extension.
pub fn validate_upload(
    file_name: &str,
    mime: &str,
    size: u64,
    max_bytes: u64,
) -> Result<BlueprintFormat, BlueprintError> {
    let format = if mime.trim().is_empty() {
        BlueprintFormat::from_file_name(file_name)
    } else {
        BlueprintFormat::from_mime(mime)
    };
    let format = format.ok_or_else(|| {
        let shown = if mime.trim().is_empty() { file_name } else { mime };
        BlueprintError::UnsupportedType(shown.to_string())
    })?;
    if size == 0 {
        return Err(BlueprintError::Empty);
    }
    if size > max_bytes {
        return Err(BlueprintError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    Ok(format)
}

/// Encode bytes as a `data:` URL.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Decode a base64 `data:` URL into its MIME type and bytes.
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>), BlueprintError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| BlueprintError::InvalidDataUrl("missing data: prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| BlueprintError::InvalidDataUrl("missing payload separator".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| BlueprintError::InvalidDataUrl("only base64 payloads are supported".to_string()))?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| BlueprintError::InvalidDataUrl(e.to_string()))?;
    Ok((mime.to_string(), bytes))
}

/// Read the pixel dimensions of an encoded raster image without
/// decoding its pixel data.
pub fn decode_dimensions(bytes: &[u8]) -> Result<(u32, u32), BlueprintError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| BlueprintError::Decode(e.to_string()))?;
    if reader.format().is_none() {
        return Err(BlueprintError::Decode("unrecognized image data".to_string()));
    }
    reader
        .into_dimensions()
        .map_err(|e| BlueprintError::Decode(e.to_string()))
}

/// A blueprint accepted into the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    /// Remote URL or inline `data:` URL.
    pub url: String,
    /// Name of the file the user uploaded.
    pub file_name: String,
    /// Detected format, if known.
    pub format: Option<BlueprintFormat>,
}

impl Blueprint {
    /// Accept an uploaded file, validating type and size first.
    pub fn from_upload(
        file_name: &str,
        mime: &str,
        bytes: &[u8],
        max_bytes: u64,
    ) -> Result<Self, BlueprintError> {
        let format = validate_upload(file_name, mime, bytes.len() as u64, max_bytes)?;
        Ok(Self {
            url: to_data_url(format.mime(), bytes),
            file_name: file_name.to_string(),
            format: Some(format),
        })
    }

    /// Reference an already stored blueprint.
    pub fn from_url(url: &str, file_name: &str) -> Self {
        let format = url
            .strip_prefix("data:")
            .and_then(|rest| rest.split([';', ',']).next())
            .and_then(BlueprintFormat::from_mime);
        Self {
            url: url.to_string(),
            file_name: file_name.to_string(),
            format: format.or_else(|| BlueprintFormat::from_file_name(file_name)),
        }
    }

    /// Check if the image bytes are embedded in the URL.
    pub fn is_inline(&self) -> bool {
        self.url.starts_with("data:")
    }

    /// Probe the dimensions of an inline raster blueprint.
    ///
    /// Remote blueprints must be fetched by the host, which then reports
    /// the outcome through the editor's decode hook.
    pub fn decode_dimensions(&self) -> Result<(u32, u32), BlueprintError> {
        if self.format == Some(BlueprintFormat::Pdf) {
            return Err(BlueprintError::Decode(
                "PDF blueprints have no raster dimensions".to_string(),
            ));
        }
        if !self.is_inline() {
            return Err(BlueprintError::Decode(format!(
                "remote blueprint {} is not available inline",
                self.url
            )));
        }
        let (_, bytes) = parse_data_url(&self.url)?;
        decode_dimensions(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::new(width, height);
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_allow_list() {
        assert_eq!(
            validate_upload("plan.png", "image/png", 100, DEFAULT_MAX_UPLOAD_BYTES).unwrap(),
            BlueprintFormat::Png
        );
        assert_eq!(
            validate_upload("plan.PDF", "", 100, DEFAULT_MAX_UPLOAD_BYTES).unwrap(),
            BlueprintFormat::Pdf
        );
        assert!(matches!(
            validate_upload("plan.dwg", "application/acad", 100, DEFAULT_MAX_UPLOAD_BYTES),
            Err(BlueprintError::UnsupportedType(_))
        ));
        assert!(matches!(
            validate_upload("notes", "", 100, DEFAULT_MAX_UPLOAD_BYTES),
            Err(BlueprintError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_size_cap() {
        assert!(validate_upload("a.jpg", "image/jpeg", DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MAX_UPLOAD_BYTES).is_ok());
        assert!(matches!(
            validate_upload("a.jpg", "image/jpeg", DEFAULT_MAX_UPLOAD_BYTES + 1, DEFAULT_MAX_UPLOAD_BYTES),
            Err(BlueprintError::TooLarge { .. })
        ));
        assert!(matches!(
            validate_upload("a.jpg", "image/jpeg", 0, DEFAULT_MAX_UPLOAD_BYTES),
            Err(BlueprintError::Empty)
        ));
    }

    #[test]
    fn test_data_url_roundtrip() {
        let url = to_data_url("image/png", b"\x89PNG-ish");
        let (mime, bytes) = parse_data_url(&url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"\x89PNG-ish");
        assert!(parse_data_url("https://example.com/a.png").is_err());
        assert!(parse_data_url("data:image/png,rawdata").is_err());
    }

    #[test]
    fn test_upload_decodes_dimensions() {
        let bytes = tiny_png(7, 3);
        let blueprint = Blueprint::from_upload("floor.png", "image/png", &bytes, DEFAULT_MAX_UPLOAD_BYTES).unwrap();
        assert!(blueprint.is_inline());
        assert_eq!(blueprint.decode_dimensions().unwrap(), (7, 3));
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        let blueprint =
            Blueprint::from_upload("floor.png", "image/png", b"not an image", DEFAULT_MAX_UPLOAD_BYTES).unwrap();
        assert!(matches!(blueprint.decode_dimensions(), Err(BlueprintError::Decode(_))));
    }

    #[test]
    fn test_pdf_and_remote_not_probed() {
        let pdf = Blueprint::from_url("https://files.example.com/plan.pdf", "plan.pdf");
        assert_eq!(pdf.format, Some(BlueprintFormat::Pdf));
        assert!(pdf.decode_dimensions().is_err());

        let remote = Blueprint::from_url("https://files.example.com/plan", "plan.png");
        assert_eq!(remote.format, Some(BlueprintFormat::Png));
        assert!(!remote.is_inline());
        assert!(remote.decode_dimensions().is_err());
    }

    #[test]
    fn test_format_from_inline_url() {
        let blueprint = Blueprint::from_url(&to_data_url("image/webp", b"x"), "scan");
        assert_eq!(blueprint.format, Some(BlueprintFormat::Webp));
    }
}
