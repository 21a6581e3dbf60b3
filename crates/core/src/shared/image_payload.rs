use image::ImageFormat;

use super::provider_error::ProviderError;

/// Raw image bytes plus the MIME type sniffed from their header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    mime_type: &'static str,
}

impl ImagePayload {
    /// Validates that `bytes` start with a known image signature.
    ///
    /// Rejects empty buffers and unknown formats before any OCR provider is
    /// invoked, so providers never see undecodable input.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ProviderError> {
        if bytes.is_empty() {
            return Err(ProviderError::invalid_data("image", "no image data"));
        }
        let format = image::guess_format(&bytes)
            .map_err(|e| ProviderError::invalid_data("image", e))?;
        Ok(Self {
            bytes,
            mime_type: mime_type_for(format),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// File extension matching the sniffed format.
    pub fn extension(&self) -> &'static str {
        match self.mime_type {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            "image/bmp" => "bmp",
            "image/tiff" => "tiff",
            _ => "bin",
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn mime_type_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Gif => "image/gif",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Tiff => "image/tiff",
        _ => "application/octet-stream",
    }
}
