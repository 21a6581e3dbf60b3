use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::{Mutex, PoisonError};

use crate::ocr::domain::ocr_provider::{OcrMethod, OcrOptions, OcrProvider, TextOrientation};
use crate::shared::constants::TESSERACT_PROGRAM;
use crate::shared::image_payload::ImagePayload;
use crate::shared::provider_error::ProviderError;

/// OCR through the `tesseract` command-line program.
///
/// The image is piped through stdin and the text read from stdout. Horizontal
/// text uses the `jpn` model with automatic page segmentation; vertical text
/// uses `jpn_vert` with single-block vertical segmentation (PSM 5).
pub struct TesseractOcr {
    program: String,
    available: bool,
    orientation: Mutex<TextOrientation>,
}

impl TesseractOcr {
    /// Probes `tesseract --version` once; a missing binary leaves the provider uninitialized.
    pub fn detect() -> Self {
        Self::with_program(TESSERACT_PROGRAM)
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        let program = program.into();
        let available = Command::new(&program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);
        if available {
            log::info!("Tesseract OCR found at '{program}'");
        } else {
            log::warn!("Tesseract OCR not found at '{program}'");
        }
        Self {
            program,
            available,
            orientation: Mutex::new(TextOrientation::Horizontal),
        }
    }

    pub fn orientation(&self) -> TextOrientation {
        *self.orientation.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Language model and page segmentation mode for an orientation.
pub(crate) fn engine_args(orientation: TextOrientation) -> [&'static str; 4] {
    match orientation {
        TextOrientation::Horizontal => ["-l", "jpn", "--psm", "3"],
        TextOrientation::Vertical => ["-l", "jpn_vert", "--psm", "5"],
    }
}

impl OcrProvider for TesseractOcr {
    fn method(&self) -> OcrMethod {
        OcrMethod::Tesseract
    }

    fn name(&self) -> String {
        "Tesseract".to_string()
    }

    fn is_initialized(&self) -> bool {
        self.available
    }

    fn configure(&self, options: &OcrOptions) {
        *self.orientation.lock().unwrap_or_else(PoisonError::into_inner) = options.orientation;
    }

    fn extract_text(&self, image: &ImagePayload) -> Result<String, ProviderError> {
        let orientation = self.orientation();
        log::debug!("Running {} with {orientation:?} orientation", self.program);

        let spawn_err = |source| ProviderError::Spawn {
            program: self.program.clone(),
            source,
        };
        let input_err = |source| ProviderError::Input {
            program: self.program.clone(),
            source,
        };
        let mut child = Command::new(&self.program)
            .args(["stdin", "stdout"])
            .args(engine_args(orientation))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(image.bytes()).map_err(input_err)?;
        }
        let output = child.wait_with_output().map_err(spawn_err)?;

        if !output.status.success() {
            return Err(ProviderError::CommandFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_args_per_orientation() {
        assert_eq!(engine_args(TextOrientation::Horizontal), ["-l", "jpn", "--psm", "3"]);
        assert_eq!(engine_args(TextOrientation::Vertical), ["-l", "jpn_vert", "--psm", "5"]);
    }

    #[test]
    fn test_missing_program_is_uninitialized() {
        let ocr = TesseractOcr::with_program("definitely-not-a-real-tesseract-binary");
        assert!(!ocr.is_initialized());
    }

    #[test]
    fn test_configure_sets_orientation() {
        let ocr = TesseractOcr::with_program("definitely-not-a-real-tesseract-binary");
        ocr.configure(&OcrOptions {
            orientation: TextOrientation::Vertical,
            model: None,
        });
        assert_eq!(ocr.orientation(), TextOrientation::Vertical);
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let ocr = TesseractOcr::with_program("definitely-not-a-real-tesseract-binary");
        let image = ImagePayload::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        assert!(matches!(ocr.extract_text(&image), Err(ProviderError::Spawn { .. })));
    }
}
