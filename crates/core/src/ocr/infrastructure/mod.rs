pub mod remote_vision_ocr;
pub mod tesseract_ocr;
