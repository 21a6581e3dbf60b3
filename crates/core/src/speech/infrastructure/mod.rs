pub mod directory_pronunciation_source;
pub mod espeak_synthesizer;
pub mod http_pronunciation_source;
