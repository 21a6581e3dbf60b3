use std::io::Write;
use std::process::{Command, Output, Stdio};
use std::sync::{Mutex, PoisonError};

use crate::shared::constants::ESPEAK_PROGRAM;
use crate::shared::provider_error::ProviderError;
use crate::speech::domain::speech_synthesizer::{AudioClip, AudioFormat, SpeechSynthesizer, Voice};

/// Local speech synthesis through the `espeak-ng` program.
///
/// espeak-ng only writes WAV, so every clip is WAV regardless of the
/// requested format.
pub struct EspeakSynthesizer {
    program: String,
    available: bool,
    voices: Mutex<Vec<Voice>>,
}

impl EspeakSynthesizer {
    pub fn detect() -> Self {
        Self::with_program(ESPEAK_PROGRAM)
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
        if !available {
            log::warn!("Speech synthesizer '{program}' not found");
        }
        Self {
            program,
            available,
            voices: Mutex::new(Vec::new()),
        }
    }

    fn run(&self, args: &[&str], stdin: Option<&str>) -> Result<Output, ProviderError> {
        let spawn_err = |source| ProviderError::Spawn {
            program: self.program.clone(),
            source,
        };
        let input_err = |source| ProviderError::Input {
            program: self.program.clone(),
            source,
        };
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;
        if let (Some(text), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(text.as_bytes()).map_err(input_err)?;
        }
        let output = child.wait_with_output().map_err(spawn_err)?;
        if !output.status.success() {
            return Err(ProviderError::CommandFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

/// Parses `espeak-ng --voices` output.
///
/// Columns: priority, language, age/gender, voice name, file, other languages.
pub(crate) fn parse_voice_list(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("Pty"))
        .skip(1)
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            match columns.as_slice() {
                [_, language, _, name, ..] => Some(Voice {
                    id: (*language).to_string(),
                    name: name.replace('_', " "),
                    language: (*language).to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}

impl SpeechSynthesizer for EspeakSynthesizer {
    fn id(&self) -> &str {
        "espeak"
    }

    fn name(&self) -> String {
        "eSpeak NG".to_string()
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn voices(&self) -> Vec<Voice> {
        self.voices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn refresh_voices(&self) -> Result<Vec<Voice>, ProviderError> {
        let output = self.run(&["--voices"], None)?;
        let voices = parse_voice_list(&String::from_utf8_lossy(&output.stdout));
        log::info!("Loaded {} espeak-ng voices", voices.len());
        *self.voices.lock().unwrap_or_else(PoisonError::into_inner) = voices.clone();
        Ok(voices)
    }

    fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        language_code: &str,
        format: AudioFormat,
    ) -> Result<AudioClip, ProviderError> {
        if text.trim().is_empty() {
            return Err(ProviderError::failed(self.name(), "nothing to synthesize"));
        }
        let voice = if voice_id.is_empty() { language_code } else { voice_id };
        if format != AudioFormat::Wav {
            log::debug!("espeak-ng produces WAV; requested {format:?} ignored");
        }
        let output = self.run(&["-v", voice, "--stdin", "--stdout"], Some(text))?;
        if output.stdout.is_empty() {
            return Err(ProviderError::failed(self.name(), "no audio produced"));
        }
        Ok(AudioClip::new(output.stdout, AudioFormat::Wav))
    }
}
