use std::io::Write;
use std::process::{Command, Stdio};

use crate::language::domain::kana;
use crate::language::domain::tokenizer::{Token, Tokenizer};
use crate::shared::constants::MECAB_PROGRAM;
use crate::shared::provider_error::ProviderError;

// IPADIC feature columns.
const POS_FIELD: usize = 0;
const BASE_FORM_FIELD: usize = 6;
const READING_FIELD: usize = 7;

/// Morphological analysis through the `mecab` program with an IPADIC dictionary.
pub struct MecabTokenizer {
    program: String,
    dictionary_dir: Option<String>,
}

impl MecabTokenizer {
    pub fn new() -> Self {
        Self {
            program: MECAB_PROGRAM.to_string(),
            dictionary_dir: None,
        }
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            dictionary_dir: None,
        }
    }

    pub fn with_dictionary_dir(mut self, dir: impl Into<String>) -> Self {
        self.dictionary_dir = Some(dir.into());
        self
    }

    /// Runs a one-word analysis to check that program and dictionary work.
    pub fn probe(&self) -> Result<(), ProviderError> {
        self.analyze("本").map(|_| ())
    }
}

impl Default for MecabTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses MeCab's default output format, one morpheme per line:
/// `surface\tpos,sub1,sub2,sub3,conj_type,conj_form,base,reading,pronunciation`,
/// terminated by `EOS`.
pub(crate) fn parse_ipadic_output(output: &str) -> Vec<Token> {
    output
        .lines()
        .filter(|line| !line.is_empty() && *line != "EOS")
        .filter_map(|line| {
            let (surface, features) = line.split_once('\t')?;
            let fields: Vec<&str> = features.split(',').collect();
            let field = |i: usize| {
                fields
                    .get(i)
                    .copied()
                    .filter(|value| !value.is_empty() && *value != "*")
            };

            let dictionary_form = field(BASE_FORM_FIELD).unwrap_or(surface).to_string();
            let reading = match field(READING_FIELD) {
                Some(reading) => kana::to_hiragana(reading),
                None if surface.chars().all(kana::is_kana) => kana::to_hiragana(surface),
                None => String::new(),
            };
            Some(Token {
                surface: surface.to_string(),
                part_of_speech: field(POS_FIELD).unwrap_or_default().to_string(),
                dictionary_form,
                reading,
            })
        })
        .collect()
}

impl Tokenizer for MecabTokenizer {
    fn analyze(&self, sentence: &str) -> Result<Vec<Token>, ProviderError> {
        let spawn_err = |source| ProviderError::Spawn {
            program: self.program.clone(),
            source,
        };
        let input_err = |source| ProviderError::Input {
            program: self.program.clone(),
            source,
        };
        let mut command = Command::new(&self.program);
        if let Some(dir) = &self.dictionary_dir {
            command.arg("-d").arg(dir);
        }
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            // MeCab analyzes line by line; keep the sentence on one line.
            let line = sentence.replace(['\r', '\n'], " ");
            stdin.write_all(line.as_bytes()).map_err(input_err)?;
            stdin.write_all(b"\n").map_err(input_err)?;
        }
        let output = child.wait_with_output().map_err(spawn_err)?;
        if !output.status.success() {
            return Err(ProviderError::CommandFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| ProviderError::invalid_data(&self.program, e))?;
        Ok(parse_ipadic_output(&stdout))
    }
}
