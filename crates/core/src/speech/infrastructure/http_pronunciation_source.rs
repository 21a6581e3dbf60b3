use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::StatusCode;

use crate::shared::constants::{PRONUNCIATION_CONNECT_TIMEOUT, PRONUNCIATION_READ_TIMEOUT};
use crate::shared::provider_error::ProviderError;
use crate::speech::domain::pronunciation_source::PronunciationSource;
use crate::speech::domain::speech_synthesizer::{AudioClip, AudioFormat};

/// Keeps RFC 3986 unreserved characters readable in the encoded word.
const WORD_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const WORD_PLACEHOLDER: &str = "{word}";

/// Recorded pronunciations fetched over plain HTTP(S).
///
/// The URL template contains a `{word}` placeholder, e.g.
/// `https://audio.example.org/ja/{word}.mp3`. A 404 means "no recording".
pub struct HttpPronunciationSource {
    template: String,
    client: reqwest::blocking::Client,
}

impl HttpPronunciationSource {
    pub fn new(template: impl Into<String>) -> Result<Self, ProviderError> {
        let template = template.into();
        if !template.contains(WORD_PLACEHOLDER) {
            return Err(ProviderError::invalid_data(
                "pronunciation URL",
                format!("template has no {WORD_PLACEHOLDER} placeholder"),
            ));
        }
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(PRONUNCIATION_CONNECT_TIMEOUT)
            .timeout(PRONUNCIATION_CONNECT_TIMEOUT + PRONUNCIATION_READ_TIMEOUT)
            .build()
            .map_err(|source| ProviderError::Http {
                url: template.clone(),
                source,
            })?;
        Ok(Self { template, client })
    }

    pub(crate) fn url_for(&self, word: &str) -> String {
        let encoded = utf8_percent_encode(word, WORD_ENCODE_SET).to_string();
        self.template.replace(WORD_PLACEHOLDER, &encoded)
    }
}

/// Guesses the clip format from the URL path's extension.
pub(crate) fn format_from_url(url: &str) -> AudioFormat {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit_once('.')
        .and_then(|(_, ext)| AudioFormat::from_extension(ext))
        .unwrap_or_default()
}

impl PronunciationSource for HttpPronunciationSource {
    fn name(&self) -> &str {
        "online recordings"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn find(&self, word: &str) -> Result<Option<AudioClip>, ProviderError> {
        if word.is_empty() {
            return Ok(None);
        }
        let url = self.url_for(word);
        let http_err = |source| ProviderError::Http {
            url: url.clone(),
            source,
        };

        let response = self.client.get(&url).send().map_err(http_err)?;
        if response.status() == StatusCode::NOT_FOUND {
            log::debug!("No recording for '{word}' at {url}");
            return Ok(None);
        }
        let bytes = response
            .error_for_status()
            .and_then(|r| r.bytes())
            .map_err(http_err)?;
        if bytes.is_empty() {
            return Ok(None);
        }

        let format = format_from_url(&url);
        log::info!("Downloaded recording for '{word}' ({} bytes)", bytes.len());
        Ok(Some(
            AudioClip::new(bytes.to_vec(), format).named(format!("{word}.{}", format.extension())),
        ))
    }
}
