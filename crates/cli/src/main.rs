use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;

use cardscan_core::analysis::sentence_analyzer::SentenceAnalyzer;
use cardscan_core::language::domain::tokenizer::Tokenizer;
use cardscan_core::language::infrastructure::json_dictionary::JsonDictionary;
use cardscan_core::language::infrastructure::mecab_tokenizer::MecabTokenizer;
use cardscan_core::language::infrastructure::reading_annotation_generator::ReadingAnnotationGenerator;
use cardscan_core::language::infrastructure::tsv_pitch_accent_store::TsvPitchAccentStore;
use cardscan_core::ocr::domain::ocr_provider::{OcrMethod, TextOrientation};
use cardscan_core::ocr::infrastructure::remote_vision_ocr::RemoteVisionOcr;
use cardscan_core::ocr::infrastructure::tesseract_ocr::TesseractOcr;
use cardscan_core::pipeline::flashcard::FlashcardDraft;
use cardscan_core::pipeline::status_reporter::StatusUpdate;
use cardscan_core::registry::provider_registry::ProviderRegistry;
use cardscan_core::session::card_session::{CardSession, SessionEvent};
use cardscan_core::shared::image_payload::ImagePayload;
use cardscan_core::shared::settings::Settings;
use cardscan_core::speech::domain::speech_synthesizer::AudioFormat;
use cardscan_core::speech::infrastructure::directory_pronunciation_source::DirectoryPronunciationSource;
use cardscan_core::speech::infrastructure::espeak_synthesizer::EspeakSynthesizer;
use cardscan_core::speech::infrastructure::http_pronunciation_source::HttpPronunciationSource;
use cardscan_core::translation::infrastructure::none_translator::NoneTranslator;

const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Turn a photo or a sentence into an annotated flashcard draft with audio.
#[derive(Parser)]
#[command(name = "cardscan")]
struct Cli {
    /// Image to read the sentence from.
    image: Option<PathBuf>,

    /// Sentence to process instead of (or to override) the OCR result.
    #[arg(long)]
    sentence: Option<String>,

    /// Word to focus the card on (default: first content word).
    #[arg(long)]
    target: Option<String>,

    /// Directory the card and its media are written to.
    #[arg(long, short, default_value = "card")]
    output: PathBuf,

    /// OCR engine: tesseract, native or remote. No remote vision backend is
    /// compiled into this binary, so `remote` reports the engine unavailable.
    #[arg(long)]
    ocr: Option<String>,

    /// Text orientation: horizontal or vertical.
    #[arg(long)]
    orientation: Option<String>,

    /// Remote vision model as Provider/model. Only stored in the settings;
    /// this binary has no remote vision backend.
    #[arg(long)]
    vision_model: Option<String>,

    /// Preferred translator id. Only stored in the settings; this binary
    /// ships the `none` translator alone.
    #[arg(long)]
    translator: Option<String>,

    /// Voice id for speech synthesis.
    #[arg(long)]
    voice: Option<String>,

    /// Audio format: mp3, opus or wav.
    #[arg(long)]
    audio_format: Option<String>,

    /// Directory of recorded pronunciations named <word>.<ext>.
    #[arg(long)]
    audio_dir: Option<PathBuf>,

    /// URL template for recorded pronunciations, containing {word}.
    #[arg(long)]
    audio_url: Option<String>,

    /// JSON dictionary file.
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Tab-separated pitch accent file.
    #[arg(long)]
    pitch_accents: Option<PathBuf>,

    /// MeCab dictionary directory.
    #[arg(long)]
    mecab_dict: Option<String>,

    /// Print the synthesizer's voices and exit.
    #[arg(long)]
    list_voices: bool,

    /// Persist the given options as the new defaults.
    #[arg(long)]
    save: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = apply_overrides(Settings::load(), &cli)?;
    if cli.save {
        settings.save()?;
        log::info!("Settings saved");
    }

    let providers = Arc::new(build_registry(&cli)?);
    let analyzer = Arc::new(build_analyzer(&cli, providers.clone())?);
    let mut session = CardSession::new(providers, analyzer, settings);

    let result = if cli.list_voices {
        list_voices(&mut session)
    } else {
        make_card(&mut session, &cli)
    };

    let report = session.shutdown();
    if !report.abandoned.is_empty() {
        log::warn!("{} task(s) still running at exit", report.abandoned.len());
    }
    result
}

fn make_card(session: &mut CardSession, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let image = match &cli.image {
        Some(path) => Some(fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?),
        None => None,
    };

    let sentence = match (&cli.sentence, &image) {
        (Some(sentence), _) => sentence.clone(),
        (None, Some(bytes)) => {
            session.scan(bytes.clone())?;
            match drive_until_idle(session).into_iter().next() {
                Some(SessionEvent::ScanCompleted(text)) => text,
                Some(SessionEvent::ScanFailed(message)) => return Err(message.into()),
                _ => return Err("OCR produced no result".into()),
            }
        }
        (None, None) => return Err("Either an image or --sentence is required".into()),
    };
    log::info!("Sentence: {sentence}");

    let payload = image.map(ImagePayload::from_bytes).transpose()?;
    session.process(sentence, cli.target.clone(), payload)?;
    let draft = match drive_until_idle(session).into_iter().next() {
        Some(SessionEvent::CardReady(draft)) => draft,
        Some(SessionEvent::ProcessFailed(message)) => return Err(message.into()),
        _ => return Err("Processing produced no result".into()),
    };

    for warning in draft.warnings.iter().chain(
        draft
            .analysis
            .degraded_stages
            .iter()
            .map(|e| &e.message),
    ) {
        log::warn!("{warning}");
    }
    write_card(&draft, &cli.output)?;
    log::info!("Card written to {}", cli.output.display());
    Ok(())
}

fn list_voices(session: &mut CardSession) -> Result<(), Box<dyn std::error::Error>> {
    session.refresh_voices()?;
    match drive_until_idle(session).into_iter().next() {
        Some(SessionEvent::VoicesRefreshed(voices)) => {
            for voice in voices {
                println!("{}\t{}\t{}", voice.id, voice.language, voice.name);
            }
            Ok(())
        }
        Some(SessionEvent::VoiceRefreshFailed(message)) => Err(message.into()),
        _ => Err("Voice refresh produced no result".into()),
    }
}

/// Ticks the session until every task is delivered, printing progress.
/// Returns the task outcome events.
fn drive_until_idle(session: &mut CardSession) -> Vec<SessionEvent> {
    let mut outcomes = Vec::new();
    loop {
        for event in session.tick() {
            match event {
                SessionEvent::Status(StatusUpdate::Progress(fraction)) => {
                    eprint!("\rProgress: {:>3.0}%", fraction * 100.0);
                }
                SessionEvent::Status(StatusUpdate::Message(_)) => {}
                outcome => outcomes.push(outcome),
            }
        }
        if session.is_idle() {
            break;
        }
        thread::sleep(TICK_INTERVAL);
    }
    eprintln!();
    outcomes
}

fn write_card(draft: &FlashcardDraft, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join("card.json"), serde_json::to_string_pretty(draft)?)?;
    for media in draft.media() {
        fs::write(dir.join(&media.file_name), &media.bytes)?;
    }
    Ok(())
}

fn build_registry(cli: &Cli) -> Result<ProviderRegistry, Box<dyn std::error::Error>> {
    let mut registry = ProviderRegistry::new();
    registry.register_ocr(Arc::new(TesseractOcr::detect()));
    // No vision backends are compiled in; the engine reports itself unavailable.
    registry.register_ocr(Arc::new(RemoteVisionOcr::new(Vec::new())));
    registry.register_translator(Arc::new(NoneTranslator));
    registry.set_synthesizer(Arc::new(EspeakSynthesizer::detect()));

    if let Some(dir) = &cli.audio_dir {
        registry.register_pronunciation_source(Arc::new(DirectoryPronunciationSource::new(dir)));
    }
    if let Some(template) = &cli.audio_url {
        registry.register_pronunciation_source(Arc::new(HttpPronunciationSource::new(
            template.as_str(),
        )?));
    }
    Ok(registry)
}

fn build_analyzer(
    cli: &Cli,
    providers: Arc<ProviderRegistry>,
) -> Result<SentenceAnalyzer, Box<dyn std::error::Error>> {
    let mut mecab = MecabTokenizer::new();
    if let Some(dir) = &cli.mecab_dict {
        mecab = mecab.with_dictionary_dir(dir.as_str());
    }
    if let Err(e) = mecab.probe() {
        log::warn!("Tokenizer unavailable: {e}");
    }
    let tokenizer: Arc<dyn Tokenizer> = Arc::new(mecab);

    let mut analyzer = SentenceAnalyzer::new()
        .with_tokenizer(tokenizer.clone())
        .with_annotator(Arc::new(ReadingAnnotationGenerator::new(tokenizer)))
        .with_providers(providers);

    if let Some(path) = &cli.dictionary {
        let dictionary = JsonDictionary::load(path)?;
        log::info!("Loaded {} dictionary entries", dictionary.len());
        analyzer = analyzer.with_dictionary(Arc::new(dictionary));
    }
    if let Some(path) = &cli.pitch_accents {
        let store = TsvPitchAccentStore::load(path)?;
        log::info!("Loaded {} pitch accent entries", store.len());
        analyzer = analyzer.with_pitch_accents(Arc::new(store));
    }
    Ok(analyzer)
}

fn apply_overrides(mut settings: Settings, cli: &Cli) -> Result<Settings, String> {
    if let Some(method) = &cli.ocr {
        settings.ocr_method = parse_ocr_method(method)?;
    }
    if let Some(orientation) = &cli.orientation {
        settings.text_orientation = parse_orientation(orientation)?;
    }
    if let Some(format) = &cli.audio_format {
        settings.audio_format = AudioFormat::from_extension(format)
            .ok_or_else(|| format!("Audio format must be mp3, opus or wav, got '{format}'"))?;
    }
    if let Some(model) = &cli.vision_model {
        settings.vision_model = model.clone();
    }
    if let Some(translator) = &cli.translator {
        settings.preferred_translator = translator.clone();
    }
    if let Some(voice) = &cli.voice {
        settings.voice_id = voice.clone();
    }
    Ok(settings)
}

fn parse_ocr_method(method: &str) -> Result<OcrMethod, String> {
    match method {
        "tesseract" => Ok(OcrMethod::Tesseract),
        "native" => Ok(OcrMethod::Native),
        "remote" => Ok(OcrMethod::Remote),
        other => Err(format!(
            "OCR method must be tesseract, native or remote, got '{other}'"
        )),
    }
}

fn parse_orientation(orientation: &str) -> Result<TextOrientation, String> {
    match orientation {
        "horizontal" => Ok(TextOrientation::Horizontal),
        "vertical" => Ok(TextOrientation::Vertical),
        other => Err(format!(
            "Orientation must be horizontal or vertical, got '{other}'"
        )),
    }
}
