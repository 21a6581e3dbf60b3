pub mod shared {
    pub mod constants;
    pub mod image_payload;
    pub mod model_selection;
    pub mod provider_error;
    pub mod settings;
}

pub mod orchestration {
    mod result_slot;
    pub mod task;
    pub mod task_context;
    pub mod task_orchestrator;
}

pub mod ocr {
    pub mod domain {
        pub mod ocr_provider;
        pub mod vision_client;
    }
    pub mod infrastructure;
}

pub mod speech {
    pub mod domain {
        pub mod pronunciation_source;
        pub mod speech_synthesizer;
    }
    pub mod infrastructure;
}

pub mod translation {
    pub mod domain {
        pub mod translator;
    }
    pub mod infrastructure;
}

pub mod language {
    pub mod domain {
        pub mod annotation_generator;
        pub mod dictionary;
        pub mod kana;
        pub mod pitch_accent;
        pub mod tokenizer;
    }
    pub mod infrastructure;
}

pub mod registry {
    pub mod provider_registry;
}

pub mod analysis {
    pub mod analysis_result;
    pub mod sentence_analyzer;
    pub mod stage_outcome;
    pub mod word_highlighter;
}

pub mod pipeline {
    pub mod flashcard;
    pub mod process_sentence_use_case;
    pub mod scan_image_use_case;
    pub mod status_reporter;
}

pub mod session {
    pub mod card_session;
}

#[cfg(test)]
pub(crate) mod test_support;
