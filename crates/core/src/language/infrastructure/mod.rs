pub mod json_dictionary;
pub mod mecab_tokenizer;
pub mod reading_annotation_generator;
pub mod tsv_pitch_accent_store;
