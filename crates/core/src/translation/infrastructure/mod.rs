pub mod none_translator;
