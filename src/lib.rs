mod base;
mod config;
mod dictionary;
mod error;
mod history;
mod index;
mod persist;
mod quiz;
mod search;
mod tokenizer;
mod types;

pub use types::{
    AddOption, AddOutcome, HistoryEntry, INDEX_SNAPSHOT_VERSION, IndexSnapshot, LexicalStore,
    SearchKind, Term,
};

pub use config::{DEFAULT_QUIZ_OPTIONS, DictionaryConfig, StorageConfig};
pub use dictionary::{Dictionary, parse_definitions};
pub use error::{DictionaryError, Result};
pub use history::HistoryLog;
pub use index::{InvertedIndex, TokenAnchor};
pub use persist::{FileStorage, MemoryStorage, Storage, format};
pub use quiz::{QuizKind, QuizQuestion};
pub use search::{QueryPlan, plan_query};
pub use tokenizer::{
    MIN_TOKEN_CHARS, Token, normalize_for_substring_match, tokenize, tokenize_normalized,
};
