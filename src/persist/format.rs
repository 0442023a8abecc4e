//! Line-based term file: one term per line, `key` + '`' + definitions joined by `|`.

use std::io::{BufRead, Write};

use log::warn;

use crate::{
    error::{DictionaryError, Result},
    types::Term,
};

pub const RECORD_DELIMITER: char = '`';
pub const DEFINITION_DELIMITER: char = '|';

/// Parse one record. Lines without a delimiter, with a blank key, or without
/// any non-blank definition yield `None`.
pub fn decode_line(line: &str) -> Option<Term> {
    let (key, definitions) = line.split_once(RECORD_DELIMITER)?;
    let definitions: Vec<String> = split_definitions(definitions, &[DEFINITION_DELIMITER]);
    if definitions.is_empty() {
        return None;
    }
    Term::new(key, definitions).ok()
}

/// Render one record, refusing text the decoder could not read back.
pub fn encode_line(term: &Term) -> Result<String> {
    validate_key(term.key())?;
    for definition in term.definitions() {
        if definition.contains([DEFINITION_DELIMITER, '\n', '\r']) {
            return Err(DictionaryError::InvalidDefinition(definition.clone()));
        }
    }
    let mut line = String::with_capacity(term.key().len() + 1);
    line.push_str(term.key());
    line.push(RECORD_DELIMITER);
    line.push_str(&term.definitions().join("|"));
    Ok(line)
}

pub fn validate_key(key: &str) -> Result<()> {
    if key.contains([RECORD_DELIMITER, '\n', '\r']) {
        return Err(DictionaryError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Split raw text on any of `delimiters`, trim each piece and drop blanks.
pub fn split_definitions(raw: &str, delimiters: &[char]) -> Vec<String> {
    raw.split(delimiters)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_terms<R: BufRead>(reader: R) -> Result<Vec<Term>> {
    let mut terms = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match decode_line(&line) {
            Some(term) => terms.push(term),
            None => warn!("skipping malformed term record on line {}", line_no + 1),
        }
    }
    Ok(terms)
}

pub fn write_terms<'a, W, I>(mut writer: W, terms: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Term>,
{
    for term in terms {
        writeln!(writer, "{}", encode_line(term)?)?;
    }
    writer.flush()?;
    Ok(())
}
