use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Fold text into the form used for both indexing and substring checks:
/// canonical decomposition, combining marks dropped, then lowercased per char.
///
/// Lowercasing is applied char by char so the result is context free (no
/// final-sigma rule), which keeps `fold(a)` a substring of `fold(b)` whenever
/// `a` is a substring of `b`.
pub fn normalize_for_substring_match(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for ch in text.nfd() {
        if is_combining_mark(ch) {
            continue;
        }
        normalized.extend(ch.to_lowercase());
    }
    normalized
}

#[inline]
pub(crate) fn is_token_char(ch: char) -> bool {
    ch.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics_and_lowercases() {
        assert_eq!(normalize_for_substring_match("Café Déjà Vu"), "cafe deja vu");
        assert_eq!(normalize_for_substring_match("Tiếng Việt"), "tieng viet");
    }

    #[test]
    fn keeps_separators_untouched() {
        assert_eq!(normalize_for_substring_match("  O.M.G!! "), "  o.m.g!! ");
    }

    #[test]
    fn sigma_is_folded_without_context() {
        assert_eq!(normalize_for_substring_match("ΟΣ"), "οσ");
        assert_eq!(normalize_for_substring_match("ΟΣΑ"), "οσα");
    }
}
