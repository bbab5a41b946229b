//! Graph-bound string normalization.
//!
//! Two rules apply to every string destined for the triple graph:
//!
//! - runs of whitespace collapse to a single space, and
//! - non-ASCII characters are transliterated to an ASCII approximation.
//!
//! The transliteration table covers the Latin repertoire that actually shows
//! up in bill text (accented letters, typographic quotes and dashes).
//! Anything outside the table becomes `?`, matching the lossy `//translit`
//! behavior of the system this replaces.

/// Collapse every run of whitespace (including Unicode spaces) to one space
/// and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Transliterate `s` to ASCII. Returns the result and whether any character
/// was substituted.
pub fn to_ascii(s: &str) -> (String, bool) {
    if s.is_ascii() {
        return (s.to_string(), false);
    }
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            out.push_str(fold_char(c));
        }
    }
    (out, true)
}

fn fold_char(c: char) -> &'static str {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ā' => "a",
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' | 'Ā' => "A",
        'é' | 'è' | 'ê' | 'ë' | 'ē' => "e",
        'É' | 'È' | 'Ê' | 'Ë' | 'Ē' => "E",
        'í' | 'ì' | 'î' | 'ï' | 'ī' => "i",
        'Í' | 'Ì' | 'Î' | 'Ï' | 'Ī' => "I",
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ō' | 'ø' => "o",
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ō' | 'Ø' => "O",
        'ú' | 'ù' | 'û' | 'ü' | 'ū' => "u",
        'Ú' | 'Ù' | 'Û' | 'Ü' | 'Ū' => "U",
        'ý' | 'ÿ' => "y",
        'ñ' => "n",
        'Ñ' => "N",
        'ç' => "c",
        'Ç' => "C",
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'ð' => "d",
        'Ð' => "D",
        'þ' => "th",
        'Þ' => "Th",
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => "\"",
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' => "-",
        '\u{2026}' => "...",
        '\u{00A0}' | '\u{2009}' | '\u{200A}' | '\u{2002}' | '\u{2003}' => " ",
        '\u{00D7}' => "x",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(
            collapse_whitespace("  A bill\n\tto   amend "),
            "A bill to amend"
        );
    }

    #[test]
    fn ascii_strings_pass_through_unchanged() {
        let (out, changed) = to_ascii("15 USC 78a");
        assert_eq!(out, "15 USC 78a");
        assert!(!changed);
    }

    #[test]
    fn folds_accents_and_typographic_punctuation() {
        let (out, changed) = to_ascii("Sarbanes\u{2013}Oxley Act — “résumé”");
        assert_eq!(out, "Sarbanes-Oxley Act - \"resume\"");
        assert!(changed);
    }

    #[test]
    fn unknown_characters_degrade_to_question_mark() {
        let (out, changed) = to_ascii("法");
        assert_eq!(out, "?");
        assert!(changed);
    }
}
