//! Accent and symbol variants offered by the long-press popup.
//!
//! Letters are looked up in a per-language table: Turkish (`"tr"`) has its
//! own, every other language uses the generic Latin accent table. Digits and
//! punctuation are looked up in language-independent tables after that.

/// Which letter table a language selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccentTable {
    Turkish,
    Latin,
}

impl AccentTable {
    pub fn for_language(language: &str) -> Self {
        if language == "tr" {
            AccentTable::Turkish
        } else {
            AccentTable::Latin
        }
    }

    fn letters(self, key: &str) -> Option<&'static [&'static str]> {
        match self {
            AccentTable::Turkish => turkish_letters(key),
            AccentTable::Latin => latin_letters(key),
        }
    }
}

fn turkish_letters(key: &str) -> Option<&'static [&'static str]> {
    let found: &'static [&'static str] = match key {
        "c" => &["ç"],
        "s" => &["ş"],
        "g" => &["ğ"],
        "u" => &["ü"],
        "o" => &["ö"],
        "i" => &["ı", "İ"],
        _ => return None,
    };
    Some(found)
}

fn latin_letters(key: &str) -> Option<&'static [&'static str]> {
    let found: &'static [&'static str] = match key {
        "e" => &["é", "è", "ê", "ë", "ē"],
        "a" => &["à", "á", "â", "ä", "ã", "å", "æ"],
        "u" => &["ù", "ú", "û", "ü", "ū"],
        "i" => &["ì", "í", "î", "ï", "ī"],
        "o" => &["ò", "ó", "ô", "ö", "õ", "ø", "œ"],
        "c" => &["ç", "ć", "č"],
        "n" => &["ñ", "ń"],
        "s" => &["ß", "ś", "š"],
        "y" => &["ý", "ÿ"],
        "z" => &["ž", "ź", "ż"],
        _ => return None,
    };
    Some(found)
}

// Digits plus the symbols that live on the number row.
fn number_symbols(key: &str) -> Option<&'static [&'static str]> {
    let found: &'static [&'static str] = match key {
        "1" => &["①", "⅟"],
        "2" => &["②", "½"],
        "3" => &["③", "⅓"],
        "4" => &["④", "¼"],
        "5" => &["⑤", "⅕"],
        "0" => &["⓪", "∅"],
        "-" => &["–", "—", "−"],
        "." => &[",", "…"],
        "'" => &["\u{2018}", "\u{2019}", "\"", "\u{201C}", "\u{201D}"],
        "!" => &["¡"],
        "?" => &["¿"],
        _ => return None,
    };
    Some(found)
}

fn punctuation(key: &str) -> Option<&'static [&'static str]> {
    let found: &'static [&'static str] = match key {
        "." => &[".", ",", "?", "!", ":", ";", "@"],
        "," => &[",", ".", "?", "!", ":", ";", "'", "\""],
        _ => return None,
    };
    Some(found)
}

// Shifted key labels fold back to their base key. Under Turkish both capital
// I forms label the i key, which carries the dotted and dotless variants.
fn base_key(key: &str, language: &str) -> String {
    match key {
        "İ" if language == "tr" => "i".to_string(),
        other => other.to_lowercase(),
    }
}

fn lookup(key: &str, language: &str) -> Option<&'static [&'static str]> {
    let key = base_key(key, language);
    AccentTable::for_language(language)
        .letters(&key)
        .or_else(|| number_symbols(&key))
        .or_else(|| punctuation(&key))
}

/// Ordered variants for `key`, upper-cased when `shifted`.
///
/// Returns an empty list when nothing is configured for the key.
pub fn variants(key: &str, language: &str, shifted: bool) -> Vec<String> {
    let Some(found) = lookup(key, language) else {
        return Vec::new();
    };
    found
        .iter()
        .map(|v| if shifted { shift_variant(v) } else { v.to_string() })
        .collect()
}

/// Whether `key` has any variants in `language`.
pub fn has_variants(key: &str, language: &str) -> bool {
    lookup(key, language).is_some()
}

/// Upper-case a popup variant. Dotless and dotted i are mapped by hand
/// because generic upper-casing would turn both into plain `I`.
pub fn shift_variant(variant: &str) -> String {
    match variant {
        "ı" => "I".to_string(),
        "i" => "İ".to_string(),
        other => other.to_uppercase(),
    }
}

/// Upper-case typed text for `language`.
///
/// Turkish keeps the dotted/dotless distinction (`i` -> `İ`, `ı` -> `I`).
pub fn to_upper(text: &str, language: &str) -> String {
    if language != "tr" {
        return text.to_uppercase();
    }
    text.chars()
        .map(|c| match c {
            'i' => "İ".to_string(),
            'ı' => "I".to_string(),
            other => other.to_uppercase().collect(),
        })
        .collect()
}

/// Lower-case typed text for `language`.
///
/// Turkish maps `I` -> `ı` and `İ` -> `i`.
pub fn to_lower(text: &str, language: &str) -> String {
    if language != "tr" {
        return text.to_lowercase();
    }
    text.chars()
        .map(|c| match c {
            'I' => "ı".to_string(),
            'İ' => "i".to_string(),
            other => other.to_lowercase().collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turkish_table_selected_for_tr_only() {
        assert_eq!(variants("s", "tr", false), vec!["ş"]);
        assert_eq!(variants("s", "en", false), vec!["ß", "ś", "š"]);
        assert_eq!(variants("s", "de", false), vec!["ß", "ś", "š"]);
        assert!(variants("e", "tr", false).is_empty());
    }

    #[test]
    fn shifted_turkish_i_variants() {
        assert_eq!(variants("i", "tr", true), vec!["I", "İ"]);
        // Either capital I label on the shifted i key opens the i popup
        assert_eq!(variants("I", "tr", true), vec!["I", "İ"]);
        assert_eq!(variants("İ", "tr", true), vec!["I", "İ"]);
        assert_eq!(variants("I", "tr", false), vec!["ı", "İ"]);
        assert!(has_variants("I", "tr"));
    }

    #[test]
    fn shifted_latin_variants_uppercase() {
        assert_eq!(variants("n", "en", true), vec!["Ñ", "Ń"]);
        assert_eq!(variants("e", "en", true)[0], "É");
    }

    #[test]
    fn digits_and_punctuation_ignore_language() {
        assert_eq!(variants("2", "tr", false), vec!["②", "½"]);
        assert_eq!(variants("2", "en", false), vec!["②", "½"]);
        assert_eq!(variants("-", "en", false), vec!["–", "—", "−"]);
        // The number-row table wins over the punctuation table for '.'
        assert_eq!(variants(".", "en", false), vec![",", "…"]);
        assert_eq!(variants(",", "tr", false).len(), 8);
    }

    #[test]
    fn missing_key_has_no_variants() {
        assert!(variants("q", "en", false).is_empty());
        assert!(!has_variants("q", "en"));
        assert!(has_variants("g", "tr"));
        assert!(!has_variants("g", "en"));
    }

    #[test]
    fn language_aware_casing() {
        assert_eq!(to_upper("i", "tr"), "İ");
        assert_eq!(to_upper("ı", "tr"), "I");
        assert_eq!(to_upper("i", "en"), "I");
        assert_eq!(to_lower("I", "tr"), "ı");
        assert_eq!(to_lower("İ", "tr"), "i");
        assert_eq!(to_lower("I", "en"), "i");
    }
}
