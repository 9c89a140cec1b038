//! Locale-aware text folding shared by every classifier.

/// Punctuation replaced by a space before whitespace is collapsed.
const PUNCTUATION: &[char] = &[
    ',', '.', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}', '\'', '"', '’', '‘', '“', '”',
];

/// Combining dot above, left behind when `İ` is lowercased.
const COMBINING_DOT_ABOVE: char = '\u{0307}';

fn fold(c: char) -> char {
    match c {
        'ç' => 'c',
        'ğ' => 'g',
        'ı' => 'i',
        'ö' => 'o',
        'ş' => 's',
        'ü' => 'u',
        'â' => 'a',
        'î' => 'i',
        'û' => 'u',
        'é' => 'e',
        _ => c,
    }
}

/// Lowercase, fold Turkish diacritics to ASCII, strip punctuation and
/// collapse whitespace.
///
/// Total and idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let mut folded = String::with_capacity(raw.len());

    for c in raw.chars() {
        for lower in c.to_lowercase() {
            if lower == COMBINING_DOT_ABOVE {
                continue;
            }
            if PUNCTUATION.contains(&lower) {
                folded.push(' ');
            } else {
                folded.push(fold(lower));
            }
        }
    }

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
