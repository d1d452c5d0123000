//! Text normalization for comparing statements and questions.

/// Accented characters folded to their base letter, applied after lowercasing.
const DIACRITICS: &[(char, char)] = &[
    ('á', 'a'),
    ('à', 'a'),
    ('ã', 'a'),
    ('â', 'a'),
    ('é', 'e'),
    ('ê', 'e'),
    ('í', 'i'),
    ('ó', 'o'),
    ('õ', 'o'),
    ('ô', 'o'),
    ('ú', 'u'),
    ('ü', 'u'),
    ('ç', 'c'),
];

fn fold(c: char) -> char {
    DIACRITICS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

/// Lowercase, fold the Portuguese diacritics in the table, and trim.
///
/// Characters outside the table pass through unchanged. The result is a
/// fixed point: normalizing it again returns the same string.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().chars().map(fold).collect::<String>().trim().to_string()
}
