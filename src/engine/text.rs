//! Text normalization shared by the load matcher.

/// Spelling and spacing variants of equipment names, keyed by normalized text.
pub const EQUIPMENT_ALIASES: &[(&str, &str)] = &[
    ("dryvan", "dry van"),
    ("dry-van", "dry van"),
    ("dry van", "dry van"),
    ("flat bed", "flatbed"),
    ("flat-bed", "flatbed"),
    ("flatbed", "flatbed"),
    ("reefer", "reefer"),
];

/// Lowercase, drop commas, trim and collapse internal whitespace.
pub fn normalize_text(raw: &str) -> String {
    raw.to_lowercase()
        .replace(',', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize an equipment name and fold known variants to one spelling.
pub fn canonical_equipment(raw: &str, aliases: &[(&str, &str)]) -> String {
    let normalized = normalize_text(raw);
    aliases
        .iter()
        .find(|(variant, _)| *variant == normalized)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(normalized)
}

/// Words of at least two characters from already-normalized text.
pub fn tokens(normalized: &str) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for word in normalized.split(' ') {
        if word.chars().count() >= 2 && !out.contains(&word) {
            out.push(word);
        }
    }
    out
}
