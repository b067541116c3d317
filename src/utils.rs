/// Lowercases `text` and strips the diacritics common in Portuguese and
/// Spanish place names ("São Paulo" → "sao paulo").
pub(crate) fn fold_accents(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'ã' | 'á' | 'â' | 'à' | 'ä' => 'a',
            'é' | 'ê' | 'è' | 'ë' => 'e',
            'í' | 'î' | 'ì' | 'ï' => 'i',
            'ó' | 'ô' | 'ò' | 'õ' | 'ö' => 'o',
            'ú' | 'û' | 'ù' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Case-insensitive equality of two names, ignoring surrounding whitespace.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

const PLACEHOLDER_NAMES: [&str; 9] = [
    "n/a", "na", "none", "null", "unknown", "undefined", "sem nome", "indefinido", "-",
];

/// Filters out location names that aren't city names: test stations,
/// placeholders and station codes.
pub(crate) fn is_plausible_city_name(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    if lower.chars().count() < 3 || PLACEHOLDER_NAMES.contains(&lower.as_str()) {
        return false;
    }
    if lower.contains("test") {
        return false;
    }
    if lower
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-' || c == '_')
    {
        return false;
    }
    // Short names with a digit up front are station codes ("211004", "A1 Norte").
    if lower.chars().take(3).any(|c| c.is_ascii_digit()) && lower.chars().count() < 10 {
        return false;
    }
    let starts_with_digit = lower.chars().next().is_some_and(|c| c.is_ascii_digit());
    if (starts_with_digit && lower.contains('_')) || lower.matches('_').count() > 1 {
        return false;
    }
    true
}
