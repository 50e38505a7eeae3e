/// WordNet-style noun lemmatization.
///
/// Applies the morphy detachment rules for nouns (the noun default of the
/// reference pipeline) without a lexicon lookup: the first applicable
/// suffix rule is detached. Irregular plurals are handled by a small
/// table. Input tokens are already lowercased.
pub fn lemmatize(word: &str) -> String {
    if let Some(base) = irregular(word) {
        return base.to_string();
    }

    for (suffix, replacement) in DETACHMENT_RULES {
        if let Some(stripped) = word.strip_suffix(suffix) {
            if !stripped.is_empty() {
                return format!("{}{}", stripped, replacement);
            }
        }
    }

    // Plain plural "s", keeping "-ss"/"-us"/"-is" endings and short words
    if word.len() > 3
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
    {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

// Longer suffixes first so "ches" wins over "es"
const DETACHMENT_RULES: [(&str, &str); 6] = [
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("zes", "z"),
    ("ses", "s"),
    ("ies", "y"),
];

fn irregular(word: &str) -> Option<&'static str> {
    match word {
        "men" => Some("man"),
        "women" => Some("woman"),
        "children" => Some("child"),
        "feet" => Some("foot"),
        "teeth" => Some("tooth"),
        "mice" => Some("mouse"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detachment_rules() {
        assert_eq!(lemmatize("churches"), "church");
        assert_eq!(lemmatize("boxes"), "box");
        assert_eq!(lemmatize("wishes"), "wish");
        assert_eq!(lemmatize("movies"), "movy"); // no lexicon: pure detachment
        assert_eq!(lemmatize("horses"), "hors");
    }

    #[test]
    fn test_plain_plural() {
        assert_eq!(lemmatize("actors"), "actor");
        assert_eq!(lemmatize("films"), "film");
        // kept endings
        assert_eq!(lemmatize("actress"), "actress");
        assert_eq!(lemmatize("census"), "census");
        assert_eq!(lemmatize("crisis"), "crisis");
        // short words are left alone
        assert_eq!(lemmatize("gas"), "gas");
    }

    #[test]
    fn test_irregular_plurals() {
        assert_eq!(lemmatize("men"), "man");
        assert_eq!(lemmatize("children"), "child");
    }

    #[test]
    fn test_non_plural_identity() {
        assert_eq!(lemmatize("drama"), "drama");
        assert_eq!(lemmatize("crime"), "crime");
        assert_eq!(lemmatize("fight"), "fight");
    }
}
