const MONEY_MARKERS: [&str; 3] = ["$", "USD", "dollars"];

fn complete_text(title: &str, description: &str) -> String {
    format!("{} {}", title, description)
}

/// Counts non-overlapping, case-insensitive literal occurrences of `phrase`
/// in the title and description joined by a single space. Matches inside
/// longer words are counted.
pub fn count_phrase_occurrences(title: &str, description: &str, phrase: &str) -> usize {
    if phrase.is_empty() {
        return 0;
    }

    complete_text(title, description)
        .to_lowercase()
        .matches(phrase.to_lowercase().as_str())
        .count()
}

/// `$11.1`, `$111,111.11`, `11 dollars` and `11 USD` all qualify. The markers
/// are matched with their exact casing.
pub fn has_monetary_mention(title: &str, description: &str) -> bool {
    let text = complete_text(title, description);
    MONEY_MARKERS.iter().any(|marker| text.contains(marker))
}
