//! Identifier formatting for game-data records

/// Slug a display name into a game-data identifier.
///
/// Lowercases, replaces spaces with underscores and drops apostrophes. Other
/// punctuation is kept as-is; existing mod files depend on this exact form.
///
/// ```
/// use trinketforge::utils::slugify;
///
/// assert_eq!(slugify("Moonwhisper's Tear"), "moonwhispers_tear");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "_").replace('\'', "")
}

/// Turn a tier identifier like `very_rare` into display text (`Very Rare`).
#[must_use]
pub fn display_name(id: &str) -> String {
    id.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
