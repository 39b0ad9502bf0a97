//! Persistent game-data stores
//!
//! Read-modify-write access to the files a mod ships:
//! - JSON record stores (buffs, entries, rarities), append-only
//! - the localized string table (XML)
//!
//! Unreadable files are never fatal: they are started over and the loss is
//! reported as a [`crate::Degradation`]. Write failures always propagate.
//! There is no locking; runs against the same files must not overlap.

mod json;
mod localization;
mod rarity;

pub use json::{AppendReport, JsonStore, append_records};
pub use localization::{
    EntryKind, LANGUAGES, Language, LocalizationStore, LocalizationUpsert, LocalizedEntry,
    StringTable, UpsertOutcome, upsert_localization_entry,
};
pub use rarity::{
    FRAMED_RARITY, RARITY_CATEGORY, RarityStore, RarityUpsert, install_rarity_frame,
    upsert_rarity,
};

/// Store category of the buffs file.
pub const BUFF_CATEGORY: &str = "buffs";
/// Store category of the trinket entries file.
pub const ENTRY_CATEGORY: &str = "entries";

/// String id of a trinket's inventory title.
#[must_use]
pub fn title_string_id(trinket_slug: &str) -> String {
    format!("str_inventory_title_trinket{trinket_slug}")
}

/// String id of a rarity's display name.
#[must_use]
pub fn rarity_string_id(rarity_slug: &str) -> String {
    format!("trinket_rarity_{rarity_slug}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_ids() {
        assert_eq!(
            title_string_id("starweave_pendant"),
            "str_inventory_title_trinketstarweave_pendant"
        );
        assert_eq!(rarity_string_id("stochastic"), "trinket_rarity_stochastic");
    }
}
