//! Mod rarity table

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::catalog::{RaritySpec, SchemaCatalog};
use crate::degrade::Degradation;
use crate::error::{Error, Result};

use super::json::JsonStore;

/// Store category of the rarity table.
pub const RARITY_CATEGORY: &str = "rarities";

/// Tier that gets a decorative frame when first created.
pub const FRAMED_RARITY: &str = "stochastic";

/// Outcome of a rarity upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct RarityUpsert {
    /// The rarity was appended by this call.
    pub created: bool,
    /// Set when the rarity file was unreadable and started over.
    pub recovered: Option<Degradation>,
}

/// The mod's rarity table, checked against the base game's rarities.
#[derive(Debug, Clone)]
pub struct RarityStore {
    store: JsonStore,
}

impl RarityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonStore::new(path, RARITY_CATEGORY),
        }
    }

    /// Ids already in the mod's rarity table.
    ///
    /// # Errors
    /// Returns an error on I/O failure.
    pub fn ids(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .records()?
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_str).map(str::to_string))
            .collect())
    }

    /// Make sure `spec` exists, appending it when neither the base game nor
    /// the mod table knows its id. Calling twice creates it once.
    ///
    /// # Errors
    /// Returns an error on I/O failure.
    pub fn upsert(&self, spec: &RaritySpec, catalog: &SchemaCatalog) -> Result<RarityUpsert> {
        if catalog.is_vanilla_rarity(&spec.id) {
            return Ok(RarityUpsert {
                created: false,
                recovered: None,
            });
        }

        let (document, recovered) = self.store.read()?;
        let known = document
            .get(RARITY_CATEGORY)
            .and_then(Value::as_array)
            .is_some_and(|records| {
                records
                    .iter()
                    .any(|r| r.get("id").and_then(Value::as_str) == Some(spec.id.as_str()))
            });
        if known {
            return Ok(RarityUpsert {
                created: false,
                recovered,
            });
        }

        let record = RaritySpec::created(&spec.id, spec.price);
        let report = self.store.append(std::slice::from_ref(&record))?;
        tracing::info!("Created rarity '{}'", record.id);
        Ok(RarityUpsert {
            created: true,
            recovered: recovered.or(report.recovered),
        })
    }
}

/// Ensure `spec` is a known rarity in the store at `store_path`.
///
/// # Errors
/// See [`RarityStore::upsert`].
pub fn upsert_rarity(
    spec: &RaritySpec,
    store_path: &Path,
    catalog: &SchemaCatalog,
) -> Result<bool> {
    RarityStore::new(store_path)
        .upsert(spec, catalog)
        .map(|outcome| outcome.created)
}

/// Copy the decorative frame for a newly created framed rarity.
///
/// Returns the written path, or `None` when `rarity_id` has no frame.
///
/// # Errors
/// Returns an error if the frame image is missing or cannot be copied.
pub fn install_rarity_frame(
    rarity_id: &str,
    frame_image: &Path,
    image_dir: &Path,
) -> Result<Option<PathBuf>> {
    if rarity_id != FRAMED_RARITY {
        return Ok(None);
    }
    fs::create_dir_all(image_dir).map_err(|e| Error::file_io(image_dir, e))?;
    let dest = image_dir.join(format!("rarity_{rarity_id}.png"));
    fs::copy(frame_image, &dest).map_err(|e| Error::file_io(frame_image, e))?;
    tracing::info!("Installed rarity frame {}", dest.display());
    Ok(Some(dest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::from_parts(
            Vec::new(),
            Vec::new(),
            [
                ("common".to_string(), RaritySpec::created("common", 1500)),
                ("stochastic".to_string(), RaritySpec::created("stochastic", 7500)),
            ],
            [RaritySpec {
                id: "common".to_string(),
                price: 0,
                award_category: "common".to_string(),
            }],
        )
    }

    #[test]
    fn test_vanilla_rarity_not_written() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rarities.json");
        let catalog = catalog();
        let created = upsert_rarity(catalog.rarity("common").unwrap(), &path, &catalog).unwrap();
        assert!(!created);
        assert!(!path.exists());
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rarities.json");
        let catalog = catalog();
        let spec = catalog.rarity("stochastic").unwrap();

        assert!(upsert_rarity(spec, &path, &catalog).unwrap());
        assert!(!upsert_rarity(spec, &path, &catalog).unwrap());

        let store = RarityStore::new(&path);
        assert_eq!(store.ids().unwrap(), vec!["stochastic".to_string()]);
        let records = store.store.records().unwrap();
        assert_eq!(
            records[0],
            serde_json::json!({"id": "stochastic", "award_category": "universal"})
        );
    }

    #[test]
    fn test_frame_only_for_stochastic() {
        let temp = TempDir::new().unwrap();
        let frame = temp.path().join("frame.png");
        fs::write(&frame, b"png").unwrap();
        let images = temp.path().join("panels");

        assert!(install_rarity_frame("common", &frame, &images).unwrap().is_none());
        let dest = install_rarity_frame("stochastic", &frame, &images)
            .unwrap()
            .unwrap();
        assert_eq!(dest, images.join("rarity_stochastic.png"));
        assert_eq!(fs::read(dest).unwrap(), b"png");
    }

    #[test]
    fn test_missing_frame_is_error() {
        let temp = TempDir::new().unwrap();
        let err = install_rarity_frame(
            "stochastic",
            &temp.path().join("nope.png"),
            temp.path(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::FileIo { .. }));
    }
}
