//! Registry lifecycle: selection, first-load seeding, load and save

use crate::error::{EarningsError, Result, EMPTY_SELECTION};
use crate::models::catalog::{find_catalog_entry, PlatformCatalogEntry};
use crate::models::registry::Registry;
use crate::services::store::Store;

/// Map requested catalog ids to entries, keeping first-seen order and
/// dropping repeats
pub fn resolve_selection(platform_ids: &[String]) -> Result<Vec<PlatformCatalogEntry>> {
    let mut selected: Vec<PlatformCatalogEntry> = Vec::with_capacity(platform_ids.len());

    for id in platform_ids {
        let id = id.trim();
        let entry = find_catalog_entry(id).ok_or_else(|| {
            EarningsError::Validation(format!("Unknown platform id: {}", id))
        })?;
        if !selected.iter().any(|s| s.id == entry.id) {
            selected.push(*entry);
        }
    }

    Ok(selected)
}

/// Replace whatever is stored with a fresh registry for `selected`.
///
/// Existing ledgers are discarded. An empty selection fails before any write.
pub async fn initialize_registry(
    store: &dyn Store,
    key: &str,
    selected: &[PlatformCatalogEntry],
) -> Result<Registry> {
    if selected.is_empty() {
        return Err(EarningsError::Validation(EMPTY_SELECTION.to_string()));
    }

    let registry = Registry::from_catalog(selected);
    save_registry(store, key, &registry).await?;

    tracing::info!(
        platforms = registry.platforms.len(),
        "Initialized registry from selection"
    );

    Ok(registry)
}

/// Read the stored registry, seeding it from `default_catalog` on first run.
///
/// A present but unreadable document is an error; it is never overwritten
/// with defaults.
pub async fn load_or_seed_registry(
    store: &dyn Store,
    key: &str,
    default_catalog: &[PlatformCatalogEntry],
) -> Result<Registry> {
    if let Some(registry) = load_registry(store, key).await? {
        return Ok(registry);
    }

    tracing::info!(key = %key, "No stored registry, seeding from default catalog");

    let registry = Registry::from_catalog(default_catalog);
    save_registry(store, key, &registry).await?;
    Ok(registry)
}

pub async fn load_registry(store: &dyn Store, key: &str) -> Result<Option<Registry>> {
    let Some(text) = store.get(key).await? else {
        return Ok(None);
    };

    let registry = Registry::from_json(&text).map_err(|e| {
        tracing::error!(key = %key, error = %e, "Stored registry could not be read");
        e
    })?;

    tracing::debug!(key = %key, platforms = registry.platforms.len(), "Loaded registry");
    Ok(Some(registry))
}

pub async fn save_registry(store: &dyn Store, key: &str, registry: &Registry) -> Result<()> {
    let text = registry.to_json()?;
    store.set(key, text).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::CATALOG;
    use crate::services::store::MemoryStore;

    const KEY: &str = "platforms";

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_selection_dedups_in_order() {
        let selected = resolve_selection(&ids(&["5", "1", "5"])).unwrap();
        let names: Vec<_> = selected.iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Zepto", "Uber"]);
    }

    #[test]
    fn test_resolve_selection_unknown_id() {
        let result = resolve_selection(&ids(&["1", "42"]));
        assert!(matches!(result, Err(EarningsError::Validation(msg)) if msg.contains("42")));
    }

    #[tokio::test]
    async fn test_empty_selection_writes_nothing() {
        let store = MemoryStore::with_value(KEY, "[]");

        let result = initialize_registry(&store, KEY, &[]).await;

        assert!(matches!(result, Err(EarningsError::Validation(_))));
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.raw(KEY).as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_selection_replaces_existing_registry() {
        let store = MemoryStore::new();
        let mut old = Registry::from_catalog(&CATALOG);
        old.platforms[0].earnings = rust_decimal::Decimal::ONE;
        save_registry(&store, KEY, &old).await.unwrap();

        let selected = resolve_selection(&ids(&["1", "5"])).unwrap();
        let registry = initialize_registry(&store, KEY, &selected).await.unwrap();

        assert_eq!(registry.platforms.len(), 2);
        assert!(registry.platforms.iter().all(|p| p.earnings.is_zero()));
        assert!(registry.platforms.iter().all(|p| p.earning_entries.is_empty()));

        let stored = load_registry(&store, KEY).await.unwrap().unwrap();
        assert_eq!(stored, registry);
    }

    #[tokio::test]
    async fn test_seed_on_first_load_only() {
        let store = MemoryStore::new();

        let seeded = load_or_seed_registry(&store, KEY, &CATALOG).await.unwrap();
        assert_eq!(seeded.platforms.len(), CATALOG.len());
        assert_eq!(store.write_count(), 1);

        let again = load_or_seed_registry(&store, KEY, &CATALOG[..1]).await.unwrap();
        assert_eq!(again, seeded);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_store_is_not_reseeded() {
        let store = MemoryStore::with_value(KEY, "{broken");

        let result = load_or_seed_registry(&store, KEY, &CATALOG).await;

        assert!(matches!(result, Err(EarningsError::Malformed(_))));
        assert_eq!(store.raw(KEY).as_deref(), Some("{broken"));
        assert_eq!(store.write_count(), 0);
    }
}
