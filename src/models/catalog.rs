use serde::{Deserialize, Serialize};

/// A platform the user can opt into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformCatalogEntry {
    pub id: &'static str,
    pub name: &'static str,
}

pub const CATALOG: [PlatformCatalogEntry; 5] = [
    PlatformCatalogEntry { id: "1", name: "Uber" },
    PlatformCatalogEntry { id: "2", name: "Ola" },
    PlatformCatalogEntry { id: "3", name: "Rapido" },
    PlatformCatalogEntry { id: "4", name: "Swiggy" },
    PlatformCatalogEntry { id: "5", name: "Zepto" },
];

pub fn find_catalog_entry(id: &str) -> Option<&'static PlatformCatalogEntry> {
    CATALOG.iter().find(|entry| entry.id == id)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectPlatformsRequest {
    pub platform_ids: Vec<String>,
}

pub type CatalogListResponse = Vec<PlatformCatalogEntry>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_and_names_unique() {
        let ids: HashSet<_> = CATALOG.iter().map(|e| e.id).collect();
        let names: HashSet<_> = CATALOG.iter().map(|e| e.name).collect();
        assert_eq!(ids.len(), CATALOG.len());
        assert_eq!(names.len(), CATALOG.len());
    }

    #[test]
    fn test_find_catalog_entry() {
        assert_eq!(find_catalog_entry("5").map(|e| e.name), Some("Zepto"));
        assert!(find_catalog_entry("6").is_none());
        assert!(find_catalog_entry("Uber").is_none());
    }
}
