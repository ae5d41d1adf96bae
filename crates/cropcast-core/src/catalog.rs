//! Ordered crop catalog used for request validation and index lookup.

use serde::{Deserialize, Serialize};

use crate::features::title_case;

/// Crops served when the model carries no label set of its own.
pub const FALLBACK_CROPS: [&str; 5] = ["Wheat", "Rice", "Maize", "Millet", "Barley"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CropEntry {
    /// Title-cased display name.
    name: String,
    /// Label as the model saw it during training.
    label: String,
}

/// A crop looked up in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCrop<'a> {
    /// Position in the catalog.
    pub index: usize,
    /// Canonical (title-cased) name.
    pub name: &'a str,
    /// Label the model was trained with.
    pub label: &'a str,
}

/// Small ordered list of crops. Identity is the string value only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropCatalog {
    entries: Vec<CropEntry>,
}

impl CropCatalog {
    /// The five-crop catalog used by the placeholder model.
    pub fn fallback() -> Self {
        Self::from_labels(FALLBACK_CROPS)
    }

    /// Builds a catalog from model labels, title-casing display names and
    /// dropping duplicates while keeping first-seen order. An empty label
    /// set yields the fallback catalog.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<CropEntry> = Vec::new();
        for label in labels {
            let label = label.as_ref();
            let name = title_case(label.trim());
            if name.is_empty() || entries.iter().any(|e| e.name == name) {
                continue;
            }
            entries.push(CropEntry { name, label: label.to_string() });
        }

        if entries.is_empty() {
            return Self::fallback();
        }
        Self { entries }
    }

    /// Looks up a crop by name after title-casing it.
    pub fn resolve(&self, crop_type: &str) -> Option<ResolvedCrop<'_>> {
        let wanted = title_case(crop_type);
        self.entries
            .iter()
            .enumerate()
            .find(|(_, e)| e.name == wanted)
            .map(|(index, e)| ResolvedCrop { index, name: &e.name, label: &e.label })
    }

    /// Returns the crop at `index`.
    pub fn get(&self, index: usize) -> Option<ResolvedCrop<'_>> {
        self.entries
            .get(index)
            .map(|e| ResolvedCrop { index, name: &e.name, label: &e.label })
    }

    /// Display names in catalog order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CropCatalog {
    fn default() -> Self {
        Self::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_order() {
        let catalog = CropCatalog::fallback();
        assert_eq!(catalog.names(), vec!["Wheat", "Rice", "Maize", "Millet", "Barley"]);
    }

    #[test]
    fn test_resolve_title_cases_input() {
        let catalog = CropCatalog::fallback();
        let crop = catalog.resolve("mAIZE").unwrap();
        assert_eq!(crop.index, 2);
        assert_eq!(crop.name, "Maize");
        assert!(catalog.resolve("Sorghum").is_none());
    }

    #[test]
    fn test_from_labels_keeps_model_label() {
        let catalog = CropCatalog::from_labels(["maize", "rice", "MAIZE"]);
        assert_eq!(catalog.names(), vec!["Maize", "Rice"]);
        let crop = catalog.resolve("Maize").unwrap();
        assert_eq!(crop.label, "maize");
    }

    #[test]
    fn test_from_empty_labels_falls_back() {
        let catalog = CropCatalog::from_labels(Vec::<String>::new());
        assert_eq!(catalog, CropCatalog::fallback());
    }

    #[test]
    fn test_get_by_index() {
        let catalog = CropCatalog::fallback();
        assert_eq!(catalog.get(4).map(|c| c.name), Some("Barley"));
        assert!(catalog.get(5).is_none());
    }
}
