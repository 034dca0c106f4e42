// hotel_catalog/src/categories.rs

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;

use crate::error::CategoryError;

const DEFAULT_CATEGORIES: &str = include_str!("../data/grouped_columns.json");

/// Static grouping of attribute names into semantic categories
/// (e.g. `price_rating`, `distances`). Order is kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLookup {
    categories: Vec<(String, Vec<String>)>,
}

impl CategoryLookup {
    /// The grouping shipped with the service.
    pub fn embedded() -> Result<Self, CategoryError> {
        Self::from_json_str(DEFAULT_CATEGORIES)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CategoryError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CategoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, CategoryError> {
        let Value::Object(map) = serde_json::from_str::<Value>(text)? else {
            return Err(CategoryError::NotAnObject);
        };

        let mut categories = Vec::with_capacity(map.len());
        for (category, value) in map {
            let Value::Array(items) = value else {
                return Err(CategoryError::NotAList { category });
            };
            let mut names = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                match item {
                    Value::String(name) => names.push(name),
                    _ => return Err(CategoryError::NotAString { category, index }),
                }
            }
            categories.push((category, names));
        }
        Ok(Self { categories })
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    pub fn category(&self, name: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|(category, _)| category == name)
            .map(|(_, items)| items.as_slice())
    }

    /// Every attribute name across all categories, first occurrence wins.
    pub fn attribute_universe(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.categories
            .iter()
            .flat_map(|(_, items)| items.iter())
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }
}
