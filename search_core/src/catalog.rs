// search_core/src/catalog.rs

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeSet, HashMap};

/// Reserved attribute holding the pre-computed ranking signal.
pub const LTR_SCORE_ATTRIBUTE: &str = "ltr_score";

/// Type of a catalog column, decided once when the catalog is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Boolean,
    Number,
    Text,
    Null,
}

/// A single attribute cell of a hotel record.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Boolean(bool),
    Number(f64),
    Text(String),
    Null,
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Boolean(_) => AttributeKind::Boolean,
            AttributeValue::Number(_) => AttributeKind::Number,
            AttributeValue::Text(_) => AttributeKind::Text,
            AttributeValue::Null => AttributeKind::Null,
        }
    }

    /// Truthiness as the amenity columns use it: non-zero numbers and
    /// non-empty text count as present.
    pub fn is_truthy(&self) -> bool {
        match self {
            AttributeValue::Boolean(b) => *b,
            AttributeValue::Number(n) => *n != 0.0 && !n.is_nan(),
            AttributeValue::Text(s) => !s.is_empty(),
            AttributeValue::Null => false,
        }
    }

    /// Numeric view; booleans count as 0/1.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            AttributeValue::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

// Booleans go back out as 0/1, the way the source tables store them.
impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AttributeValue::Boolean(b) => serializer.serialize_u8(u8::from(*b)),
            AttributeValue::Number(n) => serializer.serialize_f64(*n),
            AttributeValue::Text(s) => serializer.serialize_str(s),
            AttributeValue::Null => serializer.serialize_none(),
        }
    }
}

/// One catalog record. Attributes keep the column order of the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotel {
    id: String,
    attributes: Vec<(String, AttributeValue)>,
    index: HashMap<String, usize>,
}

impl Hotel {
    /// A repeated attribute name keeps its first position and its last value.
    pub fn new(id: impl Into<String>, attributes: Vec<(String, AttributeValue)>) -> Self {
        let mut hotel = Self {
            id: id.into(),
            attributes: Vec::with_capacity(attributes.len()),
            index: HashMap::with_capacity(attributes.len()),
        };
        for (name, value) in attributes {
            hotel.set(name, value);
        }
        hotel
    }

    fn set(&mut self, name: String, value: AttributeValue) {
        match self.index.get(&name) {
            Some(&pos) => self.attributes[pos].1 = value,
            None => {
                self.index.insert(name.clone(), self.attributes.len());
                self.attributes.push((name, value));
            }
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get(&self, attribute: &str) -> Option<&AttributeValue> {
        self.index.get(attribute).map(|&pos| &self.attributes[pos].1)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The `ltr_score` attribute, 0 when missing or non-numeric.
    pub fn ltr_score(&self) -> f64 {
        self.get(LTR_SCORE_ATTRIBUTE)
            .and_then(AttributeValue::as_number)
            .unwrap_or(0.0)
    }
}

impl Serialize for Hotel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len()))?;
        for (name, value) in &self.attributes {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Read-only set of hotels for one search, kept in source order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    hotels: Vec<Hotel>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a hotel. A hotel with an id already present replaces the earlier
    /// record at its original position, and the old record is returned.
    pub fn insert(&mut self, hotel: Hotel) -> Option<Hotel> {
        match self.index.get(hotel.id()) {
            Some(&pos) => Some(std::mem::replace(&mut self.hotels[pos], hotel)),
            None => {
                self.index.insert(hotel.id().to_string(), self.hotels.len());
                self.hotels.push(hotel);
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Hotel> {
        self.index.get(id).map(|&pos| &self.hotels[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hotel> {
        self.hotels.iter()
    }

    pub fn len(&self) -> usize {
        self.hotels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotels.is_empty()
    }

    /// Kind of the first non-null value stored under `attribute`.
    /// `None` when no hotel carries the attribute at all.
    pub fn kind_of(&self, attribute: &str) -> Option<AttributeKind> {
        let mut seen = false;
        for value in self.hotels.iter().filter_map(|h| h.get(attribute)) {
            seen = true;
            if *value != AttributeValue::Null {
                return Some(value.kind());
            }
        }
        seen.then_some(AttributeKind::Null)
    }

    /// Every distinct text value observed for `attribute`, sorted.
    pub fn distinct_text_values(&self, attribute: &str) -> BTreeSet<String> {
        self.hotels
            .iter()
            .filter_map(|h| h.get(attribute).and_then(AttributeValue::as_text))
            .map(str::to_string)
            .collect()
    }
}

impl FromIterator<Hotel> for Catalog {
    fn from_iter<I: IntoIterator<Item = Hotel>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for hotel in iter {
            catalog.insert(hotel);
        }
        catalog
    }
}
