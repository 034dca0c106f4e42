// search_core/src/constraint.rs

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::catalog::{AttributeValue, Hotel};

/// Amenity columns that together make up the virtual `Massage` attribute.
pub const MASSAGE_COLUMNS: &[&str] = &[
    "Fußmassage",
    "Ganzkörpermassage",
    "Handmassage",
    "Kopfmassage",
    "Massage",
    "Massagestuhl",
    "Nackenmassage",
    "Paarmassage",
    "Rückenmassage",
    "Massage im Zimmer",
];

/// Amenity columns that together make up the virtual `Pool` attribute.
pub const POOL_COLUMNS: &[&str] = &[
    "Infinity-Pool",
    "Innenpool",
    "Innenpool (saisonal)",
    "Pool",
    "Pool Cabana",
    "Pool mit Rampe",
    "Pool-/Strandtücher",
    "Außenpool",
    "Außenpool (saisonal)",
    "Beheizter Pool",
    "Whirlpool",
    "Whirlpool/Jacuzzi",
];

/// Attribute names that are satisfied through an amenity group rather than
/// a column of the same name.
pub fn virtual_aggregate(attribute: &str) -> Option<&'static [&'static str]> {
    match attribute {
        "Massage" => Some(MASSAGE_COLUMNS),
        "Pool" => Some(POOL_COLUMNS),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Le => "<=",
            ComparisonOperator::Ge => ">=",
            ComparisonOperator::Eq => "==",
        }
    }

    pub fn holds(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            ComparisonOperator::Lt => lhs < rhs,
            ComparisonOperator::Gt => lhs > rhs,
            ComparisonOperator::Le => lhs <= rhs,
            ComparisonOperator::Ge => lhs >= rhs,
            ComparisonOperator::Eq => lhs == rhs,
        }
    }
}

impl FromStr for ComparisonOperator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" => Ok(ComparisonOperator::Lt),
            ">" => Ok(ComparisonOperator::Gt),
            "<=" => Ok(ComparisonOperator::Le),
            ">=" => Ok(ComparisonOperator::Ge),
            "==" => Ok(ComparisonOperator::Eq),
            other => Err(UnknownOperator(other.to_string())),
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown comparison operator '{0}'")]
pub struct UnknownOperator(pub String);

#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    Boolean { value: bool },
    NumericComparison { operator: ComparisonOperator, value: f64 },
    CategoricalSet { value: BTreeSet<String> },
}

/// A typed predicate over one hotel attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    attribute: String,
    kind: ConstraintKind,
}

impl Constraint {
    pub fn boolean(attribute: impl Into<String>, value: bool) -> Self {
        Self { attribute: attribute.into(), kind: ConstraintKind::Boolean { value } }
    }

    pub fn comparison(attribute: impl Into<String>, operator: ComparisonOperator, value: f64) -> Self {
        Self {
            attribute: attribute.into(),
            kind: ConstraintKind::NumericComparison { operator, value },
        }
    }

    pub fn categorical<I, S>(attribute: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attribute: attribute.into(),
            kind: ConstraintKind::CategoricalSet {
                value: values.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    /// Whether `hotel` meets this constraint. Missing, null or mistyped
    /// values never satisfy it. `Massage` and `Pool` hold whenever any
    /// column of their group is truthy, whatever the constraint value.
    pub fn is_satisfied(&self, hotel: &Hotel) -> bool {
        if let Some(group) = virtual_aggregate(&self.attribute) {
            return group
                .iter()
                .any(|column| hotel.get(column).is_some_and(AttributeValue::is_truthy));
        }

        let Some(actual) = hotel.get(&self.attribute) else {
            return false;
        };
        if *actual == AttributeValue::Null {
            return false;
        }

        match &self.kind {
            ConstraintKind::Boolean { value } => actual.is_truthy() == *value,
            ConstraintKind::NumericComparison { operator, value } => actual
                .as_number()
                .is_some_and(|n| operator.holds(n, *value)),
            ConstraintKind::CategoricalSet { value } => {
                actual.as_text().is_some_and(|s| value.contains(s))
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ConstraintKind::Boolean { value } => {
                write!(f, "{} == {}", self.attribute, u8::from(*value))
            }
            ConstraintKind::NumericComparison { operator, value } => {
                write!(f, "{} {} {}", self.attribute, operator, value)
            }
            ConstraintKind::CategoricalSet { value } => {
                let items: Vec<&str> = value.iter().map(String::as_str).collect();
                write!(f, "{} in {{{}}}", self.attribute, items.join(", "))
            }
        }
    }
}
