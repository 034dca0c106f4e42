// search_core/src/scoring.rs

use std::cmp::Ordering;

use crate::catalog::{Catalog, Hotel};
use crate::constraint::Constraint;

/// Per-hotel count of satisfied constraints, in catalog order. Hotels that
/// satisfy nothing are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scores {
    entries: Vec<(String, usize)>,
}

impl Scores {
    pub fn get(&self, hotel_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(id, _)| id == hotel_id)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(id, score)| (id.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn score(constraints: &[Constraint], catalog: &Catalog) -> Scores {
    let entries = catalog
        .iter()
        .filter_map(|hotel| {
            let satisfied = constraints.iter().filter(|c| c.is_satisfied(hotel)).count();
            (satisfied > 0).then(|| (hotel.id().to_string(), satisfied))
        })
        .collect();
    Scores { entries }
}

/// Orders the scored hotels by score, then `ltr_score`, both descending.
/// Exact ties keep catalog order.
pub fn rank_by_score(scores: &Scores, catalog: &Catalog) -> Vec<String> {
    let mut ranked: Vec<(&str, usize, f64)> = scores
        .iter()
        .map(|(id, score)| {
            let ltr = catalog.get(id).map_or(0.0, Hotel::ltr_score);
            (id, score, ltr)
        })
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| descending(a.2, b.2)));
    ranked.into_iter().map(|(id, _, _)| id.to_string()).collect()
}

/// Orders the whole catalog by `ltr_score` alone, descending.
pub fn rank_by_ltr_only(catalog: &Catalog) -> Vec<String> {
    let mut ranked: Vec<&Hotel> = catalog.iter().collect();
    ranked.sort_by(|a, b| descending(a.ltr_score(), b.ltr_score()));
    ranked.into_iter().map(|h| h.id().to_string()).collect()
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
