//! Index aggregation and dominant-type classification
//!
//! Each accepted review folds its four index values into the owning cafe's
//! running totals, after which the dominant type is recomputed from scratch:
//!
//! - the largest total wins, ties broken by [`Dimension::ALL`] order
//! - if all four totals are equal (including the all-zero fresh cafe) the
//!   type is `NONE`
//!
//! Totals are `i64` while indices are `i32`, and additions saturate, so a
//! total sitting at the `i32` ceiling keeps its ordering and one at the `i64`
//! ceiling never wraps negative.

use crate::rules::alias::{resolve, Lookup};
use crate::rules::index::{Dimension, ReviewIndex};
use crate::types::CafeType;
use serde::{Deserialize, Serialize};

/// Running index totals and the type derived from them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CafeTypeAggregate {
    pub coffee_total: i64,
    pub space_total: i64,
    pub price_total: i64,
    pub noise_total: i64,
    pub dominant_type: CafeType,
}

impl CafeTypeAggregate {
    /// Fold one review into the totals and reclassify
    ///
    /// Pure: `self` is left untouched and the updated aggregate is returned.
    pub fn apply_review(&self, index: &ReviewIndex) -> Self {
        let mut next = Self {
            coffee_total: self.coffee_total.saturating_add(i64::from(index.coffee)),
            space_total: self.space_total.saturating_add(i64::from(index.space)),
            price_total: self.price_total.saturating_add(i64::from(index.price)),
            noise_total: self.noise_total.saturating_add(i64::from(index.noise)),
            dominant_type: self.dominant_type,
        };
        next.dominant_type = classify(&next.totals());
        next
    }

    /// Totals keyed by dimension, in [`Dimension::ALL`] order
    pub fn totals(&self) -> [(Dimension, i64); 4] {
        [
            (Dimension::Coffee, self.coffee_total),
            (Dimension::Space, self.space_total),
            (Dimension::Price, self.price_total),
            (Dimension::Noise, self.noise_total),
        ]
    }
}

/// Pick the dominant type for a set of totals
pub fn classify(totals: &[(Dimension, i64); 4]) -> CafeType {
    let max = totals.iter().fold(i64::MIN, |acc, (_, total)| acc.max(*total));
    let tied = totals.iter().filter(|(_, total)| *total == max).count();

    if tied == totals.len() {
        return CafeType::None;
    }

    totals
        .iter()
        .find(|(_, total)| *total == max)
        .and_then(|(dimension, _)| resolve(dimension.name(), Lookup::Fallback(CafeType::None)))
        .unwrap_or_default()
}
