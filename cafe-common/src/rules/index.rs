//! Review index tuple and its range gate

use crate::error::RuleViolation;
use serde::{Deserialize, Serialize};

/// Lowest accepted index value (inclusive)
pub const INDEX_MIN: i32 = 1;

/// Highest accepted index value (inclusive)
pub const INDEX_MAX: i32 = 5;

/// One of the four review signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Coffee,
    Space,
    Price,
    Noise,
}

impl Dimension {
    /// Fixed evaluation order; also the classifier's tie-break order
    pub const ALL: [Dimension; 4] = [
        Dimension::Coffee,
        Dimension::Space,
        Dimension::Price,
        Dimension::Noise,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Coffee => "coffee",
            Dimension::Space => "space",
            Dimension::Price => "price",
            Dimension::Noise => "noise",
        }
    }
}

/// Four independent integer signals submitted with a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewIndex {
    pub coffee: i32,
    pub space: i32,
    pub price: i32,
    pub noise: i32,
}

impl ReviewIndex {
    pub fn new(coffee: i32, space: i32, price: i32, noise: i32) -> Self {
        Self {
            coffee,
            space,
            price,
            noise,
        }
    }

    pub fn get(&self, dimension: Dimension) -> i32 {
        match dimension {
            Dimension::Coffee => self.coffee,
            Dimension::Space => self.space,
            Dimension::Price => self.price,
            Dimension::Noise => self.noise,
        }
    }
}

/// Reject any index outside `INDEX_MIN..=INDEX_MAX`
///
/// Used for both review creation and index updates. Reports the first
/// offending dimension in [`Dimension::ALL`] order.
pub fn validate_index_range(index: &ReviewIndex) -> Result<(), RuleViolation> {
    for dimension in Dimension::ALL {
        let value = index.get(dimension);
        if !(INDEX_MIN..=INDEX_MAX).contains(&value) {
            return Err(RuleViolation::IndexOutOfRange {
                dimension: dimension.name(),
                value,
                min: INDEX_MIN,
                max: INDEX_MAX,
            });
        }
    }
    Ok(())
}
