//! Review image set construction

use crate::error::RuleViolation;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Maximum distinct images attached to one review
pub const MAX_REVIEW_IMAGES: usize = 3;

/// Image row to be persisted for a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReviewImage {
    pub review_id: Uuid,
    pub url: String,
}

/// Collapse duplicate URLs and cap the result at [`MAX_REVIEW_IMAGES`]
///
/// Duplicates are dropped silently; the cap applies to the distinct count,
/// so `[A, B, B, C]` is accepted. First-seen order is kept.
pub fn build_review_images(
    review_id: Uuid,
    urls: &[String],
) -> Result<Vec<NewReviewImage>, RuleViolation> {
    let mut seen = HashSet::new();
    let distinct: Vec<&String> = urls.iter().filter(|url| seen.insert(url.as_str())).collect();

    if distinct.len() > MAX_REVIEW_IMAGES {
        return Err(RuleViolation::TooManyImages {
            count: distinct.len(),
            max: MAX_REVIEW_IMAGES,
        });
    }

    Ok(distinct
        .into_iter()
        .map(|url| NewReviewImage {
            review_id,
            url: url.clone(),
        })
        .collect())
}
