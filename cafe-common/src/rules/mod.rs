//! Domain rule engine
//!
//! Pure, synchronous checks and folds over review and orphan-file input.
//! Nothing in here touches storage; the `db` module wraps these in
//! transactions.

pub mod alias;
pub mod classifier;
pub mod images;
pub mod index;
pub mod orphan;
pub mod theme;

pub use alias::{resolve, Aliased, Lookup};
pub use classifier::{classify, CafeTypeAggregate};
pub use images::{build_review_images, NewReviewImage, MAX_REVIEW_IMAGES};
pub use index::{validate_index_range, Dimension, ReviewIndex, INDEX_MAX, INDEX_MIN};
pub use orphan::{
    validate_and_build_orphan_batch, ExistingUrlChecker, NewOrphanFileHistory, MAX_ORPHAN_BATCH,
};
pub use theme::CafeThemeAggregate;
