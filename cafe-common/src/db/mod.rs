//! SQLite persistence for cafes, reviews and orphan-file history

pub mod cafes;
pub mod init;
pub mod models;
pub mod orphan_files;
pub mod retry;
pub mod reviews;

pub use cafes::{apply_review_to_cafe, create_cafe, load_cafe};
pub use init::init_database;
pub use models::{Cafe, OrphanFileHistory, Review, ReviewImage};
pub use orphan_files::{
    find_recorded_urls, list_live_orphan_files, load_orphan_file, mark_hard_deleted,
    record_orphan_batch,
};
pub use retry::retry_on_conflict;
pub use reviews::{
    create_review, load_review, load_review_images, update_review_index, CreatedReview, NewReview,
};
