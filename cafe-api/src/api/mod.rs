//! HTTP API handlers for cafe-api

pub mod cafes;
pub mod health;
pub mod orphan_files;
pub mod reviews;

pub use cafes::cafe_routes;
pub use health::health_routes;
pub use orphan_files::orphan_file_routes;
pub use reviews::review_routes;
