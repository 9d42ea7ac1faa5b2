pub mod health;
pub mod rating;
pub mod version;

pub use health::health_handler;
pub use rating::{get_ratings_handler, rate_handler};
pub use version::version_handler;
