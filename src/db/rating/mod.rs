pub mod get;
pub mod post;

pub use get::{MAX_RATINGS_LIMIT, get_ratings};
pub use post::insert_rating;
