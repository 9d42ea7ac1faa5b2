pub mod rating;

pub use rating::{Rating, RatingRow, StoredTimestamp};
