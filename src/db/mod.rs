pub mod connection;
pub mod memory;
pub mod postgres;
pub mod rating;
pub mod retry;
pub mod store;

pub use rating::{get_ratings, insert_rating};
pub use store::RatingStore;
