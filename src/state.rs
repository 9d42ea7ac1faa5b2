use std::sync::Arc;

use uuid::Uuid;

use crate::db::store::RatingStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    /// Short id of this process, generated at cold start.
    pub backend_id: String,
}

pub type SharedStore = Arc<dyn RatingStore>;

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            backend_id: generate_backend_id(),
        }
    }
}

fn generate_backend_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_id_is_eight_hex_chars() {
        let id = generate_backend_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
