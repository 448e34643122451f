use crate::store::AppStore;

#[derive(Clone)]
pub struct AppState {
    pub store: AppStore,
}

impl AppState {
    pub fn new(store: AppStore) -> Self {
        Self { store }
    }
}
