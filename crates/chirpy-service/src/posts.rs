use std::sync::Arc;

use chirpy_store::Store;
use chirpy_types::{Chirp, ChirpId, MAX_CHIRP_LEN};

use crate::error::{ServiceError, ServiceResult};
use crate::filter::TextFilter;

/// Validates, filters and stores chirps.
pub struct PostService {
    store: Arc<dyn Store>,
    filter: Arc<dyn TextFilter>,
}

impl PostService {
    pub fn new(store: Arc<dyn Store>, filter: Arc<dyn TextFilter>) -> Self {
        Self { store, filter }
    }

    /// Submit a new chirp.
    ///
    /// Length is checked on the raw body, before filtering. Over-long bodies
    /// are rejected with [`ServiceError::TooLong`] and nothing is stored.
    pub fn submit(&self, raw_body: &str) -> ServiceResult<Chirp> {
        let len = Chirp::body_len(raw_body);
        if len > MAX_CHIRP_LEN {
            return Err(ServiceError::TooLong {
                len,
                max: MAX_CHIRP_LEN,
            });
        }
        let body = self.filter.filter(raw_body);
        Ok(self.store.create_chirp(&body)?)
    }

    /// All chirps in creation order.
    pub fn list(&self) -> ServiceResult<Vec<Chirp>> {
        Ok(self.store.list_chirps()?)
    }

    pub fn get(&self, id: ChirpId) -> ServiceResult<Chirp> {
        Ok(self.store.get_chirp(id)?)
    }
}
