use serde::{Deserialize, Serialize};

use crate::identity::ChirpId;

/// Maximum chirp body length, in characters.
pub const MAX_CHIRP_LEN: usize = 140;

/// A short text post. Immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: ChirpId,
    pub body: String,
}

impl Chirp {
    /// Length of a body as counted against [`MAX_CHIRP_LEN`].
    ///
    /// Counts Unicode scalar values, not bytes.
    pub fn body_len(body: &str) -> usize {
        body.chars().count()
    }

    /// Returns `true` if `body` fits within [`MAX_CHIRP_LEN`].
    pub fn fits(body: &str) -> bool {
        Self::body_len(body) <= MAX_CHIRP_LEN
    }
}
