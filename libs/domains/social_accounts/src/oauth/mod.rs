//! Short-lived OAuth records: CSRF state and pending account selections.

mod selection;
mod state_store;

pub use selection::{SELECTION_TTL, SelectionCache};
pub use state_store::{OAuthStateStore, STATE_TTL};

/// 32 random bytes, hex encoded
pub(crate) fn random_token() -> String {
    const_hex::encode(rand::random::<[u8; 32]>())
}
