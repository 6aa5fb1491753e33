//! Serialized, prioritized access to the remote translation backend.

mod priority;
mod worker;

pub use priority::Priority;
pub use worker::{DEFAULT_ITEM_DELAY, DEFAULT_TIMEOUT, QueueTicket, TranslationQueue};
