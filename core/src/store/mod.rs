// Store module — invoice/action → chat message persistence

pub mod file;
pub mod messages;
pub mod record;

pub use messages::{LoadOutcome, MessageMap, MessageStore, StoreKind};
pub use record::{Identifier, MessageRecord};
