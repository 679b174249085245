//! Topic-based event bus for runtime events.
//!
//! Device changes are published on [`Topic::Tracking`]; world edits and tick
//! boundaries on [`Topic::Control`].

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::ControlEvent;
