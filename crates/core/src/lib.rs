//! `querypad-core`: framework-agnostic interaction primitives.
//!
//! Nothing in here touches the filesystem or a UI toolkit. The engine and
//! config crates build on these types; a frontend renders them.

pub mod icon;
pub mod keystroke;
pub mod recency;
pub mod selection;
pub mod tasks;

pub use icon::IconRef;
pub use keystroke::{Keystroke, Modifiers};
pub use recency::RecencyCache;
pub use selection::{SelectionController, SelectionState};
pub use tasks::TaskQueue;
