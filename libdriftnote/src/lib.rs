//! Driftnote - client-side session state for a Nostr-style feed client
//!
//! This library holds the state layer a feed UI binds to: domain types for
//! events and profiles, observable session cells (current user, relay
//! lists, mute lists), and the pure helpers that classify muted content and
//! derive relay lists from relay announcement events. Networking, signature
//! verification, persistence, and rendering belong to the surrounding
//! application and its protocol client.

pub mod cell;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use cell::{Cell, Subscription};
pub use config::Config;
pub use error::{DriftnoteError, Result};
pub use session::Session;
pub use types::{Event, RelayPermission, Timeline, User, UserEvent};
