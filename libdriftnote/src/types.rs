//! Core types for Driftnote

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A feed event as relays deliver it.
///
/// Field names follow the NIP-01 wire shape so events deserialize straight
/// from relay payloads. An event is immutable once constructed; its identity
/// is the `id` field. Tags are ordered string sequences interpreted
/// positionally by convention: tag name at position 0, value at position 1,
/// optional qualifier at position 2. Consumers read what they need and this
/// module does not enforce tag shape beyond that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub pubkey: String,
    pub created_at: i64,
    pub kind: u32,
    pub tags: Vec<Vec<String>>,
    pub content: String,
    pub sig: String,
}

impl Event {
    /// Iterate over tags whose first element equals `name`.
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a [String]> {
        self.tags
            .iter()
            .filter(move |tag| tag.first().map(String::as_str) == Some(name))
            .map(Vec::as_slice)
    }

    /// The creation timestamp as a UTC datetime.
    ///
    /// Timestamps outside the representable range fall back to the Unix
    /// epoch.
    pub fn created_at_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.created_at, 0).unwrap_or_default()
    }
}

/// A user profile resolved from a metadata event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub display_name: String,
    pub nip05: String,
    pub picture: String,
    pub website: String,
}

/// An event enriched with its author's resolved profile.
///
/// The embedded `User` is a snapshot taken at enrichment time, not a live
/// view of the profile cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEvent {
    #[serde(flatten)]
    pub event: Event,
    pub user: User,
}

/// An ordered feed of events plus a lookup from event id to enriched event.
///
/// The `events` sequence is display order; `user_events` keys are unique.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    pub events: Vec<Event>,
    pub user_events: HashMap<String, UserEvent>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an enriched event and index it by id.
    ///
    /// A duplicate id replaces the indexed copy; the display sequence keeps
    /// its existing entry.
    pub fn push(&mut self, user_event: UserEvent) {
        let id = user_event.event.id.clone();
        if !self.user_events.contains_key(&id) {
            self.events.push(user_event.event.clone());
        }
        self.user_events.insert(id, user_event);
    }

    /// Look up the enriched copy of an event by id.
    pub fn user_event(&self, id: &str) -> Option<&UserEvent> {
        self.user_events.get(id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Read/write permission carried by a relay announcement tag marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayPermission {
    pub read: bool,
    pub write: bool,
}

impl RelayPermission {
    /// Interpret the optional third element of an `"r"` tag.
    ///
    /// An absent marker grants both directions; an unknown marker grants
    /// neither.
    pub fn from_marker(marker: Option<&str>) -> Self {
        match marker {
            None => Self {
                read: true,
                write: true,
            },
            Some("read") => Self {
                read: true,
                write: false,
            },
            Some("write") => Self {
                read: false,
                write: true,
            },
            Some(_) => Self {
                read: false,
                write: false,
            },
        }
    }
}
