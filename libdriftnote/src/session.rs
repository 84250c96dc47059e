//! Current-user session state
//!
//! A [`Session`] owns one observable cell per piece of the signed-in user's
//! state: identity, profile, relay lists, mute lists, pinned notes. Cells
//! are independently readable, writable, and subscribable; no cell enforces
//! cross-cell invariants, so callers keep related cells consistent.
//!
//! The session also carries the pure helpers the feed layer calls on every
//! event: mute classification ([`Session::is_mute_event`]) and relay-list
//! derivation from relay announcement events ([`Session::update_relays`]).
//!
//! # Lifecycle
//!
//! A session is constructed once at application start, seeded with a
//! baseline relay list (a one-time read; later changes to the caller's list
//! do not propagate). [`Session::reset`] tears the state back down to the
//! seeded defaults on logout.

use tracing::{debug, info};
use url::Url;

use crate::cell::Cell;
use crate::config::Config;
use crate::types::{Event, RelayPermission, User};

/// The signed-in user's observable state.
pub struct Session {
    default_relays: Vec<String>,

    /// Public key of the current user; empty when signed out.
    pub pubkey: Cell<String>,
    /// Resolved profile of the current user, once a metadata event arrives.
    pub profile: Cell<Option<User>>,
    /// Relay recommended by the user's metadata.
    pub recommended_relay: Cell<String>,
    /// Public keys the user follows.
    pub followees: Cell<Vec<String>>,
    /// Muted author public keys.
    pub mute_pubkeys: Cell<Vec<String>>,
    /// Muted event ids.
    pub mute_event_ids: Cell<Vec<String>>,
    /// Ids of notes the user has pinned.
    pub pin_notes: Cell<Vec<String>>,
    /// Relays to fetch from.
    pub read_relays: Cell<Vec<String>>,
    /// Relays to publish to.
    pub write_relays: Cell<Vec<String>>,
    /// Signed in without signing capability.
    pub read_only: Cell<bool>,
}

impl Session {
    /// Create a session seeded with `default_relays` in both relay cells.
    pub fn new(default_relays: &[String]) -> Self {
        Self {
            default_relays: default_relays.to_vec(),
            pubkey: Cell::new(String::new()),
            profile: Cell::new(None),
            recommended_relay: Cell::new(String::new()),
            followees: Cell::new(Vec::new()),
            mute_pubkeys: Cell::new(Vec::new()),
            mute_event_ids: Cell::new(Vec::new()),
            pin_notes: Cell::new(Vec::new()),
            read_relays: Cell::new(default_relays.to_vec()),
            write_relays: Cell::new(default_relays.to_vec()),
            read_only: Cell::new(false),
        }
    }

    /// Create a session seeded from the configured default relay list.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.relays.default)
    }

    /// Whether `pubkey` is in the mute list.
    pub fn is_mute_pubkey(&self, pubkey: &str) -> bool {
        self.mute_pubkeys.read().iter().any(|muted| muted == pubkey)
    }

    /// Whether `event` is suppressed by any mute rule: a muted author, a
    /// `"p"` tag naming a muted pubkey, a muted event id, or an `"e"` tag
    /// naming a muted event id.
    pub fn is_mute_event(&self, event: &Event) -> bool {
        if self.is_mute_pubkey(&event.pubkey)
            || event
                .tags_named("p")
                .any(|tag| tag.get(1).is_some_and(|pubkey| self.is_mute_pubkey(pubkey)))
        {
            return true;
        }

        let ids = self.mute_event_ids.read();
        ids.contains(&event.id)
            || event
                .tags_named("e")
                .any(|tag| tag.get(1).is_some_and(|id| ids.contains(id)))
    }

    /// Recompute both relay cells from `event`'s `"r"` tags.
    ///
    /// This is a full overwrite, not a merge. Entries that are not
    /// websocket URLs are dropped without error. The optional tag marker
    /// selects the direction per [`RelayPermission::from_marker`]; each list
    /// is written once, deduplicated, observers firing even when the
    /// content did not change. The two writes are not jointly atomic.
    pub fn update_relays(&self, event: &Event) {
        let mut read = Vec::new();
        let mut write = Vec::new();

        for tag in event.tags_named("r") {
            let Some(relay) = tag.get(1) else {
                debug!(?tag, "relay tag without a URL, dropped");
                continue;
            };
            if !is_websocket_url(relay) {
                debug!(%relay, "relay tag is not a websocket URL, dropped");
                continue;
            }

            let permission = RelayPermission::from_marker(tag.get(2).map(String::as_str));
            if permission.read && !read.contains(relay) {
                read.push(relay.clone());
            }
            if permission.write && !write.contains(relay) {
                write.push(relay.clone());
            }
        }

        debug!(
            read_count = read.len(),
            write_count = write.len(),
            "relay lists replaced"
        );
        self.read_relays.write(read);
        self.write_relays.write(write);
    }

    /// Tear the session down to its initial state (logout).
    ///
    /// Every cell is rewritten, so observers see the reset; the relay cells
    /// return to the seeded defaults.
    pub fn reset(&self) {
        info!("session reset");
        self.pubkey.write(String::new());
        self.profile.write(None);
        self.recommended_relay.write(String::new());
        self.followees.write(Vec::new());
        self.mute_pubkeys.write(Vec::new());
        self.mute_event_ids.write(Vec::new());
        self.pin_notes.write(Vec::new());
        self.read_relays.write(self.default_relays.clone());
        self.write_relays.write(self.default_relays.clone());
        self.read_only.write(false);
    }
}

fn is_websocket_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "ws" | "wss"),
        Err(_) => false,
    }
}
