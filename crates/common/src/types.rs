use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exact character count of a canonical wallet address, `0x` included.
pub const WALLET_ADDRESS_LEN: usize = 42;

/// Scheme prefix for the mini-app deep link; the app id is appended verbatim.
pub const DEEP_LINK_PREFIX: &str = "worldapp://mini-app?app_id=";

/// A `0x`-prefixed notification recipient key.
///
/// Only the length is enforced. Hex digits and checksums are not inspected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Accept `value` if it is exactly [`WALLET_ADDRESS_LEN`] characters long.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.chars().count() == WALLET_ADDRESS_LEN {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Request body for one notification batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub app_id: String,
    pub addresses: Vec<WalletAddress>,
    pub title: String,
    pub message: String,
    pub mini_app_path: String,
}

impl NotificationPayload {
    /// Build a payload, deriving the deep link from `app_id`.
    pub fn new(
        app_id: impl Into<String>,
        addresses: Vec<WalletAddress>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let app_id = app_id.into();
        let mini_app_path = deep_link(&app_id);
        Self {
            app_id,
            addresses,
            title: title.into(),
            message: message.into(),
            mini_app_path,
        }
    }
}

/// Deep link that opens the mini-app identified by `app_id`.
pub fn deep_link(app_id: &str) -> String {
    format!("{DEEP_LINK_PREFIX}{app_id}")
}

/// Outcome of one successful notification cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSummary {
    /// Correlation id shared by every log line of the cycle
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Cells read from the roster's first column
    pub entries_read: usize,
    /// Entries that normalized into a wallet address
    pub addresses_accepted: usize,
    /// Entries dropped by normalization
    pub entries_discarded: usize,
    /// Batches delivered to the notification endpoint
    pub batches_sent: usize,
}
