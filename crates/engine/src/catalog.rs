//! Notification message catalog and message selection.
//!
//! Every batch gets one message drawn from the catalog. Selection goes through
//! [`MessageSelector`] so a seeded or fixed selector can make payloads
//! reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Built-in messages as `(title, body)`.
const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("Play!", "🎮 Be the top 1 — keep playing minigames!"),
    ("Care", "🧼 Remember to clean your Beasts!"),
    ("Feed", "🍗 Don't forget to feed your Beasts!"),
    ("Hungry", "🍽️ Your Beast might be hungry!"),
    ("Happy", "😄 Keep it up — one day is one year!"),
    ("Sleep", "🌙 Bedtime! Let your Beast recharge."),
    ("Energy Low", "⚡️ Energy is low — a boost could help."),
    ("Level Up", "⭐️ So close to leveling up — one more game!"),
    ("Name Time", "🏷️ Give your Beast a cool new name!"),
    ("Clean Up", "🫧 Mud alert! Your Beast needs a bath."),
    ("Miss You", "👋 Your Beast misses you — come say hi!"),
];

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMessage {
    pub title: String,
    pub body: String,
}

impl CatalogMessage {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Ordered, non-empty, read-only set of messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    messages: Vec<CatalogMessage>,
}

impl MessageCatalog {
    /// Build a catalog. Returns `None` for an empty list.
    pub fn new(messages: Vec<CatalogMessage>) -> Option<Self> {
        if messages.is_empty() {
            None
        } else {
            Some(Self { messages })
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Never true for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogMessage> {
        self.messages.get(index)
    }

    pub fn messages(&self) -> &[CatalogMessage] {
        &self.messages
    }

    /// Draw one message. Out-of-range selector output is clamped to the last entry.
    pub fn pick(&self, selector: &mut dyn MessageSelector) -> &CatalogMessage {
        let last = self.messages.len() - 1;
        let index = selector.select(self.messages.len()).min(last);
        &self.messages[index]
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            messages: DEFAULT_MESSAGES
                .iter()
                .map(|(title, body)| CatalogMessage::new(*title, *body))
                .collect(),
        }
    }
}

/// Chooses an index in `0..len`.
pub trait MessageSelector: Send {
    fn select(&mut self, len: usize) -> usize;
}

/// Uniform random selection backed by any [`Rng`].
#[derive(Debug, Clone)]
pub struct RandomSelector<R = StdRng> {
    rng: R,
}

impl RandomSelector<StdRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic selector, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomSelector<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> MessageSelector for RandomSelector<R> {
    fn select(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

/// Always selects the same index.
#[derive(Debug, Clone, Copy)]
pub struct FixedSelector(pub usize);

impl MessageSelector for FixedSelector {
    fn select(&mut self, _len: usize) -> usize {
        self.0
    }
}
