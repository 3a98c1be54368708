//! Response Bank
//!
//! The fixed, locally stored collection of canned reply texts used for
//! click-triggered replies. The bank is loaded once at startup - from a JSON
//! asset or the built-in default - and is immutable for the process lifetime.
//!
//! # Asset Format
//!
//! ```json
//! [
//!     { "text": "Hey! Watch the paint." },
//!     { "text": "I'm not a button." }
//! ]
//! ```

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Built-in canned replies for clicks on the companion
///
/// Used when the embedding layer ships no bank asset of its own.
const BUILTIN_RESPONSES: &[&str] = &[
    "Hey! Watch the paint.",
    "Ow.",
    "Do you mind?",
    "I'm not a button.",
    "Careful, I dent easily.",
    "Still here. Unfortunately.",
    "That tickles. Stop it.",
    "Poking me won't fix your ticket.",
];

/// Errors that can occur when loading a response bank
#[derive(Debug, Error)]
pub enum BankError {
    /// Failed to read the asset file
    #[error("failed to read response bank at {path}: {source}")]
    Io {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse the asset document
    #[error("failed to parse response bank: {0}")]
    Parse(#[from] serde_json::Error),

    /// The asset parsed but contained no entries
    ///
    /// An empty bank would make uniform selection impossible, so loading
    /// refuses it up front instead of failing on the first click.
    #[error("response bank contains no entries")]
    Empty,
}

/// A single canned reply
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BankEntry {
    /// The reply text
    pub text: String,
}

/// The immutable collection of canned replies
#[derive(Clone, Debug)]
pub struct ResponseBank {
    entries: Vec<BankEntry>,
}

impl ResponseBank {
    /// Build a bank from reply texts
    pub fn from_entries<I, S>(texts: I) -> Result<Self, BankError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<BankEntry> = texts
            .into_iter()
            .map(|text| BankEntry { text: text.into() })
            .collect();
        if entries.is_empty() {
            return Err(BankError::Empty);
        }
        Ok(Self { entries })
    }

    /// Parse a bank from its JSON document
    pub fn from_json_str(json: &str) -> Result<Self, BankError> {
        let entries: Vec<BankEntry> = serde_json::from_str(json)?;
        if entries.is_empty() {
            return Err(BankError::Empty);
        }
        Ok(Self { entries })
    }

    /// Load a bank from a JSON asset file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bank = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), entries = bank.len(), "loaded response bank");
        Ok(bank)
    }

    /// The built-in default bank
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_RESPONSES
                .iter()
                .map(|text| BankEntry {
                    text: (*text).to_string(),
                })
                .collect(),
        }
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bank is empty (never true after construction)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry text at `index`, if in range
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| entry.text.as_str())
    }

    /// Whether `text` is one of the bank's entries
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|entry| entry.text == text)
    }

    /// Uniformly select one entry with the given randomness source
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        let index = rng.gen_range(0..self.entries.len());
        &self.entries[index].text
    }
}

impl Default for ResponseBank {
    fn default() -> Self {
        Self::builtin()
    }
}
