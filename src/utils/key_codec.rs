//! Deterministic short key encoding.
//!
//! A short key is derived from the original URL alone, so submitting the same
//! URL always yields the same candidate keys in the same order. Collisions are
//! escaped by salting the input with the attempt number.

use sha2::{Digest, Sha256};

/// Symbols used by default, uppercase before lowercase before digits.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Symbol appended to keys shorter than the requested length.
///
/// Also the encoding of a zero hash.
pub const PAD_SYMBOL: char = '0';

/// Errors raised when building a custom [`Alphabet`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AlphabetError {
    #[error("Alphabet must contain at least 2 symbols, got {0}")]
    TooShort(usize),

    #[error("Alphabet symbols must be ASCII letters or digits, got '{0}'")]
    NonAlphanumeric(char),

    #[error("Alphabet contains duplicate symbol '{0}'")]
    Duplicate(char),

    #[error("Alphabet must contain the pad symbol '{PAD_SYMBOL}'")]
    MissingPadSymbol,
}

/// Ordered set of symbols a short key is written in.
///
/// The position of a symbol is its digit value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Builds an alphabet from a string of distinct ASCII alphanumerics.
    ///
    /// # Errors
    ///
    /// Returns [`AlphabetError`] if the alphabet is too short, contains a
    /// non-alphanumeric or duplicate symbol, or lacks [`PAD_SYMBOL`].
    pub fn new(symbols: &str) -> Result<Self, AlphabetError> {
        let mut seen = Vec::with_capacity(symbols.len());

        for symbol in symbols.chars() {
            if !symbol.is_ascii_alphanumeric() {
                return Err(AlphabetError::NonAlphanumeric(symbol));
            }
            if seen.contains(&symbol) {
                return Err(AlphabetError::Duplicate(symbol));
            }
            seen.push(symbol);
        }

        if seen.len() < 2 {
            return Err(AlphabetError::TooShort(seen.len()));
        }
        if !seen.contains(&PAD_SYMBOL) {
            return Err(AlphabetError::MissingPadSymbol);
        }

        Ok(Self { symbols: seen })
    }

    /// Number of symbols, i.e. the numeric base.
    pub fn base(&self) -> u64 {
        self.symbols.len() as u64
    }

    /// Returns true if `symbol` belongs to this alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_ALPHABET.chars().collect(),
        }
    }
}

/// Salted hash encoder producing fixed-length short keys.
#[derive(Debug, Clone, Default)]
pub struct KeyCodec {
    alphabet: Alphabet,
}

impl KeyCodec {
    /// Creates a codec over the given alphabet.
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Encodes `url` into a key of exactly `length` symbols.
    ///
    /// `attempt` 0 hashes the URL as is; later attempts append `_<attempt>`
    /// so that each retry yields a different candidate.
    pub fn encode(&self, url: &str, length: usize, attempt: u32) -> String {
        let hash = salted_hash(url, attempt).unsigned_abs();

        let mut key = self.to_base(hash);
        while key.len() < length {
            key.push(PAD_SYMBOL);
        }
        key.truncate(length);

        key
    }

    /// Writes `value` in the alphabet's base, most significant digit first.
    fn to_base(&self, mut value: u64) -> String {
        if value == 0 {
            return PAD_SYMBOL.to_string();
        }

        let base = self.alphabet.base();
        let mut digits = Vec::new();
        while value > 0 {
            digits.push(self.alphabet.symbols[(value % base) as usize]);
            value /= base;
        }

        digits.iter().rev().collect()
    }
}

/// Signed 64-bit hash of `url` with the attempt salt applied.
fn salted_hash(url: &str, attempt: u32) -> i64 {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    if attempt > 0 {
        hasher.update(format!("_{attempt}").as_bytes());
    }
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(prefix)
}
