use crate::Generator;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use shortly_core::identifier::{ALPHABET, RANDOM_LEN, SUFFIX_LEN};
use shortly_core::Identifier;

/// A semi-random, semi-deterministic identifier generator.
///
/// Each identifier is [`RANDOM_LEN`] characters drawn uniformly from
/// [`ALPHABET`] followed by the [`SUFFIX_LEN`] character [`url_suffix`] of
/// the url. Saving the same url twice yields the same suffix under
/// different random prefixes.
///
/// The random source is owned by the generator and guarded by a mutex, so a
/// single instance can be shared across tasks.
#[derive(Debug)]
pub struct UrlIdGenerator<R = StdRng> {
    rng: Mutex<R>,
}

impl UrlIdGenerator<StdRng> {
    /// Creates a generator seeded from the operating system.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Creates a generator with a fixed seed, producing a reproducible
    /// sequence of random prefixes.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for UrlIdGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> UrlIdGenerator<R> {
    /// Creates a generator drawing from the given random source.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn random_part(&self) -> String {
        let mut rng = self.rng.lock();
        (0..RANDOM_LEN)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl<R: RngCore + Send + 'static> Generator for UrlIdGenerator<R> {
    fn generate(&self, url: &str) -> Identifier {
        let mut id = self.random_part();
        id.push_str(&url_suffix(url));
        Identifier::new_unchecked(id)
    }
}

/// Derives the deterministic suffix of an identifier from a url.
///
/// The url bytes are base64 encoded without padding, characters outside
/// [`ALPHABET`] (`+` and `/`) are dropped, and the trailing [`SUFFIX_LEN`]
/// characters are kept. Shorter encodings are left-padded with `0`.
pub fn url_suffix(url: &str) -> String {
    let encoded = STANDARD_NO_PAD.encode(url.as_bytes());
    let kept: Vec<u8> = encoded
        .bytes()
        .filter(u8::is_ascii_alphanumeric)
        .collect();
    let tail = &kept[kept.len().saturating_sub(SUFFIX_LEN)..];

    let mut suffix = String::with_capacity(SUFFIX_LEN);
    suffix.extend(std::iter::repeat('0').take(SUFFIX_LEN - tail.len()));
    suffix.extend(tail.iter().map(|&b| b as char));
    suffix
}
