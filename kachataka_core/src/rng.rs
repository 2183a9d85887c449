use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

// Provably-fair derivation
// server_seed (secret key) + round_id[:purpose] -> HMAC-SHA256 -> hex -> float / int draws

pub type HmacSha256 = Hmac<Sha256>;

/// Hex characters consumed when a digest is turned into a float or LCG seed.
pub const FLOAT_HEX_CHARS: usize = 13;
/// Hex characters consumed when a digest is turned into a dice or reel draw.
pub const INT_HEX_CHARS: usize = 8;
/// Decimal digits kept by [`hex_to_float`].
pub const DEFAULT_PRECISION: u32 = 12;

pub fn sha256_hex(message: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(message);
    hex::encode(hasher.finalize())
}

pub fn hmac_sha256_hex(key: &[u8], message: &[u8]) -> String {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC key of any length");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Parses the leading `chars` hex digits of a digest as an unsigned integer.
///
/// Digests produced by this module are always 64 lowercase hex characters,
/// so the only way to get `None` is to hand in foreign input.
pub fn leading_int(hex: &str, chars: usize) -> Option<u64> {
    debug_assert!(chars <= 16);
    let prefix = hex.get(..chars)?;
    u64::from_str_radix(prefix, 16).ok()
}

/// Maps a digest to a float in `[0, 1)`.
///
/// The leading 13 hex characters are reduced modulo `10^precision` and
/// divided by the same power of ten, so the result can never reach 1.
pub fn hex_to_float(hex: &str, precision: u32) -> Option<f64> {
    let value = leading_int(hex, FLOAT_HEX_CHARS)?;
    let scale = 10u64.pow(precision);
    Some((value % scale) as f64 / scale as f64)
}

/// HMAC source for a single `(seed, round)` pair.
///
/// Every draw for a round goes through [`RoundRng::digest`] with a purpose
/// tag, so games sharing a seed never reuse an HMAC message.
#[derive(Debug, Clone, Copy)]
pub struct RoundRng<'a> {
    server_seed: &'a str,
    round_id: &'a str,
}

impl<'a> RoundRng<'a> {
    pub fn new(server_seed: &'a str, round_id: &'a str) -> Self {
        Self {
            server_seed,
            round_id,
        }
    }

    /// HMAC over the bare round id, or `round_id:purpose` when tagged.
    pub fn digest(&self, purpose: Option<&str>) -> String {
        let message = match purpose {
            Some(tag) => format!("{}:{}", self.round_id, tag),
            None => self.round_id.to_string(),
        };
        hmac_sha256_hex(self.server_seed.as_bytes(), message.as_bytes())
    }

    pub fn float(&self, purpose: Option<&str>) -> f64 {
        let digest = self.digest(purpose);
        hex_to_float(&digest, DEFAULT_PRECISION).expect("64 hex char digest")
    }

    pub fn int(&self, purpose: Option<&str>, chars: usize) -> u64 {
        let digest = self.digest(purpose);
        leading_int(&digest, chars).expect("64 hex char digest")
    }
}

/// Linear congruential generator driving the mines shuffle.
///
/// Arithmetic stays exact in integers: the state is reduced modulo the
/// period before the first multiply so large digest seeds cannot overflow.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub const MULTIPLIER: u64 = 9301;
    pub const INCREMENT: u64 = 49297;
    pub const MODULUS: u64 = 233280;

    pub fn new(seed: u64) -> Self {
        Self {
            state: seed % Self::MODULUS,
        }
    }

    pub fn next_float(&mut self) -> f64 {
        self.state = (self.state * Self::MULTIPLIER + Self::INCREMENT) % Self::MODULUS;
        self.state as f64 / Self::MODULUS as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hmac_rfc4231_case_2() {
        assert_eq!(
            hmac_sha256_hex(b"Jefe", b"what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_determinism() {
        let seed = "00".repeat(32);
        let rng1 = RoundRng::new(&seed, "1");
        let rng2 = RoundRng::new(&seed, "1");
        assert_eq!(rng1.digest(None), rng2.digest(None));
        assert_eq!(rng1.float(Some("dice")), rng2.float(Some("dice")));
        assert_ne!(rng1.digest(None), rng1.digest(Some("dice")));
    }

    #[test]
    fn test_hex_to_float_bounds() {
        assert_eq!(hex_to_float(&"0".repeat(64), 12), Some(0.0));
        let max = hex_to_float(&"f".repeat(64), 12).unwrap();
        assert!(max < 1.0);
        assert_eq!(hex_to_float("abc", 12), None);
    }

    #[test]
    fn test_hex_to_float_reference() {
        let digest = "847926d893201d5dcf22773ac16c0d39d3c95caec0faebaab850df7a6ddd7b17";
        assert_eq!(hex_to_float(digest, 12), Some(0.494042190337));
    }

    #[test]
    fn test_lcg_sequence() {
        let mut lcg = Lcg::new(0);
        assert_eq!(lcg.next_float(), 49297.0 / 233280.0);
        let mut wrapped = Lcg::new(Lcg::MODULUS + 7);
        let mut plain = Lcg::new(7);
        for _ in 0..10 {
            assert_eq!(wrapped.next_float(), plain.next_float());
        }
    }
}
