//! Message digests and HMAC.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use sha3::{Sha3_256, Sha3_512};

use crate::CodecError;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    #[serde(rename = "sha3-256")]
    Sha3_256,
    #[serde(rename = "sha3-512")]
    Sha3_512,
}

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 8] = [
        DigestAlgorithm::Md5,
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha224,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
        DigestAlgorithm::Sha3_256,
        DigestAlgorithm::Sha3_512,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha224 => "sha224",
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha384 => "sha384",
            DigestAlgorithm::Sha512 => "sha512",
            DigestAlgorithm::Sha3_256 => "sha3-256",
            DigestAlgorithm::Sha3_512 => "sha3-512",
        }
    }

    /// Digest size in bytes.
    pub fn output_len(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 16,
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha224 => 28,
            DigestAlgorithm::Sha256 | DigestAlgorithm::Sha3_256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 | DigestAlgorithm::Sha3_512 => 64,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect();
        match normalized.as_str() {
            "md5" => Ok(DigestAlgorithm::Md5),
            "sha1" => Ok(DigestAlgorithm::Sha1),
            "sha224" => Ok(DigestAlgorithm::Sha224),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            "sha384" => Ok(DigestAlgorithm::Sha384),
            "sha512" => Ok(DigestAlgorithm::Sha512),
            "sha3256" => Ok(DigestAlgorithm::Sha3_256),
            "sha3512" => Ok(DigestAlgorithm::Sha3_512),
            _ => Err(CodecError::Unknown {
                kind: "digest algorithm",
                name: s.to_string(),
            }),
        }
    }
}

/// Lower-case hex digest of `data`.
pub fn digest(algorithm: DigestAlgorithm, data: &[u8]) -> String {
    let mut hasher = StreamingDigest::new(algorithm);
    hasher.update(data);
    hasher.finalize()
}

/// Digests of `data` under every algorithm, keyed by algorithm name.
pub fn digest_all(data: &[u8]) -> BTreeMap<String, String> {
    DigestAlgorithm::ALL
        .iter()
        .map(|a| (a.as_str().to_string(), digest(*a, data)))
        .collect()
}

/// Lower-case hex HMAC of `data` keyed with `key`.
pub fn hmac(algorithm: DigestAlgorithm, key: &[u8], data: &[u8]) -> Result<String, CodecError> {
    match algorithm {
        DigestAlgorithm::Md5 => mac_hex::<Hmac<Md5>>(key, data),
        DigestAlgorithm::Sha1 => mac_hex::<Hmac<Sha1>>(key, data),
        DigestAlgorithm::Sha224 => mac_hex::<Hmac<Sha224>>(key, data),
        DigestAlgorithm::Sha256 => mac_hex::<Hmac<Sha256>>(key, data),
        DigestAlgorithm::Sha384 => mac_hex::<Hmac<Sha384>>(key, data),
        DigestAlgorithm::Sha512 => mac_hex::<Hmac<Sha512>>(key, data),
        DigestAlgorithm::Sha3_256 => mac_hex::<Hmac<Sha3_256>>(key, data),
        DigestAlgorithm::Sha3_512 => mac_hex::<Hmac<Sha3_512>>(key, data),
    }
}

fn mac_hex<M>(key: &[u8], data: &[u8]) -> Result<String, CodecError>
where
    M: Mac + KeyInit,
{
    let mut mac = <M as KeyInit>::new_from_slice(key)
        .map_err(|e| CodecError::InvalidKey(e.to_string()))?;
    mac.update(data);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

enum HasherState {
    Md5(Md5),
    Sha1(Sha1),
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    Sha3_256(Sha3_256),
    Sha3_512(Sha3_512),
}

/// Incremental digest for inputs that arrive in chunks (files, streams).
pub struct StreamingDigest {
    algorithm: DigestAlgorithm,
    state: HasherState,
    bytes: u64,
}

impl StreamingDigest {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        let state = match algorithm {
            DigestAlgorithm::Md5 => HasherState::Md5(Md5::new()),
            DigestAlgorithm::Sha1 => HasherState::Sha1(Sha1::new()),
            DigestAlgorithm::Sha224 => HasherState::Sha224(Sha224::new()),
            DigestAlgorithm::Sha256 => HasherState::Sha256(Sha256::new()),
            DigestAlgorithm::Sha384 => HasherState::Sha384(Sha384::new()),
            DigestAlgorithm::Sha512 => HasherState::Sha512(Sha512::new()),
            DigestAlgorithm::Sha3_256 => HasherState::Sha3_256(Sha3_256::new()),
            DigestAlgorithm::Sha3_512 => HasherState::Sha3_512(Sha3_512::new()),
        };
        Self {
            algorithm,
            state,
            bytes: 0,
        }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Total bytes fed so far.
    pub fn bytes_processed(&self) -> u64 {
        self.bytes
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.bytes += chunk.len() as u64;
        match &mut self.state {
            HasherState::Md5(h) => Digest::update(h, chunk),
            HasherState::Sha1(h) => Digest::update(h, chunk),
            HasherState::Sha224(h) => Digest::update(h, chunk),
            HasherState::Sha256(h) => Digest::update(h, chunk),
            HasherState::Sha384(h) => Digest::update(h, chunk),
            HasherState::Sha512(h) => Digest::update(h, chunk),
            HasherState::Sha3_256(h) => Digest::update(h, chunk),
            HasherState::Sha3_512(h) => Digest::update(h, chunk),
        }
    }

    /// Consumes the hasher and returns the lower-case hex digest.
    pub fn finalize(self) -> String {
        match self.state {
            HasherState::Md5(h) => hex::encode(h.finalize()),
            HasherState::Sha1(h) => hex::encode(h.finalize()),
            HasherState::Sha224(h) => hex::encode(h.finalize()),
            HasherState::Sha256(h) => hex::encode(h.finalize()),
            HasherState::Sha384(h) => hex::encode(h.finalize()),
            HasherState::Sha512(h) => hex::encode(h.finalize()),
            HasherState::Sha3_256(h) => hex::encode(h.finalize()),
            HasherState::Sha3_512(h) => hex::encode(h.finalize()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_abc_vectors() {
        let abc = b"abc";
        assert_eq!(
            digest(DigestAlgorithm::Md5, abc),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(
            digest(DigestAlgorithm::Sha1, abc),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            digest(DigestAlgorithm::Sha256, abc),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            digest(DigestAlgorithm::Sha3_256, abc),
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
        );
    }

    #[test]
    fn test_output_lengths() {
        for (name, hex_digest) in digest_all(b"devbox") {
            let algorithm: DigestAlgorithm = name.parse().unwrap();
            assert_eq!(hex_digest.len(), algorithm.output_len() * 2, "{}", name);
        }
    }

    #[test]
    fn test_streaming_matches_one_shot() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        for algorithm in DigestAlgorithm::ALL {
            let mut streaming = StreamingDigest::new(algorithm);
            for chunk in data.chunks(777) {
                streaming.update(chunk);
            }
            assert_eq!(streaming.bytes_processed(), data.len() as u64);
            assert_eq!(streaming.finalize(), digest(algorithm, &data));
        }
    }

    #[test]
    fn test_hmac_rfc4231_case_2() {
        let mac = hmac(
            DigestAlgorithm::Sha256,
            b"Jefe",
            b"what do ya want for nothing?",
        )
        .unwrap();
        assert_eq!(
            mac,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_hmac_md5_rfc2104() {
        let mac = hmac(DigestAlgorithm::Md5, b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(mac, "750c783e6ab0b503eaa86e310a5db738");
    }

    #[test]
    fn test_algorithm_names() {
        assert_eq!("SHA-256".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha256);
        assert_eq!("sha3_512".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha3_512);
        assert!("crc32".parse::<DigestAlgorithm>().is_err());
        for algorithm in DigestAlgorithm::ALL {
            assert_eq!(algorithm.as_str().parse::<DigestAlgorithm>().unwrap(), algorithm);
        }
    }
}
