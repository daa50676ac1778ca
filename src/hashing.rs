use argon2::Argon2;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use sha3::Sha3_256;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Shortest salt Argon2 accepts, in bytes.
const ARGON2_MIN_SALT_LEN: usize = 8;
const ARGON2_OUTPUT_LEN: usize = 32;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown hash algorithm `{0}`, expected one of: sha256, sha512, sha3, blake3, argon2")]
pub struct HashAlgorithmError(String);

#[derive(Error, Debug, Clone, PartialEq)]
#[error("hashing failed: {0}")]
pub struct HashError(String);

/// One-way hash functions available to the hashing based methods.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha512,
    /// SHA3-256
    Sha3,
    Blake3,
    /// Argon2id with the default cost parameters. Slow by construction.
    Argon2,
}

impl HashAlgorithm {
    pub(crate) fn hasher(&self) -> &'static dyn Hasher {
        match self {
            HashAlgorithm::Sha256 => &Sha256Hasher,
            HashAlgorithm::Sha512 => &Sha512Hasher,
            HashAlgorithm::Sha3 => &Sha3Hasher,
            HashAlgorithm::Blake3 => &Blake3Hasher,
            HashAlgorithm::Argon2 => &Argon2Hasher,
        }
    }

    /// Minimum salt length in bytes; zero when any salt, including none, is accepted.
    pub fn min_salt_len(&self) -> usize {
        match self {
            HashAlgorithm::Argon2 => ARGON2_MIN_SALT_LEN,
            _ => 0,
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "").as_str() {
            "sha256" | "sha2" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            "sha3" | "sha3256" => Ok(HashAlgorithm::Sha3),
            "blake3" => Ok(HashAlgorithm::Blake3),
            "argon2" | "argon2id" => Ok(HashAlgorithm::Argon2),
            _ => Err(HashAlgorithmError(s.into())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Sha3 => "sha3",
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::Argon2 => "argon2",
        };
        f.write_str(name)
    }
}

/// A salted one-way hash, rendered as lowercase hex.
pub(crate) trait Hasher: Send + Sync {
    fn hash(&self, salt: &[u8], input: &str) -> Result<String, HashError>;
}

/// BLAKE3 of `salt` followed by `input`.
pub(crate) fn blake3_hex(salt: &[u8], input: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt);
    hasher.update(input.as_bytes());
    hasher.finalize().to_hex().to_string()
}

fn digest_hex<D: Digest>(salt: &[u8], input: &str) -> String {
    let mut hasher = D::new();
    hasher.update(salt);
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Blake3Hasher;

impl Hasher for Blake3Hasher {
    fn hash(&self, salt: &[u8], input: &str) -> Result<String, HashError> {
        Ok(blake3_hex(salt, input))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn hash(&self, salt: &[u8], input: &str) -> Result<String, HashError> {
        Ok(digest_hex::<Sha256>(salt, input))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Sha512Hasher;

impl Hasher for Sha512Hasher {
    fn hash(&self, salt: &[u8], input: &str) -> Result<String, HashError> {
        Ok(digest_hex::<Sha512>(salt, input))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Sha3Hasher;

impl Hasher for Sha3Hasher {
    fn hash(&self, salt: &[u8], input: &str) -> Result<String, HashError> {
        Ok(digest_hex::<Sha3_256>(salt, input))
    }
}

/// The salt is passed to Argon2 as its salt, not prepended to the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Argon2Hasher;

impl Hasher for Argon2Hasher {
    fn hash(&self, salt: &[u8], input: &str) -> Result<String, HashError> {
        let mut output = [0u8; ARGON2_OUTPUT_LEN];
        Argon2::default()
            .hash_password_into(input.as_bytes(), salt, &mut output)
            .map_err(|err| HashError(err.to_string()))?;
        Ok(hex::encode(output))
    }
}
