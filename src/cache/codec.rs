//! Codec Module
//!
//! Serialization helpers shared by the durable backends: compressed
//! entry files, key digests and remote-store keys.

use std::io::{Read, Write};

use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::cache::CacheEntry;
use crate::error::Result;

/// Extension of cache entry files.
pub const CACHE_FILE_EXTENSION: &str = "cache";

// == Entry Files ==
/// Serializes `(value, expires_at)` and compresses it with zlib.
pub fn encode_entry<V: Serialize>(entry: &CacheEntry<&V>) -> Result<Vec<u8>> {
    let raw = encode_to_vec(entry, standard())?;

    let mut encoder = ZlibEncoder::new(Vec::with_capacity(raw.len() / 2), Compression::default());
    encoder.write_all(&raw)?;
    Ok(encoder.finish()?)
}

/// Inverse of [`encode_entry`].
pub fn decode_entry<V: DeserializeOwned>(bytes: &[u8]) -> Result<CacheEntry<V>> {
    let mut raw = Vec::new();
    ZlibDecoder::new(bytes).read_to_end(&mut raw)?;

    let (entry, _) = decode_from_slice(&raw, standard())?;
    Ok(entry)
}

// == Key Digest ==
/// Hex digest of the key's UTF-8 bytes, used as the entry file stem.
///
/// Distinct keys sharing a digest share a file; the later write wins.
pub fn key_digest(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

// == Remote Keys ==
/// Builds `"<namespace>:<serialized-key>"`.
pub fn remote_key(namespace: &str, key: &str) -> Result<String> {
    Ok(format!("{}:{}", namespace, serde_json::to_string(key)?))
}

/// Serializes a value for the remote store.
pub fn encode_value<V: Serialize>(value: &V) -> Result<Vec<u8>> {
    Ok(encode_to_vec(value, standard())?)
}

/// Inverse of [`encode_value`].
pub fn decode_value<V: DeserializeOwned>(bytes: &[u8]) -> Result<V> {
    let (value, _) = decode_from_slice(bytes, standard())?;
    Ok(value)
}
