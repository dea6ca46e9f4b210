//! Chunked payload reassembly.
//!
//! A conforming peer sends chunks `1..=N` in order, every chunk declaring the
//! same `total_chunk_num = N`. Parts are concatenated in arrival order when
//! chunk `N` arrives. Anything else (zero total, missing index, gaps,
//! duplicates, a changed total) is a protocol violation: the partial assembly
//! is discarded and `BadChunkMetadata` returned.
//!
//! The reassembler is generic over its key so the same code backs both the
//! `content_info` scheme (responses) and the `info.file` scheme (file
//! transfer).

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};
use serde_json::Value;

use crate::error::{Go2Error, ProtocolError, Result};
use crate::protocol::message::Message;

/// Bounds on in-flight assemblies. A peer can otherwise make the client buffer
/// an arbitrary amount of data by never sending the final chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLimits {
    pub max_assemblies: usize,
    pub max_chunks: u32,
    pub max_assembly_bytes: usize,
    pub ttl: Duration,
}

impl Default for ChunkLimits {
    fn default() -> Self {
        Self {
            max_assemblies: 64,
            max_chunks: 4096,
            max_assembly_bytes: 64 * 1024 * 1024,
            ttl: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
struct Assembly {
    parts: Vec<Bytes>,
    expected_total: u32,
    bytes: usize,
    started: Instant,
}

#[derive(Debug)]
pub struct ChunkReassembler<K> {
    assemblies: HashMap<K, Assembly>,
    limits: ChunkLimits,
}

impl<K> ChunkReassembler<K>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    pub fn new(limits: ChunkLimits) -> Self {
        Self {
            assemblies: HashMap::new(),
            limits,
        }
    }

    pub fn limits(&self) -> &ChunkLimits {
        &self.limits
    }

    /// Feed one chunk. Returns the full payload exactly once, on the final chunk.
    pub fn feed(
        &mut self,
        key: K,
        chunk_index: Option<u32>,
        total_chunk_num: u32,
        bytes: Bytes,
    ) -> Result<Option<Bytes>> {
        self.feed_at(Instant::now(), key, chunk_index, total_chunk_num, bytes)
    }

    /// [`feed`](Self::feed) with an explicit clock, for TTL handling.
    pub fn feed_at(
        &mut self,
        now: Instant,
        key: K,
        chunk_index: Option<u32>,
        total_chunk_num: u32,
        bytes: Bytes,
    ) -> Result<Option<Bytes>> {
        self.evict_expired(now);

        if total_chunk_num == 0 {
            self.assemblies.remove(&key);
            return Err(Go2Error::bad_chunk("total_chunk_num must be greater than zero"));
        }
        let Some(index) = chunk_index else {
            self.assemblies.remove(&key);
            return Err(Go2Error::bad_chunk("chunk_index is missing"));
        };
        if total_chunk_num > self.limits.max_chunks {
            self.assemblies.remove(&key);
            return Err(limit(format!(
                "total_chunk_num {total_chunk_num} exceeds {}",
                self.limits.max_chunks
            )));
        }

        let Some(asm) = self.assemblies.get_mut(&key) else {
            if index != 1 {
                return Err(Go2Error::bad_chunk(format!(
                    "first chunk has index {index}, expected 1"
                )));
            }
            if total_chunk_num == 1 {
                return Ok(Some(bytes));
            }
            if bytes.len() > self.limits.max_assembly_bytes {
                return Err(limit(format!("chunk of {} bytes", bytes.len())));
            }
            if self.assemblies.len() >= self.limits.max_assemblies {
                return Err(limit(format!(
                    "{} assemblies already in flight",
                    self.assemblies.len()
                )));
            }
            self.assemblies.insert(
                key,
                Assembly {
                    bytes: bytes.len(),
                    parts: vec![bytes],
                    expected_total: total_chunk_num,
                    started: now,
                },
            );
            return Ok(None);
        };

        if asm.expected_total != total_chunk_num {
            let was = asm.expected_total;
            self.assemblies.remove(&key);
            return Err(Go2Error::bad_chunk(format!(
                "total_chunk_num changed from {was} to {total_chunk_num}"
            )));
        }

        let expected = asm.parts.len() as u32 + 1;
        if index != expected {
            self.assemblies.remove(&key);
            return Err(Go2Error::bad_chunk(format!(
                "chunk index {index}, expected {expected}"
            )));
        }

        asm.bytes += bytes.len();
        if asm.bytes > self.limits.max_assembly_bytes {
            self.assemblies.remove(&key);
            return Err(limit(format!(
                "assembly exceeds {} bytes",
                self.limits.max_assembly_bytes
            )));
        }
        asm.parts.push(bytes);

        if index < total_chunk_num {
            return Ok(None);
        }

        let Some(done) = self.assemblies.remove(&key) else {
            return Ok(None);
        };
        let mut out = BytesMut::with_capacity(done.bytes);
        for part in &done.parts {
            out.extend_from_slice(part);
        }
        Ok(Some(out.freeze()))
    }

    /// Drop assemblies older than the TTL. Returns how many were evicted.
    pub fn evict_expired(&mut self, now: Instant) -> usize {
        let ttl = self.limits.ttl;
        let before = self.assemblies.len();
        self.assemblies.retain(|key, asm| {
            let keep = now.saturating_duration_since(asm.started) < ttl;
            if !keep {
                tracing::warn!(?key, parts = asm.parts.len(), "chunk assembly expired");
            }
            keep
        });
        before - self.assemblies.len()
    }

    pub fn discard(&mut self, key: &K) -> bool {
        self.assemblies.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.assemblies.clear();
    }

    pub fn len(&self) -> usize {
        self.assemblies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assemblies.is_empty()
    }
}

fn limit(msg: String) -> Go2Error {
    Go2Error::Protocol(ProtocolError::ChunkLimitExceeded(msg))
}

/// Chunk marker found in a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkInfo {
    pub chunk_index: Option<u32>,
    /// Missing totals read as zero, which the reassembler rejects.
    pub total_chunk_num: u32,
}

impl ChunkInfo {
    /// `data.content_info`, when chunking is enabled.
    pub fn from_content_info(msg: &Message) -> Option<Self> {
        Self::parse(msg.data_at(&["content_info"])?)
    }

    /// `info.file`, when chunking is enabled (file transfer).
    pub fn from_file_info(msg: &Message) -> Option<Self> {
        Self::parse(msg.info_at(&["file"])?)
    }

    fn parse(v: &Value) -> Option<Self> {
        if !v.get("enable_chunking").and_then(Value::as_bool).unwrap_or(false) {
            return None;
        }
        let num = |field: &str| {
            v.get(field)
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
        };
        Some(Self {
            chunk_index: num("chunk_index"),
            total_chunk_num: num("total_chunk_num").unwrap_or(0),
        })
    }
}

/// Bytes of one chunk body: strings as UTF-8, byte arrays as-is, anything else
/// as its JSON text.
pub fn value_bytes(v: Option<&Value>) -> Bytes {
    match v {
        None | Some(Value::Null) => Bytes::new(),
        Some(Value::String(s)) => Bytes::copy_from_slice(s.as_bytes()),
        Some(Value::Array(items)) => {
            let bytes: Option<Vec<u8>> = items
                .iter()
                .map(|i| i.as_u64().and_then(|n| u8::try_from(n).ok()))
                .collect();
            match bytes {
                Some(b) => Bytes::from(b),
                None => Bytes::from(Value::Array(items.clone()).to_string()),
            }
        }
        Some(other) => Bytes::from(other.to_string()),
    }
}

/// Inverse of [`value_bytes`] for a reassembled body: UTF-8 text becomes a
/// string, anything else a byte array.
pub fn bytes_value(b: &[u8]) -> Value {
    match std::str::from_utf8(b) {
        Ok(s) => Value::String(s.to_owned()),
        Err(_) => Value::Array(b.iter().map(|&x| Value::from(x)).collect()),
    }
}
