use std::time::Duration;

use serde::Deserialize;

use go2link_core::chunk::ChunkLimits;
use go2link_core::error::{Go2Error, Result};
use go2link_core::handshake::ResponseEncoding;
use go2link_core::netstatus::ConnectionMethod;
use go2link_core::voxel::SLICE_BYTES;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    pub version: u32,

    #[serde(default)]
    pub channel: ChannelSection,

    #[serde(default)]
    pub chunks: ChunkSection,

    #[serde(default)]
    pub files: FileSection,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            version: 1,
            channel: ChannelSection::default(),
            chunks: ChunkSection::default(),
            files: FileSection::default(),
        }
    }
}

impl ChannelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(Go2Error::UnsupportedVersion);
        }

        self.channel.validate()?;
        self.chunks.validate()?;
        self.files.validate()?;

        Ok(())
    }

    pub fn chunk_limits(&self) -> ChunkLimits {
        ChunkLimits {
            max_assemblies: self.chunks.max_assemblies,
            max_chunks: self.chunks.max_chunks,
            max_assembly_bytes: self.chunks.max_assembly_bytes,
            ttl: Duration::from_millis(self.chunks.assembly_ttl_ms),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelSection {
    #[serde(default)]
    pub connection_method: ConnectionMethod,

    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,

    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,

    #[serde(default = "default_network_poll_ms")]
    pub network_poll_ms: u64,

    #[serde(default = "default_network_retry_ms")]
    pub network_retry_ms: u64,

    #[serde(default = "default_network_response_timeout_ms")]
    pub network_response_timeout_ms: u64,

    /// How the validation answer is encoded (`digest` or `hex_text`).
    #[serde(default)]
    pub validation_encoding: ResponseEncoding,

    /// Largest decompressed voxel grid accepted from a LiDAR frame.
    #[serde(default = "default_max_voxel_bytes")]
    pub max_voxel_bytes: usize,
}

impl Default for ChannelSection {
    fn default() -> Self {
        Self {
            connection_method: ConnectionMethod::default(),
            outbound_queue: default_outbound_queue(),
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            network_poll_ms: default_network_poll_ms(),
            network_retry_ms: default_network_retry_ms(),
            network_response_timeout_ms: default_network_response_timeout_ms(),
            validation_encoding: ResponseEncoding::default(),
            max_voxel_bytes: default_max_voxel_bytes(),
        }
    }
}

impl ChannelSection {
    pub fn validate(&self) -> Result<()> {
        if !(16..=65536).contains(&self.outbound_queue) {
            return Err(Go2Error::Config(
                "channel.outbound_queue must be between 16 and 65536".into(),
            ));
        }
        if !(500..=60000).contains(&self.heartbeat_interval_ms) {
            return Err(Go2Error::Config(
                "channel.heartbeat_interval_ms must be between 500 and 60000".into(),
            ));
        }
        if !(100..=60000).contains(&self.network_poll_ms) {
            return Err(Go2Error::Config(
                "channel.network_poll_ms must be between 100 and 60000".into(),
            ));
        }
        if self.network_retry_ms < 100 || self.network_retry_ms > self.network_poll_ms {
            return Err(Go2Error::Config(
                "channel.network_retry_ms must be between 100 and network_poll_ms".into(),
            ));
        }
        if self.network_response_timeout_ms == 0 {
            return Err(Go2Error::Config(
                "channel.network_response_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.max_voxel_bytes < SLICE_BYTES {
            return Err(Go2Error::Config(format!(
                "channel.max_voxel_bytes must be at least {SLICE_BYTES}"
            )));
        }
        Ok(())
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    pub fn network_poll(&self) -> Duration {
        Duration::from_millis(self.network_poll_ms)
    }

    pub fn network_retry(&self) -> Duration {
        Duration::from_millis(self.network_retry_ms)
    }

    pub fn network_response_timeout(&self) -> Duration {
        Duration::from_millis(self.network_response_timeout_ms)
    }
}

fn default_outbound_queue() -> usize {
    1024
}
fn default_heartbeat_interval_ms() -> u64 {
    2000
}
fn default_network_poll_ms() -> u64 {
    1000
}
fn default_network_retry_ms() -> u64 {
    500
}
fn default_network_response_timeout_ms() -> u64 {
    5000
}
fn default_max_voxel_bytes() -> usize {
    8 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChunkSection {
    #[serde(default = "default_max_assemblies")]
    pub max_assemblies: usize,

    #[serde(default = "default_max_chunks")]
    pub max_chunks: u32,

    #[serde(default = "default_max_assembly_bytes")]
    pub max_assembly_bytes: usize,

    #[serde(default = "default_assembly_ttl_ms")]
    pub assembly_ttl_ms: u64,
}

impl Default for ChunkSection {
    fn default() -> Self {
        Self {
            max_assemblies: default_max_assemblies(),
            max_chunks: default_max_chunks(),
            max_assembly_bytes: default_max_assembly_bytes(),
            assembly_ttl_ms: default_assembly_ttl_ms(),
        }
    }
}

impl ChunkSection {
    pub fn validate(&self) -> Result<()> {
        if self.max_assemblies == 0 || self.max_chunks == 0 || self.max_assembly_bytes == 0 {
            return Err(Go2Error::Config(
                "chunks.max_assemblies, max_chunks and max_assembly_bytes must be at least 1".into(),
            ));
        }
        if self.assembly_ttl_ms < 1000 {
            return Err(Go2Error::Config(
                "chunks.assembly_ttl_ms must be at least 1000".into(),
            ));
        }
        Ok(())
    }
}

fn default_max_assemblies() -> usize {
    64
}
fn default_max_chunks() -> u32 {
    4096
}
fn default_max_assembly_bytes() -> usize {
    64 * 1024 * 1024
}
fn default_assembly_ttl_ms() -> u64 {
    30000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSection {
    /// Bytes of base64 text per upload chunk.
    #[serde(default = "default_upload_chunk_size")]
    pub upload_chunk_size: usize,

    #[serde(default = "default_upload_pause_every")]
    pub upload_pause_every: usize,

    #[serde(default = "default_upload_pause_ms")]
    pub upload_pause_ms: u64,
}

impl Default for FileSection {
    fn default() -> Self {
        Self {
            upload_chunk_size: default_upload_chunk_size(),
            upload_pause_every: default_upload_pause_every(),
            upload_pause_ms: default_upload_pause_ms(),
        }
    }
}

impl FileSection {
    pub fn validate(&self) -> Result<()> {
        if self.upload_chunk_size == 0 {
            return Err(Go2Error::Config("files.upload_chunk_size must be greater than zero".into()));
        }
        if self.upload_pause_every == 0 {
            return Err(Go2Error::Config("files.upload_pause_every must be greater than zero".into()));
        }
        Ok(())
    }
}

fn default_upload_chunk_size() -> usize {
    60 * 1024
}
fn default_upload_pause_every() -> usize {
    5
}
fn default_upload_pause_ms() -> u64 {
    500
}
