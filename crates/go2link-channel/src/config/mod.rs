//! Channel config loader (strict parsing).

pub mod schema;

use std::fs;

use go2link_core::error::{Go2Error, Result};

pub use schema::{ChannelConfig, ChannelSection, ChunkSection, FileSection};

pub fn load_from_file(path: &str) -> Result<ChannelConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| Go2Error::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ChannelConfig> {
    let cfg: ChannelConfig = serde_yaml::from_str(s)
        .map_err(|e| Go2Error::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
