//! Static file transfer over `rtc_inner_req`.
//!
//! Files travel as base64 text. Downloads arrive in `info.file` chunks that the
//! channel reassembles before resolving the request. Uploads are sliced here
//! and pushed without waiting for acknowledgements, pausing every few chunks
//! so the robot keeps up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use serde_json::{json, Value};
use uuid::Uuid;

use go2link_core::error::{Go2Error, Result};
use go2link_core::{Message, MessageKind};

use crate::channel::Channel;

pub const FILE_DOWNLOAD_REQ_TYPE: &str = "request_static_file";
pub const FILE_UPLOAD_REQ_TYPE: &str = "push_static_file";
const RELATED_BUSINESS: &str = "uslam_final_pcd";

/// Shared cancellation switch for an upload in progress.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Completed { chunks: usize },
    /// Stopped at a chunk boundary; `sent` chunks went out.
    Canceled { sent: usize },
}

impl Channel {
    /// Fetch a file from the robot.
    pub async fn download_file(&self, file_path: &str) -> Result<Bytes> {
        let data = json!({
            "req_type": FILE_DOWNLOAD_REQ_TYPE,
            "req_uuid": format!("req_{}", Uuid::new_v4()),
            "related_bussiness": RELATED_BUSINESS,
            "file_md5": "null",
            "file_path": file_path,
        });
        let res = self.publish("", Some(data), MessageKind::RtcInnerReq).await?;

        let text = res
            .info_at(&["file", "data"])
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Go2Error::Decode(format!("no file data for {file_path}")))?;
        let bytes = STANDARD
            .decode(text)
            .map_err(|e| Go2Error::Decode(format!("file base64: {e}")))?;

        tracing::info!(file_path, len = bytes.len(), "file downloaded");
        Ok(Bytes::from(bytes))
    }

    /// Push `data` to `file_path` on the robot. `progress` receives the
    /// percentage of chunks sent after each chunk.
    pub async fn upload_file<F>(
        &self,
        data: &[u8],
        file_path: &str,
        cancel: &CancelFlag,
        mut progress: F,
    ) -> Result<UploadOutcome>
    where
        F: FnMut(u8),
    {
        self.require_validated()?;

        let files = &self.config().files;
        let encoded = STANDARD.encode(data);
        let chunk_size = files.upload_chunk_size;
        let total = encoded.len().div_ceil(chunk_size);
        let pause = Duration::from_millis(files.upload_pause_ms);
        tracing::debug!(file_path, b64_len = encoded.len(), chunks = total, "upload started");

        for (i, start) in (0..encoded.len()).step_by(chunk_size).enumerate() {
            if i % files.upload_pause_every == 0 {
                tokio::time::sleep(pause).await;
            }
            if cancel.is_canceled() {
                tracing::debug!(file_path, sent = i, "upload canceled");
                return Ok(UploadOutcome::Canceled { sent: i });
            }

            let end = (start + chunk_size).min(encoded.len());
            let chunk = encoded
                .get(start..end)
                .ok_or_else(|| Go2Error::Codec("upload chunk boundary".into()))?;
            let body = json!({
                "req_type": FILE_UPLOAD_REQ_TYPE,
                "req_uuid": format!("upload_req_{}", Uuid::new_v4()),
                "related_bussiness": RELATED_BUSINESS,
                "file_md5": "null",
                "file_path": file_path,
                "file_size_after_b64": encoded.len(),
                "file": {
                    "chunk_index": i + 1,
                    "total_chunk_num": total,
                    "chunk_data": chunk,
                    "chunk_data_size": chunk.len(),
                },
            });
            self.send_waiting(&Message::new(MessageKind::RtcInnerReq, "").with_data(body))
                .await?;

            progress(((i + 1) * 100 / total) as u8);
        }

        tracing::info!(file_path, chunks = total, "file uploaded");
        Ok(UploadOutcome::Completed { chunks: total })
    }
}
