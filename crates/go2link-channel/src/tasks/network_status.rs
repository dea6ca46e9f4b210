use std::sync::Weak;

use uuid::Uuid;

use go2link_core::netstatus::{evaluate, status_request, NetworkStatus, PollDecision};
use go2link_core::MessageKind;

use crate::channel::{Channel, Inner};
use crate::config::ChannelSection;

/// Poll the robot's uplink status until it is stable, then report the
/// normalized mode and stop.
pub(crate) async fn run(chan: Weak<Inner>, cfg: ChannelSection) {
    let mut delay = cfg.network_poll();

    loop {
        tokio::time::sleep(delay).await;
        delay = cfg.network_poll();

        let completion = {
            let Some(channel) = Channel::upgrade(&chan) else {
                return;
            };
            let uuid = Uuid::new_v4().to_string();
            channel.publish("", Some(status_request(&uuid)), MessageKind::RtcInnerReq)
        };
        let key = completion.key().cloned();

        let msg = match tokio::time::timeout(cfg.network_response_timeout(), completion).await {
            Ok(Ok(msg)) => msg,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "network status request failed");
                continue;
            }
            Err(_) => {
                tracing::warn!("network status response timed out");
                if let (Some(channel), Some(key)) = (Channel::upgrade(&chan), key) {
                    channel.cancel(&key);
                }
                continue;
            }
        };

        let status = NetworkStatus::from_info(msg.info.as_ref());
        match evaluate(&status, cfg.connection_method) {
            PollDecision::Stable(mode) => {
                if let Some(channel) = Channel::upgrade(&chan) {
                    channel.set_network_mode(mode);
                }
                return;
            }
            PollDecision::Retry => {
                tracing::debug!(?status, "robot uplink down, retrying");
                delay = cfg.network_retry();
            }
            PollDecision::Continue => {
                tracing::debug!(?status, "robot uplink not settled");
            }
        }
    }
}
