use std::sync::Weak;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::channel::{Channel, Inner};

/// Send a heartbeat every `every` while the channel lives. A failed send does
/// not stop the schedule.
pub(crate) async fn run(chan: Weak<Inner>, every: Duration) {
    let mut tick = interval_at(Instant::now() + every, every);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tick.tick().await;
        let Some(channel) = Channel::upgrade(&chan) else {
            break;
        };
        if let Err(e) = channel.send_heartbeat() {
            tracing::debug!(error = %e, "heartbeat not sent");
        }
    }
}
