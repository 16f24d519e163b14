//! Background freshness checks of a connected session.

use std::{sync::Weak, time::Duration};

use log::info;
use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use super::{session::SessionInner, ChainQuery, SessionStorage};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Check the session started at `epoch` every `period` until it ends.
///
/// The task only holds a weak reference, so it never keeps a dropped store alive.
pub(super) fn spawn<Q: ChainQuery, K: SessionStorage>(
    store: Weak<SessionInner<Q, K>>,
    epoch: u64,
    period: Duration,
) -> JoinHandle<()> {
    let period = period.max(MIN_PERIOD);

    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let Some(store) = store.upgrade() else {
                break;
            };
            if !store.check_for_changes(epoch).await {
                break;
            }
        }

        info!("📣 Session refresh of epoch {epoch} stopped");
    })
}
