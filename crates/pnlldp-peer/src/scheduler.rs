use std::time::Duration;

/// Transmit timer state of one device, kept in 10 ms ticks.
///
/// Also holds the device-wide count of transmitted frames so both are
/// updated under the same lock.
#[derive(Debug, Clone)]
pub struct TxSchedule {
    interval_10ms: u32,
    next_due_10ms: Option<u32>,
    sent: u64,
}

impl TxSchedule {
    pub fn new(interval: Duration) -> Self {
        let ticks = (interval.as_millis() / 10).clamp(1, u128::from(u32::MAX >> 1));
        Self {
            interval_10ms: ticks as u32,
            next_due_10ms: None,
            sent: 0,
        }
    }

    /// Arm the timer one interval after `now_10ms`.
    pub fn restart(&mut self, now_10ms: u32) {
        self.next_due_10ms = Some(now_10ms.wrapping_add(self.interval_10ms));
    }

    /// True when the timer is armed and its deadline has passed.
    pub fn is_due(&self, now_10ms: u32) -> bool {
        match self.next_due_10ms {
            // Signed distance keeps working across counter wrap.
            Some(due) => now_10ms.wrapping_sub(due) as i32 >= 0,
            None => false,
        }
    }

    pub fn next_due_10ms(&self) -> Option<u32> {
        self.next_due_10ms
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.interval_10ms) * 10)
    }

    /// Count one transmitted frame and return the new total.
    pub fn record_sent(&mut self) -> u64 {
        self.sent += 1;
        self.sent
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}

#[cfg(feature = "async")]
mod task {
    use std::sync::Arc;

    use tokio::sync::Notify;
    use tokio::task::JoinHandle;
    use tracing::{debug, trace};

    use crate::agent::LldpAgent;

    /// Drives an agent's transmit timer on a tokio runtime.
    ///
    /// The task sends on every port once per interval. It stops when the
    /// handle is dropped.
    #[derive(Debug)]
    pub struct TxTask {
        agent: Arc<LldpAgent>,
        restart: Arc<Notify>,
        handle: JoinHandle<()>,
    }

    impl TxTask {
        /// Send on all ports now, then every interval.
        pub fn spawn(agent: Arc<LldpAgent>) -> Self {
            agent.tx_restart(true);

            let restart = Arc::new(Notify::new());
            let notified = Arc::clone(&restart);
            let worker = Arc::clone(&agent);
            let interval = agent.tx_interval();
            let handle = tokio::spawn(async move {
                loop {
                    tokio::select! {
                        () = tokio::time::sleep(interval) => {
                            let sent = worker.on_timer_elapsed();
                            trace!(sent, "transmit timer elapsed");
                        }
                        () = notified.notified() => {
                            trace!("transmit timer restarted");
                        }
                    }
                }
            });
            debug!(interval_ms = interval.as_millis() as u64, "LLDP transmit task started");

            Self {
                agent,
                restart,
                handle,
            }
        }

        /// Restart the interval, optionally sending on all ports first.
        pub fn tx_restart(&self, send_now: bool) {
            self.agent.tx_restart(send_now);
            self.restart.notify_one();
        }

        pub fn agent(&self) -> &Arc<LldpAgent> {
            &self.agent
        }
    }

    impl Drop for TxTask {
        fn drop(&mut self) {
            self.handle.abort();
        }
    }
}

#[cfg(feature = "async")]
pub use task::TxTask;
