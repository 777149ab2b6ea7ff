use tokio::time::{self, MissedTickBehavior};

use super::controller::EurekaClient;
use super::signal::termination_signal;
use crate::services::transport::RegistryTransport;

impl<T: RegistryTransport> EurekaClient<T> {
    // 心跳任务：立即执行第一次，之后按续约间隔执行
    pub(super) fn spawn_heartbeat_task(&self) {
        let client = self.clone();
        let period = self.inner.config.renewal_interval();

        self.inner.tasks.spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = client.inner.cancel.cancelled() => break,
                    _ = interval.tick() => {}
                }
                if !client.is_running() {
                    break;
                }
                client.renew().await;
            }

            tracing::debug!(instance_id = %client.inner.instance.instance_id, "Heartbeat task stopped");
        });
    }

    // 拉取任务：立即执行第一次，之后按拉取间隔执行
    pub(super) fn spawn_refresh_task(&self) {
        let client = self.clone();
        let period = self.inner.config.fetch_interval();

        self.inner.tasks.spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = client.inner.cancel.cancelled() => break,
                    _ = interval.tick() => {}
                }
                if !client.is_running() {
                    break;
                }
                client.refresh().await;
            }

            tracing::debug!(instance_id = %client.inner.instance.instance_id, "Refresh task stopped");
        });
    }

    // 收到终止信号后注销，进程由调用方退出
    pub(super) fn spawn_signal_listener(&self) {
        let client = self.clone();

        self.inner.tasks.spawn(async move {
            let signal = tokio::select! {
                _ = client.inner.cancel.cancelled() => return,
                signal = termination_signal() => signal,
            };

            client
                .inner
                .logger
                .info(&format!("Received {signal}, deregistering before exit"));
            client.shutdown().await;
        });
    }
}
