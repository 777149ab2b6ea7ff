#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use eureka_client::services::transport::RegistryResult;
use eureka_client::{
    Applications, ClientBuilder, ClientConfig, EurekaClient, InstanceInfo, Logger, RegistryError,
    RegistryTransport,
};

/// 记录调用次数的内存传输
#[derive(Debug, Clone, Default)]
pub struct FakeTransport {
    state: Arc<FakeState>,
}

#[derive(Debug, Default)]
struct FakeState {
    register_calls: AtomicUsize,
    deregister_calls: AtomicUsize,
    deregister_completed: AtomicUsize,
    heartbeat_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    lease_present: AtomicBool,
    fail_heartbeat: AtomicBool,
    fail_fetch: AtomicBool,
    fail_deregister: AtomicBool,
    register_delay: Mutex<Option<Duration>>,
    heartbeat_delay: Mutex<Option<Duration>>,
    deregister_delay: Mutex<Option<Duration>>,
    payloads: Mutex<Vec<Value>>,
    registered: Mutex<Vec<InstanceInfo>>,
    heartbeat_ids: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 依次轮流返回这些响应
    pub fn with_payloads(payloads: Vec<Value>) -> Self {
        let transport = Self::default();
        *transport.state.payloads.lock() = payloads;
        transport
    }

    pub fn register_calls(&self) -> usize {
        self.state.register_calls.load(Ordering::SeqCst)
    }

    pub fn deregister_calls(&self) -> usize {
        self.state.deregister_calls.load(Ordering::SeqCst)
    }

    /// 已返回（成功或失败）的注销请求数
    pub fn deregister_completed(&self) -> usize {
        self.state.deregister_completed.load(Ordering::SeqCst)
    }

    pub fn heartbeat_calls(&self) -> usize {
        self.state.heartbeat_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.state.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn registered(&self) -> Vec<InstanceInfo> {
        self.state.registered.lock().clone()
    }

    pub fn heartbeat_ids(&self) -> Vec<String> {
        self.state.heartbeat_ids.lock().clone()
    }

    pub fn grant_lease(&self) {
        self.state.lease_present.store(true, Ordering::SeqCst);
    }

    /// 模拟服务端租约过期
    pub fn expire_lease(&self) {
        self.state.lease_present.store(false, Ordering::SeqCst);
    }

    pub fn set_fail_heartbeat(&self, fail: bool) {
        self.state.fail_heartbeat.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.state.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deregister(&self, fail: bool) {
        self.state.fail_deregister.store(fail, Ordering::SeqCst);
    }

    pub fn has_lease(&self) -> bool {
        self.state.lease_present.load(Ordering::SeqCst)
    }

    /// 注册在授予租约之前先等待
    pub fn set_register_delay(&self, delay: Duration) {
        *self.state.register_delay.lock() = Some(delay);
    }

    /// 心跳在检查租约之前先等待
    pub fn set_heartbeat_delay(&self, delay: Duration) {
        *self.state.heartbeat_delay.lock() = Some(delay);
    }

    pub fn set_deregister_delay(&self, delay: Duration) {
        *self.state.deregister_delay.lock() = Some(delay);
    }
}

fn server_error(operation: &'static str) -> RegistryError {
    RegistryError::UnexpectedStatus {
        operation,
        status: http::StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[async_trait]
impl RegistryTransport for FakeTransport {
    async fn register(&self, _zone: &str, _app: &str, instance: &InstanceInfo) -> RegistryResult<()> {
        self.state.register_calls.fetch_add(1, Ordering::SeqCst);
        self.state.registered.lock().push(instance.clone());
        let delay = *self.state.register_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.grant_lease();
        Ok(())
    }

    async fn deregister(&self, _zone: &str, _app: &str, _instance_id: &str) -> RegistryResult<()> {
        self.state.deregister_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.state.deregister_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.state.deregister_completed.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_deregister.load(Ordering::SeqCst) {
            return Err(server_error("deregister"));
        }
        self.expire_lease();
        Ok(())
    }

    async fn heartbeat(&self, _zone: &str, app: &str, instance_id: &str) -> RegistryResult<()> {
        self.state.heartbeat_calls.fetch_add(1, Ordering::SeqCst);
        self.state.heartbeat_ids.lock().push(instance_id.to_string());
        let delay = *self.state.heartbeat_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.state.fail_heartbeat.load(Ordering::SeqCst) {
            return Err(server_error("heartbeat"));
        }
        if self.state.lease_present.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RegistryError::LeaseNotFound {
                app: app.to_string(),
                instance_id: instance_id.to_string(),
            })
        }
    }

    async fn fetch_all(&self, _zone: &str) -> RegistryResult<Applications> {
        let call = self.state.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_fetch.load(Ordering::SeqCst) {
            return Err(server_error("fetch applications"));
        }

        let payload = {
            let payloads = self.state.payloads.lock();
            if payloads.is_empty() {
                empty_payload()
            } else {
                payloads[call % payloads.len()].clone()
            }
        };
        let body = serde_json::to_vec(&payload)?;
        Ok(Applications::from_json(&body)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// 记录所有日志的 Logger
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn count(&self, level: Level) -> usize {
        self.entries.lock().iter().filter(|(l, _)| *l == level).count()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.entries
            .lock()
            .iter()
            .any(|(l, msg)| *l == level && msg.contains(needle))
    }
}

impl Logger for RecordingLogger {
    fn debug(&self, msg: &str) {
        self.entries.lock().push((Level::Debug, msg.to_string()));
    }

    fn info(&self, msg: &str) {
        self.entries.lock().push((Level::Info, msg.to_string()));
    }

    fn warn(&self, msg: &str, err: &dyn std::error::Error) {
        self.entries.lock().push((Level::Warn, format!("{msg}: {err}")));
    }

    fn error(&self, msg: &str, err: &dyn std::error::Error) {
        self.entries.lock().push((Level::Error, format!("{msg}: {err}")));
    }
}

pub fn test_config() -> ClientConfig {
    ClientConfig {
        app: "orders".to_string(),
        port: 8080,
        ip: Some("10.0.0.1".to_string()),
        renewal_interval_in_secs: 30,
        registry_fetch_interval_seconds: 15,
        shutdown_on_signal: false,
        ..Default::default()
    }
}

pub fn build_client(transport: &FakeTransport) -> (EurekaClient<FakeTransport>, Arc<RecordingLogger>) {
    build_client_with(test_config(), transport)
}

pub fn build_client_with(
    config: ClientConfig,
    transport: &FakeTransport,
) -> (EurekaClient<FakeTransport>, Arc<RecordingLogger>) {
    let logger = Arc::new(RecordingLogger::default());
    let client = ClientBuilder::new(config)
        .logger(logger.clone())
        .build_with_transport(transport.clone())
        .expect("build client");
    (client, logger)
}

pub fn empty_payload() -> Value {
    json!({"applications": {"versions__delta": "1", "apps__hashcode": "", "application": []}})
}

pub fn instance_json(app: &str, id: &str, status: &str) -> Value {
    json!({
        "instanceId": id,
        "hostName": id,
        "app": app,
        "ipAddr": "10.9.9.9",
        "status": status,
        "port": {"$": 8080, "@enabled": "true"},
        "securePort": {"$": 443, "@enabled": "false"},
        "dataCenterInfo": {
            "@class": "com.netflix.appinfo.InstanceInfo$DefaultDataCenterInfo",
            "name": "MyOwn"
        }
    })
}

/// 两个应用，各有一个 UP 和一个 DOWN 实例
pub fn two_app_payload() -> Value {
    json!({
        "applications": {
            "versions__delta": "1",
            "apps__hashcode": "UP_2_DOWN_2_",
            "application": [
                {
                    "name": "ORDERS",
                    "instance": [
                        instance_json("ORDERS", "orders-up", "UP"),
                        instance_json("ORDERS", "orders-down", "DOWN")
                    ]
                },
                {
                    "name": "PAYMENTS",
                    "instance": [
                        instance_json("PAYMENTS", "payments-oos", "OUT_OF_SERVICE"),
                        instance_json("PAYMENTS", "payments-up", "UP")
                    ]
                }
            ]
        }
    })
}
