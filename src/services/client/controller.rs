use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::error::ClientError;
use super::state::{ClientState, Lifecycle};
use crate::config::ClientConfig;
use crate::services::instance::{InstanceBuilder, InstanceInfo, InstanceStatus};
use crate::services::logger::{Logger, TracingLogger};
use crate::services::registry::Applications;
use crate::services::transport::{HttpTransport, HttpTransportConfig, RegistryTransport};

type InstanceCustomizer = Box<dyn FnOnce(&mut InstanceInfo)>;

/// 客户端构造器
pub struct ClientBuilder {
    config: ClientConfig,
    logger: Option<Arc<dyn Logger>>,
    customizers: Vec<InstanceCustomizer>,
}

impl ClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config: config.normalized(),
            logger: None,
            customizers: Vec::new(),
        }
    }

    /// 替换默认的 tracing 日志输出
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// 在实例描述冻结前对其做自定义修改
    pub fn customize_instance(mut self, customizer: impl FnOnce(&mut InstanceInfo) + 'static) -> Self {
        self.customizers.push(Box::new(customizer));
        self
    }

    /// 使用基于 HTTP 的默认传输
    pub fn build(self) -> Result<EurekaClient<HttpTransport>, ClientError> {
        let transport = HttpTransport::new(HttpTransportConfig::from(&self.config))?;
        self.build_with_transport(transport)
    }

    pub fn build_with_transport<T: RegistryTransport>(
        self,
        transport: T,
    ) -> Result<EurekaClient<T>, ClientError> {
        let mut instance = InstanceBuilder::new(&self.config).build()?;
        for customizer in self.customizers {
            customizer(&mut instance);
        }

        let logger = self.logger.unwrap_or_else(|| {
            Arc::new(TracingLogger::new(
                instance.app.clone(),
                instance.instance_id.clone(),
            ))
        });

        tracing::info!(
            app = %instance.app,
            instance_id = %instance.instance_id,
            ip = %instance.ip_addr,
            zone = %self.config.default_zone,
            "Eureka client created"
        );

        Ok(EurekaClient {
            inner: Arc::new(ClientInner {
                config: self.config,
                instance,
                transport,
                logger,
                state: RwLock::new(ClientState::new()),
                cancel: CancellationToken::new(),
                stopped: CancellationToken::new(),
                tasks: TaskTracker::new(),
            }),
        })
    }
}

pub(super) struct ClientInner<T> {
    pub(super) config: ClientConfig,
    // 构造后不可变
    pub(super) instance: InstanceInfo,
    pub(super) transport: T,
    pub(super) logger: Arc<dyn Logger>,
    pub(super) state: RwLock<ClientState>,
    // 通知周期任务退出
    pub(super) cancel: CancellationToken,
    // 注销流程结束后触发
    pub(super) stopped: CancellationToken,
    pub(super) tasks: TaskTracker,
}

/// Eureka 客户端
///
/// 负责注册、心跳续约、定期拉取注册表以及停止时注销。克隆开销很小，
/// 所有克隆共享同一份状态。
pub struct EurekaClient<T = HttpTransport> {
    pub(super) inner: Arc<ClientInner<T>>,
}

impl<T> Clone for EurekaClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for EurekaClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EurekaClient")
            .field("app", &self.inner.instance.app)
            .field("instance_id", &self.inner.instance.instance_id)
            .field("lifecycle", &self.inner.state.read().lifecycle)
            .finish()
    }
}

impl EurekaClient<HttpTransport> {
    /// 使用默认 HTTP 传输创建客户端
    ///
    /// 本机 IP 探测失败时返回错误。
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        ClientBuilder::new(config).build()
    }

    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder::new(config)
    }
}

impl<T: RegistryTransport> EurekaClient<T> {
    /// 启动心跳、拉取和信号监听任务，立即返回
    ///
    /// 只有第一次调用生效。注册在第一次心跳返回 not found 时进行。
    /// 不在 tokio 运行时中调用时不改变状态并返回 false。
    pub fn start(&self) -> bool {
        if tokio::runtime::Handle::try_current().is_err() {
            tracing::error!(
                instance_id = %self.inner.instance.instance_id,
                "Start ignored, no tokio runtime available"
            );
            return false;
        }
        if !self.inner.state.write().try_start() {
            self.inner.logger.debug("Start ignored, client is not idle");
            return false;
        }

        self.spawn_heartbeat_task();
        self.spawn_refresh_task();
        if self.inner.config.shutdown_on_signal {
            self.spawn_signal_listener();
        }
        self.inner.tasks.close();

        self.inner.logger.info("Eureka client started");
        true
    }

    /// 停止周期任务并注销实例
    ///
    /// 只有从 `Running` 进入 `Stopped` 的那次调用会发出注销请求，返回值表示是否注销过。
    /// 其他调用会等待那次注销尝试结束后再返回。
    /// 不等待周期任务退出，需要时调用 [`EurekaClient::join`]。
    pub async fn shutdown(&self) -> bool {
        let previous = self.inner.state.write().stop();
        self.inner.cancel.cancel();
        self.inner.tasks.close();

        match previous {
            Lifecycle::Running => {}
            // 从未启动，没有注销流程
            Lifecycle::Idle => {
                self.inner.stopped.cancel();
                return false;
            }
            // 已有调用在注销，等它结束
            Lifecycle::Stopped => {
                self.inner.stopped.cancelled().await;
                return false;
            }
        }

        self.deregister().await;
        self.inner.state.write().status = InstanceStatus::Down;
        self.inner.stopped.cancel();
        true
    }

    /// 发送一次心跳，租约丢失时重新注册
    pub async fn renew(&self) -> Renewal {
        let inner = &self.inner;
        let instance = &inner.instance;

        match inner
            .transport
            .heartbeat(&inner.config.default_zone, &instance.app, &instance.instance_id)
            .await
        {
            Ok(()) => {
                inner.logger.debug("Heartbeat success");
                Renewal::Renewed
            }
            Err(e) if e.is_lease_not_found() => {
                if self.lifecycle() == Lifecycle::Stopped {
                    inner.logger.warn("Lease not found after shutdown, not re-registering", &e);
                    return Renewal::Failed;
                }
                inner.logger.warn("Lease not found on registry, re-registering", &e);
                if self.register().await {
                    Renewal::Reregistered
                } else {
                    Renewal::Failed
                }
            }
            Err(e) => {
                inner.logger.error("Heartbeat failed", &e);
                Renewal::Failed
            }
        }
    }

    /// 拉取全量注册表并整体替换本地快照
    ///
    /// 失败时保留旧快照。
    pub async fn refresh(&self) -> bool {
        let inner = &self.inner;

        match inner.transport.fetch_all(&inner.config.default_zone).await {
            Ok(applications) => {
                let snapshot = Arc::new(applications.into_up_only());
                let msg = format!(
                    "Refresh success, {} applications, {} instances",
                    snapshot.len(),
                    snapshot.instance_count()
                );
                inner.state.write().applications = Some(snapshot);
                inner.logger.debug(&msg);
                true
            }
            Err(e) => {
                inner.logger.error("Refresh failed", &e);
                false
            }
        }
    }

    /// 返回指定应用 UP 实例的副本，大小写敏感
    ///
    /// 还未拉取过或应用不存在时返回空列表。
    pub fn get_application_instances(&self, name: &str) -> Vec<InstanceInfo> {
        self.inner
            .state
            .read()
            .applications
            .as_ref()
            .map(|apps| apps.instances_of(name))
            .unwrap_or_default()
    }

    /// 当前完整快照，快照本身不可变
    pub fn applications(&self) -> Option<Arc<Applications>> {
        self.inner.state.read().applications.clone()
    }

    pub fn instance(&self) -> &InstanceInfo {
        &self.inner.instance
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn instance_status(&self) -> InstanceStatus {
        self.inner.state.read().status
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.state.read().lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.inner.state.read().is_running()
    }

    /// 注销流程结束后被取消的 token
    pub fn shutdown_token(&self) -> CancellationToken {
        self.inner.stopped.clone()
    }

    /// 等待客户端停止（包括注销尝试完成）
    pub async fn wait_stopped(&self) {
        self.inner.stopped.cancelled().await;
    }

    /// 等待所有周期任务退出
    pub async fn join(&self) {
        self.inner.tasks.wait().await;
    }

    async fn register(&self) -> bool {
        let inner = &self.inner;
        // 注册时直接以 UP 状态上报
        let instance = inner.instance.with_status(InstanceStatus::Up);

        match inner
            .transport
            .register(&inner.config.default_zone, &instance.app, &instance)
            .await
        {
            Ok(()) => {
                let stopped = {
                    let mut state = inner.state.write();
                    let stopped = state.lifecycle == Lifecycle::Stopped;
                    if !stopped {
                        state.status = InstanceStatus::Up;
                    }
                    stopped
                };
                if stopped {
                    // 注册请求与注销交错，撤回这次注册
                    inner.logger.info("Registered after shutdown, withdrawing registration");
                    self.deregister().await;
                    return false;
                }
                inner.logger.info("Register application instance success");
                true
            }
            Err(e) => {
                inner.logger.error("Register application instance failed", &e);
                false
            }
        }
    }

    async fn deregister(&self) {
        let inner = &self.inner;
        let instance = &inner.instance;
        inner.logger.info("Deregistering application instance");

        match inner
            .transport
            .deregister(&inner.config.default_zone, &instance.app, &instance.instance_id)
            .await
        {
            Ok(()) => inner.logger.info("Deregister application instance success"),
            Err(e) => inner.logger.error("Deregister application instance failed", &e),
        }
    }
}

/// 一次心跳的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renewal {
    Renewed,
    /// 租约丢失，已重新注册
    Reregistered,
    Failed,
}
