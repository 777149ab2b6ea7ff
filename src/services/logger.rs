use std::fmt;

/// 客户端状态日志输出
///
/// 四个级别，调用方不关心返回值，实现不得阻塞或 panic。
pub trait Logger: Send + Sync + fmt::Debug + 'static {
    fn debug(&self, msg: &str);
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str, err: &dyn std::error::Error);
    fn error(&self, msg: &str, err: &dyn std::error::Error);
}

/// 默认实现，转发到 `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    app: String,
    instance_id: String,
}

impl TracingLogger {
    pub fn new(app: impl Into<String>, instance_id: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            instance_id: instance_id.into(),
        }
    }
}

impl Logger for TracingLogger {
    fn debug(&self, msg: &str) {
        tracing::debug!(app = %self.app, instance_id = %self.instance_id, "{msg}");
    }

    fn info(&self, msg: &str) {
        tracing::info!(app = %self.app, instance_id = %self.instance_id, "{msg}");
    }

    fn warn(&self, msg: &str, err: &dyn std::error::Error) {
        tracing::warn!(app = %self.app, instance_id = %self.instance_id, error = %err, "{msg}");
    }

    fn error(&self, msg: &str, err: &dyn std::error::Error) {
        tracing::error!(app = %self.app, instance_id = %self.instance_id, error = %err, "{msg}");
    }
}
