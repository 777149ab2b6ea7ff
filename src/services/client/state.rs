use std::fmt;
use std::sync::Arc;

use crate::services::instance::InstanceStatus;
use crate::services::registry::Applications;

/// 客户端生命周期
///
/// 只允许 `Idle -> Running -> Stopped`，停止后不能重新启动。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Running,
    Stopped,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifecycle::Idle => "idle",
            Lifecycle::Running => "running",
            Lifecycle::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

// 由同一把读写锁保护的可变状态
#[derive(Debug)]
pub(crate) struct ClientState {
    pub(crate) lifecycle: Lifecycle,
    // 本机实例在注册中心的状态
    pub(crate) status: InstanceStatus,
    // 最近一次成功拉取的快照，整体替换
    pub(crate) applications: Option<Arc<Applications>>,
}

impl ClientState {
    pub(crate) fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Idle,
            status: InstanceStatus::Down,
            applications: None,
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// `Idle -> Running`，其他状态下返回 false
    pub(crate) fn try_start(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Idle {
            return false;
        }
        self.lifecycle = Lifecycle::Running;
        true
    }

    /// 进入 `Stopped`，返回之前的状态
    pub(crate) fn stop(&mut self) -> Lifecycle {
        std::mem::replace(&mut self.lifecycle, Lifecycle::Stopped)
    }
}
