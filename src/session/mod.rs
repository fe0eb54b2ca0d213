//! 会话协调器
//! 统一管理认证请求生命周期：401 拦截与合并刷新、闲置预警与强制登出

pub mod credentials;
pub mod idle;
pub mod refresh;

pub use credentials::{
    CredentialStore, Credentials, FileCredentialStore, MemoryCredentialStore, ACCESS_TOKEN_KEY,
    CREDENTIAL_KEYS, REFRESH_TOKEN_KEY, USERNAME_KEY, USER_ROLE_KEY,
};
pub use idle::{ActivityKind, IdlePhase, IdlePolicy, IdleState, IdleTransition};
pub use refresh::{RefreshFailure, RefreshGate, RefreshOutcome};

use crate::api::ApiClient;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

/// 预警回调：`(visible, remaining, extend)`
///
/// 进入 WARNING 时以 `(true, 提前量, extend)` 调用；预警消隐（活动、延长、
/// 登出前一刻）以 `(false, 0, extend)` 调用。倒计时展示由宿主自理
pub type WarnCallback = Arc<dyn Fn(bool, Duration, ActivityHandle) + Send + Sync>;

/// 登出回调：替代默认登出行为，宿主可在其中清理自身状态
pub type LogoutCallback = Arc<dyn Fn() + Send + Sync>;

/// 会话初始化选项
#[derive(Default)]
pub struct SessionOptions {
    pub on_warn: Option<WarnCallback>,
    pub on_logout: Option<LogoutCallback>,
}

enum SessionSignal {
    Activity(ActivityKind),
    Extend,
}

/// 活动上报句柄
///
/// 宿主把指针/键盘/触摸事件接到 `record`；预警对话框的"保持会话"按钮接到
/// `extend`。可随意克隆，会话拆除后上报变为空操作
#[derive(Clone)]
pub struct ActivityHandle {
    tx: mpsc::UnboundedSender<SessionSignal>,
}

impl ActivityHandle {
    /// 上报一次用户活动；所有活动类型等价，整窗重排两个期限
    pub fn record(&self, kind: ActivityKind) {
        let _ = self.tx.send(SessionSignal::Activity(kind));
    }

    /// 显式延长会话（与活动上报效果一致）
    pub fn extend(&self) {
        let _ = self.tx.send(SessionSignal::Extend);
    }
}

/// 强制登出执行器
///
/// 凭据清除幂等、可重复；登出回调（或默认行为）整个会话只执行一次，
/// 并发触发方（多个失败请求、闲置到期）只有第一个生效
pub struct LogoutGuard {
    credentials: Credentials,
    callback: Option<LogoutCallback>,
    fired: AtomicBool,
}

impl LogoutGuard {
    pub(crate) fn new(credentials: Credentials, callback: Option<LogoutCallback>) -> Self {
        Self {
            credentials,
            callback,
            fired: AtomicBool::new(false),
        }
    }

    /// 清除全部凭据键并触发一次登出回调
    pub fn force_logout(&self) {
        self.credentials.clear();
        if self.fired.swap(true, Ordering::SeqCst) {
            return;
        }
        metrics::counter!("session_forced_logouts_total").increment(1);
        match &self.callback {
            Some(callback) => callback(),
            None => info!("Session terminated, credentials cleared"),
        }
    }

    /// 本会话是否已执行过登出
    pub fn fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

/// 已启动的会话上下文
///
/// `start` 注册拦截器并启动闲置驱动；`shutdown`（或 drop）完整撤销：
/// 注销拦截器、取消定时、关闭活动通道
pub struct Session {
    api: Arc<ApiClient>,
    activity: ActivityHandle,
    logout: Arc<LogoutGuard>,
    shutdown: watch::Sender<bool>,
    driver: Option<JoinHandle<()>>,
}

impl Session {
    /// 初始化认证会话上下文
    pub fn start(api: Arc<ApiClient>, policy: IdlePolicy, options: SessionOptions) -> Session {
        let logout = Arc::new(LogoutGuard::new(
            api.credentials().clone(),
            options.on_logout,
        ));
        api.install_recovery(logout.clone());

        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let activity = ActivityHandle { tx };

        let driver = tokio::spawn(run_idle_driver(
            policy,
            rx,
            shutdown_rx,
            options.on_warn,
            logout.clone(),
            activity.clone(),
        ));

        debug!(
            timeout_secs = policy.timeout.as_secs(),
            warn_lead_secs = policy.warn_lead.as_secs(),
            "Session coordinator started"
        );

        Session {
            api,
            activity,
            logout,
            shutdown: shutdown_tx,
            driver: Some(driver),
        }
    }

    /// 活动上报句柄（可克隆后分发给事件源）
    pub fn activity(&self) -> ActivityHandle {
        self.activity.clone()
    }

    /// 显式延长会话
    pub fn extend(&self) {
        self.activity.extend();
    }

    /// 手动登出（与强制登出共用同一条路径）
    pub fn logout(&self) {
        self.logout.force_logout();
    }

    /// 本会话是否已登出
    pub fn logged_out(&self) -> bool {
        self.logout.fired()
    }

    /// 完整撤销初始化并等待驱动退出
    pub async fn shutdown(mut self) {
        self.teardown();
        if let Some(driver) = self.driver.take() {
            let _ = driver.await;
        }
    }

    fn teardown(&self) {
        self.api.remove_recovery();
        let _ = self.shutdown.send(true);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
    }
}

/// 闲置驱动：在活动信号、拆除信号与下一期限之间复用
async fn run_idle_driver(
    policy: IdlePolicy,
    mut signals: mpsc::UnboundedReceiver<SessionSignal>,
    mut shutdown: watch::Receiver<bool>,
    on_warn: Option<WarnCallback>,
    logout: Arc<LogoutGuard>,
    extend_handle: ActivityHandle,
) {
    let notify_warn = |visible: bool, remaining: Duration| {
        if let Some(callback) = &on_warn {
            callback(visible, remaining, extend_handle.clone());
        }
    };

    let mut state = IdleState::new(policy, Instant::now());

    loop {
        let Some(deadline) = state.next_deadline() else {
            break;
        };

        tokio::select! {
            signal = signals.recv() => match signal {
                Some(SessionSignal::Activity(kind)) => {
                    trace!(?kind, "User activity observed");
                    notify_warn(false, Duration::ZERO);
                    state.reset(Instant::now());
                }
                Some(SessionSignal::Extend) => {
                    debug!("Session extended");
                    notify_warn(false, Duration::ZERO);
                    state.reset(Instant::now());
                }
                // 所有活动句柄关闭
                None => break,
            },
            _ = shutdown.changed() => break,
            _ = tokio::time::sleep_until(deadline) => {
                match state.advance(Instant::now()) {
                    Some(IdleTransition::Warn { remaining }) => {
                        warn!(remaining_secs = remaining.as_secs(), "Idle warning threshold reached");
                        metrics::counter!("session_idle_warnings_total").increment(1);
                        notify_warn(true, remaining);
                    }
                    Some(IdleTransition::Expire) => {
                        warn!("Idle timeout expired, terminating session");
                        metrics::counter!("session_idle_expiries_total").increment(1);
                        notify_warn(false, Duration::ZERO);
                        logout.force_logout();
                        break;
                    }
                    None => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logout_guard_fires_callback_once() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.set(ACCESS_TOKEN_KEY, "acc");
        store.set(REFRESH_TOKEN_KEY, "ref");
        store.set(USER_ROLE_KEY, "admin");
        store.set(USERNAME_KEY, "admin");

        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = calls.clone();
        let guard = LogoutGuard::new(
            Credentials::new(store.clone()),
            Some(Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        );

        guard.force_logout();
        guard.force_logout();
        guard.force_logout();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(guard.fired());
        for key in CREDENTIAL_KEYS {
            assert!(store.get(key).is_none());
        }
    }

    #[test]
    fn test_logout_guard_default_behavior_clears_store() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.set(ACCESS_TOKEN_KEY, "acc");
        let guard = LogoutGuard::new(Credentials::new(store.clone()), None);

        guard.force_logout();

        assert!(store.get(ACCESS_TOKEN_KEY).is_none());
        assert!(guard.fired());
    }
}
