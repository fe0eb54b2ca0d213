//! 刷新合并
//! 单航道令牌刷新：同一时间最多一次网络刷新，并发 401 共享同一结果

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// 刷新失败原因
///
/// 各变体只影响日志与指标，处理路径完全相同：全部终止会话
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshFailure {
    /// 本地没有刷新令牌
    MissingToken,
    /// 刷新端点拒绝（令牌过期/被吊销）
    Rejected { status: u16 },
    /// 刷新请求网络失败
    Transport(String),
    /// 响应里没有可用的新访问令牌
    Malformed,
}

impl std::fmt::Display for RefreshFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshFailure::MissingToken => write!(f, "no refresh token available"),
            RefreshFailure::Rejected { status } => {
                write!(f, "refresh rejected with status {status}")
            }
            RefreshFailure::Transport(msg) => write!(f, "refresh transport failure: {msg}"),
            RefreshFailure::Malformed => write!(f, "refresh response missing access token"),
        }
    }
}

/// 刷新结果：成功时携带新的访问令牌
pub type RefreshOutcome = Result<String, RefreshFailure>;

type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

/// 在途刷新登记
///
/// 槽位在任何 await 之前同步检查并占用；只由其登记的刷新完成时自行清空
#[derive(Clone, Default)]
pub struct RefreshGate {
    inflight: Arc<Mutex<Option<SharedRefresh>>>,
}

impl RefreshGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已有在途刷新则加入等待，否则启动 `start` 产生的刷新并登记
    pub fn join_or_start<F, Fut>(&self, start: F) -> impl Future<Output = RefreshOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome> + Send + 'static,
    {
        let mut slot = lock_slot(&self.inflight);
        if let Some(inflight) = slot.as_ref() {
            debug!("Joining in-flight token refresh");
            metrics::counter!("session_refresh_coalesced_total").increment(1);
            return inflight.clone();
        }

        let gate = self.clone();
        let refresh = start();
        let shared: SharedRefresh = async move {
            let outcome = refresh.await;
            // 完成时清空登记，之后的 401 风暴会发起新的刷新
            lock_slot(&gate.inflight).take();
            outcome
        }
        .boxed()
        .shared();

        *slot = Some(shared.clone());
        shared
    }

    /// 是否有刷新在途
    pub fn in_flight(&self) -> bool {
        lock_slot(&self.inflight).is_some()
    }
}

// 槽位只在同步临界区内读写；中毒时继续使用内部数据
fn lock_slot<T>(lock: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_concurrent_joiners_share_one_refresh() {
        let gate = RefreshGate::new();
        let started = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = oneshot::channel::<()>();

        let make = |rx: oneshot::Receiver<()>| {
            let started = started.clone();
            move || {
                started.fetch_add(1, Ordering::SeqCst);
                async move {
                    let _ = rx.await;
                    Ok("token-1".to_string())
                }
            }
        };

        let first = gate.join_or_start(make(rx));
        assert!(gate.in_flight());

        // 第二、三个调用方不应再启动新的刷新
        let (_unused_tx, unused_rx) = oneshot::channel::<()>();
        let second = gate.join_or_start(make(unused_rx));
        let third = gate.join_or_start({
            let started = started.clone();
            move || {
                started.fetch_add(1, Ordering::SeqCst);
                async move { Ok("never".to_string()) }
            }
        });

        tx.send(()).unwrap();
        let (a, b, c) = tokio::join!(first, second, third);

        assert_eq!(a.unwrap(), "token-1");
        assert_eq!(b.unwrap(), "token-1");
        assert_eq!(c.unwrap(), "token-1");
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert!(!gate.in_flight());
    }

    #[tokio::test]
    async fn test_failure_is_broadcast_to_all_joiners() {
        let gate = RefreshGate::new();

        let first = gate.join_or_start(|| async {
            Err(RefreshFailure::Rejected { status: 401 })
        });
        let second = gate.join_or_start(|| async { Ok("unreachable".to_string()) });

        let (a, b) = tokio::join!(first, second);
        assert_eq!(a, Err(RefreshFailure::Rejected { status: 401 }));
        assert_eq!(b, Err(RefreshFailure::Rejected { status: 401 }));
    }

    #[tokio::test]
    async fn test_slot_clears_after_completion() {
        let gate = RefreshGate::new();
        let outcome = gate
            .join_or_start(|| async { Ok("token-1".to_string()) })
            .await;
        assert!(outcome.is_ok());
        assert!(!gate.in_flight());

        // 新的风暴允许发起新的刷新
        let started = Arc::new(AtomicUsize::new(0));
        let counter = started.clone();
        let outcome = gate
            .join_or_start(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok("token-2".to_string()) }
            })
            .await;
        assert_eq!(outcome.unwrap(), "token-2");
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }
}
