//! 闲置计时器状态机
//! ACTIVE → WARNING → EXPIRED；纯转移函数以显式的 `now` 推进，不依赖真实时钟

use crate::config::SessionConfig;
use std::time::Duration;
use tokio::time::Instant;

/// 闲置策略（初始化时一次性解析）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdlePolicy {
    /// 无活动多久后登出
    pub timeout: Duration,
    /// 登出前多久发出预警，0 表示不预警
    pub warn_lead: Duration,
}

impl IdlePolicy {
    pub fn new(timeout: Duration, warn_lead: Duration) -> Self {
        Self { timeout, warn_lead }
    }

    /// 从配置换算；超时至少 1 分钟，预警允许为 0
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.idle_timeout_minutes.max(1) * 60),
            warn_lead: Duration::from_secs(config.idle_warn_minutes * 60),
        }
    }

    /// 预警为 0 或不小于总超时时跳过预警阶段，只保留登出定时
    pub fn warn_enabled(&self) -> bool {
        !self.warn_lead.is_zero() && self.warn_lead < self.timeout
    }
}

/// 状态机所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdlePhase {
    /// 无预警显示，两个期限均已排定
    Active,
    /// 预警已触发，登出期限仍然有效
    Warning,
    /// 登出期限已到，终态
    Expired,
}

/// 期限到达时产生的转移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleTransition {
    /// 进入 WARNING；remaining 固定为预警提前量
    Warn { remaining: Duration },
    /// 进入 EXPIRED
    Expire,
}

/// 监测的用户活动类型
///
/// 各类型处理完全等价，仅用于日志
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    PointerMove,
    PointerDown,
    KeyDown,
    TouchStart,
    Click,
}

/// 闲置状态：阶段 + 两个排定期限
#[derive(Debug, Clone)]
pub struct IdleState {
    policy: IdlePolicy,
    phase: IdlePhase,
    warn_at: Option<Instant>,
    logout_at: Instant,
}

impl IdleState {
    /// 以 `now` 为最近活动时间建立初始状态
    pub fn new(policy: IdlePolicy, now: Instant) -> Self {
        let mut state = Self {
            policy,
            phase: IdlePhase::Active,
            warn_at: None,
            logout_at: now + policy.timeout,
        };
        state.schedule(now);
        state
    }

    pub fn phase(&self) -> IdlePhase {
        self.phase
    }

    /// 下一个到期时刻；EXPIRED 后不再有
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            IdlePhase::Expired => None,
            IdlePhase::Active => Some(self.warn_at.unwrap_or(self.logout_at)),
            IdlePhase::Warning => Some(self.logout_at),
        }
    }

    /// 活动或显式延长：取消并整窗重排
    ///
    /// EXPIRED 为终态，重排无效
    pub fn reset(&mut self, now: Instant) {
        if self.phase == IdlePhase::Expired {
            return;
        }
        self.phase = IdlePhase::Active;
        self.schedule(now);
    }

    /// 时钟到达 `now`：若某个期限已到则推进状态机并返回需要执行的转移
    pub fn advance(&mut self, now: Instant) -> Option<IdleTransition> {
        match self.phase {
            IdlePhase::Expired => None,
            _ if now >= self.logout_at => {
                self.phase = IdlePhase::Expired;
                self.warn_at = None;
                Some(IdleTransition::Expire)
            }
            IdlePhase::Active => match self.warn_at {
                Some(at) if now >= at => {
                    self.phase = IdlePhase::Warning;
                    self.warn_at = None;
                    Some(IdleTransition::Warn {
                        remaining: self.policy.warn_lead,
                    })
                }
                _ => None,
            },
            IdlePhase::Warning => None,
        }
    }

    fn schedule(&mut self, now: Instant) {
        self.logout_at = now + self.policy.timeout;
        self.warn_at = self
            .policy
            .warn_enabled()
            .then(|| now + self.policy.timeout - self.policy.warn_lead);
    }
}
