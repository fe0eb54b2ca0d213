//! API 客户端
//! 全部请求的单一拦截点：附加 Bearer、401 时合并刷新并重试一次、状态码映射

pub mod auth;
pub mod backups;
pub mod dashboard;
pub mod equipment;
pub mod locations;
pub mod maintenance;
pub mod reports;
pub mod users;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::auth::{RefreshRequest, RefreshResponse};
use crate::session::credentials::{CredentialStore, Credentials};
use crate::session::refresh::{RefreshFailure, RefreshGate, RefreshOutcome};
use crate::session::LogoutGuard;
use reqwest::header::{self, HeaderValue};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// 会话恢复挂钩：由会话协调器注册/注销
///
/// 未注册时 401 原样传播给调用方
#[derive(Clone)]
struct Recovery {
    gate: RefreshGate,
    logout: Arc<LogoutGuard>,
}

/// REST API 客户端
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    refresh_url: Url,
    credentials: Credentials,
    recovery: RwLock<Option<Recovery>>,
}

impl ApiClient {
    /// 创建客户端
    pub fn new(config: &ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.request_timeout_secs))
            .build()?;

        let base_url = normalize_base_url(&config.api.base_url)?;
        let refresh_url = base_url.join("api/token/refresh/")?;

        Ok(Self {
            http,
            base_url,
            refresh_url,
            credentials: Credentials::new(store),
            recovery: RwLock::new(None),
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// 基于基础地址拼出端点
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// 注册会话恢复（由 `Session::start` 调用）
    pub(crate) fn install_recovery(&self, logout: Arc<LogoutGuard>) {
        let mut slot = write_lock(&self.recovery);
        *slot = Some(Recovery {
            gate: RefreshGate::new(),
            logout,
        });
    }

    /// 注销会话恢复（由会话拆除调用）；之后 401 不再被拦截
    pub(crate) fn remove_recovery(&self) {
        write_lock(&self.recovery).take();
    }

    /// 恢复是否已注册
    pub fn recovery_installed(&self) -> bool {
        read_lock(&self.recovery).is_some()
    }

    fn recovery(&self) -> Option<Recovery> {
        read_lock(&self.recovery).clone()
    }

    /// 发送已认证请求
    ///
    /// `make` 必须能重复构造同一请求：401 恢复成功后用它重建请求、
    /// 换上新令牌重发一次，把重试结果透明地交还调用方
    pub(crate) async fn send_authorized<F>(&self, make: F) -> Result<reqwest::Response>
    where
        F: Fn(&reqwest::Client) -> Result<reqwest::RequestBuilder>,
    {
        let mut request = make(&self.http)?;
        if let Some(token) = self.credentials.access_token() {
            if let Some(value) = bearer_header(token.expose_secret()) {
                request = request.header(header::AUTHORIZATION, value);
            }
        }

        let response = request.send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let Some(recovery) = self.recovery() else {
            return Err(ClientError::Unauthorized);
        };

        debug!("Request unauthorized, attempting coalesced token refresh");
        match self.refresh_access_token(&recovery).await {
            Ok(token) => {
                let Some(value) = bearer_header(&token) else {
                    return Err(ClientError::malformed(
                        "refreshed access token is not header-safe",
                    ));
                };
                let retry = make(&self.http)?.header(header::AUTHORIZATION, value);
                Ok(retry.send().await?)
            }
            Err(failure) => {
                warn!(%failure, "Session refresh failed, original request rejected");
                // 登出副作用已触发，向调用方传播原始请求的 401
                Err(ClientError::Unauthorized)
            }
        }
    }

    /// 合并刷新：已有在途刷新则共享其结果
    async fn refresh_access_token(&self, recovery: &Recovery) -> RefreshOutcome {
        recovery
            .gate
            .join_or_start(|| {
                perform_refresh(
                    self.http.clone(),
                    self.refresh_url.clone(),
                    self.credentials.clone(),
                    recovery.logout.clone(),
                )
            })
            .await
    }

    // 资源方法共用的请求助手

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self
            .send_authorized(|http| Ok(http.get(url.as_str())))
            .await?;
        expect_json(response).await
    }

    pub(crate) async fn get_json_query<Q, T>(&self, path: &str, query: &Q) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self
            .send_authorized(|http| Ok(http.get(url.as_str()).query(query)))
            .await?;
        expect_json(response).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self
            .send_authorized(|http| Ok(http.post(url.as_str()).json(body)))
            .await?;
        expect_json(response).await
    }

    /// POST 后忽略响应体（服务端返回确认消息或 204）
    pub(crate) async fn post_unit<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let response = self
            .send_authorized(|http| Ok(http.post(url.as_str()).json(body)))
            .await?;
        check_status(response).await.map(|_| ())
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self
            .send_authorized(|http| Ok(http.post(url.as_str())))
            .await?;
        expect_json(response).await
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self
            .send_authorized(|http| Ok(http.put(url.as_str()).json(body)))
            .await?;
        expect_json(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.endpoint(path)?;
        let response = self
            .send_authorized(|http| Ok(http.delete(url.as_str())))
            .await?;
        check_status(response).await.map(|_| ())
    }

    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.endpoint(path)?;
        let response = self
            .send_authorized(|http| Ok(http.get(url.as_str())))
            .await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub(crate) async fn post_json_bytes<B>(&self, path: &str, body: &B) -> Result<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let response = self
            .send_authorized(|http| Ok(http.post(url.as_str()).json(body)))
            .await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// multipart 上传；流式请求体无法重放，`make_form` 负责为重试重建表单
    pub(crate) async fn post_multipart<T, F>(&self, path: &str, make_form: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn() -> Result<reqwest::multipart::Form>,
    {
        let url = self.endpoint(path)?;
        let response = self
            .send_authorized(|http| Ok(http.post(url.as_str()).multipart(make_form()?)))
            .await?;
        expect_json(response).await
    }
}

/// 执行一次网络刷新并落盘新令牌；失败时触发强制登出
///
/// 整个 401 风暴只会进入这里一次（见 `RefreshGate`）
async fn perform_refresh(
    http: reqwest::Client,
    refresh_url: Url,
    credentials: Credentials,
    logout: Arc<LogoutGuard>,
) -> RefreshOutcome {
    let outcome = request_new_access_token(http, refresh_url, credentials).await;
    match &outcome {
        Ok(_) => {
            debug!("Access token refreshed");
            metrics::counter!("session_refresh_total", "outcome" => "success").increment(1);
        }
        Err(failure) => {
            warn!(%failure, "Session refresh failed, forcing logout");
            metrics::counter!("session_refresh_total", "outcome" => "failure").increment(1);
            logout.force_logout();
        }
    }
    outcome
}

async fn request_new_access_token(
    http: reqwest::Client,
    refresh_url: Url,
    credentials: Credentials,
) -> RefreshOutcome {
    let refresh = credentials
        .refresh_token()
        .ok_or(RefreshFailure::MissingToken)?;

    // 刷新端点本身不走认证拦截：它失败即终局，绝不触发嵌套刷新
    let response = http
        .post(refresh_url.as_str())
        .json(&RefreshRequest {
            refresh: refresh.expose_secret().clone(),
        })
        .send()
        .await
        .map_err(|err| RefreshFailure::Transport(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(RefreshFailure::Rejected {
            status: status.as_u16(),
        });
    }

    let body: RefreshResponse = response
        .json()
        .await
        .map_err(|_| RefreshFailure::Malformed)?;
    if body.access.is_empty() {
        return Err(RefreshFailure::Malformed);
    }

    credentials.replace_access_token(&Secret::new(body.access.clone()));
    Ok(body.access)
}

/// 成功状态之外映射为错误；响应体文本作为错误消息
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::FORBIDDEN => ClientError::Forbidden,
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::BAD_REQUEST => ClientError::BadRequest(message),
        _ => ClientError::Server {
            status: status.as_u16(),
            message,
        },
    })
}

pub(crate) async fn expect_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let response = check_status(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|err| ClientError::MalformedResponse(err.to_string()))
}

fn bearer_header(token: &str) -> Option<HeaderValue> {
    match HeaderValue::from_str(&format!("Bearer {token}")) {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Stored access token is not header-safe, sending request without it");
            None
        }
    }
}

/// 基础地址统一成带尾部斜杠的形式，保证 join 语义稳定
fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut base = raw.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(Url::parse(&base)?)
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}
