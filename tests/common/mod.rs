//! 测试公共模块
//! 提供测试配置与进程内 API 桩服务

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use mms_client::config::{ApiConfig, LoggingConfig, SessionConfig, StorageConfig};
use mms_client::session::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USERNAME_KEY, USER_ROLE_KEY};
use mms_client::{ClientConfig, CredentialStore, MemoryCredentialStore};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 刷新端点行为
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshBehavior {
    /// 签发新的访问令牌
    Issue,
    /// 401 拒绝
    Reject,
    /// 200 但响应里没有可用令牌
    Malformed,
}

/// 桩服务共享状态
pub struct StubState {
    pub valid_access_token: Mutex<String>,
    pub refresh_calls: AtomicUsize,
    pub protected_calls: AtomicUsize,
    pub issued_tokens: AtomicUsize,
    pub refresh_behavior: Mutex<RefreshBehavior>,
    /// 模拟刷新耗时，让并发 401 风暴在刷新完成前全部到达
    pub refresh_delay_ms: AtomicU64,
}

impl StubState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            valid_access_token: Mutex::new("access-1".to_string()),
            refresh_calls: AtomicUsize::new(0),
            protected_calls: AtomicUsize::new(0),
            issued_tokens: AtomicUsize::new(1),
            refresh_behavior: Mutex::new(RefreshBehavior::Issue),
            refresh_delay_ms: AtomicU64::new(50),
        })
    }

    pub fn set_refresh_behavior(&self, behavior: RefreshBehavior) {
        *self.refresh_behavior.lock().unwrap() = behavior;
    }

    pub fn valid_token(&self) -> String {
        self.valid_access_token.lock().unwrap().clone()
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = format!("Bearer {}", self.valid_token());
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == expected)
            .unwrap_or(false)
    }
}

/// 启动桩服务，返回监听地址
pub async fn spawn_stub(state: Arc<StubState>) -> SocketAddr {
    let app = Router::new()
        .route("/api/token/", post(login))
        .route("/api/token/refresh/", post(refresh))
        .route("/api/logout/", post(logout))
        .route("/api/equipments/", get(list_equipments))
        .route("/api/equipments/{id}/", get(get_equipment))
        .route("/api/user-info/", get(user_info))
        .route("/api/admin/users/", get(admin_users))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn login(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    if password != "secret" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
            .into_response();
    }

    let access = state.valid_token();
    Json(json!({
        "access": access,
        "refresh": "refresh-1",
        "role": if username == "admin" { "admin" } else { "technician" },
        "user": {"id": 1, "username": username, "email": "", "first_name": "",
                 "last_name": "", "is_staff": username == "admin", "is_superuser": false}
    }))
    .into_response()
}

async fn refresh(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    let delay = state.refresh_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if body["refresh"].as_str().unwrap_or_default() != "refresh-1" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired"})),
        )
            .into_response();
    }

    let behavior = *state.refresh_behavior.lock().unwrap();
    match behavior {
        RefreshBehavior::Issue => {
            let n = state.issued_tokens.fetch_add(1, Ordering::SeqCst) + 1;
            let access = format!("access-{n}");
            *state.valid_access_token.lock().unwrap() = access.clone();
            Json(json!({"access": access})).into_response()
        }
        RefreshBehavior::Reject => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired"})),
        )
            .into_response(),
        RefreshBehavior::Malformed => Json(json!({"detail": "ok"})).into_response(),
    }
}

async fn logout(State(_state): State<Arc<StubState>>, _body: Json<Value>) -> Response {
    Json(json!({"detail": "ok"})).into_response()
}

async fn list_equipments(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    state.protected_calls.fetch_add(1, Ordering::SeqCst);
    if !state.authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Given token not valid for any token type"})),
        )
            .into_response();
    }

    Json(json!({
        "count": 1,
        "next": null,
        "previous": null,
        "results": [{"id": 1, "code": "EQ-0001", "name": "Impresora HP",
                     "location": "Piso 1", "created_at": "2025-02-01T08:00:00Z"}]
    }))
    .into_response()
}

async fn get_equipment(
    State(state): State<Arc<StubState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if !state.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id != 1 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Not found."})),
        )
            .into_response();
    }
    Json(json!({"id": 1, "code": "EQ-0001", "name": "Impresora HP",
                "location": "Piso 1", "created_at": "2025-02-01T08:00:00Z"}))
        .into_response()
}

async fn user_info(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({"id": 1, "username": "admin", "groups": ["Admin"]})).into_response()
}

async fn admin_users(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    // 桩里固定当前用户无管理权限
    (
        StatusCode::FORBIDDEN,
        Json(json!({"detail": "You do not have permission to perform this action."})),
    )
        .into_response()
}

/// 创建指向桩服务的测试配置
pub fn test_config(addr: SocketAddr) -> ClientConfig {
    ClientConfig {
        api: ApiConfig {
            base_url: format!("http://{addr}"),
            request_timeout_secs: 5,
        },
        session: SessionConfig {
            idle_timeout_minutes: 30,
            idle_warn_minutes: 1,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        storage: StorageConfig {
            credentials_file: ".mms-credentials-test.json".to_string(),
        },
    }
}

/// 预置了过期访问令牌与有效刷新令牌的存储
pub fn seeded_store(access: &str, refresh: &str) -> Arc<MemoryCredentialStore> {
    let store = Arc::new(MemoryCredentialStore::new());
    store.set(ACCESS_TOKEN_KEY, access);
    store.set(REFRESH_TOKEN_KEY, refresh);
    store.set(USER_ROLE_KEY, "admin");
    store.set(USERNAME_KEY, "admin");
    store
}
