//! 凭据存储
//! 固定四个键：登录时整体写入，刷新时只覆盖访问令牌，登出时整体清除

use crate::models::auth::{LoginResponse, Role};
use secrecy::{ExposeSecret, Secret};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::warn;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_ROLE_KEY: &str = "user_role";
pub const USERNAME_KEY: &str = "username";

/// 登录/登出作为整体读写的键集合
pub const CREDENTIAL_KEYS: [&str; 4] = [
    ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    USER_ROLE_KEY,
    USERNAME_KEY,
];

/// 键值凭据存储能力
///
/// 核心逻辑不关心存储位置；宿主注入实现（内存、文件、系统钥匙串等）
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// 进程内存存储（测试与嵌入宿主默认）
#[derive(Default)]
pub struct MemoryCredentialStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        read_lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        write_lock(&self.values).insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        write_lock(&self.values).remove(key);
    }
}

/// JSON 文件存储（CLI 在两次调用之间保持登录态）
pub struct FileCredentialStore {
    path: PathBuf,
    values: RwLock<HashMap<String, String>>,
}

impl FileCredentialStore {
    /// 打开（或创建）凭据文件
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<Map<String, Value>>(&raw)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
                .collect(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err),
        };
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    fn persist(&self, values: &HashMap<String, String>) {
        let map: Map<String, Value> = values
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        let raw = Value::Object(map).to_string();
        if let Err(err) = std::fs::write(&self.path, raw) {
            warn!(path = %self.path.display(), error = %err, "Failed to persist credentials");
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        read_lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = write_lock(&self.values);
        values.insert(key.to_string(), value.to_string());
        self.persist(&values);
    }

    fn remove(&self, key: &str) {
        let mut values = write_lock(&self.values);
        if values.remove(key).is_some() {
            self.persist(&values);
        }
    }
}

// 锁中毒时继续使用内部数据；存储只有整键覆盖写，不存在半更新状态
fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

/// 四个凭据键之上的读写规则
///
/// 写入方只有两个：登录成功与刷新成功；清除方只有强制/手动登出
#[derive(Clone)]
pub struct Credentials {
    store: Arc<dyn CredentialStore>,
}

impl Credentials {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub fn access_token(&self) -> Option<Secret<String>> {
        self.store.get(ACCESS_TOKEN_KEY).map(Secret::new)
    }

    pub fn refresh_token(&self) -> Option<Secret<String>> {
        self.store.get(REFRESH_TOKEN_KEY).map(Secret::new)
    }

    pub fn username(&self) -> Option<String> {
        self.store.get(USERNAME_KEY)
    }

    pub fn role(&self) -> Option<Role> {
        self.store.get(USER_ROLE_KEY).and_then(|r| Role::parse(&r))
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.get(ACCESS_TOKEN_KEY).is_some()
    }

    /// 登录成功：四个键一次写入
    pub fn persist_login(&self, username: &str, response: &LoginResponse) {
        self.store.set(ACCESS_TOKEN_KEY, &response.access);
        self.store.set(REFRESH_TOKEN_KEY, &response.refresh);
        self.store.set(USER_ROLE_KEY, &response.role);
        self.store.set(USERNAME_KEY, username);
    }

    /// 刷新成功：只覆盖访问令牌
    pub fn replace_access_token(&self, token: &Secret<String>) {
        self.store.set(ACCESS_TOKEN_KEY, token.expose_secret());
    }

    /// 登出：四个键一次清除
    pub fn clear(&self) {
        for key in CREDENTIAL_KEYS {
            self.store.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_response() -> LoginResponse {
        LoginResponse {
            access: "acc-1".to_string(),
            refresh: "ref-1".to_string(),
            role: "admin".to_string(),
            user: None,
        }
    }

    #[test]
    fn test_persist_login_writes_all_keys() {
        let store = Arc::new(MemoryCredentialStore::new());
        let credentials = Credentials::new(store.clone());

        credentials.persist_login("admin", &login_response());

        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("acc-1"));
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("ref-1"));
        assert_eq!(store.get(USER_ROLE_KEY).as_deref(), Some("admin"));
        assert_eq!(store.get(USERNAME_KEY).as_deref(), Some("admin"));
        assert!(credentials.is_authenticated());
        assert_eq!(credentials.role(), Some(Role::Admin));
    }

    #[test]
    fn test_replace_access_token_leaves_other_keys() {
        let store = Arc::new(MemoryCredentialStore::new());
        let credentials = Credentials::new(store.clone());
        credentials.persist_login("admin", &login_response());

        credentials.replace_access_token(&Secret::new("acc-2".to_string()));

        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("acc-2"));
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("ref-1"));
        assert_eq!(store.get(USERNAME_KEY).as_deref(), Some("admin"));
    }

    #[test]
    fn test_clear_removes_all_keys() {
        let store = Arc::new(MemoryCredentialStore::new());
        let credentials = Credentials::new(store.clone());
        credentials.persist_login("admin", &login_response());

        credentials.clear();

        for key in CREDENTIAL_KEYS {
            assert!(store.get(key).is_none(), "key {key} should be cleared");
        }
        assert!(!credentials.is_authenticated());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        {
            let store = FileCredentialStore::open(&path).unwrap();
            store.set(ACCESS_TOKEN_KEY, "acc-1");
            store.set(USERNAME_KEY, "admin");
        }

        // 重新打开应读回持久化内容
        let store = FileCredentialStore::open(&path).unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("acc-1"));
        assert_eq!(store.get(USERNAME_KEY).as_deref(), Some("admin"));

        store.remove(ACCESS_TOKEN_KEY);
        let store = FileCredentialStore::open(&path).unwrap();
        assert!(store.get(ACCESS_TOKEN_KEY).is_none());
    }

    #[test]
    fn test_unknown_role_maps_to_none() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.set(USER_ROLE_KEY, "user");
        let credentials = Credentials::new(store);
        assert_eq!(credentials.role(), None);
    }
}
