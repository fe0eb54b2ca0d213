//! 认证相关端点

use super::{check_status, expect_json, ApiClient};
use crate::error::Result;
use crate::models::auth::{
    ChangePasswordRequest, LoginRequest, LoginResponse, LoginUser, RefreshRequest, UserInfo,
};
use secrecy::ExposeSecret;
use tracing::{info, warn};
use validator::Validate;

impl ApiClient {
    /// 登录并整体写入四个凭据键
    ///
    /// 登录端点不走认证拦截：失败原样传播，不会触发刷新
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let url = self.endpoint("api/token/")?;
        let response = self.http().post(url.as_str()).json(&request).send().await?;
        let response: LoginResponse = expect_json(response).await?;

        self.credentials().persist_login(username, &response);
        info!(username, role = %response.role, "Login succeeded");
        Ok(response)
    }

    /// 当前用户摘要
    pub async fn user_info(&self) -> Result<UserInfo> {
        self.get_json("api/user-info/").await
    }

    /// 当前用户完整档案
    pub async fn profile(&self) -> Result<LoginUser> {
        self.get_json("api/profile/").await
    }

    /// 修改本人密码
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<()> {
        request.validate()?;
        let url = self.endpoint("api/profile/change-password/")?;
        let response = self
            .send_authorized(|http| Ok(http.post(url.as_str()).json(request)))
            .await?;
        check_status(response).await.map(|_| ())
    }

    /// 登出：尽力通知服务端吊销刷新令牌，然后清除本地凭据
    ///
    /// 服务端通知失败不阻止本地登出
    pub async fn logout(&self) -> Result<()> {
        if let Some(refresh) = self.credentials().refresh_token() {
            let url = self.endpoint("api/logout/")?;
            let body = RefreshRequest {
                refresh: refresh.expose_secret().clone(),
            };
            let result = self
                .send_authorized(|http| Ok(http.post(url.as_str()).json(&body)))
                .await;
            if let Err(err) = result {
                warn!(error = %err, "Server-side logout failed, clearing local credentials anyway");
            }
        }

        self.credentials().clear();
        info!("Logged out, local credentials cleared");
        Ok(())
    }
}
