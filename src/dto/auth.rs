use serde::{Deserialize, Serialize};

pub const STATUS_SUCCESS: &str = "SUCCESS";

// {"token":"SESSION_TOKEN","product":"APP_KEY","status":"SUCCESS","error":""}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractiveLoginResponse {
    pub token: String,
    pub product: String,
    pub status: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CertificateLoginResponse {
    pub session_token: String,
    pub login_status: String,
}

/// Same shape as the interactive login answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeepAliveResponse {
    pub token: String,
    pub product: String,
    pub status: String,
    pub error: String,
}

impl InteractiveLoginResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

impl CertificateLoginResponse {
    pub fn is_success(&self) -> bool {
        self.login_status == STATUS_SUCCESS
    }
}

impl KeepAliveResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}
