use serde::{Deserialize, Serialize};

use dreamtales_story::Lang;

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct ModerateRequest {
    pub text: String,
    pub language: Lang,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModerateResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
