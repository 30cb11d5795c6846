use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub file_id: i64,
    pub text: String,
    pub date: Option<String>,
    pub done: bool,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    pub file_id: i64,
    pub text: String,
    pub date: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub order: i64,
}
