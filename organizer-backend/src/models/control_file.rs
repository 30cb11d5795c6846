use serde::{Deserialize, Serialize};

use crate::ordering::ControlOrder;

/// Board metadata of a plans/docs file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlFile {
    pub id: i64,
    /// File this row belongs to
    pub file_id: i64,
    pub name_file: String,
    pub topic_id: i64,
    pub is_plan: bool,
    pub order_index: ControlOrder,
    pub modification_alert: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateControlFileRequest {
    pub is_plan: Option<bool>,
    pub modification_alert: Option<bool>,
    pub order_index: Option<usize>,
}
