use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ordering::{BacklogOrder, TaskOrder};

/// Board card backed by a `tasks`-section file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub file_id: i64,
    pub topic_id: i64,
    pub file_name: String,
    /// Board bucket label, unrelated to the file section
    pub section: String,
    pub order: TaskOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub topic_id: i64,
    pub name: String,
}

/// Full board layout: section label -> task ids top to bottom
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderTasksRequest {
    pub sections: BTreeMap<String, Vec<i64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveTaskRequest {
    pub section: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnclassifiedTask {
    pub order: BacklogOrder,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddUnclassifiedTaskRequest {
    pub content: String,
}

/// Backlog rows have no stable id; they are addressed by content and position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUnclassifiedTaskRequest {
    pub content: String,
    pub order: BacklogOrder,
}
