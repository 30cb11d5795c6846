use serde::{Deserialize, Serialize};

use crate::ordering::TopicOrder;

/// A named, colored category of files living in one house
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub house: String,
    pub name: String,
    pub color: String,
    pub order: TopicOrder,
    pub flat: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTopicRequest {
    pub name: String,
    #[serde(default)]
    pub color: String,
    /// Falls back to the default house
    pub house: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTopicRequest {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveTopicRequest {
    pub house: String,
    pub index: usize,
}
