use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingItem {
    pub name: String,
    /// Day the `done` counter belongs to (`YYYY-MM-DD`)
    pub time: String,
    pub amount: i64,
    pub done: i64,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrackingRequest {
    pub name: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub content: String,
}

/// A single check or uncheck of a tracked habit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneDelta {
    Increment,
    Decrement,
}

impl DoneDelta {
    pub fn from_i64(delta: i64) -> Option<Self> {
        match delta {
            1 => Some(DoneDelta::Increment),
            -1 => Some(DoneDelta::Decrement),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> i64 {
        match self {
            DoneDelta::Increment => 1,
            DoneDelta::Decrement => -1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoneRequest {
    pub delta: i64,
}
