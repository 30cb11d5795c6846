use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteScore {
    pub category: String,
    pub score: i64,
}

/// One journal note version, identified by its client-chosen signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreenNote {
    pub signature: String,
    pub date: String,
    pub good_1: String,
    pub good_2: String,
    pub good_3: String,
    pub improve: String,
    pub scores: Vec<NoteScore>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGreenNoteRequest {
    pub signature: String,
    pub date: String,
    #[serde(default)]
    pub good_1: String,
    #[serde(default)]
    pub good_2: String,
    #[serde(default)]
    pub good_3: String,
    #[serde(default)]
    pub improve: String,
    #[serde(default)]
    pub scores: Vec<NoteScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteSignature {
    pub signature: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceNoteTopicsRequest {
    pub topics: Vec<String>,
}
