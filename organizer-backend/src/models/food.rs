use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: i64,
    pub date: String,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFoodRequest {
    pub date: String,
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodDayQuery {
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteFoodQuery {
    pub name: String,
    pub date: String,
}
