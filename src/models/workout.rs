use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize)]
pub struct Workout {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    #[serde(rename = "duration")]
    pub duration_minutes: i64,
    pub calories_burned: i64,
    pub entries: Vec<WorkoutEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutEntry {
    pub id: i64,
    pub exercise_name: String,
    pub sets: i64,
    pub reps: Option<i64>,
    pub duration_seconds: Option<i64>,
    pub weight: Option<f64>,
    pub notes: String,
    pub order_index: i64,
}

impl FromSqliteRow for Workout {
    /// Maps the workout row only; entries are fetched separately and attached.
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            duration_minutes: row.get("duration_minutes")?,
            calories_burned: row.get("calories_burned")?,
            entries: Vec::new(),
        })
    }
}

impl FromSqliteRow for WorkoutEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            exercise_name: row.get("exercise_name")?,
            sets: row.get("sets")?,
            reps: row.get("reps")?,
            duration_seconds: row.get("duration_seconds")?,
            weight: row.get("weight")?,
            notes: row.get("notes")?,
            order_index: row.get("order_index")?,
        })
    }
}

/// An entry as supplied by the client. Server-assigned ids are absent; they
/// appear once the persistence transaction returns.
#[derive(Debug, Clone, Deserialize)]
pub struct NewWorkoutEntry {
    pub exercise_name: String,
    pub sets: i64,
    pub reps: Option<i64>,
    pub duration_seconds: Option<i64>,
    pub weight: Option<f64>,
    #[serde(default)]
    pub notes: String,
    pub order_index: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkout {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "duration")]
    pub duration_minutes: i64,
    pub calories_burned: i64,
    #[serde(default)]
    pub entries: Vec<NewWorkoutEntry>,
}

/// Partial update payload. Each `Option` distinguishes "field omitted" from
/// "field set"; `entries`, when present, replaces the whole list.
#[derive(Debug, Deserialize)]
pub struct UpdateWorkout {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "duration")]
    pub duration_minutes: Option<i64>,
    pub calories_burned: Option<i64>,
    pub entries: Option<Vec<NewWorkoutEntry>>,
}
