use rusqlite::{OptionalExtension, Transaction};

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{CreateWorkout, FromSqliteRow, NewWorkoutEntry, Workout, WorkoutEntry};

#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a workout and its entries as one atomic unit.
    ///
    /// If any entry insert fails the workout row is rolled back with it, so
    /// no partial workout is ever visible to another reader. The returned
    /// workout carries the server-assigned ids, entries included.
    pub async fn create(&self, user_id: i64, workout: CreateWorkout) -> Result<Workout> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Workout> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO workouts (user_id, title, description, duration_minutes, calories_burned)
                 VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![
                    user_id,
                    workout.title,
                    workout.description,
                    workout.duration_minutes,
                    workout.calories_burned
                ],
            )?;
            let workout_id = tx.last_insert_rowid();

            let mut entries = Vec::with_capacity(workout.entries.len());
            for entry in &workout.entries {
                entries.push(insert_entry(&tx, workout_id, entry)?);
            }

            tx.commit()?;

            Ok(Workout {
                id: workout_id,
                user_id,
                title: workout.title,
                description: workout.description,
                duration_minutes: workout.duration_minutes,
                calories_burned: workout.calories_burned,
                entries,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Fetch a workout with its entries in ascending order-index order.
    ///
    /// An absent workout is `Ok(None)`. If the workout row exists but the
    /// entries query fails, the whole call errors rather than returning a
    /// workout with a falsely empty entry list.
    pub async fn get(&self, id: i64) -> Result<Option<Workout>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Option<Workout>> {
            let conn = pool.get()?;

            let workout = conn
                .query_row(
                    "SELECT id, user_id, title, description, duration_minutes, calories_burned
                     FROM workouts WHERE id = ?",
                    [id],
                    Workout::from_row,
                )
                .optional()?;

            let Some(mut workout) = workout else {
                return Ok(None);
            };

            let mut stmt = conn.prepare(
                "SELECT id, exercise_name, sets, reps, duration_seconds, weight, notes, order_index
                 FROM workout_entries
                 WHERE workout_id = ?
                 ORDER BY order_index ASC",
            )?;
            workout.entries = stmt
                .query_map([id], WorkoutEntry::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(Some(workout))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Update the workout row, and optionally replace its entries wholesale.
    ///
    /// `entries: None` leaves the child rows untouched; `Some` deletes them
    /// all and reinserts the given list with fresh ids. Updating an id with
    /// no row is a not-found error, never a silent success, and nothing is
    /// committed unless every statement succeeded.
    pub async fn update(
        &self,
        workout: &Workout,
        entries: Option<Vec<NewWorkoutEntry>>,
    ) -> Result<()> {
        let pool = self.pool.clone();
        let id = workout.id;
        let title = workout.title.clone();
        let description = workout.description.clone();
        let duration_minutes = workout.duration_minutes;
        let calories_burned = workout.calories_burned;

        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let rows = tx.execute(
                "UPDATE workouts
                 SET title = ?, description = ?, duration_minutes = ?, calories_burned = ?
                 WHERE id = ?",
                rusqlite::params![title, description, duration_minutes, calories_burned, id],
            )?;
            if rows == 0 {
                return Err(AppError::NotFound("workout not found".to_string()));
            }

            if let Some(entries) = entries {
                tx.execute("DELETE FROM workout_entries WHERE workout_id = ?", [id])?;
                for entry in &entries {
                    insert_entry(&tx, id, entry)?;
                }
            }

            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Owner lookup for authorization decisions in the handler layer.
    pub async fn get_owner(&self, id: i64) -> Result<Option<i64>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let owner = conn
                .query_row("SELECT user_id FROM workouts WHERE id = ?", [id], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(owner)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Delete a workout; entry rows cascade at the schema level.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM workouts WHERE id = ?", [id])?;
            if rows == 0 {
                return Err(AppError::NotFound("workout not found".to_string()));
            }
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn insert_entry(tx: &Transaction, workout_id: i64, entry: &NewWorkoutEntry) -> Result<WorkoutEntry> {
    tx.execute(
        "INSERT INTO workout_entries
             (workout_id, exercise_name, sets, reps, duration_seconds, weight, notes, order_index)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            workout_id,
            entry.exercise_name,
            entry.sets,
            entry.reps,
            entry.duration_seconds,
            entry.weight,
            entry.notes,
            entry.order_index
        ],
    )?;

    Ok(WorkoutEntry {
        id: tx.last_insert_rowid(),
        exercise_name: entry.exercise_name.clone(),
        sets: entry.sets,
        reps: entry.reps,
        duration_seconds: entry.duration_seconds,
        weight: entry.weight,
        notes: entry.notes.clone(),
        order_index: entry.order_index,
    })
}
