mod common;

use setlog::error::AppError;
use setlog::models::{CreateWorkout, NewWorkoutEntry, Workout};
use setlog::repositories::WorkoutRepository;

fn entry(
    name: &str,
    order_index: i64,
    reps: Option<i64>,
    duration_seconds: Option<i64>,
) -> NewWorkoutEntry {
    NewWorkoutEntry {
        exercise_name: name.to_string(),
        sets: 3,
        reps,
        duration_seconds,
        weight: None,
        notes: String::new(),
        order_index,
    }
}

fn count_rows(pool: &setlog::db::DbPool, table: &str) -> i64 {
    let conn = pool.get().unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[tokio::test]
async fn test_create_then_get_orders_entries_by_order_index() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "owner", "a strong password").await;
    let repo = WorkoutRepository::new(pool.clone());

    // Entries deliberately inserted out of display order
    let created = repo
        .create(
            user.id,
            CreateWorkout {
                title: "Morning full body".to_string(),
                description: "quick".to_string(),
                duration_minutes: 40,
                calories_burned: 250,
                entries: vec![
                    entry("Plank", 3, None, Some(60)),
                    entry("Squat", 1, Some(8), None),
                    entry("Bench press", 2, Some(5), None),
                ],
            },
        )
        .await
        .unwrap();

    assert!(created.id > 0);
    assert_eq!(created.user_id, user.id);
    assert!(created.entries.iter().all(|e| e.id > 0));

    let fetched = repo.get(created.id).await.unwrap().unwrap();
    let order: Vec<i64> = fetched.entries.iter().map(|e| e.order_index).collect();
    assert_eq!(order, vec![1, 2, 3]);
    assert_eq!(fetched.entries[0].exercise_name, "Squat");
    assert_eq!(fetched.entries[2].duration_seconds, Some(60));
}

#[tokio::test]
async fn test_create_rolls_back_completely_on_invalid_entry() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "owner", "a strong password").await;
    let repo = WorkoutRepository::new(pool.clone());

    // Second entry carries both reps and duration, which the schema rejects
    let result = repo
        .create(
            user.id,
            CreateWorkout {
                title: "Broken".to_string(),
                description: String::new(),
                duration_minutes: 30,
                calories_burned: 200,
                entries: vec![
                    entry("Squat", 1, Some(8), None),
                    NewWorkoutEntry {
                        exercise_name: "Row".to_string(),
                        sets: 3,
                        reps: Some(10),
                        duration_seconds: Some(90),
                        weight: None,
                        notes: String::new(),
                        order_index: 2,
                    },
                ],
            },
        )
        .await;

    assert!(result.is_err());
    // No orphan workout row, no stray entries
    assert_eq!(count_rows(&pool, "workouts"), 0);
    assert_eq!(count_rows(&pool, "workout_entries"), 0);
}

#[tokio::test]
async fn test_get_missing_workout_returns_none() {
    let pool = common::setup_test_db();
    let repo = WorkoutRepository::new(pool.clone());

    assert!(repo.get(42).await.unwrap().is_none());
    assert!(repo.get_owner(42).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_nonexistent_workout_is_not_found() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "owner", "a strong password").await;
    let repo = WorkoutRepository::new(pool.clone());

    let ghost = Workout {
        id: 9999,
        user_id: user.id,
        title: "ghost".to_string(),
        description: String::new(),
        duration_minutes: 10,
        calories_burned: 50,
        entries: Vec::new(),
    };

    let err = repo.update(&ghost, None).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(count_rows(&pool, "workouts"), 0);
}

#[tokio::test]
async fn test_update_replaces_entries_wholesale() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "owner", "a strong password").await;
    let repo = WorkoutRepository::new(pool.clone());

    let created = repo
        .create(
            user.id,
            CreateWorkout {
                title: "Push day".to_string(),
                description: String::new(),
                duration_minutes: 60,
                calories_burned: 400,
                entries: vec![
                    entry("Bench press", 1, Some(5), None),
                    entry("Overhead press", 2, Some(8), None),
                ],
            },
        )
        .await
        .unwrap();

    let mut updated = created.clone();
    updated.title = "Push day (deload)".to_string();
    repo.update(&updated, Some(vec![entry("Dips", 1, Some(12), None)]))
        .await
        .unwrap();

    let fetched = repo.get(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Push day (deload)");
    assert_eq!(fetched.entries.len(), 1);
    assert_eq!(fetched.entries[0].exercise_name, "Dips");
    // Replaced entries get fresh ids
    assert!(created.entries.iter().all(|e| e.id != fetched.entries[0].id));
}

#[tokio::test]
async fn test_update_without_entries_leaves_children_untouched() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "owner", "a strong password").await;
    let repo = WorkoutRepository::new(pool.clone());

    let created = repo
        .create(
            user.id,
            CreateWorkout {
                title: "Leg day".to_string(),
                description: String::new(),
                duration_minutes: 45,
                calories_burned: 350,
                entries: vec![entry("Squat", 1, Some(8), None)],
            },
        )
        .await
        .unwrap();

    let mut updated = created.clone();
    updated.calories_burned = 500;
    repo.update(&updated, None).await.unwrap();

    let fetched = repo.get(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.calories_burned, 500);
    assert_eq!(fetched.entries.len(), 1);
    assert_eq!(fetched.entries[0].id, created.entries[0].id);
}

#[tokio::test]
async fn test_delete_cascades_to_entries() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "owner", "a strong password").await;
    let repo = WorkoutRepository::new(pool.clone());

    let created = repo
        .create(
            user.id,
            CreateWorkout {
                title: "Conditioning".to_string(),
                description: String::new(),
                duration_minutes: 20,
                calories_burned: 180,
                entries: vec![
                    entry("Burpees", 1, Some(15), None),
                    entry("Plank", 2, None, Some(60)),
                ],
            },
        )
        .await
        .unwrap();

    repo.delete(created.id).await.unwrap();

    assert!(repo.get(created.id).await.unwrap().is_none());
    assert_eq!(count_rows(&pool, "workout_entries"), 0);

    let err = repo.delete(created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_get_owner_returns_owning_user_id() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "owner", "a strong password").await;
    let repo = WorkoutRepository::new(pool.clone());

    let created = repo
        .create(
            user.id,
            CreateWorkout {
                title: "Row intervals".to_string(),
                description: String::new(),
                duration_minutes: 30,
                calories_burned: 220,
                entries: vec![entry("Row", 1, None, Some(1800))],
            },
        )
        .await
        .unwrap();

    assert_eq!(repo.get_owner(created.id).await.unwrap(), Some(user.id));
}
