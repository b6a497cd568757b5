use axum::{body::Body, response::Response, Router};
use http_body_util::BodyExt;

use setlog::db::{create_memory_pool, DbPool};
use setlog::migrations::run_migrations_for_tests;
use setlog::models::token::SCOPE_AUTHENTICATION;
use setlog::models::User;
use setlog::repositories::{TokenRepository, UserRepository, WorkoutRepository};

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn create_test_app(pool: DbPool) -> Router {
    use setlog::handlers::{tokens, users, workouts};

    // Create repositories
    let user_repo = UserRepository::new(pool.clone());
    let token_repo = TokenRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());

    // Create handler states
    let users_state = users::UsersState {
        user_repo: user_repo.clone(),
    };
    let tokens_state = tokens::TokensState {
        token_repo,
        user_repo: user_repo.clone(),
    };
    let workouts_state = workouts::WorkoutsState { workout_repo };

    setlog::routes::create_router(users_state, tokens_state, workouts_state, user_repo)
}

#[allow(dead_code)]
pub async fn create_test_user(pool: &DbPool, username: &str, password: &str) -> User {
    let user_repo = UserRepository::new(pool.clone());
    user_repo
        .create(
            username,
            &format!("{}@example.com", username),
            password,
            "",
        )
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn issue_test_token(pool: &DbPool, user: &User) -> String {
    let token_repo = TokenRepository::new(pool.clone());
    let token = token_repo
        .create(user.id, chrono::Duration::hours(1), SCOPE_AUTHENTICATION)
        .await
        .unwrap();
    token.plaintext
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
