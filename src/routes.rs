use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::{health, tokens, users, workouts};
use crate::middleware::authenticate;
use crate::repositories::UserRepository;

pub fn create_router(
    users_state: users::UsersState,
    tokens_state: tokens::TokensState,
    workouts_state: workouts::WorkoutsState,
    user_repo: UserRepository,
) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        // Registration
        .route("/users", post(users::register))
        .with_state(users_state)
        // Login
        .route(
            "/tokens/authentication",
            post(tokens::create_authentication_token),
        )
        .with_state(tokens_state)
        // Workouts
        .route("/workouts", post(workouts::create))
        .route(
            "/workouts/{id}",
            get(workouts::get_by_id)
                .patch(workouts::update)
                .delete(workouts::delete),
        )
        .with_state(workouts_state)
        // Identity resolution wraps every route
        .layer(middleware::from_fn_with_state(user_repo, authenticate))
}
