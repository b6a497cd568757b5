use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use setlog::config::Config;
use setlog::handlers::{tokens, users, workouts};
use setlog::repositories::{TokenRepository, UserRepository, WorkoutRepository};
use setlog::{db, migrations, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "setlog=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database: {}", config.database_url);

    let pool = db::create_pool(&config.database_url)?;

    // Fatal on failure: the server must not take traffic on an unmigrated schema.
    migrations::run_migrations(&pool)?;

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

    // Build router
    let app = routes::create_router(users_state, tokens_state, workouts_state, user_repo);

    // Start server
    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
