use std::sync::Arc;

use diesel::r2d2::{self, ConnectionManager};
use diesel::SqliteConnection;
use diesel_migrations::MigrationHarness;
use dotenvy::dotenv;
use tokio::net::TcpListener;

use inovalink_backend::repositories::submission_store::SubmissionStore;
use inovalink_backend::utils::email::Notifier;
use inovalink_backend::{app, AppState, MIGRATIONS};

pub fn validate_env() {
    let required_vars = ["DATABASE_URL"];
    for var in required_vars.iter() {
        std::env::var(var).unwrap_or_else(|_| panic!("{} must be set", var));
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inovalink_backend=debug"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    validate_env();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set in environment");
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .build(manager)
        .expect("Failed to create pool");
    {
        let mut conn = pool.get().expect("Failed to get DB connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Failed to run migrations");
    }

    let notifier = Notifier::from_env();
    if !notifier.is_enabled() {
        tracing::warn!("SMTP not configured; contact notifications are disabled");
    }

    let state = Arc::new(AppState {
        submission_store: Arc::new(SubmissionStore::new(pool)),
        notifier: Arc::new(notifier),
    });

    let app = app(state);
    let port = match std::env::var("ENVIRONMENT").as_deref() {
        Ok("staging") => 3100,
        _ => 3000,
    };
    tracing::info!("Starting server on port {}", port);
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind port");
    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
