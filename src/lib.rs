use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use diesel::r2d2::{self, ConnectionManager};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub mod handlers {
    pub mod contact_handlers;
    pub mod responses;
    pub mod waitlist_handlers;
}
pub mod models {
    pub mod submission_models;
}
pub mod repositories {
    pub mod submission_store;
}
pub mod utils {
    pub mod email;
}
pub mod schema;
pub mod validation;

use repositories::submission_store::SubmissionStore;
use utils::email::ContactNotifier;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub struct AppState {
    pub submission_store: Arc<SubmissionStore>,
    pub notifier: Arc<dyn ContactNotifier>,
}

async fn health_check() -> &'static str {
    "OK"
}

/// Contact uploads can carry up to three 25MB files, so the default 2MB
/// body cap is raised well past that.
const MAX_BODY_SIZE: usize = 80 * 1024 * 1024;

pub fn app(state: Arc<AppState>) -> Router {
    let frontend_url =
        std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/contact", post(handlers::contact_handlers::submit_contact))
        .route(
            "/api/waitlist",
            post(handlers::waitlist_handlers::join_waitlist)
                .get(handlers::waitlist_handlers::get_waitlist),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(
            CorsLayer::new()
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_origin(AllowOrigin::exact(
                    frontend_url.parse().expect("Invalid FRONTEND_URL"),
                ))
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                    axum::http::header::ORIGIN,
                ]),
        )
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use diesel_migrations::MigrationHarness;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::utils::email::NotifierError;
    use crate::validation::{UploadedFile, ValidatedContact};

    /// Counts invocations instead of talking to SMTP, so tests can assert
    /// that rejected submissions never reach the notifier.
    #[derive(Default)]
    pub struct RecordingNotifier {
        sends: AtomicUsize,
    }

    impl RecordingNotifier {
        pub fn sends(&self) -> usize {
            self.sends.load(Ordering::SeqCst)
        }
    }

    impl ContactNotifier for RecordingNotifier {
        fn send_contact_notification(
            &self,
            _contact: &ValidatedContact,
            _files: &[UploadedFile],
        ) -> Result<(), NotifierError> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// In-memory SQLite gives each connection its own database, so the pool
    /// is capped at a single connection that everything shares.
    pub fn test_pool() -> DbPool {
        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .build(manager)
            .expect("Failed to create test pool");
        {
            let mut conn = pool.get().expect("Failed to get DB connection");
            conn.run_pending_migrations(MIGRATIONS)
                .expect("Failed to run migrations");
        }
        pool
    }

    pub fn test_state() -> (Arc<AppState>, DbPool) {
        let (state, pool, _) = test_state_with_notifier();
        (state, pool)
    }

    pub fn test_state_with_notifier() -> (Arc<AppState>, DbPool, Arc<RecordingNotifier>) {
        let pool = test_pool();
        let notifier = Arc::new(RecordingNotifier::default());
        let state = Arc::new(AppState {
            submission_store: Arc::new(SubmissionStore::new(pool.clone())),
            notifier: notifier.clone(),
        });
        (state, pool, notifier)
    }
}
