//! Reusable helpers for database integration tests.
//!
//! Database tests are `#[ignore]`d; run them with `cargo test -- --ignored`
//! against the docker container described in `Config::default_for_test`.
#![allow(dead_code)]

use sqlx::PgPool;
use tokio::sync::OnceCell;
use uuid::Uuid;

use cadenza_server::config::Config;
use cadenza_server::users::{self, NewUser, User};
use cadenza_server::{db, permissions};

/// Shared database pool across all tests in the same binary.
static SHARED_POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Get or create a shared, migrated, role-seeded pool.
pub async fn shared_pool() -> &'static PgPool {
    SHARED_POOL
        .get_or_init(|| async {
            let config = Config::default_for_test();
            let pool = db::create_pool(&config.database_url)
                .await
                .expect("connect to test database");
            db::run_migrations(&pool).await.expect("run migrations");
            permissions::reconcile_roles(
                &pool,
                permissions::DEFAULT_ROLE_TABLE,
                &config.default_role,
            )
            .await
            .expect("reconcile roles");
            pool
        })
        .await
}

/// Generate a unique name so tests can share one database.
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::now_v7().simple())
}

/// Create a user with the default role and a unique username/email.
pub async fn create_test_user(pool: &PgPool, prefix: &str) -> User {
    let name = unique_name(prefix);
    users::create_user(
        pool,
        &NewUser {
            username: name.clone(),
            email: format!("{name}@example.com"),
            password: "correct-horse-battery".into(),
            display_name: None,
            location: None,
            bio: None,
            role_id: None,
        },
    )
    .await
    .expect("create test user")
}
