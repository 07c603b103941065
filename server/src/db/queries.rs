//! Database Queries
//!
//! Runtime queries (no compile-time `DATABASE_URL` required).

use kd_common::Role;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::models::User;

/// Log and return a database error with context.
macro_rules! db_error {
    ($query:expr, $($field:tt)*) => {
        |e| {
            error!(query = $query, $($field)*, error = %e, "Database query failed");
            e
        }
    };
}

/// Find user by ID.
pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "SELECT id, role, name, email, phone, created_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("find_user_by_id", user_id = %id))
}

/// Create a user.
///
/// Production users are created by the sign-in callback; this is used for
/// seeding and tests.
pub async fn create_user(
    pool: &PgPool,
    role: Role,
    name: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(
        r"
        INSERT INTO users (role, name, email, phone)
        VALUES ($1, $2, $3, $4)
        RETURNING id, role, name, email, phone, created_at
        ",
    )
    .bind(role.as_str())
    .bind(name)
    .bind(email)
    .bind(phone)
    .fetch_one(pool)
    .await
    .map_err(db_error!("create_user", role = %role))
}

/// Delete a user by ID.
pub async fn delete_user(pool: &PgPool, id: Uuid) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(db_error!("delete_user", user_id = %id))?;
    Ok(())
}
