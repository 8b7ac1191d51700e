//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database is reachable, that the
//! bundled migrations apply, and that the schema enforces the uniqueness and
//! ownership constraints the services rely on. They need a live database and
//! run with `cargo test -- --ignored`.

use common::{
    database::{DatabaseConfig, health_check, init_pool, run_migrations},
    error::DatabaseError,
};
use sqlx::Row;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    // Migrations are idempotent
    run_migrations(&pool).await?;
    run_migrations(&pool).await?;

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_schema_constraints() -> Result<(), Box<dyn std::error::Error>> {
    let pool = init_pool(&DatabaseConfig::from_env()?).await?;
    run_migrations(&pool).await?;

    let user_id = Uuid::new_v4();
    let username = format!("constraint-{}", user_id);
    let insert_user = "INSERT INTO users (id, username, password_hash) VALUES ($1, $2, 'x')";

    sqlx::query(insert_user)
        .bind(user_id)
        .bind(&username)
        .execute(&pool)
        .await?;

    let duplicate = sqlx::query(insert_user)
        .bind(Uuid::new_v4())
        .bind(&username)
        .execute(&pool)
        .await
        .map_err(DatabaseError::from_query);
    assert!(matches!(duplicate, Err(DatabaseError::UniqueViolation(_))));

    let orphan = sqlx::query("INSERT INTO notes (id, user_id, title, text) VALUES ($1, $2, $3, 'b')")
        .bind(Uuid::new_v4())
        .bind(Uuid::new_v4())
        .bind(format!("orphan-{}", user_id))
        .execute(&pool)
        .await
        .map_err(DatabaseError::from_query);
    assert!(matches!(orphan, Err(DatabaseError::ForeignKeyViolation(_))));

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await?;

    Ok(())
}
