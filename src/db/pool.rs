use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("Database connection established");

    Ok(pool)
}

/// Apply the schema. Statements that hit existing objects are skipped, so this is safe on every start.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Running database migrations...");

    let migrations = [
        include_str!("../../migrations/001_users.sql"),
        include_str!("../../migrations/002_strikes.sql"),
        include_str!("../../migrations/003_bans.sql"),
    ];

    for (i, migration) in migrations.iter().enumerate() {
        info!("Running migration {}", i + 1);
        for statement in migration.split(';') {
            let statement = statement.trim();
            if statement.is_empty() {
                continue;
            }
            if let Err(e) = sqlx::query(statement).execute(pool).await {
                let err_str = e.to_string();
                if !err_str.contains("already exists") && !err_str.contains("duplicate key") {
                    return Err(e);
                }
            }
        }
    }

    info!("Migrations completed successfully");
    Ok(())
}
