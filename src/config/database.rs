//! Database configuration module for the treasury core.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary
//! tables based on the entity definitions. The module uses `SeaORM`'s
//! `Schema::create_table_from_entity` method to automatically generate SQL statements from
//! the entity models, ensuring that the database schema matches the Rust struct definitions
//! without requiring manual SQL.

use crate::entities::{AnnualRecord, Expense, Project, Revenue};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found. A `.env` file is honored when present.
pub fn get_database_url() -> String {
    dotenvy::dotenv().ok();
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/treasury.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// This function uses the `DeriveEntityModel` macros to automatically generate proper SQL
/// statements for table creation. It creates tables for projects, expenses, revenue, and
/// annual records.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let project_table = schema.create_table_from_entity(Project);
    let expense_table = schema.create_table_from_entity(Expense);
    let revenue_table = schema.create_table_from_entity(Revenue);
    let annual_record_table = schema.create_table_from_entity(AnnualRecord);

    db.execute(builder.build(&project_table)).await?;
    db.execute(builder.build(&expense_table)).await?;
    db.execute(builder.build(&revenue_table)).await?;
    db.execute(builder.build(&annual_record_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        annual_record::Model as AnnualRecordModel, expense::Model as ExpenseModel,
        project::Model as ProjectModel, revenue::Model as RevenueModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<ProjectModel> = Project::find().limit(1).all(&db).await?;
        let _: Vec<ExpenseModel> = Expense::find().limit(1).all(&db).await?;
        let _: Vec<RevenueModel> = Revenue::find().limit(1).all(&db).await?;
        let _: Vec<AnnualRecordModel> = AnnualRecord::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_connection_queryable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let _: Vec<ProjectModel> = Project::find().limit(1).all(&db).await?;
        Ok(())
    }
}
