//! Shared test utilities for the treasury core.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test projects with sensible defaults.

use crate::{
    core::project::{self, ExpenseInput, ProjectInput, ProjectStatus, RevenueInput},
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// An expense line with sensible defaults.
///
/// # Defaults
/// * `name`: `"Test expense"`
/// * `store_name`: `"Test store"`
/// * `mode_of_payment`: `"cash"`
#[must_use]
pub fn expense_input(unit_price: f64, quantity: i32) -> ExpenseInput {
    ExpenseInput {
        name: "Test expense".to_string(),
        description: None,
        store_name: "Test store".to_string(),
        unit_price,
        quantity,
        mode_of_payment: "cash".to_string(),
    }
}

/// A revenue line with sensible defaults (`mode_of_payment` = `"cash"`).
#[must_use]
pub fn revenue_input(amount: f64, date: NaiveDate) -> RevenueInput {
    custom_revenue_input(amount, date, "cash")
}

/// A revenue line with an explicit payment mode.
#[must_use]
pub fn custom_revenue_input(amount: f64, date: NaiveDate, mode_of_payment: &str) -> RevenueInput {
    RevenueInput {
        name: "Test revenue".to_string(),
        description: None,
        amount,
        mode_of_payment: mode_of_payment.to_string(),
        date,
    }
}

/// Creates a project with no expense or revenue rows.
///
/// The submission date defaults to the implementation date.
pub async fn create_test_project(
    db: &DatabaseConnection,
    name: &str,
    implementation_date: NaiveDate,
    status: ProjectStatus,
) -> Result<entities::project::Model> {
    create_project_with(db, name, implementation_date, status, vec![], vec![]).await
}

/// Creates a project with full expense and revenue sets through the real
/// write path, so tests exercise the same transaction the edit flows use.
pub async fn create_project_with(
    db: &DatabaseConnection,
    name: &str,
    implementation_date: NaiveDate,
    status: ProjectStatus,
    expenses: Vec<ExpenseInput>,
    revenue: Vec<RevenueInput>,
) -> Result<entities::project::Model> {
    project::create_project(
        db,
        ProjectInput {
            name: name.to_string(),
            description: None,
            implementation_date,
            submission_date: implementation_date,
            status,
            expenses,
            revenue,
        },
    )
    .await
}
