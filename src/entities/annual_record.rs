//! Annual record entity - Frozen snapshot of one academic year.
//!
//! Keyed by the composite academic-year id (`20242025` for Aug 2024 - Jul
//! 2025). Rows are created once on first access and never updated or deleted;
//! the key being the primary key lets concurrent first loads insert-or-ignore
//! instead of racing a select-then-insert.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Annual record database model - one frozen snapshot per academic year
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "annual_record")]
pub struct Model {
    /// Academic-year key: start year and end year concatenated (e.g. `20242025`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// August 1 of the start year
    pub starting_date: Date,
    /// July 31 of the end year
    pub ending_date: Date,
    /// Balance carried forward from all prior years
    pub starting_money: f64,
    /// Total expenses frozen for this year (all projects, status-blind)
    pub total_expenses: f64,
    /// Total revenue frozen for this year (completed projects only)
    pub total_revenue: f64,
}

impl Model {
    /// Balance at the end of this year: what the next year starts with.
    #[must_use]
    pub fn closing_balance(&self) -> f64 {
        self.starting_money + self.total_revenue - self.total_expenses
    }
}

/// `AnnualRecord` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
