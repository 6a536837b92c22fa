//! Expense entity - One purchased line item belonging to a project.
//!
//! The row stores `unit_price` and `quantity`; the line total is always
//! derived as `unit_price * quantity` and never persisted, so the source of
//! truth for every aggregate is the raw pair.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the project this expense belongs to
    pub project_id: i64,
    /// What was bought (e.g., "Tarpaulin", "Snacks")
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Where it was bought
    pub store_name: String,
    /// Price per unit in pesos; never negative
    pub unit_price: f64,
    /// Number of units bought; never negative
    pub quantity: i32,
    /// How it was paid (e.g., "cash", "gcash")
    pub mode_of_payment: String,
}

impl Model {
    /// Line total, recomputed from `unit_price * quantity`.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one project
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
