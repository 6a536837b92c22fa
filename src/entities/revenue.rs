//! Revenue entity - Money received for a project.
//!
//! Revenue buckets by its own `date` (not the project's implementation date),
//! and only counts toward realized aggregates once the parent project's
//! status is `"completed"`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Revenue database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "revenue")]
pub struct Model {
    /// Unique identifier for the revenue row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the project this revenue belongs to
    pub project_id: i64,
    /// Source of the money (e.g., "Ticket sales", "Sponsorship")
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Amount received in pesos; strictly positive
    pub amount: f64,
    /// How it was received (e.g., "cash", "bank transfer")
    pub mode_of_payment: String,
    /// Date the money was received
    pub date: Date,
}

/// Defines relationships between Revenue and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each revenue row belongs to one project
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
