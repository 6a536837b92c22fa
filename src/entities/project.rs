//! Project entity - Represents one funded project of the organization.
//!
//! Each project has a name, optional description, an implementation date (the
//! date the project ran, used to bucket its expenses), a submission date and a
//! status. Projects own their expense and revenue rows; deleting a project
//! removes both sets in the same transaction.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Project database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    /// Unique identifier for the project
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name of the project (e.g., "Hackathon", "Freshman Orientation")
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Date the project was (or will be) carried out; expense aggregation keys on this
    pub implementation_date: Date,
    /// Date the project paperwork was submitted
    pub submission_date: Date,
    /// Lifecycle status: `"pending"`, `"in progress"`, `"approved"`, `"rejected"`,
    /// `"completed"`, `"cancelled"`, or `"draft"`
    pub status: String,
}

/// Defines relationships between Project and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One project has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
    /// One project has many revenue rows
    #[sea_orm(has_many = "super::revenue::Entity")]
    Revenues,
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::revenue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Revenues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
