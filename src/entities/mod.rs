//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod annual_record;
pub mod expense;
pub mod project;
pub mod revenue;

// Re-export specific types to avoid conflicts
pub use annual_record::{
    Column as AnnualRecordColumn, Entity as AnnualRecord, Model as AnnualRecordModel,
};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use project::{Column as ProjectColumn, Entity as Project, Model as ProjectModel};
pub use revenue::{Column as RevenueColumn, Entity as Revenue, Model as RevenueModel};
