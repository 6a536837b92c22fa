//! Project write operations and detail reads.
//!
//! A project and its expense/revenue sets are edited as one unit: the create
//! and edit flows both submit the full project, and the store applies it as a
//! single transaction (insert, or update-then-replace-the-sets). Status
//! changes go through a restricted vocabulary and batch updates are
//! all-or-nothing.

use crate::{
    entities::{Expense, Project, Revenue, expense, project, revenue},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    Condition, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

/// Project lifecycle status as the store knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    /// Awaiting review
    #[serde(rename = "pending")]
    Pending,
    /// Approved and underway
    #[serde(rename = "in progress")]
    InProgress,
    /// Approved but not yet started
    #[serde(rename = "approved")]
    Approved,
    /// Turned down
    #[serde(rename = "rejected")]
    Rejected,
    /// Finished; its revenue counts as realized
    #[serde(rename = "completed")]
    Completed,
    /// Called off
    #[serde(rename = "cancelled")]
    Cancelled,
    /// Not yet submitted
    #[serde(rename = "draft")]
    Draft,
}

/// Statuses the batch status-update flow may assign. The wider vocabulary
/// (approved, rejected, draft) is only reachable through the full edit flow.
pub const BATCH_STATUSES: &[ProjectStatus] = &[
    ProjectStatus::Pending,
    ProjectStatus::InProgress,
    ProjectStatus::Completed,
    ProjectStatus::Cancelled,
];

impl ProjectStatus {
    /// Lowercase label as stored in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in progress",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Draft => "draft",
        }
    }

    /// Whether the batch status-update flow accepts this status.
    #[must_use]
    pub fn batch_updatable(self) -> bool {
        BATCH_STATUSES.contains(&self)
    }
}

impl FromStr for ProjectStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "in progress" => Ok(Self::InProgress),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "draft" => Ok(Self::Draft),
            _ => Err(Error::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }
}

/// One expense line of a project submission.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseInput {
    /// What was bought
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Where it was bought
    pub store_name: String,
    /// Price per unit; must be non-negative and finite
    pub unit_price: f64,
    /// Units bought; must be non-negative
    pub quantity: i32,
    /// How it was paid
    pub mode_of_payment: String,
}

/// One revenue line of a project submission.
#[derive(Debug, Clone, Deserialize)]
pub struct RevenueInput {
    /// Source of the money
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Amount received; must be strictly positive and finite
    pub amount: f64,
    /// How it was received
    pub mode_of_payment: String,
    /// Date the money was received
    pub date: NaiveDate,
}

/// A full project submission: the project row plus its complete expense and
/// revenue sets. Used by both the create and edit flows.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    /// Project name; must be non-empty after trimming
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Date the project runs; expense aggregation keys on this
    pub implementation_date: NaiveDate,
    /// Date the paperwork was submitted
    pub submission_date: NaiveDate,
    /// Lifecycle status
    pub status: ProjectStatus,
    /// Complete expense set
    pub expenses: Vec<ExpenseInput>,
    /// Complete revenue set
    pub revenue: Vec<RevenueInput>,
}

/// One entry of a batch status update, as submitted by the status table.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    /// Project to update
    pub project_id: i64,
    /// New status; validated against [`BATCH_STATUSES`]
    pub status: String,
}

/// Rejects a submission before any row is written.
fn validate_input(input: &ProjectInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Project name cannot be empty".to_string(),
        });
    }

    for e in &input.expenses {
        if e.unit_price < 0.0 || !e.unit_price.is_finite() {
            return Err(Error::InvalidAmount {
                amount: e.unit_price,
            });
        }
        if e.quantity < 0 {
            return Err(Error::InvalidQuantity {
                quantity: e.quantity,
            });
        }
    }

    for r in &input.revenue {
        if r.amount <= 0.0 || !r.amount.is_finite() {
            return Err(Error::InvalidAmount { amount: r.amount });
        }
    }

    Ok(())
}

/// Inserts a project's expense and revenue sets inside an open transaction.
async fn insert_line_items<C>(
    txn: &C,
    project_id: i64,
    expenses: &[ExpenseInput],
    revenue: &[RevenueInput],
) -> Result<()>
where
    C: ConnectionTrait,
{
    for e in expenses {
        let row = expense::ActiveModel {
            project_id: Set(project_id),
            name: Set(e.name.clone()),
            description: Set(e.description.clone()),
            store_name: Set(e.store_name.clone()),
            unit_price: Set(e.unit_price),
            quantity: Set(e.quantity),
            mode_of_payment: Set(e.mode_of_payment.clone()),
            ..Default::default()
        };
        row.insert(txn).await?;
    }

    for r in revenue {
        let row = revenue::ActiveModel {
            project_id: Set(project_id),
            name: Set(r.name.clone()),
            description: Set(r.description.clone()),
            amount: Set(r.amount),
            mode_of_payment: Set(r.mode_of_payment.clone()),
            date: Set(r.date),
            ..Default::default()
        };
        row.insert(txn).await?;
    }

    Ok(())
}

/// Creates a project with its full expense and revenue sets in one
/// transaction.
///
/// Validation runs before any write; a failure partway through rolls the
/// whole submission back.
pub async fn create_project(db: &DatabaseConnection, input: ProjectInput) -> Result<project::Model> {
    validate_input(&input)?;

    let txn = db.begin().await?;

    let row = project::ActiveModel {
        name: Set(input.name.trim().to_string()),
        description: Set(input.description.clone()),
        implementation_date: Set(input.implementation_date),
        submission_date: Set(input.submission_date),
        status: Set(input.status.as_str().to_string()),
        ..Default::default()
    };
    let created = row.insert(&txn).await?;

    insert_line_items(&txn, created.id, &input.expenses, &input.revenue).await?;

    txn.commit().await?;

    info!(project_id = created.id, "created project");
    Ok(created)
}

/// Replaces a project wholesale: updates the project row, drops its old
/// expense/revenue sets, and inserts the submitted ones - all in one
/// transaction. This is the edit flow's only write.
pub async fn replace_project(
    db: &DatabaseConnection,
    project_id: i64,
    input: ProjectInput,
) -> Result<project::Model> {
    validate_input(&input)?;

    let txn = db.begin().await?;

    let existing = Project::find_by_id(project_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProjectNotFound { id: project_id })?;

    let mut active: project::ActiveModel = existing.into();
    active.name = Set(input.name.trim().to_string());
    active.description = Set(input.description.clone());
    active.implementation_date = Set(input.implementation_date);
    active.submission_date = Set(input.submission_date);
    active.status = Set(input.status.as_str().to_string());
    let updated = active.update(&txn).await?;

    Expense::delete_many()
        .filter(expense::Column::ProjectId.eq(project_id))
        .exec(&txn)
        .await?;
    Revenue::delete_many()
        .filter(revenue::Column::ProjectId.eq(project_id))
        .exec(&txn)
        .await?;

    insert_line_items(&txn, project_id, &input.expenses, &input.revenue).await?;

    txn.commit().await?;

    info!(project_id, "replaced project");
    Ok(updated)
}

/// Deletes a project and its expense/revenue rows in one transaction.
pub async fn delete_project(db: &DatabaseConnection, project_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let existing = Project::find_by_id(project_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProjectNotFound { id: project_id })?;

    Expense::delete_many()
        .filter(expense::Column::ProjectId.eq(project_id))
        .exec(&txn)
        .await?;
    Revenue::delete_many()
        .filter(revenue::Column::ProjectId.eq(project_id))
        .exec(&txn)
        .await?;
    existing.delete(&txn).await?;

    txn.commit().await?;

    info!(project_id, "deleted project");
    Ok(())
}

/// Sets one project's status. Only the batch vocabulary is assignable here;
/// the wider statuses are reachable through the edit flow.
pub async fn update_project_status(
    db: &DatabaseConnection,
    project_id: i64,
    status: &str,
) -> Result<()> {
    let parsed = ProjectStatus::from_str(status)?;
    if !parsed.batch_updatable() {
        return Err(Error::InvalidStatus {
            status: status.to_string(),
        });
    }

    let result = Project::update_many()
        .col_expr(project::Column::Status, Expr::value(parsed.as_str()))
        .filter(project::Column::Id.eq(project_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::ProjectNotFound { id: project_id });
    }

    Ok(())
}

/// Applies a batch of status updates all-or-nothing.
///
/// Every status is validated before the first write; the updates then run in
/// a single transaction, so an unknown project id partway through rolls back
/// the entire batch.
pub async fn batch_update_status(db: &DatabaseConnection, updates: &[StatusUpdate]) -> Result<()> {
    // Validate all statuses first - nothing is written if any entry is bad
    let mut parsed = Vec::with_capacity(updates.len());
    for update in updates {
        let status = ProjectStatus::from_str(&update.status)?;
        if !status.batch_updatable() {
            return Err(Error::InvalidStatus {
                status: update.status.clone(),
            });
        }
        parsed.push((update.project_id, status));
    }

    let txn = db.begin().await?;

    for (project_id, status) in parsed {
        let result = Project::update_many()
            .col_expr(project::Column::Status, Expr::value(status.as_str()))
            .filter(project::Column::Id.eq(project_id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(Error::ProjectNotFound { id: project_id });
        }
    }

    txn.commit().await?;

    info!(count = updates.len(), "applied batch status update");
    Ok(())
}

/// One expense row of a detail view, with its derived line total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseLine {
    /// The stored expense row
    #[serde(flatten)]
    pub expense: expense::Model,
    /// `unit_price * quantity`, recomputed on read
    pub total: f64,
}

/// Everything the project detail page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDetails {
    /// The project row
    pub project: project::Model,
    /// Expenses ordered by name, each with its line total
    pub expenses: Vec<ExpenseLine>,
    /// Revenue ordered newest first
    pub revenue: Vec<revenue::Model>,
    /// Sum of all expense line totals
    pub total_expenses: f64,
    /// Sum of all revenue amounts (the project's own money, realized or not)
    pub total_revenue: f64,
    /// `total_revenue - total_expenses`
    pub net_income: f64,
}

/// Fetches one project with its full expense/revenue sets and derived totals.
///
/// Returns `None` for an unknown id. The per-project revenue figure is the
/// raw sum of the project's own rows - unlike period revenue aggregates it is
/// not gated on completion, since the detail page shows expected money too.
pub async fn get_project_details(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<Option<ProjectDetails>> {
    let Some(found) = Project::find_by_id(project_id).one(db).await? else {
        return Ok(None);
    };

    let expense_rows = Expense::find()
        .filter(expense::Column::ProjectId.eq(project_id))
        .order_by_asc(expense::Column::Name)
        .all(db)
        .await?;

    let revenue_rows = Revenue::find()
        .filter(revenue::Column::ProjectId.eq(project_id))
        .order_by_desc(revenue::Column::Date)
        .all(db)
        .await?;

    let expenses: Vec<ExpenseLine> = expense_rows
        .into_iter()
        .map(|e| {
            let total = e.total();
            ExpenseLine { expense: e, total }
        })
        .collect();

    let total_expenses: f64 = expenses.iter().map(|line| line.total).sum();
    let total_revenue: f64 = revenue_rows.iter().map(|r| r.amount).sum();

    Ok(Some(ProjectDetails {
        project: found,
        expenses,
        revenue: revenue_rows,
        total_expenses,
        total_revenue,
        net_income: total_revenue - total_expenses,
    }))
}

/// Sort key for the project listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Alphabetical by project name
    Name,
    /// By submission date
    SubmissionDate,
    /// By implementation date
    #[default]
    ImplementationDate,
    /// By summed expense totals
    Expenses,
    /// By summed revenue
    Revenue,
    /// By revenue minus expenses
    Net,
}

/// Sort direction for the project listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest/earliest first
    Asc,
    /// Largest/latest first
    #[default]
    Desc,
}

/// Filters and ordering for the project listing. `Default` lists everything,
/// newest implementation first.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilters {
    /// Substring match against name or description
    pub search: Option<String>,
    /// Exact status match
    pub status: Option<ProjectStatus>,
    /// Earliest implementation date (inclusive)
    pub implemented_from: Option<NaiveDate>,
    /// Latest implementation date (inclusive)
    pub implemented_to: Option<NaiveDate>,
    /// Column to sort by
    pub sort_by: SortKey,
    /// Sort direction
    pub sort_order: SortOrder,
}

/// One row of the project table: the project plus its raw totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectWithTotals {
    /// The project row
    #[serde(flatten)]
    pub project: project::Model,
    /// Sum of the project's expense line totals
    pub total_expenses: f64,
    /// Raw sum of the project's revenue rows
    pub total_revenue: f64,
}

/// Lists projects with their expense/revenue totals, filtered and sorted.
pub async fn list_projects(
    db: &DatabaseConnection,
    filters: &ProjectFilters,
) -> Result<Vec<ProjectWithTotals>> {
    let mut query = Project::find();

    if let Some(search) = &filters.search {
        query = query.filter(
            Condition::any()
                .add(project::Column::Name.contains(search.as_str()))
                .add(project::Column::Description.contains(search.as_str())),
        );
    }
    if let Some(status) = filters.status {
        query = query.filter(project::Column::Status.eq(status.as_str()));
    }
    if let Some(from) = filters.implemented_from {
        query = query.filter(project::Column::ImplementationDate.gte(from));
    }
    if let Some(to) = filters.implemented_to {
        query = query.filter(project::Column::ImplementationDate.lte(to));
    }

    let projects = query.all(db).await?;
    let ids: Vec<i64> = projects.iter().map(|p| p.id).collect();

    let expense_rows = Expense::find()
        .filter(expense::Column::ProjectId.is_in(ids.clone()))
        .all(db)
        .await?;
    let revenue_rows = Revenue::find()
        .filter(revenue::Column::ProjectId.is_in(ids))
        .all(db)
        .await?;

    let mut rows: Vec<ProjectWithTotals> = projects
        .into_iter()
        .map(|p| {
            let total_expenses = expense_rows
                .iter()
                .filter(|e| e.project_id == p.id)
                .map(expense::Model::total)
                .sum();
            let total_revenue = revenue_rows
                .iter()
                .filter(|r| r.project_id == p.id)
                .map(|r| r.amount)
                .sum();
            ProjectWithTotals {
                project: p,
                total_expenses,
                total_revenue,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        let ordering = match filters.sort_by {
            SortKey::Name => a.project.name.cmp(&b.project.name),
            SortKey::SubmissionDate => a.project.submission_date.cmp(&b.project.submission_date),
            SortKey::ImplementationDate => a
                .project
                .implementation_date
                .cmp(&b.project.implementation_date),
            SortKey::Expenses => a.total_expenses.total_cmp(&b.total_expenses),
            SortKey::Revenue => a.total_revenue.total_cmp(&b.total_revenue),
            SortKey::Net => (a.total_revenue - a.total_expenses)
                .total_cmp(&(b.total_revenue - b.total_expenses)),
        };
        match filters.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    Ok(rows)
}

/// One row of the dashboard's recent-ticket history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTicket {
    /// Project id
    pub id: i64,
    /// Project name
    pub name: String,
    /// Current status
    pub status: String,
    /// When the paperwork was submitted
    pub submission_date: NaiveDate,
}

/// The most recently submitted projects of the academic year containing
/// `today`, newest first.
pub async fn recent_tickets(
    db: &DatabaseConnection,
    today: NaiveDate,
    limit: u64,
) -> Result<Vec<ProjectTicket>> {
    let (start_year, _) = super::period::current_academic_year(today);
    let period = super::period::Period::academic_year(start_year);

    let rows = Project::find()
        .filter(project::Column::SubmissionDate.between(period.start(), period.end()))
        .order_by_desc(project::Column::SubmissionDate)
        .limit(limit)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|p| ProjectTicket {
            id: p.id,
            name: p.name,
            status: p.status,
            submission_date: p.submission_date,
        })
        .collect())
}
