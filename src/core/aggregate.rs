//! Period aggregation - totals, monthly series, and per-project breakdowns.
//!
//! Expenses attach to their project's `implementation_date` and count
//! regardless of project status; revenue buckets by its own `date` and only
//! counts when the parent project is completed. That asymmetry is the
//! organization's accounting rule and every function here follows it.

use crate::{
    core::period::{Period, month_label},
    core::project::ProjectStatus,
    entities::{Expense, Project, Revenue, expense, project, revenue},
    errors::Result,
};
use chrono::Datelike;
use sea_orm::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

/// Which side of the ledger a breakdown ranks by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Rank by summed expense totals (status-blind)
    Expenses,
    /// Rank by summed revenue of completed projects
    Revenue,
}

/// One month of a period's series; months without activity carry zeros.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotals {
    /// Three-letter month label (`"Aug"`, `"Sep"`, ...)
    pub month: String,
    /// Expense total for the month
    pub expenses: f64,
    /// Revenue total for the month (completed projects only)
    pub revenue: f64,
}

/// One project's total for a period and metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTotal {
    /// Name of the project
    pub project_name: String,
    /// Summed amount for the requested metric
    pub total: f64,
}

/// Revenue received through one payment channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentModeTotal {
    /// The payment channel (e.g., "cash", "bank transfer")
    pub mode_of_payment: String,
    /// Summed revenue through that channel
    pub total: f64,
}

/// Expense rows whose parent project was implemented inside the period,
/// paired with that project.
async fn expenses_in_period(
    db: &DatabaseConnection,
    period: Period,
) -> Result<Vec<(expense::Model, project::Model)>> {
    let rows = Expense::find()
        .find_also_related(Project)
        .filter(project::Column::ImplementationDate.between(period.start(), period.end()))
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(e, p)| p.map(|p| (e, p)))
        .collect())
}

/// Revenue rows dated inside the period whose parent project is completed,
/// paired with that project.
async fn revenues_in_period(
    db: &DatabaseConnection,
    period: Period,
) -> Result<Vec<(revenue::Model, project::Model)>> {
    let rows = Revenue::find()
        .find_also_related(Project)
        .filter(revenue::Column::Date.between(period.start(), period.end()))
        .filter(project::Column::Status.eq(ProjectStatus::Completed.as_str()))
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(r, p)| p.map(|p| (r, p)))
        .collect())
}

/// Sum of `unit_price * quantity` for all expenses of projects implemented in
/// the period. No status filter: money spent on a cancelled project is still
/// money spent.
pub async fn total_expenses(db: &DatabaseConnection, period: Period) -> Result<f64> {
    let rows = expenses_in_period(db, period).await?;
    Ok(rows.iter().map(|(e, _)| e.total()).sum())
}

/// Sum of revenue received in the period, counting only completed projects.
pub async fn total_revenue(db: &DatabaseConnection, period: Period) -> Result<f64> {
    let rows = revenues_in_period(db, period).await?;
    Ok(rows.iter().map(|(r, _)| r.amount).sum())
}

/// Monthly expense/revenue series across the period.
///
/// Returns one entry per month of the period in period order - for an
/// academic year that is exactly twelve entries, August through July. Months
/// with no activity report zeros rather than being omitted, so chart axes
/// stay stable.
pub async fn monthly_breakdown(
    db: &DatabaseConnection,
    period: Period,
) -> Result<Vec<MonthlyTotals>> {
    let expense_rows = expenses_in_period(db, period).await?;
    let revenue_rows = revenues_in_period(db, period).await?;

    let mut expenses_by_month: HashMap<(i32, u32), f64> = HashMap::new();
    for (e, p) in &expense_rows {
        let key = (p.implementation_date.year(), p.implementation_date.month());
        *expenses_by_month.entry(key).or_default() += e.total();
    }

    let mut revenue_by_month: HashMap<(i32, u32), f64> = HashMap::new();
    for (r, _) in &revenue_rows {
        let key = (r.date.year(), r.date.month());
        *revenue_by_month.entry(key).or_default() += r.amount;
    }

    Ok(period
        .months()
        .into_iter()
        .map(|(year, month)| MonthlyTotals {
            month: month_label(month).to_string(),
            expenses: expenses_by_month.get(&(year, month)).copied().unwrap_or(0.0),
            revenue: revenue_by_month.get(&(year, month)).copied().unwrap_or(0.0),
        })
        .collect())
}

/// Per-project totals for the period, descending by amount.
///
/// Projects whose total is zero for the requested metric are omitted; ties
/// break alphabetically so the ordering is deterministic.
pub async fn breakdown_by_project(
    db: &DatabaseConnection,
    period: Period,
    metric: Metric,
) -> Result<Vec<ProjectTotal>> {
    let mut totals: HashMap<i64, (String, f64)> = HashMap::new();

    match metric {
        Metric::Expenses => {
            for (e, p) in expenses_in_period(db, period).await? {
                let entry = totals.entry(p.id).or_insert_with(|| (p.name, 0.0));
                entry.1 += e.total();
            }
        }
        Metric::Revenue => {
            for (r, p) in revenues_in_period(db, period).await? {
                let entry = totals.entry(p.id).or_insert_with(|| (p.name, 0.0));
                entry.1 += r.amount;
            }
        }
    }

    let mut breakdown: Vec<ProjectTotal> = totals
        .into_values()
        .filter(|(_, total)| *total > 0.0)
        .map(|(project_name, total)| ProjectTotal {
            project_name,
            total,
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.project_name.cmp(&b.project_name))
    });

    Ok(breakdown)
}

/// The `n` largest projects of the period by the requested metric.
pub async fn top_projects(
    db: &DatabaseConnection,
    period: Period,
    n: usize,
    metric: Metric,
) -> Result<Vec<ProjectTotal>> {
    let mut breakdown = breakdown_by_project(db, period, metric).await?;
    breakdown.truncate(n);
    Ok(breakdown)
}

/// Revenue per payment channel for the period, descending, completed projects
/// only.
pub async fn revenue_by_payment_mode(
    db: &DatabaseConnection,
    period: Period,
) -> Result<Vec<PaymentModeTotal>> {
    let rows = revenues_in_period(db, period).await?;

    let mut totals: HashMap<String, f64> = HashMap::new();
    for (r, _) in rows {
        *totals.entry(r.mode_of_payment).or_default() += r.amount;
    }

    let mut breakdown: Vec<PaymentModeTotal> = totals
        .into_iter()
        .map(|(mode_of_payment, total)| PaymentModeTotal {
            mode_of_payment,
            total,
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.mode_of_payment.cmp(&b.mode_of_payment))
    });

    Ok(breakdown)
}

/// Share of `value` against the period maximum, for bar-chart normalization.
///
/// A zero (or negative) maximum yields 0% rather than a division by zero.
#[must_use]
pub fn percent_of_max(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }

    (value / max) * 100.0
}
