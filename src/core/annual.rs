//! Annual snapshots and carry-forward balances.
//!
//! Closed academic years are expensive to recompute on every dashboard load,
//! so the first read of a year freezes its totals into `annual_record` and
//! every later read hits the snapshot. A year's starting money is the prior
//! year's closing balance, resolved by walking backward through snapshots
//! (creating missing ones from raw rows) until a year with no history yields
//! zero. Snapshots are immutable once written.

use crate::{
    core::aggregate,
    core::period::{Period, academic_year_key, academic_year_label, current_academic_year},
    entities::{AnnualRecord, Expense, Project, Revenue, annual_record, project, revenue},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QuerySelect, Set, prelude::*, sea_query::OnConflict};
use serde::Serialize;
use tracing::info;

/// Backstop on the carry-forward walk. The chain normally terminates at the
/// first year with no snapshot and no raw activity; the cap bounds the walk
/// even if every probed year has stray rows.
const MAX_CARRY_DEPTH: usize = 50;

/// Looks up the frozen snapshot for the academic year opening in `start_year`.
async fn find_record(
    db: &DatabaseConnection,
    start_year: i32,
) -> Result<Option<annual_record::Model>> {
    AnnualRecord::find_by_id(academic_year_key(start_year))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Whether any raw expense or revenue rows exist for the academic year.
///
/// Status-blind on both sides: this asks "is there history at all", not "what
/// was realized" - a year holding only a cancelled project still anchors the
/// carry-forward chain.
async fn year_has_activity(db: &DatabaseConnection, period: Period) -> Result<bool> {
    let revenue_rows = Revenue::find()
        .filter(revenue::Column::Date.between(period.start(), period.end()))
        .limit(1)
        .all(db)
        .await?;
    if !revenue_rows.is_empty() {
        return Ok(true);
    }

    let expense_rows = Expense::find()
        .find_also_related(Project)
        .filter(project::Column::ImplementationDate.between(period.start(), period.end()))
        .limit(1)
        .all(db)
        .await?;
    Ok(!expense_rows.is_empty())
}

/// Freezes one year's totals with the given starting balance and returns the
/// stored row.
///
/// The insert ignores a conflicting row: a concurrent first load may have won
/// the race, and whichever row landed is authoritative from then on.
async fn insert_or_fetch(
    db: &DatabaseConnection,
    start_year: i32,
    starting_money: f64,
) -> Result<annual_record::Model> {
    let period = Period::academic_year(start_year);
    let total_expenses = aggregate::total_expenses(db, period).await?;
    let total_revenue = aggregate::total_revenue(db, period).await?;
    let key = academic_year_key(start_year);

    let row = annual_record::ActiveModel {
        id: Set(key),
        starting_date: Set(period.start()),
        ending_date: Set(period.end()),
        starting_money: Set(starting_money),
        total_expenses: Set(total_expenses),
        total_revenue: Set(total_revenue),
    };

    AnnualRecord::insert(row)
        .on_conflict(
            OnConflict::column(annual_record::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    info!(start_year, total_expenses, total_revenue, "froze annual record");

    AnnualRecord::find_by_id(key)
        .one(db)
        .await?
        .ok_or_else(|| Error::Database(DbErr::RecordNotFound(format!("annual_record {key}"))))
}

/// Returns the snapshot for the academic year opening in `start_year`,
/// creating it (and any missing predecessors its starting balance depends on)
/// on first access.
///
/// The starting balance resolves by walking backward: an existing snapshot
/// contributes its closing balance; a year with neither a snapshot nor raw
/// activity terminates the walk at zero. Missing years found along the way
/// are then replayed oldest-first, each frozen from raw rows (expenses
/// status-blind, revenue restricted to completed projects).
pub async fn get_or_create_record(
    db: &DatabaseConnection,
    start_year: i32,
) -> Result<annual_record::Model> {
    if let Some(existing) = find_record(db, start_year).await? {
        return Ok(existing);
    }

    // Walk backward collecting the years that still need snapshots
    let mut missing = vec![start_year];
    let mut base = 0.0_f64;
    let mut cursor = start_year - 1;
    while missing.len() < MAX_CARRY_DEPTH {
        if let Some(record) = find_record(db, cursor).await? {
            base = record.closing_balance();
            break;
        }
        if !year_has_activity(db, Period::academic_year(cursor)).await? {
            break;
        }
        missing.push(cursor);
        cursor -= 1;
    }

    // Replay forward, oldest first, chaining closing balances
    missing.reverse();
    let mut record = insert_or_fetch(db, missing[0], base).await?;
    for &year in &missing[1..] {
        let starting = record.closing_balance();
        record = insert_or_fetch(db, year, starting).await?;
    }

    Ok(record)
}

/// The organization's balance as of `today`.
///
/// Prior years are frozen snapshots; the current academic year is always
/// live: previous year's closing balance plus the current year's revenue
/// minus its expenses, both computed from raw rows.
pub async fn current_balance(db: &DatabaseConnection, today: NaiveDate) -> Result<f64> {
    let (start_year, _) = current_academic_year(today);
    let previous = get_or_create_record(db, start_year - 1).await?;

    let period = Period::academic_year(start_year);
    let live_expenses = aggregate::total_expenses(db, period).await?;
    let live_revenue = aggregate::total_revenue(db, period).await?;

    Ok(previous.closing_balance() + live_revenue - live_expenses)
}

/// Percentage change from `previous` to `current`, rounded to two decimals.
///
/// A zero (or negative) previous total yields 0 rather than a division by
/// zero - a year with no baseline has no meaningful change figure.
#[must_use]
pub fn year_over_year_change(current: f64, previous: f64) -> f64 {
    if previous <= 0.0 {
        return 0.0;
    }

    let change = (current - previous) / previous * 100.0;
    (change * 100.0).round() / 100.0
}

/// The dashboard's "versus last year" card for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearComparison {
    /// Label of the prior academic year, e.g. `"2024-2025"`
    pub previous_year: String,
    /// First day of the prior academic year
    pub starting_date: NaiveDate,
    /// Last day of the prior academic year
    pub ending_date: NaiveDate,
    /// The metric's frozen total for the prior year
    pub previous_total: f64,
    /// The metric's live total for the current year
    pub current_total: f64,
    /// [`year_over_year_change`] of the two totals
    pub change_percent: f64,
}

/// Compares the current academic year's live total against the prior year's
/// snapshot for the given metric, freezing the prior year on first access.
pub async fn previous_year_comparison(
    db: &DatabaseConnection,
    today: NaiveDate,
    metric: aggregate::Metric,
) -> Result<YearComparison> {
    let (current_start, _) = current_academic_year(today);
    let record = get_or_create_record(db, current_start - 1).await?;

    let period = Period::academic_year(current_start);
    let (previous_total, current_total) = match metric {
        aggregate::Metric::Expenses => (
            record.total_expenses,
            aggregate::total_expenses(db, period).await?,
        ),
        aggregate::Metric::Revenue => (
            record.total_revenue,
            aggregate::total_revenue(db, period).await?,
        ),
    };

    Ok(YearComparison {
        previous_year: academic_year_label(current_start - 1),
        starting_date: record.starting_date,
        ending_date: record.ending_date,
        previous_total,
        current_total,
        change_percent: year_over_year_change(current_total, previous_total),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::project::ProjectStatus;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    /// Seeds a frozen snapshot directly, bypassing the carry-forward chain.
    async fn seed_record(
        db: &DatabaseConnection,
        start_year: i32,
        starting_money: f64,
        total_expenses: f64,
        total_revenue: f64,
    ) -> Result<()> {
        let period = Period::academic_year(start_year);
        let row = annual_record::ActiveModel {
            id: Set(academic_year_key(start_year)),
            starting_date: Set(period.start()),
            ending_date: Set(period.end()),
            starting_money: Set(starting_money),
            total_expenses: Set(total_expenses),
            total_revenue: Set(total_revenue),
        };
        row.insert(db).await?;
        Ok(())
    }

    #[test]
    fn test_year_over_year_change_zero_previous() {
        assert_eq!(year_over_year_change(500.0, 0.0), 0.0);
        assert_eq!(year_over_year_change(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_year_over_year_change_signs_and_rounding() {
        assert_eq!(year_over_year_change(150.0, 100.0), 50.0);
        assert_eq!(year_over_year_change(50.0, 100.0), -50.0);
        // 3 vs 7: -57.142857...% rounds to two decimals
        assert_eq!(year_over_year_change(3.0, 7.0), -57.14);
    }

    #[tokio::test]
    async fn test_carry_forward_from_seeded_predecessor() -> Result<()> {
        let db = setup_test_db().await?;

        seed_record(&db, 2024, 1000.0, 300.0, 500.0).await?;

        let record = get_or_create_record(&db, 2025).await?;

        // 1000 + 500 - 300 carried forward
        assert_eq!(record.starting_money, 1200.0);
        assert_eq!(record.id, 20_252_026);

        Ok(())
    }

    #[tokio::test]
    async fn test_base_case_no_history() -> Result<()> {
        let db = setup_test_db().await?;

        let record = get_or_create_record(&db, 2025).await?;

        assert_eq!(record.starting_money, 0.0);
        assert_eq!(record.total_expenses, 0.0);
        assert_eq!(record.total_revenue, 0.0);
        assert_eq!(record.starting_date, date(2025, 8, 1));
        assert_eq!(record.ending_date, date(2026, 7, 31));

        // Only the requested year was frozen; silent predecessors were not
        assert_eq!(AnnualRecord::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_repeated_calls_keep_single_row() -> Result<()> {
        let db = setup_test_db().await?;

        let first = get_or_create_record(&db, 2025).await?;
        let second = get_or_create_record(&db, 2025).await?;

        assert_eq!(first, second);
        assert_eq!(AnnualRecord::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_chain_replays_two_missing_years() -> Result<()> {
        let db = setup_test_db().await?;

        // 2023-2024: 300 spent, 500 realized
        create_project_with(
            &db,
            "Old Gala",
            date(2023, 9, 1),
            ProjectStatus::Completed,
            vec![expense_input(300.0, 1)],
            vec![revenue_input(500.0, date(2023, 9, 5))],
        )
        .await?;
        // 2024-2025: 100 spent, 400 realized
        create_project_with(
            &db,
            "Recent Gala",
            date(2024, 9, 1),
            ProjectStatus::Completed,
            vec![expense_input(100.0, 1)],
            vec![revenue_input(400.0, date(2024, 9, 5))],
        )
        .await?;

        let record = get_or_create_record(&db, 2025).await?;

        // 2023 starts at 0 and closes at 200; 2024 closes at 500
        assert_eq!(record.starting_money, 500.0);
        assert_eq!(AnnualRecord::find().count(&db).await?, 3);

        let oldest = AnnualRecord::find_by_id(academic_year_key(2023))
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(oldest.starting_money, 0.0);
        assert_eq!(oldest.total_expenses, 300.0);
        assert_eq!(oldest.total_revenue, 500.0);

        let middle = AnnualRecord::find_by_id(academic_year_key(2024))
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(middle.starting_money, 200.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_snapshot_revenue_requires_completed_project() -> Result<()> {
        let db = setup_test_db().await?;

        create_project_with(
            &db,
            "Unfinished",
            date(2024, 9, 1),
            ProjectStatus::InProgress,
            vec![expense_input(150.0, 1)],
            vec![revenue_input(600.0, date(2024, 9, 5))],
        )
        .await?;

        let record = get_or_create_record(&db, 2024).await?;

        // Expenses count regardless of status; the unrealized revenue does not
        assert_eq!(record.total_expenses, 150.0);
        assert_eq!(record.total_revenue, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_snapshot_is_frozen_after_creation() -> Result<()> {
        let db = setup_test_db().await?;

        let before = get_or_create_record(&db, 2024).await?;
        assert_eq!(before.total_expenses, 0.0);

        // Historical data lands after the snapshot was taken
        create_project_with(
            &db,
            "Backdated",
            date(2024, 9, 1),
            ProjectStatus::Completed,
            vec![expense_input(250.0, 1)],
            vec![],
        )
        .await?;

        let after = get_or_create_record(&db, 2024).await?;
        assert_eq!(after.total_expenses, 0.0);
        assert_eq!(after, before);

        Ok(())
    }

    #[tokio::test]
    async fn test_current_balance_combines_snapshot_and_live() -> Result<()> {
        let db = setup_test_db().await?;

        // Previous year closed at 1000 + 500 - 300 = 1200
        seed_record(&db, 2024, 1000.0, 300.0, 500.0).await?;

        // Current year live: 200 spent, 500 realized
        create_project_with(
            &db,
            "Hackathon",
            date(2025, 9, 15),
            ProjectStatus::Completed,
            vec![expense_input(100.0, 2)],
            vec![revenue_input(500.0, date(2025, 9, 20))],
        )
        .await?;

        let balance = current_balance(&db, date(2025, 10, 1)).await?;
        assert_eq!(balance, 1200.0 + 500.0 - 200.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_current_balance_empty_store() -> Result<()> {
        let db = setup_test_db().await?;

        let balance = current_balance(&db, date(2025, 10, 1)).await?;
        assert_eq!(balance, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_previous_year_comparison_expenses() -> Result<()> {
        let db = setup_test_db().await?;

        seed_record(&db, 2024, 0.0, 400.0, 900.0).await?;

        // Live expenses this year: 600
        create_project_with(
            &db,
            "Sports Fest",
            date(2025, 9, 10),
            ProjectStatus::Pending,
            vec![expense_input(600.0, 1)],
            vec![],
        )
        .await?;

        let comparison =
            previous_year_comparison(&db, date(2025, 10, 1), aggregate::Metric::Expenses).await?;

        assert_eq!(comparison.previous_year, "2024-2025");
        assert_eq!(comparison.starting_date, date(2024, 8, 1));
        assert_eq!(comparison.ending_date, date(2025, 7, 31));
        assert_eq!(comparison.previous_total, 400.0);
        assert_eq!(comparison.current_total, 600.0);
        assert_eq!(comparison.change_percent, 50.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_previous_year_comparison_revenue_no_baseline() -> Result<()> {
        let db = setup_test_db().await?;

        create_project_with(
            &db,
            "Benefit Dinner",
            date(2025, 9, 10),
            ProjectStatus::Completed,
            vec![],
            vec![revenue_input(750.0, date(2025, 9, 12))],
        )
        .await?;

        let comparison =
            previous_year_comparison(&db, date(2025, 10, 1), aggregate::Metric::Revenue).await?;

        assert_eq!(comparison.previous_total, 0.0);
        assert_eq!(comparison.current_total, 750.0);
        // No baseline: change reports 0 rather than infinity
        assert_eq!(comparison.change_percent, 0.0);

        Ok(())
    }
}
