// db/ledgerdb.rs
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::{Error, Postgres, Row, Transaction};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::ledgermodel::{LedgerEntry, LedgerEntryStatus, LedgerEntryType};

const LEDGER_COLUMNS: &str = r#"
    id, profile_id, entry_type, amount, status,
    job_id, application_id, related_profile_id,
    note, balance_after, created_at
"#;

/// Everything needed to append one entry. The caller has already
/// computed the post-entry balance under a row lock.
pub struct NewLedgerEntry {
    pub profile_id: Uuid,
    pub entry_type: LedgerEntryType,
    pub amount: BigDecimal,
    pub status: LedgerEntryStatus,
    pub job_id: Option<Uuid>,
    pub application_id: Option<Uuid>,
    pub related_profile_id: Option<Uuid>,
    pub note: Option<String>,
    pub balance_after: BigDecimal,
}

/// Rolled-up ledger figures for the wallet statistics view.
#[derive(Debug, Clone)]
pub struct LedgerTotals {
    pub completed_total: BigDecimal,
    pub pending_total: BigDecimal,
    pub pending_count: i64,
    pub earned_total: BigDecimal,
    pub events_paid: i64,
}

#[derive(Debug, Clone)]
pub struct MonthlyEarning {
    pub month: String,
    pub amount: BigDecimal,
}

#[async_trait]
pub trait LedgerExt {
    /// Append-only; there is no update or delete path for ledger rows.
    async fn append_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: NewLedgerEntry,
    ) -> Result<LedgerEntry, Error>;

    async fn list_entries(&self, profile_id: Uuid, limit: i64) -> Result<Vec<LedgerEntry>, Error>;

    /// Signed sums by status plus the number of distinct paid hires.
    /// `completed_total` equals the wallet balance by the conservation
    /// law, so the stats view needs no second balance read.
    async fn ledger_totals(&self, profile_id: Uuid) -> Result<LedgerTotals, Error>;

    /// Completed entry sums bucketed by calendar month, oldest first.
    async fn monthly_earnings(
        &self,
        profile_id: Uuid,
        months: i32,
    ) -> Result<Vec<MonthlyEarning>, Error>;

    /// Guards against releasing the same hire twice.
    async fn has_completed_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        application_id: Uuid,
        staff_profile_id: Uuid,
    ) -> Result<bool, Error>;
}

#[async_trait]
impl LedgerExt for DBClient {
    async fn append_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: NewLedgerEntry,
    ) -> Result<LedgerEntry, Error> {
        sqlx::query_as::<_, LedgerEntry>(&format!(
            r#"
            INSERT INTO ledger_entries
            (profile_id, entry_type, amount, status, job_id, application_id,
             related_profile_id, note, balance_after)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            LEDGER_COLUMNS
        ))
        .bind(entry.profile_id)
        .bind(entry.entry_type)
        .bind(entry.amount)
        .bind(entry.status)
        .bind(entry.job_id)
        .bind(entry.application_id)
        .bind(entry.related_profile_id)
        .bind(entry.note)
        .bind(entry.balance_after)
        .fetch_one(&mut **tx)
        .await
    }

    async fn list_entries(&self, profile_id: Uuid, limit: i64) -> Result<Vec<LedgerEntry>, Error> {
        sqlx::query_as::<_, LedgerEntry>(&format!(
            r#"
            SELECT {} FROM ledger_entries
            WHERE profile_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
            LEDGER_COLUMNS
        ))
        .bind(profile_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn ledger_totals(&self, profile_id: Uuid) -> Result<LedgerTotals, Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(amount) FILTER (WHERE status = 'completed'), 0) AS completed_total,
                COALESCE(SUM(amount) FILTER (WHERE status = 'pending'), 0) AS pending_total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_count,
                COALESCE(SUM(amount) FILTER (WHERE entry_type = 'payment' AND status = 'completed'), 0) AS earned_total,
                COUNT(DISTINCT application_id) FILTER (WHERE entry_type = 'payment' AND status = 'completed') AS events_paid
            FROM ledger_entries
            WHERE profile_id = $1
            "#,
        )
        .bind(profile_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(LedgerTotals {
            completed_total: row.get::<BigDecimal, _>("completed_total"),
            pending_total: row.get::<BigDecimal, _>("pending_total"),
            pending_count: row.get::<i64, _>("pending_count"),
            earned_total: row.get::<BigDecimal, _>("earned_total"),
            events_paid: row.get::<i64, _>("events_paid"),
        })
    }

    async fn monthly_earnings(
        &self,
        profile_id: Uuid,
        months: i32,
    ) -> Result<Vec<MonthlyEarning>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT to_char(date_trunc('month', created_at), 'Mon') AS month,
                   SUM(amount) AS amount
            FROM ledger_entries
            WHERE profile_id = $1
              AND status = 'completed'
              AND created_at >= date_trunc('month', NOW()) - make_interval(months => $2)
            GROUP BY date_trunc('month', created_at)
            ORDER BY date_trunc('month', created_at)
            "#,
        )
        .bind(profile_id)
        .bind(months)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|row| MonthlyEarning {
                month: row.get::<String, _>("month"),
                amount: row.get::<BigDecimal, _>("amount"),
            })
            .collect())
    }

    async fn has_completed_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        application_id: Uuid,
        staff_profile_id: Uuid,
    ) -> Result<bool, Error> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM ledger_entries
                WHERE application_id = $1
                  AND profile_id = $2
                  AND entry_type = 'payment'
                  AND status = 'completed'
            ) AS found
            "#,
        )
        .bind(application_id)
        .bind(staff_profile_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row.get::<bool, _>("found"))
    }
}
