// models/ledgermodel.rs
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "ledger_entry_type", rename_all = "snake_case")]
pub enum LedgerEntryType {
    Deposit,
    EscrowRelease,
    Payment,
    Withdrawal,
    Refund,
}

impl LedgerEntryType {
    pub fn to_str(&self) -> &str {
        match self {
            LedgerEntryType::Deposit => "deposit",
            LedgerEntryType::EscrowRelease => "escrow_release",
            LedgerEntryType::Payment => "payment",
            LedgerEntryType::Withdrawal => "withdrawal",
            LedgerEntryType::Refund => "refund",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "ledger_entry_status", rename_all = "snake_case")]
pub enum LedgerEntryStatus {
    Pending,
    Completed,
    Failed,
}

impl LedgerEntryStatus {
    pub fn to_str(&self) -> &str {
        match self {
            LedgerEntryStatus::Pending => "pending",
            LedgerEntryStatus::Completed => "completed",
            LedgerEntryStatus::Failed => "failed",
        }
    }
}

/// Immutable record of one balance change. Amounts are signed from the
/// owning profile's point of view: positive credits, negative debits.
/// `balance_after` snapshots the wallet balance immediately following
/// this entry, so the full history replays to the current balance
/// without a running-sum query.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub entry_type: LedgerEntryType,
    pub amount: BigDecimal,
    pub status: LedgerEntryStatus,

    pub job_id: Option<Uuid>,
    pub application_id: Option<Uuid>,
    pub related_profile_id: Option<Uuid>,

    pub note: Option<String>,
    pub balance_after: BigDecimal,
    pub created_at: Option<DateTime<Utc>>,
}

/// Replay a profile's entries (oldest first) against a zero opening
/// balance. Used by tests and the audit endpoint to verify the
/// conservation law: the signed sum must equal the current balance.
pub fn replay_balance(entries: &[LedgerEntry]) -> BigDecimal {
    entries
        .iter()
        .filter(|e| e.status == LedgerEntryStatus::Completed)
        .fold(BigDecimal::from(0), |acc, e| acc + &e.amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn entry(amount: &str, balance_after: &str, entry_type: LedgerEntryType) -> LedgerEntry {
        LedgerEntry {
            id: Uuid::new_v4(),
            profile_id: Uuid::nil(),
            entry_type,
            amount: BigDecimal::from_str(amount).unwrap(),
            status: LedgerEntryStatus::Completed,
            job_id: None,
            application_id: None,
            related_profile_id: None,
            note: None,
            balance_after: BigDecimal::from_str(balance_after).unwrap(),
            created_at: None,
        }
    }

    #[test]
    fn replay_reproduces_final_balance() {
        let entries = vec![
            entry("5000.00", "5000.00", LedgerEntryType::Deposit),
            entry("-2000.00", "3000.00", LedgerEntryType::EscrowRelease),
            entry("-500.00", "2500.00", LedgerEntryType::Withdrawal),
            entry("1000.00", "3500.00", LedgerEntryType::Refund),
        ];
        assert_eq!(replay_balance(&entries), BigDecimal::from_str("3500.00").unwrap());
        assert_eq!(replay_balance(&entries), entries.last().unwrap().balance_after);
    }

    #[test]
    fn replay_skips_failed_and_pending_entries() {
        let mut failed = entry("-900.00", "0.00", LedgerEntryType::Withdrawal);
        failed.status = LedgerEntryStatus::Failed;
        let mut pending = entry("100.00", "0.00", LedgerEntryType::Deposit);
        pending.status = LedgerEntryStatus::Pending;

        let entries = vec![
            entry("300.00", "300.00", LedgerEntryType::Deposit),
            failed,
            pending,
        ];
        assert_eq!(replay_balance(&entries), BigDecimal::from_str("300.00").unwrap());
    }

    #[test]
    fn snapshots_form_a_prefix_sum_sequence() {
        let entries = vec![
            entry("1000.00", "1000.00", LedgerEntryType::Deposit),
            entry("1000.00", "2000.00", LedgerEntryType::Payment),
            entry("-1500.00", "500.00", LedgerEntryType::Withdrawal),
        ];
        let mut running = BigDecimal::from(0);
        for e in &entries {
            running += &e.amount;
            assert_eq!(running, e.balance_after);
        }
    }
}
