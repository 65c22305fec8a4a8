// service/wallet_service.rs
use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::{
    db::{
        db::DBClient,
        ledgerdb::{LedgerExt, MonthlyEarning, NewLedgerEntry},
        profiledb::ProfileExt,
    },
    models::ledgermodel::{LedgerEntry, LedgerEntryStatus, LedgerEntryType},
    service::error::ServiceError,
    utils::{decimal::to_money, reference::generate_reference},
};

const LEDGER_PAGE_SIZE: i64 = 50;
const EARNINGS_MONTHS: i32 = 6;

/// Result of a successful balance mutation: the appended entry plus
/// the balance it left behind. `entry.balance_after == balance` always.
#[derive(Debug, Clone)]
pub struct WalletMutation {
    pub balance: BigDecimal,
    pub entry: LedgerEntry,
}

#[derive(Debug, Clone)]
pub struct WalletService {
    db_client: Arc<DBClient>,
}

impl WalletService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn deposit(
        &self,
        profile_id: Uuid,
        amount: BigDecimal,
    ) -> Result<WalletMutation, ServiceError> {
        let amount = validate_amount(amount)?;

        let mut tx = self.db_client.pool.begin().await?;

        let profile = self
            .db_client
            .get_profile_for_update(&mut tx, profile_id)
            .await?
            .ok_or(ServiceError::ProfileNotFound(profile_id))?;

        let new_balance = &profile.wallet_balance + &amount;
        self.db_client
            .set_wallet_balance(&mut tx, profile_id, &new_balance)
            .await?;

        let entry = self
            .db_client
            .append_entry(
                &mut tx,
                NewLedgerEntry {
                    profile_id,
                    entry_type: LedgerEntryType::Deposit,
                    amount,
                    status: LedgerEntryStatus::Completed,
                    job_id: None,
                    application_id: None,
                    related_profile_id: None,
                    note: Some(format!("Wallet deposit {}", generate_reference())),
                    balance_after: new_balance.clone(),
                },
            )
            .await?;

        tx.commit().await?;

        Ok(WalletMutation {
            balance: new_balance,
            entry,
        })
    }

    pub async fn withdraw(
        &self,
        profile_id: Uuid,
        amount: BigDecimal,
    ) -> Result<WalletMutation, ServiceError> {
        let amount = validate_amount(amount)?;

        let mut tx = self.db_client.pool.begin().await?;

        let profile = self
            .db_client
            .get_profile_for_update(&mut tx, profile_id)
            .await?
            .ok_or(ServiceError::ProfileNotFound(profile_id))?;

        if !profile.has_bank_details() {
            return Err(ServiceError::MissingBankDetails);
        }

        if profile.wallet_balance < amount {
            return Err(ServiceError::InsufficientBalance {
                required: amount.clone(),
                available: profile.wallet_balance.clone(),
                this_hire: amount,
                already_committed: BigDecimal::from(0),
            });
        }

        let new_balance = &profile.wallet_balance - &amount;
        self.db_client
            .set_wallet_balance(&mut tx, profile_id, &new_balance)
            .await?;

        let entry = self
            .db_client
            .append_entry(
                &mut tx,
                NewLedgerEntry {
                    profile_id,
                    entry_type: LedgerEntryType::Withdrawal,
                    amount: -amount,
                    status: LedgerEntryStatus::Completed,
                    job_id: None,
                    application_id: None,
                    related_profile_id: None,
                    note: Some(format!("Withdrawal {}", generate_reference())),
                    balance_after: new_balance.clone(),
                },
            )
            .await?;

        tx.commit().await?;

        Ok(WalletMutation {
            balance: new_balance,
            entry,
        })
    }

    /// Newest-first slice of the profile's ledger for display.
    pub async fn ledger(&self, profile_id: Uuid) -> Result<Vec<LedgerEntry>, ServiceError> {
        let entries = self
            .db_client
            .list_entries(profile_id, LEDGER_PAGE_SIZE)
            .await?;
        Ok(entries)
    }

    /// Rolled-up wallet figures: completed and pending totals, lifetime
    /// payment earnings, distinct paid hires, and a six-month earnings
    /// series for the dashboard chart.
    pub async fn stats(&self, profile_id: Uuid) -> Result<WalletStats, ServiceError> {
        self.db_client
            .get_profile(profile_id)
            .await?
            .ok_or(ServiceError::ProfileNotFound(profile_id))?;

        let totals = self.db_client.ledger_totals(profile_id).await?;
        let monthly_earnings = self
            .db_client
            .monthly_earnings(profile_id, EARNINGS_MONTHS)
            .await?;

        Ok(WalletStats {
            available_balance: totals.completed_total,
            pending_amount: totals.pending_total,
            pending_count: totals.pending_count,
            total_earned: totals.earned_total,
            total_events: totals.events_paid,
            monthly_earnings,
        })
    }
}

#[derive(Debug, Clone)]
pub struct WalletStats {
    pub available_balance: BigDecimal,
    pub pending_amount: BigDecimal,
    pub pending_count: i64,
    pub total_earned: BigDecimal,
    pub total_events: i64,
    pub monthly_earnings: Vec<MonthlyEarning>,
}

/// Normalize to money scale and reject non-positive values. Every
/// deposit/withdraw amount passes through here before touching a row.
pub(crate) fn validate_amount(amount: BigDecimal) -> Result<BigDecimal, ServiceError> {
    let amount = to_money(amount);
    if amount <= BigDecimal::from(0) {
        return Err(ServiceError::InvalidAmount);
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn rejects_zero_and_negative_amounts() {
        assert!(matches!(
            validate_amount(dec("0")),
            Err(ServiceError::InvalidAmount)
        ));
        assert!(matches!(
            validate_amount(dec("-10.00")),
            Err(ServiceError::InvalidAmount)
        ));
        assert!(matches!(
            validate_amount(dec("0.004")),
            Err(ServiceError::InvalidAmount)
        ));
    }

    #[test]
    fn normalizes_to_money_scale() {
        assert_eq!(validate_amount(dec("3000")).unwrap(), dec("3000.00"));
        assert_eq!(validate_amount(dec("10.005")).unwrap(), dec("10.01"));
    }
}
