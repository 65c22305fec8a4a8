// dtos/walletdtos.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::ledgermodel::LedgerEntry,
    service::wallet_service::WalletStats,
    utils::decimal::BigDecimalHelpers,
};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct DepositRequestDto {
    #[validate(range(min = 0.01, max = 10000000.0, message = "Amount must be positive"))]
    pub amount: f64,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct WithdrawRequestDto {
    #[validate(range(min = 0.01, max = 10000000.0, message = "Amount must be positive"))]
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerEntryDto {
    pub id: Uuid,
    pub entry_type: String,
    pub amount: f64,
    pub status: String,
    pub job_id: Option<Uuid>,
    pub application_id: Option<Uuid>,
    pub related_profile_id: Option<Uuid>,
    pub note: Option<String>,
    pub balance_after: f64,
    pub created_at: Option<DateTime<Utc>>,
}

impl LedgerEntryDto {
    pub fn filter_entry(entry: &LedgerEntry) -> Self {
        LedgerEntryDto {
            id: entry.id,
            entry_type: entry.entry_type.to_str().to_string(),
            amount: entry.amount.to_f64_or_zero(),
            status: entry.status.to_str().to_string(),
            job_id: entry.job_id,
            application_id: entry.application_id,
            related_profile_id: entry.related_profile_id,
            note: entry.note.clone(),
            balance_after: entry.balance_after.to_f64_or_zero(),
            created_at: entry.created_at,
        }
    }

    pub fn filter_entries(entries: &[LedgerEntry]) -> Vec<Self> {
        entries.iter().map(Self::filter_entry).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WalletMutationResponseDto {
    pub status: String,
    pub balance: f64,
    pub entry: LedgerEntryDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerResponseDto {
    pub status: String,
    pub balance: f64,
    pub entries: Vec<LedgerEntryDto>,
    pub results: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MonthlyEarningDto {
    pub month: String,
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WalletStatsResponseDto {
    pub status: String,
    pub available_balance: f64,
    pub pending_amount: f64,
    pub pending_count: i64,
    pub total_earned: f64,
    pub total_events: i64,
    pub monthly_earnings: Vec<MonthlyEarningDto>,
}

impl WalletStatsResponseDto {
    pub fn from_stats(stats: &WalletStats) -> Self {
        WalletStatsResponseDto {
            status: "success".to_string(),
            available_balance: stats.available_balance.to_f64_or_zero(),
            pending_amount: stats.pending_amount.to_f64_or_zero(),
            pending_count: stats.pending_count,
            total_earned: stats.total_earned.to_f64_or_zero(),
            total_events: stats.total_events,
            monthly_earnings: stats
                .monthly_earnings
                .iter()
                .map(|m| MonthlyEarningDto {
                    month: m.month.clone(),
                    amount: m.amount.to_f64_or_zero(),
                })
                .collect(),
        }
    }
}
