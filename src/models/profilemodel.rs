// models/profilemodel.rs
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "profile_role", rename_all = "snake_case")]
pub enum ProfileRole {
    Organizer,
    Staff,
}

impl ProfileRole {
    pub fn to_str(&self) -> &str {
        match self {
            ProfileRole::Organizer => "organizer",
            ProfileRole::Staff => "staff",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "badge_level", rename_all = "snake_case")]
pub enum BadgeLevel {
    RisingStar,
    Pro,
    Elite,
}

impl BadgeLevel {
    pub fn to_str(&self) -> &str {
        match self {
            BadgeLevel::RisingStar => "rising_star",
            BadgeLevel::Pro => "pro",
            BadgeLevel::Elite => "elite",
        }
    }
}

/// Wallet-bearing identity: one per user, mutated by every ledger
/// operation and by review submission. Never deleted independently
/// of the owning user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: ProfileRole,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub wallet_balance: BigDecimal,

    // Reputation, recomputed on every review save
    pub average_rating: BigDecimal,
    pub total_reviews: i32,
    pub total_events_completed: i32,
    pub badge: BadgeLevel,

    // Bank details, required for withdrawals
    pub bank_account_holder: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_ifsc_code: Option<String>,
    pub bank_name: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn has_bank_details(&self) -> bool {
        fn filled(v: &Option<String>) -> bool {
            v.as_deref().map_or(false, |s| !s.trim().is_empty())
        }
        filled(&self.bank_account_holder)
            && filled(&self.bank_account_number)
            && filled(&self.bank_ifsc_code)
    }
}

/// Badge is a pure function of the rating aggregates: an account with
/// no reviews is always a rising star, whatever its badge was before.
pub fn badge_for(average_rating: &BigDecimal, total_reviews: i32) -> BadgeLevel {
    if total_reviews == 0 {
        return BadgeLevel::RisingStar;
    }
    if *average_rating >= BigDecimal::from(4) {
        BadgeLevel::Elite
    } else if *average_rating >= BigDecimal::from(3) {
        BadgeLevel::Pro
    } else {
        BadgeLevel::RisingStar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn no_reviews_is_always_rising_star() {
        assert_eq!(badge_for(&dec("4.90"), 0), BadgeLevel::RisingStar);
        assert_eq!(badge_for(&dec("0.00"), 0), BadgeLevel::RisingStar);
    }

    #[test]
    fn badge_thresholds() {
        assert_eq!(badge_for(&dec("4.00"), 3), BadgeLevel::Elite);
        assert_eq!(badge_for(&dec("4.75"), 1), BadgeLevel::Elite);
        assert_eq!(badge_for(&dec("3.99"), 5), BadgeLevel::Pro);
        assert_eq!(badge_for(&dec("3.00"), 5), BadgeLevel::Pro);
        assert_eq!(badge_for(&dec("2.99"), 5), BadgeLevel::RisingStar);
        assert_eq!(badge_for(&dec("1.00"), 2), BadgeLevel::RisingStar);
    }

    #[test]
    fn bank_details_require_all_three_fields() {
        let mut profile = Profile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: ProfileRole::Staff,
            city: None,
            phone: None,
            bio: None,
            wallet_balance: BigDecimal::from(0),
            average_rating: BigDecimal::from(0),
            total_reviews: 0,
            total_events_completed: 0,
            badge: BadgeLevel::RisingStar,
            bank_account_holder: Some("Asha Rao".to_string()),
            bank_account_number: Some("1234567890".to_string()),
            bank_ifsc_code: None,
            bank_name: None,
            created_at: None,
            updated_at: None,
        };
        assert!(!profile.has_bank_details());

        profile.bank_ifsc_code = Some("HDFC0001234".to_string());
        assert!(profile.has_bank_details());

        profile.bank_account_number = Some("   ".to_string());
        assert!(!profile.has_bank_details());
    }
}
