// dtos/profiledtos.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{models::profilemodel::Profile, utils::decimal::BigDecimalHelpers};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateProfileDto {
    #[validate(length(min = 2, max = 100, message = "City must be between 2-100 characters"))]
    pub city: Option<String>,

    #[validate(length(min = 10, max = 20, message = "Phone must be between 10-20 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
    pub bio: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateBankDetailsDto {
    #[validate(length(min = 1, max = 100, message = "Account holder name is required"))]
    pub account_holder: String,

    #[validate(length(min = 6, max = 20, message = "Account number must be 6-20 characters"))]
    pub account_number: String,

    #[validate(length(min = 4, max = 20, message = "IFSC code must be 4-20 characters"))]
    pub ifsc_code: String,

    #[validate(length(max = 100, message = "Bank name must be at most 100 characters"))]
    pub bank_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterProfileDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub wallet_balance: f64,
    pub average_rating: f64,
    pub total_reviews: i32,
    pub total_events_completed: i32,
    pub badge: String,
    pub has_bank_details: bool,
}

impl FilterProfileDto {
    pub fn filter_profile(profile: &Profile) -> Self {
        FilterProfileDto {
            id: profile.id,
            user_id: profile.user_id,
            role: profile.role.to_str().to_string(),
            city: profile.city.clone(),
            phone: profile.phone.clone(),
            bio: profile.bio.clone(),
            wallet_balance: profile.wallet_balance.to_f64_or_zero(),
            average_rating: profile.average_rating.to_f64_or_zero(),
            total_reviews: profile.total_reviews,
            total_events_completed: profile.total_events_completed,
            badge: profile.badge.to_str().to_string(),
            has_bank_details: profile.has_bank_details(),
        }
    }

    pub fn filter_profiles(profiles: &[Profile]) -> Vec<Self> {
        profiles.iter().map(Self::filter_profile).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponseDto {
    pub status: String,
    pub profile: FilterProfileDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileListResponseDto {
    pub status: String,
    pub profiles: Vec<FilterProfileDto>,
    pub results: i64,
}
