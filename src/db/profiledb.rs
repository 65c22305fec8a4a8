// db/profiledb.rs
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::{Error, Postgres, Transaction};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::profilemodel::{BadgeLevel, Profile, ProfileRole};

const PROFILE_COLUMNS: &str = r#"
    id, user_id, role, city, phone, bio, wallet_balance,
    average_rating, total_reviews, total_events_completed, badge,
    bank_account_holder, bank_account_number, bank_ifsc_code, bank_name,
    created_at, updated_at
"#;

#[async_trait]
pub trait ProfileExt {
    async fn create_profile(&self, user_id: Uuid, role: ProfileRole) -> Result<Profile, Error>;
    async fn get_profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, Error>;
    async fn get_profile(&self, profile_id: Uuid) -> Result<Option<Profile>, Error>;
    async fn list_staff_profiles(&self, limit: i64, offset: i64) -> Result<Vec<Profile>, Error>;

    async fn update_contact_details(
        &self,
        profile_id: Uuid,
        city: Option<String>,
        phone: Option<String>,
        bio: Option<String>,
    ) -> Result<Profile, Error>;

    async fn update_bank_details(
        &self,
        profile_id: Uuid,
        account_holder: String,
        account_number: String,
        ifsc_code: String,
        bank_name: Option<String>,
    ) -> Result<Profile, Error>;

    /// Row-locked read; serializes all balance mutations for a profile.
    async fn get_profile_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        profile_id: Uuid,
    ) -> Result<Option<Profile>, Error>;

    async fn set_wallet_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        profile_id: Uuid,
        new_balance: &BigDecimal,
    ) -> Result<(), Error>;

    async fn apply_reputation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        profile_id: Uuid,
        average_rating: &BigDecimal,
        total_reviews: i32,
        badge: BadgeLevel,
        events_completed_delta: i32,
    ) -> Result<(), Error>;
}

#[async_trait]
impl ProfileExt for DBClient {
    async fn create_profile(&self, user_id: Uuid, role: ProfileRole) -> Result<Profile, Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO profiles (user_id, role) VALUES ($1, $2) RETURNING {}",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {} FROM profiles WHERE user_id = $1",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_profile(&self, profile_id: Uuid) -> Result<Option<Profile>, Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {} FROM profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_staff_profiles(&self, limit: i64, offset: i64) -> Result<Vec<Profile>, Error> {
        sqlx::query_as::<_, Profile>(&format!(
            r#"
            SELECT {} FROM profiles
            WHERE role = 'staff'
            ORDER BY average_rating DESC, total_reviews DESC
            LIMIT $1 OFFSET $2
            "#,
            PROFILE_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_contact_details(
        &self,
        profile_id: Uuid,
        city: Option<String>,
        phone: Option<String>,
        bio: Option<String>,
    ) -> Result<Profile, Error> {
        sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET city = COALESCE($2, city),
                phone = COALESCE($3, phone),
                bio = COALESCE($4, bio),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(profile_id)
        .bind(city)
        .bind(phone)
        .bind(bio)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_bank_details(
        &self,
        profile_id: Uuid,
        account_holder: String,
        account_number: String,
        ifsc_code: String,
        bank_name: Option<String>,
    ) -> Result<Profile, Error> {
        sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET bank_account_holder = $2,
                bank_account_number = $3,
                bank_ifsc_code = $4,
                bank_name = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(profile_id)
        .bind(account_holder)
        .bind(account_number)
        .bind(ifsc_code)
        .bind(bank_name)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_profile_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        profile_id: Uuid,
    ) -> Result<Option<Profile>, Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {} FROM profiles WHERE id = $1 FOR UPDATE",
            PROFILE_COLUMNS
        ))
        .bind(profile_id)
        .fetch_optional(&mut **tx)
        .await
    }

    async fn set_wallet_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        profile_id: Uuid,
        new_balance: &BigDecimal,
    ) -> Result<(), Error> {
        sqlx::query("UPDATE profiles SET wallet_balance = $2, updated_at = NOW() WHERE id = $1")
            .bind(profile_id)
            .bind(new_balance)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn apply_reputation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        profile_id: Uuid,
        average_rating: &BigDecimal,
        total_reviews: i32,
        badge: BadgeLevel,
        events_completed_delta: i32,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE profiles
            SET average_rating = $2,
                total_reviews = $3,
                badge = $4,
                total_events_completed = total_events_completed + $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(profile_id)
        .bind(average_rating)
        .bind(total_reviews)
        .bind(badge)
        .bind(events_completed_delta)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
