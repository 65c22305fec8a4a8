// db/userdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::usermodel::User;

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, Error>;

    async fn save_user(
        &self,
        name: String,
        username: String,
        email: String,
        password: String,
    ) -> Result<User, Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(
                "SELECT id, name, username, email, password, created_at, updated_at FROM users WHERE id = $1"
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(username) = username {
            user = sqlx::query_as::<_, User>(
                "SELECT id, name, username, email, password, created_at, updated_at FROM users WHERE username = $1"
            )
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(
                "SELECT id, name, username, email, password, created_at, updated_at FROM users WHERE email = $1"
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn save_user(
        &self,
        name: String,
        username: String,
        email: String,
        password: String,
    ) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, username, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, username, email, password, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(username)
        .bind(email)
        .bind(password)
        .fetch_one(&self.pool)
        .await
    }
}
