// db/messagedb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::messagemodel::Message;

#[async_trait]
pub trait MessageExt {
    async fn save_message(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        text: String,
    ) -> Result<Message, Error>;

    /// Messages addressed to this profile, newest first.
    async fn list_inbox(&self, profile_id: Uuid, limit: i64) -> Result<Vec<Message>, Error>;

    /// Both directions of the conversation, oldest first.
    async fn list_conversation(
        &self,
        profile_a: Uuid,
        profile_b: Uuid,
        limit: i64,
    ) -> Result<Vec<Message>, Error>;
}

#[async_trait]
impl MessageExt for DBClient {
    async fn save_message(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        text: String,
    ) -> Result<Message, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (sender_id, recipient_id, text)
            VALUES ($1, $2, $3)
            RETURNING id, sender_id, recipient_id, text, created_at
            "#,
        )
        .bind(sender_id)
        .bind(recipient_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_inbox(&self, profile_id: Uuid, limit: i64) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT id, sender_id, recipient_id, text, created_at
            FROM messages
            WHERE recipient_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(profile_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_conversation(
        &self,
        profile_a: Uuid,
        profile_b: Uuid,
        limit: i64,
    ) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT id, sender_id, recipient_id, text, created_at
            FROM messages
            WHERE (sender_id = $1 AND recipient_id = $2)
               OR (sender_id = $2 AND recipient_id = $1)
            ORDER BY created_at ASC
            LIMIT $3
            "#,
        )
        .bind(profile_a)
        .bind(profile_b)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
