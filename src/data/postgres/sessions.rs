use chrono::{DateTime, Utc};
use sqlx::{prelude::FromRow, query, query_as};

use super::Pool;

#[derive(Clone)]
pub struct Sessions {
    pool: Pool,
}

impl Sessions {
    pub(crate) fn new(pool: Pool) -> Self {
        return Self { pool };
    }

    pub async fn get_one(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<Session>, sqlx::Error> {
        let session = query_as::<_, Session>(
            "select id, user_id, created_at from sessions where id = $1 and user_id = $2 limit 1;",
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        return Ok(session);
    }

    pub async fn insert(&self, user_id: &str, session_id: &str) -> Result<(), sqlx::Error> {
        query("insert into sessions (id, user_id, created_at) values ($1, $2, $3);")
            .bind(session_id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}
