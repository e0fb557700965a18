use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{query, query_scalar};

use super::{Pool, Session};

#[derive(Clone)]
pub struct Users {
    pool: Pool,
}

impl Users {
    pub(crate) fn new(pool: Pool) -> Self {
        return Self { pool };
    }

    pub async fn get_id_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        let user_id =
            query_scalar::<_, String>("select id from users where external_id = $1 limit 1;")
                .bind(external_id)
                .fetch_optional(&self.pool)
                .await?;

        return Ok(user_id);
    }

    pub async fn upsert_with_session(&self, user: &User, session: &Session) -> Result<()> {
        let mut tx = self.pool.begin().await.context("error starting tx")?;

        query(
            "insert into users (id, external_id, created_at) values ($1, $2, $3) on conflict (external_id) do nothing;",
        )
        .bind(&user.id)
        .bind(&user.external_id)
        .bind(user.created_at)
        .execute(&mut *tx)
        .await
        .context("error upserting user")?;

        query("insert into sessions (id, user_id, created_at) values ($1, $2, $3);")
            .bind(&session.id)
            .bind(&user.id)
            .bind(session.created_at)
            .execute(&mut *tx)
            .await
            .context("error inserting session")?;

        tx.commit().await.context("error committing tx")?;

        return Ok(());
    }
}

pub struct User {
    pub id: String,
    pub external_id: String,
    pub created_at: DateTime<Utc>,
}
