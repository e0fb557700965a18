use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{prelude::FromRow, query, query_as};
use utoipa::ToSchema;

use super::Pool;

#[derive(Clone)]
pub struct Transactions {
    pool: Pool,
}

impl Transactions {
    pub(crate) fn new(pool: Pool) -> Self {
        return Self { pool };
    }

    pub async fn insert(&self, user_id: &str, tx: &InsertTx) -> Result<(), sqlx::Error> {
        query(
            r#"
            insert into transactions (id, user_id, description, amount, date, created_at)
            values ($1, $2, $3, $4, $5, $6);
            "#,
        )
        .bind(&tx.id)
        .bind(user_id)
        .bind(&tx.desc)
        .bind(tx.amount)
        .bind(tx.date)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Transaction>, sqlx::Error> {
        let rows = query_as::<_, Transaction>(
            r#"
            select id, description, amount, date
            from transactions
            where user_id = $1
            order by date desc;
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        return Ok(rows);
    }
}

pub struct InsertTx {
    pub id: String,
    pub desc: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Transaction {
    pub id: String,
    #[sqlx(rename = "description")]
    pub desc: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
}
