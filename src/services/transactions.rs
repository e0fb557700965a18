use anyhow::Context;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    data::{Data, InsertTx, Transaction, create_id},
    endpoints,
    error::ApiError,
};

// every ledger starts from the same fixed opening balance
const OPENING_BALANCE: f64 = 5000.0;

pub async fn create(
    data: &Data,
    user_id: &str,
    input: &endpoints::transactions::create::CreateTransactionInput,
) -> Result<(), ApiError> {
    let desc = input.desc.trim();
    if desc.is_empty() {
        return Err(ApiError::BadRequest("desc is required".to_owned()));
    }
    if desc.len() > 250 {
        return Err(ApiError::BadRequest(
            "desc must be shorter than 250".to_owned(),
        ));
    }
    if !input.amount.is_finite() {
        return Err(ApiError::BadRequest("amount must be a number".to_owned()));
    }

    let tx = InsertTx {
        id: create_id(),
        desc: desc.to_owned(),
        amount: input.amount,
        date: input.date,
    };

    data.transactions
        .insert(user_id, &tx)
        .await
        .context("error inserting transaction")?;

    Ok(())
}

pub async fn list(data: &Data, user_id: &str) -> Result<Vec<Transaction>, ApiError> {
    let transactions = data
        .transactions
        .list_by_user(user_id)
        .await
        .context("error querying transactions")?;

    return Ok(transactions);
}

pub async fn overview(data: &Data, user_id: &str) -> Result<Overview, ApiError> {
    let transactions = list(data, user_id).await?;

    return Ok(compute_overview(transactions));
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Overview {
    pub balance: f64,
    pub top_expenses: Vec<Transaction>,
    pub recent: Vec<Transaction>,
}

// expects transactions date-descending, the order the data layer
// returns them in
fn compute_overview(transactions: Vec<Transaction>) -> Overview {
    let balance = transactions
        .iter()
        .fold(OPENING_BALANCE, |acc, tx| acc - tx.amount);

    let recent = transactions.iter().take(5).cloned().collect();

    let mut by_amount = transactions;
    by_amount.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    let top_expenses = by_amount.into_iter().take(3).collect();

    return Overview {
        balance,
        top_expenses,
        recent,
    };
}

#[cfg(test)]
mod test {
    use chrono::{DateTime, Utc};

    use crate::data::Transaction;

    use super::compute_overview;

    #[test]
    fn balance_subtracts_the_ledger_from_the_opening_balance() {
        let overview = compute_overview(vec![tx("a", 100.0), tx("b", -40.0)]);

        assert_eq!(overview.balance, 4940.0);
    }

    #[test]
    fn empty_ledger_keeps_the_opening_balance() {
        let overview = compute_overview(vec![]);

        assert_eq!(overview.balance, 5000.0);
        assert!(overview.top_expenses.is_empty());
        assert!(overview.recent.is_empty());
    }

    #[test]
    fn top_expenses_are_the_three_largest_amounts() {
        let overview = compute_overview(vec![
            tx("rent", 900.0),
            tx("coffee", 4.0),
            tx("groceries", 60.0),
            tx("flight", 300.0),
        ]);

        let descs: Vec<&str> = overview
            .top_expenses
            .iter()
            .map(|tx| tx.desc.as_str())
            .collect();

        assert_eq!(descs, vec!["rent", "flight", "groceries"]);
    }

    #[test]
    fn recent_keeps_the_first_five_in_given_order() {
        let transactions: Vec<Transaction> =
            (0..7).map(|i| tx(&format!("tx{i}"), i as f64)).collect();

        let overview = compute_overview(transactions);

        let descs: Vec<&str> = overview.recent.iter().map(|tx| tx.desc.as_str()).collect();

        assert_eq!(descs, vec!["tx0", "tx1", "tx2", "tx3", "tx4"]);
    }

    fn tx(desc: &str, amount: f64) -> Transaction {
        Transaction {
            id: desc.to_owned(),
            desc: desc.to_owned(),
            amount,
            date: DateTime::<Utc>::from_timestamp_millis(0).expect("epoch"),
        }
    }
}
