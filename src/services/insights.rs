use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{config::Config, data::Transaction};

/// Ledger aggregates plus the raw model completion. `message` is
/// best-effort: upstream failures degrade into a warning-marker string
/// so the caller always has something to sectionize.
pub struct LedgerSummary {
    pub total: f64,
    pub avg: f64,
    pub message: String,
}

pub const FALLBACK_MESSAGE: &str = "⚠️ AI service unavailable, showing fallback insights.";

const SYSTEM_PROMPT: &str = "\
You are a financial assistant. Analyze these transactions and provide:
1. Spending insights (e.g., categories increasing/decreasing)
2. Predictions for next month
3. A short motivational message
Label each section with a '### Spending Insights:', '### Predictions for Next Month:' and '### Motivational Message:' heading.
Make it concise and human-friendly.";

static AI_CLIENT: Lazy<Client> = Lazy::new(Client::new);

pub async fn summarize(config: &Config, transactions: &[Transaction]) -> LedgerSummary {
    let (total, avg) = ledger_totals(transactions);

    let message = match complete(config, transactions).await {
        Ok(message) => message,
        Err(err) => {
            tracing::error!("ai completion failed: {:#}", err);

            FALLBACK_MESSAGE.to_owned()
        }
    };

    return LedgerSummary {
        total,
        avg,
        message,
    };
}

fn ledger_totals(transactions: &[Transaction]) -> (f64, f64) {
    let total: f64 = transactions.iter().map(|tx| tx.amount).sum();
    let avg = total / transactions.len().max(1) as f64;

    (total, avg)
}

async fn complete(config: &Config, transactions: &[Transaction]) -> Result<String> {
    let body = CompletionReq {
        model: &config.ai_model,
        messages: vec![
            Message {
                role: "system",
                content: SYSTEM_PROMPT.to_owned(),
            },
            Message {
                role: "user",
                content: serde_json::to_string(transactions)
                    .context("error serializing transactions")?,
            },
        ],
        max_tokens: 200,
    };

    let res = AI_CLIENT
        .post(&config.ai_api_url)
        .bearer_auth(&config.ai_api_key)
        .json(&body)
        .send()
        .await
        .context("error executing completion req")?;

    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        tracing::error!("ai api error {status}: {text}");

        // still a renderable message, just one that matches no heading
        return Ok(format!("⚠️ AI API error {status}: {text}"));
    }

    let res = res
        .json::<CompletionRes>()
        .await
        .context("error parsing completion res")?;

    let message = res
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .map(|message| message.content)
        .filter(|content| !content.is_empty())
        .unwrap_or_else(|| "No AI response".to_owned());

    return Ok(message);
}

#[derive(Serialize)]
struct CompletionReq<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct CompletionRes {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[cfg(test)]
mod test {
    use chrono::{DateTime, Utc};

    use crate::data::Transaction;

    use super::{FALLBACK_MESSAGE, ledger_totals};

    #[test]
    fn totals_sum_the_ledger() {
        let transactions = vec![tx(100.0), tx(50.0), tx(-30.0)];

        let (total, avg) = ledger_totals(&transactions);

        assert_eq!(total, 120.0);
        assert_eq!(avg, 40.0);
    }

    #[test]
    fn empty_ledger_avg_does_not_divide_by_zero() {
        let (total, avg) = ledger_totals(&[]);

        assert_eq!(total, 0.0);
        assert_eq!(avg, 0.0);
    }

    #[test]
    fn fallback_message_carries_the_warning_marker() {
        assert!(FALLBACK_MESSAGE.starts_with("⚠️"));
    }

    fn tx(amount: f64) -> Transaction {
        Transaction {
            id: amount.to_string(),
            desc: "tx".to_owned(),
            amount,
            date: DateTime::<Utc>::from_timestamp_millis(0).expect("epoch"),
        }
    }
}
