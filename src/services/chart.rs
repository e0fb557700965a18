use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// One point of the fixed twelve-month spending series.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartPoint {
    pub month: String,
    pub value: f64,
}

static MONTH_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^M(\d{1,2})$").expect("month label regex"));

// labels that don't match M<digits> sort after every real month
const MALFORMED_LABEL_RANK: u32 = 99;

/// Turns whatever the transactions endpoint returned into a renderable
/// monthly series. Accepts already-aggregated `{month, value}` arrays,
/// raw transaction arrays, or garbage; never fails, malformed records
/// are dropped.
pub fn normalize(records: &Value) -> Vec<ChartPoint> {
    let Some(records) = records.as_array() else {
        return empty_months();
    };

    // an array is treated as aggregated only if every element fits the
    // aggregated shape, otherwise the whole thing goes down the raw path
    if let Some(points) = as_aggregated(records) {
        return sort_months(points);
    }

    let mut totals = [0.0f64; 12];
    for record in records {
        let Some(amount) = record_amount(record) else {
            continue;
        };
        let Some(month) = record_month(record) else {
            continue;
        };
        totals[(month - 1) as usize] += amount;
    }

    totals
        .iter()
        .enumerate()
        .map(|(i, total)| ChartPoint {
            month: format!("M{}", i + 1),
            value: round2(*total),
        })
        .collect()
}

fn as_aggregated(records: &[Value]) -> Option<Vec<ChartPoint>> {
    if records.is_empty() {
        return None;
    }

    records
        .iter()
        .map(|record| {
            let month = record.get("month")?.as_str()?;
            let value = coerce_number(record.get("value")?)?;

            Some(ChartPoint {
                month: month.to_owned(),
                value,
            })
        })
        .collect()
}

fn sort_months(mut points: Vec<ChartPoint>) -> Vec<ChartPoint> {
    points.sort_by_key(|point| month_rank(&point.month));

    points
}

fn month_rank(label: &str) -> u32 {
    MONTH_LABEL
        .captures(label)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .unwrap_or(MALFORMED_LABEL_RANK)
}

// amount lives under `amount`, `value` or `sum` depending on which
// upstream produced the record; first field that coerces wins
fn record_amount(record: &Value) -> Option<f64> {
    ["amount", "value", "sum"]
        .iter()
        .find_map(|field| record.get(*field).and_then(coerce_number))
        .filter(|amount| amount.is_finite())
}

fn record_month(record: &Value) -> Option<u32> {
    record
        .get("date")
        .and_then(date_month)
        .or_else(|| record.get("timestamp").and_then(timestamp_month))
}

fn date_month(value: &Value) -> Option<u32> {
    // a numeric date (or numeric string) is epoch millis
    if let Some(millis) = coerce_number(value) {
        return epoch_month(millis);
    }

    let text = value.as_str()?.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.to_utc().month());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.month());
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(date.month());
    }

    None
}

fn timestamp_month(value: &Value) -> Option<u32> {
    coerce_number(value).and_then(epoch_month)
}

fn epoch_month(millis: f64) -> Option<u32> {
    if !millis.is_finite() {
        return None;
    }

    let date = DateTime::from_timestamp_millis(millis as i64)?;

    return Some(date.month());
}

fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    number.filter(|n| !n.is_nan())
}

// rounds halves toward positive infinity; f64::round would send
// -0.5 to -1
fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

fn empty_months() -> Vec<ChartPoint> {
    (1..=12)
        .map(|m| ChartPoint {
            month: format!("M{m}"),
            value: 0.0,
        })
        .collect()
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::{ChartPoint, normalize, round2};

    fn assert_zero_series(points: &[ChartPoint]) {
        assert_eq!(points.len(), 12);
        for (i, point) in points.iter().enumerate() {
            assert_eq!(point.month, format!("M{}", i + 1));
            assert_eq!(point.value, 0.0);
        }
    }

    #[test]
    fn non_array_inputs_yield_the_zero_series() {
        assert_zero_series(&normalize(&json!(null)));
        assert_zero_series(&normalize(&json!("transactions")));
        assert_zero_series(&normalize(&json!({ "error": "unauthorized" })));
        assert_zero_series(&normalize(&json!(42)));
    }

    #[test]
    fn empty_array_yields_the_zero_series() {
        assert_zero_series(&normalize(&json!([])));
    }

    #[test]
    fn aggregated_input_is_sorted_by_numeric_suffix() {
        let input = json!([
            { "month": "M12", "value": 540 },
            { "month": "M2", "value": 345 },
            { "month": "M10", "value": "495" },
            { "month": "M1", "value": 310.5 },
        ]);

        let points = normalize(&input);

        assert_eq!(points.len(), 4);
        assert_eq!(points[0], point("M1", 310.5));
        assert_eq!(points[1], point("M2", 345.0));
        assert_eq!(points[2], point("M10", 495.0));
        assert_eq!(points[3], point("M12", 540.0));
    }

    #[test]
    fn malformed_labels_sort_last() {
        let input = json!([
            { "month": "total", "value": 1 },
            { "month": "M3", "value": 3 },
            { "month": "M1", "value": 1 },
        ]);

        let points = normalize(&input);

        assert_eq!(points[0].month, "M1");
        assert_eq!(points[1].month, "M3");
        assert_eq!(points[2].month, "total");
    }

    #[test]
    fn one_raw_element_sends_the_whole_array_down_the_raw_path() {
        // mixed input must not be read as partially aggregated
        let input = json!([
            { "month": "M1", "value": 310 },
            { "date": "2024-01-15", "amount": 100 },
        ]);

        let points = normalize(&input);

        // only the raw transaction lands in a bucket
        assert_eq!(points.len(), 12);
        assert_eq!(points[0], point("M1", 100.0));
        assert_eq!(points[1].value, 0.0);
    }

    #[test]
    fn raw_transactions_bucket_by_calendar_month() {
        let input = json!([
            { "date": "2024-01-15", "amount": 100 },
            { "date": "2024-01-20", "amount": 50 },
            { "date": "2024-03-01", "amount": -30 },
        ]);

        let points = normalize(&input);

        assert_eq!(points.len(), 12);
        assert_eq!(points[0], point("M1", 150.0));
        assert_eq!(points[2], point("M3", -30.0));
        for i in [1, 3, 4, 5, 6, 7, 8, 9, 10, 11] {
            assert_eq!(points[i].value, 0.0);
        }
    }

    #[test]
    fn unparseable_dates_skip_the_record() {
        let input = json!([{ "date": "not-a-date", "amount": 10 }]);

        assert_zero_series(&normalize(&input));
    }

    #[test]
    fn unparseable_amounts_skip_the_record() {
        let input = json!([
            { "date": "2024-06-01", "amount": "lots" },
            { "date": "2024-06-01" },
            { "date": "2024-06-01", "amount": 25 },
        ]);

        let points = normalize(&input);

        assert_eq!(points[5], point("M6", 25.0));
    }

    #[test]
    fn amount_falls_back_through_value_and_sum() {
        let input = json!([
            { "date": "2024-02-01", "value": "12.5" },
            { "date": "2024-02-02", "sum": 7.5 },
        ]);

        let points = normalize(&input);

        assert_eq!(points[1], point("M2", 20.0));
    }

    #[test]
    fn numeric_date_and_timestamp_are_epoch_millis() {
        // 2021-07-01T00:00:00Z
        let millis = 1_625_097_600_000i64;

        let input = json!([
            { "date": millis, "amount": 10 },
            { "date": millis.to_string(), "amount": 10 },
            { "timestamp": millis, "amount": 10 },
        ]);

        let points = normalize(&input);

        assert_eq!(points[6], point("M7", 30.0));
    }

    #[test]
    fn rfc3339_dates_parse() {
        let input = json!([{ "date": "2024-11-05T13:45:00Z", "amount": 9.99 }]);

        let points = normalize(&input);

        assert_eq!(points[10], point("M11", 9.99));
    }

    #[test]
    fn same_calendar_month_across_years_shares_a_bucket() {
        // known quirk, reproduced on purpose: the series has no year
        // dimension, so May 2023 and May 2024 land in the same bucket
        let input = json!([
            { "date": "2023-05-10", "amount": 40 },
            { "date": "2024-05-10", "amount": 2 },
        ]);

        let points = normalize(&input);

        assert_eq!(points[4], point("M5", 42.0));
    }

    #[test]
    fn normalizing_an_already_normalized_series_is_stable() {
        let raw = json!([
            { "date": "2024-01-15", "amount": 100.10 },
            { "date": "2024-03-01", "amount": -30.55 },
        ]);

        let once = normalize(&raw);
        let again = normalize(&serde_json::to_value(&once).expect("series to value"));

        assert_eq!(once, again);
    }

    #[test]
    fn totals_round_half_up() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.12);
        assert_eq!(round2(150.0), 150.0);
    }

    fn point(month: &str, value: f64) -> ChartPoint {
        ChartPoint {
            month: month.to_owned(),
            value,
        }
    }
}
