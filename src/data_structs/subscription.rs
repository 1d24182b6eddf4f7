use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlRow;
use sqlx::Row;

/// One row of the `subscriptions` table, keyed by `user_id`. Rows are written
/// by the external billing-sync process; this service only reads them and
/// passes them through unmodified.
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct Subscription {
    pub user_id: String,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub status: String,
    pub price_id: Option<String>,
    pub current_period_end: Option<i64>,
    pub cancel_at_period_end: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Subscription {
    pub(crate) fn decode(row: &MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Subscription {
            user_id: row.try_get("user_id")?,
            stripe_customer_id: row.try_get("stripe_customer_id")?,
            stripe_subscription_id: row.try_get("stripe_subscription_id")?,
            status: row.try_get("status")?,
            price_id: row.try_get("price_id")?,
            current_period_end: row.try_get("current_period_end")?,
            cancel_at_period_end: row.try_get("cancel_at_period_end")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_snake_case_field_names() {
        let subscription = Subscription {
            user_id: "user-1".to_string(),
            stripe_customer_id: Some("cus_123".to_string()),
            stripe_subscription_id: Some("sub_456".to_string()),
            status: "active".to_string(),
            price_id: None,
            current_period_end: Some(1_735_689_600),
            cancel_at_period_end: false,
            created_at: 1_704_067_200,
            updated_at: 1_704_067_200,
        };

        let json = serde_json::to_value(&subscription).unwrap();
        assert_eq!(json["user_id"], "user-1");
        assert_eq!(json["stripe_customer_id"], "cus_123");
        assert_eq!(json["status"], "active");
        assert_eq!(json["price_id"], serde_json::Value::Null);
        assert_eq!(json["cancel_at_period_end"], false);
    }
}
