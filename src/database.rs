use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{Executor, MySql, Pool};
use thiserror::Error;

use crate::config::MysqlConfig;
use crate::data_structs::subscription::Subscription;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

/// Keyed, zero-or-one read against the `subscriptions` table. The trait is
/// the seam that lets tests substitute a fake store for the MySQL pool.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn subscription_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<Subscription>, StoreError>;
}

#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: Pool<MySql>,
}

impl DatabasePool {
    pub async fn new(creds: &MysqlConfig) -> Result<Self, sqlx::Error> {
        let connection_url = format!(
            "mysql://{}:{}@{}:{}/{}",
            creds.username, creds.password, creds.host, creds.port, creds.database
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .min_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&connection_url)
            .await?;

        Ok(DatabasePool { pool })
    }

    pub async fn init(&self) -> Result<(), sqlx::Error> {
        self.create_subscriptions_table().await?;
        Ok(())
    }

    // Rows are inserted and updated by the billing-sync worker, never here.
    // The primary key on user_id is what guarantees the zero-or-one contract.
    async fn create_subscriptions_table(&self) -> Result<(), sqlx::Error> {
        self.pool
            .execute(
                r#"
            create table if not exists subscriptions
            (
                user_id                varchar(64)                           not null,
                stripe_customer_id     varchar(32)                           null,
                stripe_subscription_id varchar(32)                           null,
                status                 varchar(32)                           not null,
                price_id               varchar(32)                           null,
                cancel_at_period_end   tinyint(1)  default 0                 not null,
                current_period_end     bigint                                null,
                created_at             bigint      default unix_timestamp()  not null,
                updated_at             bigint      default unix_timestamp()  not null,
                primary key (user_id)
            );
        "#,
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SubscriptionStore for DatabasePool {
    async fn subscription_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<Subscription>, StoreError> {
        let row = sqlx::query("SELECT * FROM subscriptions WHERE user_id=?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Subscription::decode(&row)?)),
            None => Ok(None),
        }
    }
}
