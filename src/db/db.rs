// db/db.rs
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use crate::config::Config;

#[derive(Clone)]
pub struct DBClient {
    pub pool: Pool<Postgres>,
}

impl std::fmt::Debug for DBClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DBClient")
            .field("pool", &"Pool<Postgres>")
            .finish()
    }
}

impl DBClient {
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient { pool }
    }

    /// Connect using the configured pool size and apply pending migrations.
    pub async fn connect(config: &Config) -> Result<Self, crate::service::error::ServiceError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        tracing::info!("✅ Connection to the database is successful");

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(DBClient::new(pool))
    }
}
