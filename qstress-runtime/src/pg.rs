//! Postgres connection provider (requires `postgres` feature)
use futures_util::TryStreamExt;
use qstress::{Connection, ConnectionError, Connector};
use qstress_core::Target;
use sqlx::{Connection as _, PgConnection};
#[allow(unused)]
use tracing::{debug, trace};

/// Opens one unpooled `PgConnection` per call to [`Connector::connect`].
#[derive(Debug, Clone)]
pub struct PgConnector {
    url: String,
}

impl PgConnector {
    pub fn new(target: &Target) -> Self {
        Self {
            url: target.postgres_url(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Connector for PgConnector {
    type Connection = PgQueryConnection;

    async fn connect(&self) -> Result<PgQueryConnection, ConnectionError> {
        let conn = PgConnection::connect(&self.url)
            .await
            .map_err(ConnectionError::driver)?;
        trace!("Connected to Postgres.");
        Ok(PgQueryConnection { conn })
    }
}

pub struct PgQueryConnection {
    conn: PgConnection,
}

impl Connection for PgQueryConnection {
    async fn execute(&mut self, query: &str) -> Result<u64, ConnectionError> {
        let mut rows = sqlx::raw_sql(query).fetch(&mut self.conn);
        let mut count = 0;
        while rows
            .try_next()
            .await
            .map_err(ConnectionError::driver)?
            .is_some()
        {
            count += 1;
        }
        Ok(count)
    }

    async fn close(self) -> Result<(), ConnectionError> {
        self.conn.close().await.map_err(ConnectionError::driver)
    }
}
