use crate::{Result, TestInfraError};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const POSTGRES_PORT: u16 = 5432;

#[derive(Debug, Clone, TypedBuilder)]
pub struct PostgresConfig {
    #[builder(default = "shortly".to_string())]
    database: String,
    #[builder(default = "shortly".to_string())]
    username: String,
    #[builder(default = "shortly".to_string())]
    password: String,
    /// Pool size used by [`PostgresServer::connect`].
    #[builder(default = 5)]
    max_connections: u32,
    /// How many times [`PostgresServer::connect`] tries before giving up.
    #[builder(default = 20)]
    connect_attempts: usize,
    #[builder(default = Duration::from_millis(500))]
    connect_backoff: Duration,
}

/// Test fixture for a disposable Postgres server.
pub struct PostgresServer {
    container: ContainerAsync<GenericImage>,
    config: PostgresConfig,
}

impl PostgresServer {
    /// Starts a Postgres container suitable for integration tests.
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        let container = GenericImage::new("postgres", "17-alpine")
            .with_exposed_port(POSTGRES_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr(
                "database system is ready to accept connections",
            ))
            .with_env_var("POSTGRES_DB", config.database.as_str())
            .with_env_var("POSTGRES_USER", config.username.as_str())
            .with_env_var("POSTGRES_PASSWORD", config.password.as_str())
            .start()
            .await?;

        Ok(Self { container, config })
    }

    pub async fn host(&self) -> Result<String> {
        Ok(self.container.get_host().await?.to_string())
    }

    pub async fn port(&self) -> Result<u16> {
        Ok(self.container.get_host_port_ipv4(POSTGRES_PORT).await?)
    }

    pub async fn database_url(&self) -> Result<String> {
        let host = self.host().await?;
        let port = self.port().await?;
        Ok(format!(
            "postgres://{}:{}@{}:{}/{}",
            self.config.username, self.config.password, host, port, self.config.database
        ))
    }

    /// Opens a connection pool to the server.
    ///
    /// The image logs its ready message once for the init server and again
    /// after restarting, so the first connections can be refused. Connecting
    /// is retried with a fixed backoff.
    pub async fn connect(&self) -> Result<PgPool> {
        let url = self.database_url().await?;
        let attempts = self.config.connect_attempts.max(1);
        let mut attempt = 1;

        loop {
            let result = PgPoolOptions::new()
                .max_connections(self.config.max_connections)
                .connect(&url)
                .await;

            match result {
                Ok(pool) => return Ok(pool),
                Err(_) if attempt < attempts => {
                    attempt += 1;
                    tokio::time::sleep(self.config.connect_backoff).await;
                }
                Err(source) => return Err(TestInfraError::NotReady { attempts, source }),
            }
        }
    }
}
