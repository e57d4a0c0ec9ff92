mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, SmtpConfig};
pub use repos::Repos;
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tracing::info;

#[derive(Clone)]
pub struct MingleContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub mailer: Arc<dyn IMailer>,
}

impl MingleContext {
    fn create(repos: Repos, config: Config) -> Self {
        let mailer: Arc<dyn IMailer> = match &config.smtp {
            Some(smtp) => match SmtpMailer::new(smtp, &config.email_from) {
                Ok(mailer) => Arc::new(mailer),
                Err(e) => {
                    info!(
                        "Could not configure the SMTP mailer ({}). Falling back to the in-memory mailer.",
                        e
                    );
                    Arc::new(InMemoryMailer::new())
                }
            },
            None => {
                info!("No SMTP settings found. Outbound email will be recorded in memory.");
                Arc::new(InMemoryMailer::new())
            }
        };
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            mailer,
        }
    }
}

/// Will setup the infrastructure context given the environment. Uses
/// Postgres when `DATABASE_URL` is present and in-memory repositories
/// otherwise, which is also what the test suites run against.
pub async fn setup_context() -> MingleContext {
    let config = Config::new();
    match get_psql_connection_string() {
        Some(connection_string) => {
            let pool = connect_postgres(&connection_string)
                .await
                .expect("Postgres credentials must be valid when DATABASE_URL is set");
            MingleContext::create(Repos::create_postgres(pool), config)
        }
        None => {
            info!("No DATABASE_URL found. Using in-memory repositories.");
            MingleContext::create(Repos::create_inmemory(), config)
        }
    }
}

fn get_psql_connection_string() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

async fn connect_postgres(connection_string: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(connection_string)
        .await
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let connection_string =
        get_psql_connection_string().expect("DATABASE_URL env var to be present.");
    let pool = connect_postgres(&connection_string)
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
