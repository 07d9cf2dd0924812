use anyhow::Context;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

use surgical_academy_data::database::{DatabaseConfig, DatabasePool};
use surgical_academy_data::seed::SEED_ACCOUNTS;
use surgical_academy_domain::auth::Passwords;

/// Fill the configured database with the sample data set
///
/// Idempotent: rows whose slug or email already exists are left alone.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DatabaseConfig::from_env().context("invalid database configuration")?;
    let pool = DatabasePool::open(&config).context("failed to open database")?;
    info!("Seeding {}", pool.connection_info());

    let report = surgical_academy_domain::seed::seed(&pool, &Passwords::new())
        .await
        .context("failed to seed database")?;

    if report.is_empty() {
        info!("Nothing to do, sample data is already present");
    } else {
        info!(
            categories = report.categories,
            users = report.users,
            tags = report.tags,
            courses = report.courses,
            articles = report.articles,
            enrollments = report.enrollments,
            fhir_resources = report.fhir_resources,
            "Seed complete"
        );
        for account in SEED_ACCOUNTS {
            info!("Login: {} / {}", account.email, account.password);
        }
    }

    Ok(())
}
