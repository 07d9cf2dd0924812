//! Development data seeding with hashed account passwords

use std::collections::HashMap;

use tracing::info;

use crate::auth::Passwords;
use crate::services::ServiceError;
use surgical_academy_data::database::DatabasePool;
use surgical_academy_data::seed::{seed_database, SeedReport, SEED_ACCOUNTS};

/// Hash every sample account's password and insert the sample data set.
///
/// Safe to run repeatedly; existing rows are left untouched.
pub async fn seed(pool: &DatabasePool, passwords: &Passwords) -> Result<SeedReport, ServiceError> {
    let passwords = passwords.clone();
    let hashes = tokio::task::spawn_blocking(move || {
        SEED_ACCOUNTS
            .iter()
            .map(|account| -> Result<(&'static str, String), ServiceError> {
                Ok((account.email, passwords.hash(account.password)?))
            })
            .collect::<Result<HashMap<&'static str, String>, ServiceError>>()
    })
    .await
    .map_err(|e| ServiceError::Internal(format!("password hashing task failed: {}", e)))??;

    let report = seed_database(pool, hashes).await?;
    if report.is_empty() {
        info!("Database already seeded");
    } else {
        info!(?report, "Database seeded");
    }
    Ok(report)
}
