use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

use super::errors::RepositoryError;
use super::predicate::Predicate;
use crate::database::DatabasePool;
use crate::models::{AuthorSummary, FhirResource, NewFhirResource};

/// Repository trait for stored FHIR resources
#[async_trait]
pub trait FhirRepositoryTrait: Send + Sync {
    /// Resources newest first, optionally limited to one resource type
    async fn list(&self, resource_type: Option<String>) -> Result<Vec<FhirResource>, RepositoryError>;

    async fn create(&self, resource: NewFhirResource) -> Result<FhirResource, RepositoryError>;
}

/// SQLite-backed FHIR resource repository
#[derive(Debug, Clone)]
pub struct FhirRepository {
    pool: DatabasePool,
}

impl FhirRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

const FHIR_SELECT: &str = "SELECT f.id, f.resource_type, f.fhir_id, f.data, f.status, f.synced_at,
        f.created_at, f.updated_at,
        u.id, u.name, u.full_name, u.specialization
    FROM fhir_resources f
    LEFT JOIN users u ON u.id = f.author_id";

fn select_resources(conn: &Connection, predicate: &Predicate) -> Result<Vec<FhirResource>, RepositoryError> {
    let sql = format!(
        "{} {} ORDER BY f.created_at DESC, f.rowid DESC",
        FHIR_SELECT,
        predicate.where_sql()
    );

    let mut stmt = conn.prepare(&sql)?;
    let resources = stmt
        .query_map(params_from_iter(predicate.params()), map_fhir_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(resources)
}

fn map_fhir_row(row: &Row<'_>) -> rusqlite::Result<FhirResource> {
    let raw: String = row.get(3)?;
    let data = serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    let author = match row.get::<_, Option<String>>(8)? {
        Some(id) => Some(AuthorSummary {
            id,
            name: row.get(9)?,
            full_name: row.get(10)?,
            specialization: row.get(11)?,
        }),
        None => None,
    };

    Ok(FhirResource {
        id: row.get(0)?,
        resource_type: row.get(1)?,
        fhir_id: row.get(2)?,
        data,
        status: row.get(4)?,
        author,
        synced_at: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub(crate) fn insert_resource(
    conn: &Connection,
    id: &str,
    resource: &NewFhirResource,
) -> Result<(), RepositoryError> {
    let now = Utc::now();
    let data = serde_json::to_string(&resource.data)?;

    conn.execute(
        "INSERT INTO fhir_resources (id, resource_type, fhir_id, data, status, author_id, synced_at,
            created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        params![
            id,
            resource.resource_type,
            resource.fhir_id,
            data,
            resource.status,
            resource.author_id,
            resource.synced_at,
            now,
        ],
    )?;

    Ok(())
}

#[async_trait]
impl FhirRepositoryTrait for FhirRepository {
    async fn list(&self, resource_type: Option<String>) -> Result<Vec<FhirResource>, RepositoryError> {
        self.pool
            .run(move |conn| {
                let predicate = Predicate::new().with(resource_type, |p, t| p.eq("f.resource_type", t));
                select_resources(conn, &predicate)
            })
            .await
    }

    async fn create(&self, resource: NewFhirResource) -> Result<FhirResource, RepositoryError> {
        self.pool
            .run(move |conn| {
                let id = Uuid::new_v4().to_string();
                insert_resource(conn, &id, &resource)?;

                select_resources(conn, &Predicate::new().eq("f.id", id.clone()))?
                    .into_iter()
                    .next()
                    .ok_or_else(|| RepositoryError::NotFound(format!("FHIR resource {}", id)))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn observation(status: &str) -> NewFhirResource {
        NewFhirResource {
            resource_type: "Observation".to_string(),
            fhir_id: Some("obs-1".to_string()),
            data: json!({"resourceType": "Observation", "id": "obs-1", "status": status}),
            status: Some(status.to_string()),
            author_id: None,
            synced_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_filter_by_type() {
        let repo = FhirRepository::new(DatabasePool::in_memory().unwrap());

        let created = repo.create(observation("final")).await.unwrap();
        assert_eq!(created.data["status"], "final");
        assert!(created.author.is_none());

        let mut patient = observation("active");
        patient.resource_type = "Patient".to_string();
        repo.create(patient).await.unwrap();

        assert_eq!(repo.list(None).await.unwrap().len(), 2);
        let observations = repo.list(Some("Observation".to_string())).await.unwrap();
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].id, created.id);
        assert!(repo.list(Some("Procedure".to_string())).await.unwrap().is_empty());
    }
}
