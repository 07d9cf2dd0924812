use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::ServiceError;
use crate::auth::UserInfo;
use crate::entities::query::non_blank;
use crate::entities::{CreateFhirInput, FhirSample};
use surgical_academy_data::models::{FhirResource, NewFhirResource};
use surgical_academy_data::repository::FhirRepositoryTrait;

static SAMPLES: Lazy<Vec<FhirSample>> = Lazy::new(|| {
    vec![
        FhirSample {
            resource_type: "Patient".to_string(),
            label: "Пациент".to_string(),
            data: json!({
                "resourceType": "Patient",
                "id": "example-patient-1",
                "name": [{
                    "use": "official",
                    "family": "Иванов",
                    "given": ["Иван", "Петрович"]
                }],
                "gender": "male",
                "birthDate": "1980-05-15"
            }),
        },
        FhirSample {
            resource_type: "Procedure".to_string(),
            label: "Процедура".to_string(),
            data: json!({
                "resourceType": "Procedure",
                "id": "example-procedure-1",
                "status": "completed",
                "code": {"text": "Лапароскопическая аппендэктомия"},
                "subject": {
                    "reference": "Patient/example-patient-1",
                    "display": "Иванов Иван Петрович"
                }
            }),
        },
        FhirSample {
            resource_type: "Observation".to_string(),
            label: "Наблюдение".to_string(),
            data: json!({
                "resourceType": "Observation",
                "id": "example-observation-1",
                "status": "final",
                "code": {"text": "Систолическое артериальное давление"},
                "subject": {"reference": "Patient/example-patient-1"},
                "valueQuantity": {"value": 120, "unit": "mmHg"}
            }),
        },
    ]
});

/// Stored FHIR resources and example payloads
#[derive(Clone)]
pub struct FhirService {
    resources: Arc<dyn FhirRepositoryTrait>,
}

impl FhirService {
    pub fn new(resources: Arc<dyn FhirRepositoryTrait>) -> Self {
        Self { resources }
    }

    /// Newest first, optionally limited to one resource type
    #[instrument(skip(self))]
    pub async fn list(&self, resource_type: Option<String>) -> Result<Vec<FhirResource>, ServiceError> {
        Ok(self.resources.list(non_blank(&resource_type)).await?)
    }

    /// Store a resource on behalf of `author`.
    ///
    /// `fhir_id` and `status` are copied from the payload's `id` and
    /// `status` when those are strings.
    #[instrument(skip(self, author, input), fields(author = %author.user_id))]
    pub async fn create(&self, author: &UserInfo, input: CreateFhirInput) -> Result<FhirResource, ServiceError> {
        let (resource_type, data) = match (non_blank(&input.resource_type), input.data) {
            (Some(resource_type), Some(data)) if !data.is_null() => (resource_type, data),
            _ => {
                return Err(ServiceError::Validation(
                    "ResourceType and data are required".to_string(),
                ))
            }
        };

        if !data.is_object() {
            return Err(ServiceError::Validation("data must be a JSON object".to_string()));
        }

        let string_field = |key: &str| data.get(key).and_then(Value::as_str).map(str::to_string);
        let fhir_id = string_field("id");
        let status = string_field("status");

        let resource = self
            .resources
            .create(NewFhirResource {
                resource_type,
                fhir_id,
                status,
                data,
                author_id: Some(author.user_id.clone()),
                synced_at: Some(Utc::now()),
            })
            .await?;

        info!(resource_id = %resource.id, resource_type = %resource.resource_type, "FHIR resource stored");
        Ok(resource)
    }

    pub fn samples(&self) -> &'static [FhirSample] {
        SAMPLES.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surgical_academy_data::database::DatabasePool;
    use surgical_academy_data::models::{NewUser, UserRole};
    use surgical_academy_data::repository::{FhirRepository, UserRepository, UserRepositoryTrait};

    async fn setup() -> (FhirService, UserInfo) {
        let pool = DatabasePool::in_memory().unwrap();
        let user = UserRepository::new(pool.clone())
            .create(NewUser {
                email: "doctor@example.com".to_string(),
                password_hash: "x".to_string(),
                full_name: "Доктор Петров".to_string(),
                name: None,
                role: UserRole::Teacher,
                specialization: None,
                institution: None,
                bio: None,
            })
            .await
            .unwrap();

        (FhirService::new(Arc::new(FhirRepository::new(pool))), UserInfo::from(&user))
    }

    #[tokio::test]
    async fn test_create_copies_id_and_status() {
        let (service, author) = setup().await;
        let sample = service.samples()[1].clone();

        let stored = service
            .create(
                &author,
                CreateFhirInput {
                    resource_type: Some(sample.resource_type.clone()),
                    data: Some(sample.data.clone()),
                },
            )
            .await
            .unwrap();

        assert_eq!(stored.fhir_id.as_deref(), Some("example-procedure-1"));
        assert_eq!(stored.status.as_deref(), Some("completed"));
        assert!(stored.synced_at.is_some());
        assert_eq!(stored.author.as_ref().map(|a| a.id.as_str()), Some(author.user_id.as_str()));

        let listed = service.list(Some("Procedure".to_string())).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(service.list(Some("Patient".to_string())).await.unwrap().is_empty());
        assert_eq!(service.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_or_non_object_data() {
        let (service, author) = setup().await;

        let missing = service
            .create(
                &author,
                CreateFhirInput {
                    resource_type: Some("Patient".to_string()),
                    data: None,
                },
            )
            .await;
        assert!(matches!(missing, Err(ServiceError::Validation(ref m)) if m == "ResourceType and data are required"));

        let not_object = service
            .create(
                &author,
                CreateFhirInput {
                    resource_type: Some("Patient".to_string()),
                    data: Some(json!(["not", "an", "object"])),
                },
            )
            .await;
        assert!(matches!(not_object, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_samples() {
        let types: Vec<&str> = SAMPLES.iter().map(|s| s.resource_type.as_str()).collect();
        assert_eq!(types, ["Patient", "Procedure", "Observation"]);
        assert!(SAMPLES.iter().all(|s| s.data["resourceType"] == s.resource_type.as_str()));
    }
}
