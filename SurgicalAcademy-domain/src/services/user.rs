use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::ServiceError;
use crate::auth::logging::{log_failed_login, log_registration, log_successful_login};
use crate::auth::Passwords;
use crate::entities::query::non_blank;
use crate::entities::{CreatedUser, PageQuery, Pagination, SignupInput, SignupResult, UserList};
use surgical_academy_data::models::{NewUser, User, UserRole};
use surgical_academy_data::repository::UserRepositoryTrait;

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 6;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Accounts: registration, credential checks and the admin listing
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepositoryTrait>,
    passwords: Passwords,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepositoryTrait>, passwords: Passwords) -> Self {
        Self { users, passwords }
    }

    /// Register a student or teacher account
    ///
    /// Any role other than `TEACHER` becomes `STUDENT`; administrators are
    /// only created by the seed routine.
    #[instrument(skip(self, input))]
    pub async fn signup(&self, input: SignupInput) -> Result<SignupResult, ServiceError> {
        let (email, password, full_name) = match (
            non_blank(&input.email),
            input.password.clone().filter(|p| !p.is_empty()),
            non_blank(&input.full_name),
        ) {
            (Some(email), Some(password), Some(full_name)) => (email.trim().to_string(), password, full_name),
            _ => {
                return Err(ServiceError::Validation(
                    "Email, password, and full name are required".to_string(),
                ))
            }
        };

        if !validator::validate_email(email.as_str()) {
            return Err(ServiceError::Validation("Must be a valid email address".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ServiceError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let role = match input.role.as_deref().map(str::parse::<UserRole>) {
            Some(Ok(UserRole::Teacher)) => UserRole::Teacher,
            _ => UserRole::Student,
        };

        if self.users.find_by_email(email.clone()).await?.is_some() {
            warn!("signup rejected: email already registered");
            return Err(ServiceError::Conflict("User with this email already exists".to_string()));
        }

        let password_hash = self.passwords.spawn_hash(password).await?;
        let user = self
            .users
            .create(NewUser {
                email,
                password_hash,
                name: Some(full_name.clone()),
                full_name,
                role,
                specialization: non_blank(&input.specialization),
                institution: non_blank(&input.institution),
                bio: None,
            })
            .await?;

        log_registration(&user.id, user.role.as_str());
        info!(user_id = %user.id, role = %user.role, "user registered");

        Ok(SignupResult {
            message: "User created successfully".to_string(),
            user: CreatedUser::from(&user),
        })
    }

    /// Check credentials and stamp the login time
    ///
    /// Unknown email, missing password hash and wrong password all give the
    /// same [`ServiceError::Unauthorized`].
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let email = email.trim();
        let user = match self.users.find_by_email(email.to_string()).await? {
            Some(user) => user,
            None => {
                log_failed_login(email, "unknown email");
                return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        let verified = match user.password_hash.as_deref() {
            Some(stored) => {
                self.passwords
                    .spawn_verify(password.to_string(), stored.to_string())
                    .await?
            }
            None => false,
        };
        if !verified {
            log_failed_login(email, "password mismatch");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        self.users.record_login(user.id.clone()).await?;
        log_successful_login(&user.id);
        Ok(user)
    }

    pub async fn find(&self, id: &str) -> Result<User, ServiceError> {
        self.users
            .find_by_id(id.to_string())
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    /// Newest accounts first
    #[instrument(skip(self))]
    pub async fn list(&self, query: PageQuery) -> Result<UserList, ServiceError> {
        let (page, limit, window) = query.window().map_err(ServiceError::Validation)?;
        let (users, total) = self.users.list(window).await?;
        Ok(UserList {
            users,
            pagination: Pagination::new(page, limit, total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use surgical_academy_data::database::DatabasePool;
    use surgical_academy_data::repository::UserRepository;

    fn service() -> UserService {
        let pool = DatabasePool::in_memory().unwrap();
        UserService::new(Arc::new(UserRepository::new(pool)), Passwords::with_params(8, 1, 1).unwrap())
    }

    fn form(email: &str, role: Option<&str>) -> SignupInput {
        SignupInput {
            email: Some(email.to_string()),
            password: Some("secret123".to_string()),
            full_name: Some("Мария Соколова".to_string()),
            role: role.map(str::to_string),
            specialization: Some("Хирург".to_string()),
            institution: None,
        }
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let service = service();

        let created = service.signup(form("maria@example.com", Some("TEACHER"))).await.unwrap();
        assert_eq!(created.message, "User created successfully");
        assert_eq!(created.user.role, UserRole::Teacher);
        assert_eq!(created.user.full_name, "Мария Соколова");

        let user = service.authenticate("maria@example.com", "secret123").await.unwrap();
        assert_eq!(user.id, created.user.id);
        assert_eq!(user.name.as_deref(), Some("Мария Соколова"));

        let stored = service.find(&user.id).await.unwrap();
        assert!(stored.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_admin_role_is_downgraded() {
        let service = service();
        let created = service.signup(form("eve@example.com", Some("ADMIN"))).await.unwrap();
        assert_eq!(created.user.role, UserRole::Student);

        let created = service.signup(form("bob@example.com", Some("nonsense"))).await.unwrap();
        assert_eq!(created.user.role, UserRole::Student);
    }

    #[tokio::test]
    async fn test_duplicate_signup_is_conflict() {
        let service = service();
        service.signup(form("dup@example.com", None)).await.unwrap();

        let again = service.signup(form("dup@example.com", None)).await;
        assert!(matches!(again, Err(ServiceError::Conflict(ref m)) if m == "User with this email already exists"));

        let listed = service.list(PageQuery::default()).await.unwrap();
        assert_eq!(listed.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_signup_validation() {
        let service = service();

        let missing = service.signup(SignupInput::default()).await;
        assert!(matches!(missing, Err(ServiceError::Validation(_))));

        let bad_email = service.signup(form("not-an-email", None)).await;
        assert!(matches!(bad_email, Err(ServiceError::Validation(_))));

        let mut short = form("short@example.com", None);
        short.password = Some("12345".to_string());
        assert!(matches!(service.signup(short).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_hashing_does_not_stall_the_runtime() {
        // costly enough to take many milliseconds per hash
        let passwords = Passwords::with_params(32 * 1024, 4, 1).unwrap();
        let pool = DatabasePool::in_memory().unwrap();
        let service = UserService::new(Arc::new(UserRepository::new(pool)), passwords);

        let done = Arc::new(AtomicBool::new(false));
        let ticker = {
            let done = done.clone();
            tokio::spawn(async move {
                let mut ticks = 0u32;
                while !done.load(Ordering::SeqCst) {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                    ticks += 1;
                }
                ticks
            })
        };

        service.signup(form("slow@example.com", None)).await.unwrap();
        service.authenticate("slow@example.com", "secret123").await.unwrap();
        done.store(true, Ordering::SeqCst);

        // the single-threaded test runtime kept ticking while Argon2 ran
        let ticks = ticker.await.unwrap();
        assert!(ticks >= 5, "only {} ticks during signup and login", ticks);
    }

    #[tokio::test]
    async fn test_bad_credentials_are_indistinguishable() {
        let service = service();
        service.signup(form("known@example.com", None)).await.unwrap();

        let wrong_password = service.authenticate("known@example.com", "nope-nope").await;
        let unknown = service.authenticate("ghost@example.com", "secret123").await;

        for result in [wrong_password, unknown] {
            match result {
                Err(ServiceError::Unauthorized(message)) => assert_eq!(message, INVALID_CREDENTIALS),
                other => panic!("expected unauthorized, got {:?}", other.map(|u| u.id)),
            }
        }
    }
}
