use std::sync::Arc;

use tracing::instrument;

use super::article::present;
use super::ServiceError;
use crate::auth::authorize::can_create_content;
use crate::auth::UserInfo;
use crate::entities::{Capabilities, Dashboard};
use surgical_academy_data::models::UserRole;
use surgical_academy_data::repository::{
    ArticleRepositoryTrait, CourseRepositoryTrait, ProgressRepositoryTrait, UserRepositoryTrait,
};

pub const RECENT_COURSES: u64 = 6;
pub const FEATURED_ARTICLES: u64 = 4;
pub const RECENT_PROGRESS: u64 = 5;

/// Post-login overview
#[derive(Clone)]
pub struct DashboardService {
    users: Arc<dyn UserRepositoryTrait>,
    courses: Arc<dyn CourseRepositoryTrait>,
    articles: Arc<dyn ArticleRepositoryTrait>,
    progress: Arc<dyn ProgressRepositoryTrait>,
}

impl DashboardService {
    pub fn new(
        users: Arc<dyn UserRepositoryTrait>,
        courses: Arc<dyn CourseRepositoryTrait>,
        articles: Arc<dyn ArticleRepositoryTrait>,
        progress: Arc<dyn ProgressRepositoryTrait>,
    ) -> Self {
        Self {
            users,
            courses,
            articles,
            progress,
        }
    }

    #[instrument(skip(self, user), fields(user = %user.user_id))]
    pub async fn overview(&self, user: &UserInfo) -> Result<Dashboard, ServiceError> {
        let (stats, recent_courses, featured_articles, progress) = tokio::try_join!(
            self.users.stats(user.user_id.clone()),
            self.courses.recent(RECENT_COURSES),
            self.articles.featured(FEATURED_ARTICLES),
            self.progress.recent_for_user(user.user_id.clone(), RECENT_PROGRESS),
        )?;

        Ok(Dashboard {
            stats,
            recent_courses,
            featured_articles: featured_articles.into_iter().map(present).collect(),
            progress,
            capabilities: Capabilities {
                can_create_content: can_create_content(user.role),
                is_admin: user.role == UserRole::Admin,
            },
        })
    }
}
