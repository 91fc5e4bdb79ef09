//! Meeting business logic service.
//!
//! Scheduling a meeting notifies the project's client by mail. Mail
//! delivery is best effort: a failed send is logged, never fatal.

use crate::api::common::PaginationFilter;
use crate::database::models::{CreateMeeting, Meeting, MeetingStatus};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::meeting_repository::MeetingRepository;
use crate::repositories::project_repository::ProjectRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::email_service::EmailService;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

pub struct MeetingService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MeetingService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn schedule_meeting(
        &self,
        create_meeting: CreateMeeting,
        mailer: Option<&EmailService>,
    ) -> ServiceResult<Meeting> {
        if let Err(errors) = create_meeting.validate() {
            return Err(ServiceError::validation(
                crate::api::common::validation_errors_to_field_errors(errors)
                    .into_iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", "),
            ));
        }

        if create_meeting.scheduled_at <= Utc::now() {
            return Err(ServiceError::validation(
                "Meetings must be scheduled in the future".to_string(),
            ));
        }

        let projects = ProjectRepository::new(self.pool);
        let project = projects
            .get_project_by_id(&create_meeting.project_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project", &create_meeting.project_id))?;

        let repo = MeetingRepository::new(self.pool);
        let meeting = repo
            .create_meeting(&Uuid::now_v7().to_string(), &create_meeting)
            .await?;

        if let Some(mailer) = mailer {
            let users = UserRepository::new(self.pool);
            match users.get_user_by_id(&project.client_id).await {
                Ok(Some(client)) => {
                    if let Err(e) = mailer
                        .send_meeting_email(&client.email, &client.name, &meeting)
                        .await
                    {
                        warn!("Meeting mail to {} failed: {}", client.email, e);
                    }
                }
                Ok(None) => warn!("Project {} has no client user", project.id),
                Err(e) => warn!("Client lookup for meeting mail failed: {}", e),
            }
        }

        Ok(meeting)
    }

    pub async fn get_meeting_required(&self, id: &str) -> ServiceResult<Meeting> {
        let repo = MeetingRepository::new(self.pool);
        repo.get_meeting_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Meeting", id))
    }

    pub async fn get_meetings_by_project(
        &self,
        project_id: &str,
        pagination: &PaginationFilter,
    ) -> ServiceResult<(Vec<Meeting>, u64)> {
        let repo = MeetingRepository::new(self.pool);
        let meetings = repo
            .get_meetings_by_project_id(project_id, pagination)
            .await?;
        let total = repo.count_meetings_by_project_id(project_id).await?;
        Ok((meetings, total))
    }

    pub async fn cancel_meeting(&self, id: &str) -> ServiceResult<Meeting> {
        let current = self.get_meeting_required(id).await?;
        if current.status != MeetingStatus::Scheduled {
            return Err(ServiceError::invalid_operation(format!(
                "Meeting is {}",
                current.status
            )));
        }

        let repo = MeetingRepository::new(self.pool);
        repo.update_meeting_status(id, MeetingStatus::Cancelled)
            .await?
            .ok_or_else(|| ServiceError::not_found("Meeting", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn pool_with_project() -> (SqlitePool, String) {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();

        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, role) \
             VALUES ('client-1', 'client@example.com', 'Client', 'x', 'cliente')",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO projects (id, client_id, name) VALUES ('project-1', 'client-1', 'Site')",
        )
        .execute(&pool)
        .await
        .unwrap();

        (pool, "project-1".to_string())
    }

    fn meeting_request(project_id: &str) -> CreateMeeting {
        CreateMeeting {
            project_id: project_id.to_string(),
            title: "Kickoff".to_string(),
            scheduled_at: Utc::now() + Duration::days(2),
            location: Some("Video call".to_string()),
        }
    }

    #[tokio::test]
    async fn schedules_and_cancels() {
        let (pool, project_id) = pool_with_project().await;
        let service = MeetingService::new(&pool);

        let meeting = service
            .schedule_meeting(meeting_request(&project_id), None)
            .await
            .unwrap();
        assert_eq!(meeting.status, MeetingStatus::Scheduled);

        let cancelled = service.cancel_meeting(&meeting.id).await.unwrap();
        assert_eq!(cancelled.status, MeetingStatus::Cancelled);

        // Cancelling twice is invalid.
        let err = service.cancel_meeting(&meeting.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidOperation { .. }));
    }

    #[tokio::test]
    async fn rejects_past_meetings() {
        let (pool, project_id) = pool_with_project().await;
        let service = MeetingService::new(&pool);

        let mut request = meeting_request(&project_id);
        request.scheduled_at = Utc::now() - Duration::hours(1);
        let err = service.schedule_meeting(request, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }
}
