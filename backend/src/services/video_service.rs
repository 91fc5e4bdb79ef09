//! Video record business logic service.
//!
//! Covers the persistence endpoint of the upload workflow and the
//! list/delete surface. Remote deletion goes through the `VideoHost`
//! client and does not cascade to the local record.

use crate::api::common::PaginationFilter;
use crate::database::models::{CreateVideoRecord, VideoRecord};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::project_repository::ProjectRepository;
use crate::repositories::video_repository::VideoRepository;
use crate::services::video_host::VideoHost;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct VideoService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> VideoService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Persists a Video Record for a completed upload.
    pub async fn record_video(&self, create_video: CreateVideoRecord) -> ServiceResult<VideoRecord> {
        if let Err(errors) = create_video.validate() {
            return Err(ServiceError::validation(
                crate::api::common::validation_errors_to_field_errors(errors)
                    .into_iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", "),
            ));
        }

        let projects = ProjectRepository::new(self.pool);
        if projects
            .get_project_by_id(&create_video.project_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found("Project", &create_video.project_id));
        }

        let repo = VideoRepository::new(self.pool);
        if repo
            .get_video_by_resource_id(&create_video.resource_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::already_exists(
                "Video",
                &create_video.resource_id,
            ));
        }

        let video = repo
            .create_video(&Uuid::now_v7().to_string(), &create_video)
            .await?;
        Ok(video)
    }

    pub async fn get_videos_by_project(
        &self,
        project_id: &str,
        pagination: &PaginationFilter,
    ) -> ServiceResult<(Vec<VideoRecord>, u64)> {
        let repo = VideoRepository::new(self.pool);
        let videos = repo.get_videos_by_project_id(project_id, pagination).await?;
        let total = repo.count_videos_by_project_id(project_id).await?;
        Ok((videos, total))
    }

    /// Deletes the remote asset on the host. The local Video Record is the
    /// caller's responsibility.
    pub async fn delete_remote_video(
        &self,
        host: &dyn VideoHost,
        resource_id: &str,
    ) -> ServiceResult<()> {
        host.delete_video(resource_id)
            .await
            .map_err(ServiceError::from)
    }

    /// Drops the local Video Record. The remote asset is untouched.
    pub async fn delete_video_record(&self, resource_id: &str) -> ServiceResult<()> {
        let repo = VideoRepository::new(self.pool);
        if !repo.delete_video_by_resource_id(resource_id).await? {
            return Err(ServiceError::not_found("Video", resource_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
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

        pool
    }

    fn record(resource_id: &str) -> CreateVideoRecord {
        CreateVideoRecord {
            resource_id: resource_id.to_string(),
            playback_url: format!("https://player.example.com/video/{}", resource_id),
            project_id: "project-1".to_string(),
            category: "avance".to_string(),
            title: "Walkthrough".to_string(),
            description: None,
            duration_seconds: 120,
        }
    }

    #[tokio::test]
    async fn records_and_lists_videos() {
        let pool = test_pool().await;
        let service = VideoService::new(&pool);

        let video = service.record_video(record("111")).await.unwrap();
        assert_eq!(video.resource_id, "111");

        let (videos, total) = service
            .get_videos_by_project("project-1", &PaginationFilter::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(videos[0].resource_id, "111");
    }

    #[tokio::test]
    async fn rejects_duplicate_resource_id() {
        let pool = test_pool().await;
        let service = VideoService::new(&pool);

        service.record_video(record("222")).await.unwrap();
        let err = service.record_video(record("222")).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn rejects_unknown_project() {
        let pool = test_pool().await;
        let service = VideoService::new(&pool);

        let mut request = record("333");
        request.project_id = "missing".to_string();
        let err = service.record_video(request).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn deleting_missing_record_is_not_found() {
        let pool = test_pool().await;
        let service = VideoService::new(&pool);

        let err = service.delete_video_record("absent").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
