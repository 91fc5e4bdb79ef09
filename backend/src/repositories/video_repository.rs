//! Database repository for video records.
//!
//! A video row is written only after the upload to the host has completed;
//! it is immutable afterwards except for deletion.

use crate::api::common::PaginationFilter;
use crate::database::models::{CreateVideoRecord, VideoRecord};
use anyhow::Result;
use sqlx::SqlitePool;

pub struct VideoRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> VideoRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_video(&self, id: &str, video: &CreateVideoRecord) -> Result<VideoRecord> {
        let created = sqlx::query_as::<_, VideoRecord>(
            r#"
            INSERT INTO videos
                (id, resource_id, playback_url, project_id, category, title, description, duration_seconds)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&video.resource_id)
        .bind(&video.playback_url)
        .bind(&video.project_id)
        .bind(&video.category)
        .bind(&video.title)
        .bind(&video.description)
        .bind(video.duration_seconds)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    pub async fn get_video_by_resource_id(&self, resource_id: &str) -> Result<Option<VideoRecord>> {
        let video =
            sqlx::query_as::<_, VideoRecord>("SELECT * FROM videos WHERE resource_id = ?")
                .bind(resource_id)
                .fetch_optional(self.pool)
                .await?;

        Ok(video)
    }

    pub async fn get_videos_by_project_id(
        &self,
        project_id: &str,
        pagination: &PaginationFilter,
    ) -> Result<Vec<VideoRecord>> {
        let videos = sqlx::query_as::<_, VideoRecord>(
            r#"
            SELECT * FROM videos
            WHERE project_id = ?
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(project_id)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(videos)
    }

    pub async fn count_videos_by_project_id(&self, project_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE project_id = ?")
            .bind(project_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count as u64)
    }

    /// Removes the local record. Deleting the remote asset is a separate,
    /// explicit call against the host.
    pub async fn delete_video_by_resource_id(&self, resource_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM videos WHERE resource_id = ?")
            .bind(resource_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
