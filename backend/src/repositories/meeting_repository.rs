//! Database repository for meetings.

use crate::api::common::PaginationFilter;
use crate::database::models::{CreateMeeting, Meeting, MeetingStatus};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct MeetingRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MeetingRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_meeting(&self, id: &str, meeting: &CreateMeeting) -> Result<Meeting> {
        let created = sqlx::query_as::<_, Meeting>(
            r#"
            INSERT INTO meetings (id, project_id, title, scheduled_at, location, status)
            VALUES (?, ?, ?, ?, ?, 'scheduled')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&meeting.project_id)
        .bind(&meeting.title)
        .bind(meeting.scheduled_at)
        .bind(&meeting.location)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    pub async fn get_meeting_by_id(&self, id: &str) -> Result<Option<Meeting>> {
        let meeting = sqlx::query_as::<_, Meeting>("SELECT * FROM meetings WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(meeting)
    }

    /// Upcoming meetings first.
    pub async fn get_meetings_by_project_id(
        &self,
        project_id: &str,
        pagination: &PaginationFilter,
    ) -> Result<Vec<Meeting>> {
        let meetings = sqlx::query_as::<_, Meeting>(
            r#"
            SELECT * FROM meetings
            WHERE project_id = ?
            ORDER BY scheduled_at ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(project_id)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(meetings)
    }

    pub async fn count_meetings_by_project_id(&self, project_id: &str) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM meetings WHERE project_id = ?")
                .bind(project_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count as u64)
    }

    pub async fn update_meeting_status(
        &self,
        id: &str,
        status: MeetingStatus,
    ) -> Result<Option<Meeting>> {
        let meeting = sqlx::query_as::<_, Meeting>(
            r#"
            UPDATE meetings SET status = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(meeting)
    }
}
