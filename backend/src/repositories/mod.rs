//! Database repositories, one per entity.
//!
//! Repositories own all SQL; services above them own the business rules.

pub mod budget_repository;
pub mod document_repository;
pub mod lead_repository;
pub mod meeting_repository;
pub mod project_repository;
pub mod user_repository;
pub mod video_repository;
