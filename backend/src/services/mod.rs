//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business
//! operations and orchestrate interactions between different parts of the
//! application, such as the video upload workflow or outgoing mail.

pub mod budget_service;
pub mod document_service;
pub mod email_service;
pub mod lead_service;
pub mod meeting_service;
pub mod project_service;
pub mod user_service;
pub mod video_host;
pub mod video_service;
pub mod video_upload;
