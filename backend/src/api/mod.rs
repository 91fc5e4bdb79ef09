//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for different API domains
//! (leads, budgets, meetings, documents, projects, users, videos),
//! excluding core authentication routes which are handled separately.

pub mod budget;
pub mod common;
pub mod document;
pub mod lead;
pub mod meeting;
pub mod project;
pub mod user;
pub mod video;
