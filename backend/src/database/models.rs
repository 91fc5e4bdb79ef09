//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. Note that these may differ from API-specific models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use validator::Validate;

/// Access level attached to every principal. Admins see the CRM, clients
/// see the portal. Kept as a closed enum so role checks are exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Cliente,
}

/// Finer-grained admin sub-role, used only to gate individual CRM screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SubRole {
    Ceo,
    Coo,
    Qa,
    Ventas,
    Pm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BudgetStatus {
    Draft,
    Sent,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MeetingStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub sub_role: Option<SubRole>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub role: Role,
    pub sub_role: Option<SubRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: String,
    /// Owning client user.
    pub client_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, message = "Client ID is required"))]
    pub client_id: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Project name must be between 1-255 characters"
    ))]
    pub name: String,

    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Where the lead came from (web form, referral, campaign name).
    pub source: Option<String>,
    pub status: LeadStatus,
    /// Admin user the lead is assigned to, if any.
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLead {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: String,

    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    pub phone: Option<String>,
    pub source: Option<String>,
    pub assigned_to: Option<String>,
}

/// One line of a budget. Budgets store their lines as a JSON column; the
/// total is computed server-side and never trusted from the client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BudgetItem {
    #[validate(length(min = 1, max = 500, message = "Item description is required"))]
    pub description: String,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,

    #[validate(range(min = 0))]
    pub unit_price_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Budget {
    pub id: String,
    pub lead_id: String,
    pub title: String,
    /// JSON-encoded `Vec<BudgetItem>`.
    pub items: String,
    pub total_cents: i64,
    pub status: BudgetStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBudget {
    #[validate(length(min = 1, message = "Lead ID is required"))]
    pub lead_id: String,

    #[validate(length(min = 1, max = 255, message = "Title must be between 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "At least one budget item is required"))]
    #[validate(nested)]
    pub items: Vec<BudgetItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meeting {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    pub location: Option<String>,
    pub status: MeetingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMeeting {
    #[validate(length(min = 1, message = "Project ID is required"))]
    pub project_id: String,

    #[validate(length(min = 1, max = 255, message = "Title must be between 1-255 characters"))]
    pub title: String,

    pub scheduled_at: DateTime<Utc>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub storage_url: String,
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDocument {
    #[validate(length(min = 1, message = "Project ID is required"))]
    pub project_id: String,

    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: String,

    #[validate(url(message = "Must be a valid URL"))]
    pub storage_url: String,
}

/// Persisted row linking a completed upload to a project. Immutable after
/// insert except for deletion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VideoRecord {
    pub id: String,
    /// Identifier assigned by the video host.
    pub resource_id: String,
    pub playback_url: String,
    pub project_id: String,
    pub category: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_seconds: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateVideoRecord {
    #[validate(length(min = 1, message = "Resource ID is required"))]
    pub resource_id: String,

    #[validate(url(message = "Must be a valid URL"))]
    pub playback_url: String,

    #[validate(length(min = 1, message = "Project ID is required"))]
    pub project_id: String,

    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,

    #[validate(length(min = 1, max = 255, message = "Title must be between 1-255 characters"))]
    pub title: String,

    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub duration_seconds: i64,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Cliente => "cliente",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "cliente" => Ok(Role::Cliente),
            _ => Err(format!("Invalid role: {}", input)),
        }
    }
}

impl SubRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubRole::Ceo => "ceo",
            SubRole::Coo => "coo",
            SubRole::Qa => "qa",
            SubRole::Ventas => "ventas",
            SubRole::Pm => "pm",
        }
    }
}

impl Display for SubRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubRole {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "ceo" => Ok(SubRole::Ceo),
            "coo" => Ok(SubRole::Coo),
            "qa" => Ok(SubRole::Qa),
            "ventas" => Ok(SubRole::Ventas),
            "pm" => Ok(SubRole::Pm),
            _ => Err(format!("Invalid sub-role: {}", input)),
        }
    }
}

impl Display for LeadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let status = match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Won => "won",
            LeadStatus::Lost => "lost",
        };
        write!(f, "{}", status)
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "new" => Ok(LeadStatus::New),
            "contacted" => Ok(LeadStatus::Contacted),
            "qualified" => Ok(LeadStatus::Qualified),
            "won" => Ok(LeadStatus::Won),
            "lost" => Ok(LeadStatus::Lost),
            _ => Err(format!("Invalid lead status: {}", input)),
        }
    }
}

impl Display for BudgetStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let status = match self {
            BudgetStatus::Draft => "draft",
            BudgetStatus::Sent => "sent",
            BudgetStatus::Approved => "approved",
            BudgetStatus::Rejected => "rejected",
        };
        write!(f, "{}", status)
    }
}

impl FromStr for BudgetStatus {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "draft" => Ok(BudgetStatus::Draft),
            "sent" => Ok(BudgetStatus::Sent),
            "approved" => Ok(BudgetStatus::Approved),
            "rejected" => Ok(BudgetStatus::Rejected),
            _ => Err(format!("Invalid budget status: {}", input)),
        }
    }
}

impl Display for MeetingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let status = match self {
            MeetingStatus::Scheduled => "scheduled",
            MeetingStatus::Completed => "completed",
            MeetingStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", status)
    }
}

impl FromStr for MeetingStatus {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "scheduled" => Ok(MeetingStatus::Scheduled),
            "completed" => Ok(MeetingStatus::Completed),
            "cancelled" => Ok(MeetingStatus::Cancelled),
            _ => Err(format!("Invalid meeting status: {}", input)),
        }
    }
}
