use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Pure post model for inter-module communication (no serde).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    /// Id of the authoring user.
    pub author: Uuid,
    pub contents: Option<String>,
    /// Insertion order is kept; duplicates are allowed.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a post. The author is passed separately and always wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewPost {
    pub title: String,
    pub contents: Option<String>,
    pub tags: Vec<String>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    /// `Some(None)` removes the contents.
    pub contents: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.contents.is_none() && self.tags.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Credentials for registering a user.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Field a post listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::Title => "title",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts both the camelCase document names and snake_case.
impl FromStr for SortField {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "createdAt" | "created_at" => Ok(SortField::CreatedAt),
            "updatedAt" | "updated_at" => Ok(SortField::UpdatedAt),
            "title" => Ok(SortField::Title),
            other => Err(ParseSortError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascending" | "asc" | "1" => Ok(SortOrder::Ascending),
            "descending" | "desc" | "-1" => Ok(SortOrder::Descending),
            _ => Err(ParseSortError::UnknownOrder(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseSortError {
    #[error("unknown sort field '{0}' (expected createdAt, updatedAt or title)")]
    UnknownField(String),
    #[error("unknown sort order '{0}' (expected ascending or descending)")]
    UnknownOrder(String),
}

/// Listing options; unset fields fall back to the service defaults
/// (`createdAt`, descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListOptions {
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
}

impl ListOptions {
    pub fn sorted(sort_by: SortField, sort_order: SortOrder) -> Self {
        Self {
            sort_by: Some(sort_by),
            sort_order: Some(sort_order),
        }
    }
}
