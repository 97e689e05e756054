use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::*;

// DTOs for API communication
#[derive(Debug, Deserialize)]
pub struct TaskDto {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

// Request DTOs
#[derive(Debug, Serialize)]
pub struct TaskCreateDto {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TaskPatchDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Parse a server timestamp. Offsets are honoured when present; bare
/// `isoformat()` timestamps are taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| naive.and_utc())
                .ok()
        })
}

// Conversion implementations
impl From<TaskDto> for Task {
    fn from(dto: TaskDto) -> Self {
        Self {
            created_at: dto.created_at.as_deref().and_then(parse_timestamp),
            updated_at: dto.updated_at.as_deref().and_then(parse_timestamp),
            ..Task::new(dto.id, dto.text, dto.completed)
        }
    }
}

impl From<&TaskPatch> for TaskPatchDto {
    fn from(patch: &TaskPatch) -> Self {
        Self {
            text: patch.text.clone(),
            completed: patch.completed,
        }
    }
}
