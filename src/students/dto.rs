use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::ApiError;
use crate::students::repo_types::{parse_date, Status, UnknownStatus};

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";

/// Body of POST /students and PUT /students/:id. Fields are optional here so
/// that a missing field becomes a validation error instead of a JSON rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A complete set of mutable student fields, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Date,
    pub course_name: String,
    pub status: Status,
}

fn required(value: Option<String>) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::Validation(ALL_FIELDS_REQUIRED.into())),
    }
}

impl StudentPayload {
    pub fn into_new_student(self) -> Result<NewStudent, ApiError> {
        let full_name = required(self.full_name)?;
        let email = required(self.email)?;
        let phone = required(self.phone)?;
        let date_of_birth = required(self.date_of_birth)?;
        let course_name = required(self.course_name)?;

        let date_of_birth = parse_date(&date_of_birth).map_err(|_| {
            ApiError::Validation(format!(
                "date_of_birth must be YYYY-MM-DD, got {date_of_birth:?}"
            ))
        })?;

        let status = match self.status {
            None => Status::default(),
            Some(s) => s
                .parse()
                .map_err(|e: UnknownStatus| ApiError::Validation(e.to_string()))?,
        };

        Ok(NewStudent {
            full_name,
            email,
            phone,
            date_of_birth,
            course_name,
            status,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiIndex {
    pub message: &'static str,
    pub status: &'static str,
    pub endpoints: serde_json::Value,
}
