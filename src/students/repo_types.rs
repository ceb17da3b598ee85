use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use time::{macros::format_description, Date};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Enrollment status of a student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Status must be Active or Inactive, got {0:?}")]
pub struct UnknownStatus(pub String);

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "Active",
            Status::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Status::Active),
            "Inactive" => Ok(Status::Inactive),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Student record as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(with = "iso_date")]
    pub date_of_birth: Date,
    pub course_name: String,
    pub status: Status,
}

/// Row shape of the `students` table; status is stored as text.
#[derive(Debug, FromRow)]
pub struct StudentRow {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Date,
    pub course_name: String,
    pub status: String,
}

impl TryFrom<StudentRow> for Student {
    type Error = UnknownStatus;

    fn try_from(r: StudentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            full_name: r.full_name,
            email: r.email,
            phone: r.phone,
            date_of_birth: r.date_of_birth,
            course_name: r.course_name,
            status: r.status.parse()?,
        })
    }
}

/// Parses the `YYYY-MM-DD` form used on the wire and in forms.
pub fn parse_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s, format_description!("[year]-[month]-[day]"))
}

pub fn format_iso_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn sample() -> Student {
        Student {
            id: 7,
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "1234567890".into(),
            date_of_birth: date!(1815 - 12 - 10),
            course_name: "Mathematics".into(),
            status: Status::Active,
        }
    }

    #[test]
    fn student_serializes_date_as_iso_string() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["date_of_birth"], "1815-12-10");
        assert_eq!(json["status"], "Active");
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn student_deserializes_from_api_shape() {
        let s: Student = serde_json::from_str(
            r#"{"id":3,"full_name":"Alan Turing","email":"alan@example.com","phone":"0987654321",
                "date_of_birth":"1912-06-23","course_name":"Logic","status":"Inactive"}"#,
        )
        .unwrap();
        assert_eq!(s.id, 3);
        assert_eq!(s.status, Status::Inactive);
        assert_eq!(s.date_of_birth, date!(1912 - 06 - 23));
    }

    #[test]
    fn status_parsing_is_exact() {
        assert_eq!("Active".parse::<Status>(), Ok(Status::Active));
        assert_eq!("Inactive".parse::<Status>(), Ok(Status::Inactive));
        assert!("active".parse::<Status>().is_err());
        assert!("".parse::<Status>().is_err());
    }

    #[test]
    fn row_with_unknown_status_is_rejected() {
        let row = StudentRow {
            id: 1,
            full_name: "x".into(),
            email: "x@y.z".into(),
            phone: "1234567890".into(),
            date_of_birth: date!(2000 - 01 - 01),
            course_name: "c".into(),
            status: "Graduated".into(),
        };
        assert_eq!(
            Student::try_from(row).unwrap_err(),
            UnknownStatus("Graduated".into())
        );
    }

    #[test]
    fn iso_date_helpers_agree() {
        let d = parse_date("2001-02-03").unwrap();
        assert_eq!(format_iso_date(d), "2001-02-03");
        assert!(parse_date("02/03/2001").is_err());
        assert!(parse_date("2001-02-30").is_err());
    }
}
