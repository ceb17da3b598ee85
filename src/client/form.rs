use std::fmt;

use tracing::warn;

use crate::client::{
    api::RecordsApi,
    notice::Notice,
    validation::{validate, FieldErrors},
};
use crate::students::{
    dto::StudentPayload,
    repo_types::{format_iso_date, Status, UnknownStatus},
    Student,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    Email,
    Phone,
    DateOfBirth,
    CourseName,
    Status,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::FullName,
        Field::Email,
        Field::Phone,
        Field::DateOfBirth,
        Field::CourseName,
        Field::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::FullName => "Full Name",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::DateOfBirth => "Date of Birth",
            Field::CourseName => "Course Name",
            Field::Status => "Status",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw form input. `date_of_birth` holds `YYYY-MM-DD` text as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub course_name: String,
    pub status: Status,
}

impl StudentForm {
    pub fn from_student(s: &Student) -> Self {
        Self {
            full_name: s.full_name.clone(),
            email: s.email.clone(),
            phone: s.phone.clone(),
            date_of_birth: format_iso_date(s.date_of_birth),
            course_name: s.course_name.clone(),
            status: s.status,
        }
    }

    pub fn to_payload(&self) -> StudentPayload {
        StudentPayload {
            full_name: Some(self.full_name.clone()),
            email: Some(self.email.clone()),
            phone: Some(self.phone.clone()),
            date_of_birth: Some(self.date_of_birth.clone()),
            course_name: Some(self.course_name.clone()),
            status: Some(self.status.to_string()),
        }
    }

    pub fn value(&self, field: Field) -> String {
        match field {
            Field::FullName => self.full_name.clone(),
            Field::Email => self.email.clone(),
            Field::Phone => self.phone.clone(),
            Field::DateOfBirth => self.date_of_birth.clone(),
            Field::CourseName => self.course_name.clone(),
            Field::Status => self.status.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

/// Outcome of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Validation failed; nothing was sent. Errors are on the form.
    Invalid,
    Saved(Notice),
    Failed(Notice),
}

/// Add/edit screen state. `submit` takes `&mut self` across the request, so a
/// form never has two submissions in flight.
#[derive(Debug, Clone)]
pub struct FormState {
    mode: FormMode,
    form: StudentForm,
    errors: FieldErrors,
}

impl FormState {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            form: StudentForm::default(),
            errors: FieldErrors::new(),
        }
    }

    /// Loads the record to edit from a fresh full listing.
    pub async fn load_edit(api: &dyn RecordsApi, id: i64) -> Result<Self, Notice> {
        let students = api.list().await.map_err(|e| {
            warn!(error = %e, id, "load student for edit failed");
            Notice::error("Failed to fetch student data")
        })?;
        let student = students
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Notice::error("Student not found"))?;
        Ok(Self {
            mode: FormMode::Edit(id),
            form: StudentForm::from_student(student),
            errors: FieldErrors::new(),
        })
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn form(&self) -> &StudentForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    /// Sets a field and clears its error.
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), UnknownStatus> {
        match field {
            Field::FullName => self.form.full_name = value.to_string(),
            Field::Email => self.form.email = value.to_string(),
            Field::Phone => self.form.phone = value.to_string(),
            Field::DateOfBirth => self.form.date_of_birth = value.to_string(),
            Field::CourseName => self.form.course_name = value.to_string(),
            Field::Status => self.form.status = value.parse()?,
        }
        self.errors.remove(&field);
        Ok(())
    }

    pub async fn submit(&mut self, api: &dyn RecordsApi) -> Submission {
        let errors = validate(&self.form);
        if !errors.is_empty() {
            self.errors = errors;
            return Submission::Invalid;
        }

        let payload = self.form.to_payload();
        let (result, saved, fallback) = match self.mode {
            FormMode::Create => (
                api.create(&payload).await,
                "Student added successfully!",
                "Failed to add student",
            ),
            FormMode::Edit(id) => (
                api.update(id, &payload).await,
                "Student updated successfully!",
                "Failed to update student",
            ),
        };

        match result {
            Ok(_) => Submission::Saved(Notice::success(saved)),
            Err(e) => {
                warn!(error = %e, mode = ?self.mode, "submit failed");
                Submission::Failed(Notice::error(e.server_message().unwrap_or(fallback)))
            }
        }
    }
}
