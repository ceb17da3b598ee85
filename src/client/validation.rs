use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::client::form::{Field, StudentForm};

/// One message per invalid field.
pub type FieldErrors = BTreeMap<Field, &'static str>;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"\S+@\S+\.\S+").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Phone numbers may contain dashes and whitespace; what remains must be ten digits.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();
    PHONE_RE.is_match(&digits)
}

/// Checks every field and reports all failures at once.
pub fn validate(form: &StudentForm) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if form.full_name.trim().is_empty() {
        errors.insert(Field::FullName, "Full name is required");
    }

    if form.email.trim().is_empty() {
        errors.insert(Field::Email, "Email is required");
    } else if !is_valid_email(&form.email) {
        errors.insert(Field::Email, "Email is invalid");
    }

    if form.phone.trim().is_empty() {
        errors.insert(Field::Phone, "Phone is required");
    } else if !is_valid_phone(&form.phone) {
        errors.insert(Field::Phone, "Phone must be 10 digits");
    }

    if form.date_of_birth.is_empty() {
        errors.insert(Field::DateOfBirth, "Date of birth is required");
    }

    if form.course_name.trim().is_empty() {
        errors.insert(Field::CourseName, "Course name is required");
    }

    errors
}
