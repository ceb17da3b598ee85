use std::fmt::Write;

use time::{macros::format_description, Date};

use crate::client::{
    form::{Field, FormMode, FormState},
    list::{EmptyState, StudentList},
};

const COLUMNS: [&str; 7] = [
    "ID",
    "Full Name",
    "Email",
    "Phone",
    "Date of Birth",
    "Course Name",
    "Status",
];

/// `MM/DD/YYYY`, as shown in the list.
pub fn display_date(date: Date) -> String {
    date.format(format_description!("[month]/[day]/[year]"))
        .unwrap_or_default()
}

pub fn render_login_hint() -> &'static str {
    "Hint: Enter any username and password to login"
}

pub fn render_list(list: &StudentList, username: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Student Management System  ({username})");
    if !list.search_term().is_empty() {
        let _ = writeln!(out, "Search: {}", list.search_term());
    }
    out.push('\n');

    if let Some(empty) = list.empty_state() {
        let _ = match empty {
            EmptyState::NoRecords => writeln!(
                out,
                "No students found. Run `students add` to get started!"
            ),
            EmptyState::NoMatches(term) => {
                writeln!(out, "No students found matching \"{term}\"")
            }
        };
        return out;
    }

    let rows: Vec<[String; 7]> = list
        .visible()
        .into_iter()
        .map(|s| {
            [
                s.id.to_string(),
                s.full_name.clone(),
                s.email.clone(),
                s.phone.clone(),
                display_date(s.date_of_birth),
                s.course_name.clone(),
                s.status.to_string(),
            ]
        })
        .collect();

    let mut widths = COLUMNS.map(|c| c.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let header = COLUMNS.map(String::from);
    for row in std::iter::once(&header).chain(&rows) {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }

    if list.shows_pagination() {
        out.push('\n');
        out.push_str(&render_pagination(list));
    }
    out
}

fn render_pagination(list: &StudentList) -> String {
    let prev = if list.can_prev() { "<- Previous" } else { "   (Previous)" };
    let next = if list.can_next() { "Next ->" } else { "(Next)" };
    let pages: Vec<String> = (1..=list.total_pages())
        .map(|p| {
            if p == list.page() {
                format!("[{p}]")
            } else {
                p.to_string()
            }
        })
        .collect();
    format!(
        "{prev}  {}  {next}\nPage {} of {}\n",
        pages.join(" "),
        list.page(),
        list.total_pages()
    )
}

/// Field-by-field form summary with errors next to the fields they belong to.
pub fn render_form(state: &FormState) -> String {
    let mut out = String::new();
    let title = match state.mode() {
        FormMode::Create => "Add New Student".to_string(),
        FormMode::Edit(id) => format!("Edit Student #{id}"),
    };
    let _ = writeln!(out, "{title}");
    for field in Field::ALL {
        let value = state.form().value(field);
        match state.error(field) {
            Some(err) => {
                let _ = writeln!(out, "  {:<14} {value:<24} <- {err}", field.label());
            }
            None => {
                let _ = writeln!(out, "  {:<14} {value}", field.label());
            }
        }
    }
    out
}
