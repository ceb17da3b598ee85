//! In-memory listing: the canonical list is fetched once per mount; search and
//! pagination are derived from it without further API calls.

use tracing::{info, warn};

use crate::client::{api::RecordsApi, notice::Notice};
use crate::students::Student;

pub const PAGE_SIZE: usize = 5;

/// Why the current page is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    NoRecords,
    NoMatches(String),
}

#[derive(Debug, Clone)]
pub struct StudentList {
    students: Vec<Student>,
    search: String,
    /// Indices into `students` that match `search`, in list order.
    filtered: Vec<usize>,
    page: usize,
}

/// Result of mounting the list screen. A failed fetch is a blocking state,
/// never an empty list.
#[derive(Debug, Clone)]
pub enum ListScreen {
    Ready(StudentList),
    Failed(Notice),
}

pub async fn mount(api: &dyn RecordsApi) -> ListScreen {
    match api.list().await {
        Ok(students) => {
            info!(count = students.len(), "students loaded");
            ListScreen::Ready(StudentList::new(students))
        }
        Err(e) => {
            warn!(error = %e, "fetch students failed");
            ListScreen::Failed(Notice::error("Failed to fetch students"))
        }
    }
}

fn matches(student: &Student, needle: &str) -> bool {
    student.full_name.to_lowercase().contains(needle)
}

impl StudentList {
    pub fn new(students: Vec<Student>) -> Self {
        let mut list = Self {
            students,
            search: String::new(),
            filtered: Vec::new(),
            page: 1,
        };
        list.refilter();
        list
    }

    /// Recomputes the filtered view and returns to page 1.
    fn refilter(&mut self) {
        let needle = self.search.to_lowercase();
        self.filtered = self
            .students
            .iter()
            .enumerate()
            .filter(|(_, s)| matches(s, &needle))
            .map(|(i, _)| i)
            .collect();
        self.page = 1;
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: &str) {
        if self.search == term {
            return;
        }
        self.search = term.to_string();
        self.refilter();
    }

    pub fn filtered(&self) -> impl Iterator<Item = &Student> + '_ {
        self.filtered.iter().map(|&i| &self.students[i])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(PAGE_SIZE)
    }

    /// Records on the current page: `[(page-1)*PAGE_SIZE, page*PAGE_SIZE)` of the filtered list.
    pub fn visible(&self) -> Vec<&Student> {
        self.filtered()
            .skip((self.page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect()
    }

    pub fn shows_pagination(&self) -> bool {
        self.filtered.len() > PAGE_SIZE
    }

    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn prev(&mut self) {
        if self.can_prev() {
            self.page -= 1;
        }
    }

    pub fn next(&mut self) {
        if self.can_next() {
            self.page += 1;
        }
    }

    /// Jumps to `page`, clamped to `[1, total_pages]`.
    pub fn go_to(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.visible().is_empty() {
            return None;
        }
        if self.search.is_empty() {
            Some(EmptyState::NoRecords)
        } else {
            Some(EmptyState::NoMatches(self.search.clone()))
        }
    }

    /// Drops a record from the canonical list; returns whether it was present.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.students.len();
        self.students.retain(|s| s.id != id);
        let removed = self.students.len() != before;
        if removed {
            self.refilter();
        }
        removed
    }

    /// Deletes through the API and, on success only, removes the record locally.
    pub async fn delete(&mut self, api: &dyn RecordsApi, id: i64) -> Notice {
        match api.delete(id).await {
            Ok(_) => {
                self.remove(id);
                Notice::success("Student deleted successfully!")
            }
            Err(e) => {
                warn!(error = %e, id, "delete student failed");
                Notice::error("Failed to delete student")
            }
        }
    }
}
