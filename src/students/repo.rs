use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::students::dto::NewStudent;
use crate::students::repo_types::{Student, StudentRow};

/// Persistence for the single `students` table.
///
/// `update` and `delete` report the number of affected rows; callers treat zero
/// as success, there is no existence check.
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn insert(&self, student: &NewStudent) -> Result<Student, StoreError>;
    async fn list(&self) -> Result<Vec<Student>, StoreError>;
    async fn update(&self, id: i64, student: &NewStudent) -> Result<u64, StoreError>;
    async fn delete(&self, id: i64) -> Result<u64, StoreError>;
}

#[derive(Clone)]
pub struct PgStudentStore {
    db: PgPool,
}

impl PgStudentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn into_student(row: StudentRow) -> Result<Student, StoreError> {
    Student::try_from(row).map_err(|e| StoreError::Backend(e.to_string()))
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn insert(&self, s: &NewStudent) -> Result<Student, StoreError> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            INSERT INTO students
                (full_name, email, phone, date_of_birth, course_name, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, full_name, email, phone, date_of_birth, course_name, status
            "#,
        )
        .bind(&s.full_name)
        .bind(&s.email)
        .bind(&s.phone)
        .bind(s.date_of_birth)
        .bind(&s.course_name)
        .bind(s.status.as_str())
        .fetch_one(&self.db)
        .await?;
        into_student(row)
    }

    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        let rows = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, full_name, email, phone, date_of_birth, course_name, status
            FROM students
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        rows.into_iter().map(into_student).collect()
    }

    async fn update(&self, id: i64, s: &NewStudent) -> Result<u64, StoreError> {
        let res = sqlx::query(
            r#"
            UPDATE students
               SET full_name = $1, email = $2, phone = $3,
                   date_of_birth = $4, course_name = $5, status = $6
             WHERE id = $7
            "#,
        )
        .bind(&s.full_name)
        .bind(&s.email)
        .bind(&s.phone)
        .bind(s.date_of_birth)
        .bind(&s.course_name)
        .bind(s.status.as_str())
        .bind(id)
        .execute(&self.db)
        .await?;
        debug!(id, rows = res.rows_affected(), "students updated");
        Ok(res.rows_affected())
    }

    async fn delete(&self, id: i64) -> Result<u64, StoreError> {
        let res = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        debug!(id, rows = res.rows_affected(), "students deleted");
        Ok(res.rows_affected())
    }
}

/// Process-local store with the same contract as the Postgres table: emails
/// unique ignoring case, ids from a counter that never hands out a number twice.
#[derive(Default)]
pub struct MemoryStudentStore {
    inner: RwLock<MemoryTable>,
}

fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[derive(Default)]
struct MemoryTable {
    last_id: i64,
    rows: Vec<Student>,
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn insert(&self, s: &NewStudent) -> Result<Student, StoreError> {
        let mut table = self.inner.write().await;
        if table.rows.iter().any(|r| same_email(&r.email, &s.email)) {
            return Err(StoreError::DuplicateEmail);
        }
        table.last_id += 1;
        let student = Student {
            id: table.last_id,
            full_name: s.full_name.clone(),
            email: s.email.clone(),
            phone: s.phone.clone(),
            date_of_birth: s.date_of_birth,
            course_name: s.course_name.clone(),
            status: s.status,
        };
        table.rows.push(student.clone());
        Ok(student)
    }

    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.inner.read().await.rows.clone())
    }

    async fn update(&self, id: i64, s: &NewStudent) -> Result<u64, StoreError> {
        let mut table = self.inner.write().await;
        let Some(pos) = table.rows.iter().position(|r| r.id == id) else {
            return Ok(0);
        };
        if table.rows.iter().any(|r| r.id != id && same_email(&r.email, &s.email)) {
            return Err(StoreError::DuplicateEmail);
        }
        let row = &mut table.rows[pos];
        row.full_name = s.full_name.clone();
        row.email = s.email.clone();
        row.phone = s.phone.clone();
        row.date_of_birth = s.date_of_birth;
        row.course_name = s.course_name.clone();
        row.status = s.status;
        Ok(1)
    }

    async fn delete(&self, id: i64) -> Result<u64, StoreError> {
        let mut table = self.inner.write().await;
        let before = table.rows.len();
        table.rows.retain(|r| r.id != id);
        Ok((before - table.rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::students::repo_types::Status;
    use time::macros::date;

    fn new_student(name: &str, email: &str) -> NewStudent {
        NewStudent {
            full_name: name.into(),
            email: email.into(),
            phone: "1234567890".into(),
            date_of_birth: date!(2001 - 04 - 05),
            course_name: "Physics".into(),
            status: Status::Active,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids_and_lists_in_order() {
        let store = MemoryStudentStore::default();
        let a = store.insert(&new_student("A", "a@x.io")).await.unwrap();
        let b = store.insert(&new_student("B", "b@x.io")).await.unwrap();
        assert!(b.id > a.id);
        let all = store.list().await.unwrap();
        assert_eq!(all, vec![a, b]);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_insert() {
        let store = MemoryStudentStore::default();
        store.insert(&new_student("A", "same@x.io")).await.unwrap();
        let err = store
            .insert(&new_student("B", "same@x.io"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn email_uniqueness_ignores_case() {
        let store = MemoryStudentStore::default();
        let a = store.insert(&new_student("A", "Ann@X.io")).await.unwrap();
        let err = store
            .insert(&new_student("B", "ann@x.io"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));

        let b = store.insert(&new_student("B", "bob@x.io")).await.unwrap();
        let err = store
            .update(b.id, &new_student("B", "ANN@x.IO"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));

        // changing only the case of one's own email is allowed
        assert_eq!(store.update(a.id, &new_student("A", "ann@x.io")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryStudentStore::default();
        let a = store.insert(&new_student("A", "a@x.io")).await.unwrap();
        assert_eq!(store.delete(a.id).await.unwrap(), 1);
        let b = store.insert(&new_student("B", "b@x.io")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_id() {
        let store = MemoryStudentStore::default();
        let a = store.insert(&new_student("A", "a@x.io")).await.unwrap();
        let mut changed = new_student("A Renamed", "renamed@x.io");
        changed.status = Status::Inactive;
        changed.date_of_birth = date!(1999 - 09 - 09);
        assert_eq!(store.update(a.id, &changed).await.unwrap(), 1);

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, a.id);
        assert_eq!(all[0].full_name, "A Renamed");
        assert_eq!(all[0].email, "renamed@x.io");
        assert_eq!(all[0].status, Status::Inactive);
        assert_eq!(all[0].date_of_birth, date!(1999 - 09 - 09));
    }

    #[tokio::test]
    async fn update_to_taken_email_fails() {
        let store = MemoryStudentStore::default();
        store.insert(&new_student("A", "a@x.io")).await.unwrap();
        let b = store.insert(&new_student("B", "b@x.io")).await.unwrap();
        let err = store
            .update(b.id, &new_student("B", "a@x.io"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_id_are_noops() {
        let store = MemoryStudentStore::default();
        assert_eq!(store.update(42, &new_student("X", "x@x.io")).await.unwrap(), 0);
        assert_eq!(store.delete(42).await.unwrap(), 0);
        assert!(store.list().await.unwrap().is_empty());
    }
}
