use crate::errors::StoreError;
use crate::models::{Enrollment, Student, User};
use crate::store::Tables;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Repository Trait
///
/// Contract between the enrollment workflow and whatever holds the records. Operations
/// that read then write (duplicate check then insert, lookup then delete) are single
/// methods so an implementation can run each one as one critical section.
///
/// **Send + Sync + async_trait** let `Arc<dyn Repository>` cross Axum task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    // --- Students ---
    async fn list_students(&self) -> Result<Vec<Student>, StoreError>;
    async fn find_student(&self, student_id: &str) -> Result<Option<Student>, StoreError>;
    /// Removes a student and its enrollments. Returns the enrollments left in the store,
    /// or `None` (store untouched) when the student does not exist.
    async fn remove_student(&self, student_id: &str)
    -> Result<Option<Vec<Enrollment>>, StoreError>;

    // --- Enrollments ---
    async fn list_enrollments(&self) -> Result<Vec<Enrollment>, StoreError>;
    /// Inserts the enrollment unless the same `(studentId, courseId)` pair exists.
    /// Returns `true` when a row was inserted, `false` on a duplicate.
    async fn insert_enrollment(&self, enrollment: Enrollment) -> Result<bool, StoreError>;

    // --- Lifecycle ---
    /// Clears every collection and reseeds the fixture. Idempotent.
    async fn reset_all(&self) -> Result<(), StoreError>;
}

/// RepositoryState
///
/// Shared handle to the persistence layer carried in the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// InMemoryRepository
///
/// Process-scoped record store. One lock covers all four collections, so resets are
/// all-or-nothing and no reader observes a half-applied mutation.
pub struct InMemoryRepository {
    // `None` once the store has been torn down.
    tables: RwLock<Option<Tables>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Initializes the store with the fixture dataset.
    pub fn new() -> Self {
        Self::with_tables(Tables::fixture())
    }

    /// Initializes the store with explicit contents.
    pub fn with_tables(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(Some(tables)),
        }
    }

    /// Drops every collection. Later calls fail with `StoreError::Closed`.
    pub async fn teardown(&self) {
        self.tables.write().await.take();
        tracing::info!("record store torn down");
    }

    /// Copy of the current contents, for inspection.
    pub async fn snapshot(&self) -> Result<Tables, StoreError> {
        self.read(Tables::clone).await
    }

    async fn read<R: Send>(&self, f: impl FnOnce(&Tables) -> R + Send) -> Result<R, StoreError> {
        let guard = self.tables.read().await;
        guard.as_ref().map(f).ok_or(StoreError::Closed)
    }

    async fn write<R: Send>(&self, f: impl FnOnce(&mut Tables) -> R + Send) -> Result<R, StoreError> {
        let mut guard = self.tables.write().await;
        guard.as_mut().map(f).ok_or(StoreError::Closed)
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let key = username.to_string();
        self.read(|t| t.users.find_by_key(&key).cloned()).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.read(|t| t.users.scan().cloned().collect()).await
    }

    async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        self.read(|t| t.students.scan().cloned().collect()).await
    }

    async fn find_student(&self, student_id: &str) -> Result<Option<Student>, StoreError> {
        let key = student_id.to_string();
        self.read(|t| t.students.find_by_key(&key).cloned()).await
    }

    async fn remove_student(
        &self,
        student_id: &str,
    ) -> Result<Option<Vec<Enrollment>>, StoreError> {
        let key = student_id.to_string();
        self.write(|t| {
            t.students.remove(&key)?;
            t.enrollments.retain(|(sid, _), _| *sid != key);
            Some(t.enrollments.scan().cloned().collect())
        })
        .await
    }

    async fn list_enrollments(&self) -> Result<Vec<Enrollment>, StoreError> {
        self.read(|t| t.enrollments.scan().cloned().collect()).await
    }

    async fn insert_enrollment(&self, enrollment: Enrollment) -> Result<bool, StoreError> {
        self.write(|t| {
            let key = enrollment.key();
            if t.enrollments.contains_key(&key) {
                return false;
            }

            // Keep the student's course list in step with its enrollments.
            match t.students.find_by_key_mut(&enrollment.student_id) {
                Some(student) => student.courses.push(enrollment.course_id.clone()),
                None => {
                    let student = Student {
                        student_id: enrollment.student_id.clone(),
                        courses: vec![enrollment.course_id.clone()],
                        ..Student::default()
                    };
                    t.students.insert(student.student_id.clone(), student);
                }
            }
            t.enrollments.insert(key, enrollment);
            true
        })
        .await
    }

    async fn reset_all(&self) -> Result<(), StoreError> {
        self.write(Tables::reset).await
    }
}
