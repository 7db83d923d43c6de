use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::db::ClassRepository;
use crate::models::{ClassSession, NewClassSession};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Class not found")]
    NotFound,
    #[error("Already booked")]
    AlreadyBooked,
    #[error("Class is full")]
    Full,
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Adds and removes attendees while keeping `|attendees| <= capacity` and
/// each user at most once per session.
///
/// Every read-modify-write on a session runs under a lock keyed by the
/// session id, so concurrent bookings cannot overrun capacity.
pub struct BookingService {
    classes: ClassRepository,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl BookingService {
    pub fn new(classes: ClassRepository) -> Self {
        Self {
            classes,
            locks: DashMap::new(),
        }
    }

    fn lock_for(&self, class_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(class_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the lock entry for an id nobody else is holding or waiting on.
    fn release_idle_lock(&self, class_id: &str) {
        self.locks
            .remove_if(class_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub async fn book(&self, class_id: &str, user_id: &str) -> Result<ClassSession, BookingError> {
        let result = {
            let lock = self.lock_for(class_id);
            let _guard = lock.lock().await;
            self.book_locked(class_id, user_id).await
        };
        if matches!(result, Err(BookingError::NotFound)) {
            self.release_idle_lock(class_id);
        }
        result
    }

    async fn book_locked(&self, class_id: &str, user_id: &str) -> Result<ClassSession, BookingError> {
        let mut session = self
            .classes
            .find_by_id(class_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        // membership is checked before capacity
        if session.has_attendee(user_id) {
            return Err(BookingError::AlreadyBooked);
        }
        if session.is_full() {
            return Err(BookingError::Full);
        }

        session.attendees.push(user_id.to_string());
        if !self.classes.update(&mut session).await? {
            return Err(BookingError::NotFound);
        }

        info!(class_id, user_id, booked = session.attendees.len(), capacity = session.capacity, "class booked");
        Ok(session)
    }

    /// Removing a user who is not booked succeeds without changing anything.
    pub async fn cancel(&self, class_id: &str, user_id: &str) -> Result<ClassSession, BookingError> {
        let result = {
            let lock = self.lock_for(class_id);
            let _guard = lock.lock().await;
            self.cancel_locked(class_id, user_id).await
        };
        if matches!(result, Err(BookingError::NotFound)) {
            self.release_idle_lock(class_id);
        }
        result
    }

    async fn cancel_locked(&self, class_id: &str, user_id: &str) -> Result<ClassSession, BookingError> {
        let mut session = self
            .classes
            .find_by_id(class_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        let before = session.attendees.len();
        session.attendees.retain(|id| id != user_id);
        if session.attendees.len() == before {
            debug!(class_id, user_id, "cancel for a user who was not booked");
            return Ok(session);
        }

        if !self.classes.update(&mut session).await? {
            return Err(BookingError::NotFound);
        }

        info!(class_id, user_id, "booking cancelled");
        Ok(session)
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<ClassSession>, BookingError> {
        Ok(self.classes.find_by_attendee(user_id).await?)
    }

    /// All sessions, earliest start first.
    pub async fn list_all(&self) -> Result<Vec<ClassSession>, BookingError> {
        Ok(self.classes.find_all().await?)
    }

    pub async fn create(&self, new: &NewClassSession) -> Result<ClassSession, BookingError> {
        let session = self.classes.create(new).await?;
        info!(class_id = %session.id, title = %session.title, capacity = session.capacity, "class created");
        Ok(session)
    }

    pub async fn delete(&self, class_id: &str) -> Result<(), BookingError> {
        let lock = self.lock_for(class_id);
        let deleted = {
            let _guard = lock.lock().await;
            self.classes.delete_by_id(class_id).await
        };
        drop(lock);
        self.release_idle_lock(class_id);
        let deleted = deleted?;

        if !deleted {
            return Err(BookingError::NotFound);
        }
        info!(class_id, "class removed");
        Ok(())
    }
}
