use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Concert {0} not found")]
    ConcertNotFound(i32),

    #[error("Email {email} already holds a confirmed reservation for concert {concert_id}")]
    DuplicateReservation { concert_id: i32, email: String },

    #[error("Not enough seats: {remaining} remaining")]
    InsufficientCapacity { remaining: i64 },

    #[error("Reservation {0} not found")]
    ReservationNotFound(i32),

    #[error("Reservation {0} is already cancelled")]
    AlreadyCancelled(i32),

    #[error("Cancellation deadline passed")]
    DeadlinePassed,

    #[error("Concert {0} is busy, retry later")]
    Busy(i32),

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Whether this error is likely transient (lock contention, lost DB
    /// connection) and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Busy(_) | DomainError::Storage(_))
    }

    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl From<InfraError> for DomainError {
    fn from(e: InfraError) -> Self {
        DomainError::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_and_storage_are_transient() {
        assert!(DomainError::Busy(1).is_transient());
        assert!(DomainError::Storage("connection reset".into()).is_transient());
        assert!(!DomainError::InsufficientCapacity { remaining: 0 }.is_transient());
        assert!(!DomainError::DeadlinePassed.is_transient());
    }

    #[test]
    fn insufficient_capacity_message_carries_remaining() {
        let err = DomainError::InsufficientCapacity { remaining: 40 };
        assert_eq!(err.to_string(), "Not enough seats: 40 remaining");
    }

    #[test]
    fn crypto_failures_surface_as_storage_errors() {
        let err: DomainError = InfraError::Crypto("bad key".into()).into();
        assert_eq!(err.to_string(), DomainError::Storage("Crypto error: bad key".into()).to_string());
    }

    #[test]
    fn db_errors_become_storage_errors() {
        let err: DomainError = sea_orm::DbErr::Custom("boom".into()).into();
        assert!(matches!(err, DomainError::Storage(_)));
    }
}
