//! Durable key/value settings read by the booking policies

/// Hours before concert start after which cancellation is refused
pub const CANCEL_DEADLINE_HOURS: &str = "CANCEL_DEADLINE_HOURS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub key: String,
    pub value: String,
}
