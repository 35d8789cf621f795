//! Stage domain entity

/// Festival stage; `capacity` bounds the capacity of concerts held on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub id: i32,
    pub name: String,
    pub capacity: i32,
}
