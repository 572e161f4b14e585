//! Data models
//!
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod certificate;
pub mod order;
pub mod tag;
pub mod user;

// Re-exports
pub use certificate::*;
pub use order::*;
pub use tag::*;
pub use user::*;

/// Soft-delete visibility of an entity
///
/// Inactive entities stay in storage but are hidden from default reads.
pub trait SoftDelete {
    fn is_active(&self) -> bool;

    fn mark_inactive(&mut self);

    fn is_visible(&self) -> bool {
        self.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_inactive_hides_entity() {
        let mut tag = Tag {
            id: 1,
            name: "spa".into(),
            is_active: true,
        };
        assert!(tag.is_visible());
        tag.mark_inactive();
        assert!(!tag.is_visible());
    }
}
