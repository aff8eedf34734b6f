//! ID generator port for locally-created tasks.

/// Allocates ids for tasks entered through the form.
///
/// Ids carry the [`LOCAL_ID_PREFIX`](crate::task::LOCAL_ID_PREFIX) marker so
/// they can be told apart from ids supplied in bulk input.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh id, distinct from every id this generator returned before.
    fn generate_id(&self) -> String;
}
