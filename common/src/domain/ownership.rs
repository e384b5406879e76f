use crate::domain::{RepositoryError, User, UserId};

/// A record with an author, the only user allowed to see it for editing, change or delete it
pub trait Owned {
    fn author(&self) -> UserId;
}

/// Lets the record through only when the user wrote it.
///
/// A record owned by somebody else is reported exactly like a missing one,
/// so the response never reveals that the record exists.
pub fn ensure_owner<T: Owned>(record: Option<T>, user: &User) -> Result<T, RepositoryError> {
    match record {
        Some(record) if record.author() == user.id => Ok(record),
        Some(record) => {
            tracing::debug!(
                "user {:?} is not the author ({:?}) of the requested record",
                user.id,
                record.author()
            );
            Err(RepositoryError::NotFound)
        }
        None => Err(RepositoryError::NotFound),
    }
}
