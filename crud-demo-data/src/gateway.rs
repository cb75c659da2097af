use crate::entity::CrudDemo;
use crate::error::DataError;
use std::future::Future;

/// Handle on a backing store for `CrudDemo` records.
///
/// Cheap to clone; every request opens its own [`Session`].
pub trait Gateway: Clone + Send + Sync + 'static {
    type Session: Session;

    fn session(&self) -> Self::Session;
}

/// A unit of work over the `CrudDemo` collection.
///
/// Reads hit the store immediately. `add`, `mark_modified` and `remove` only
/// stage changes; nothing is written until [`Session::commit`].
///
/// Uses RPITIT (return-position `impl Trait` in traits), so no `async-trait` is needed.
pub trait Session: Send + Sync {
    /// Whether the backing collection exists at all.
    fn is_provisioned(&self) -> impl Future<Output = Result<bool, DataError>> + Send;

    /// Every record in the store's natural order.
    ///
    /// Fails with [`DataError::NotProvisioned`] rather than returning an empty
    /// list when the collection does not exist.
    fn find_all(&self) -> impl Future<Output = Result<Vec<CrudDemo>, DataError>> + Send;

    fn find(&self, id: i32) -> impl Future<Output = Result<Option<CrudDemo>, DataError>> + Send;

    fn any(&self, id: i32) -> impl Future<Output = Result<bool, DataError>> + Send;

    /// Stage a new record for insertion.
    fn add(&mut self, record: CrudDemo);

    /// Stage an update persisting the current field values of a fetched record.
    fn mark_modified(&mut self, record: &CrudDemo);

    /// Stage a fetched record for deletion.
    fn remove(&mut self, record: &CrudDemo);

    /// Number of changes waiting for the next commit.
    fn pending(&self) -> usize;

    /// Apply every staged change atomically and return the number of rows written.
    ///
    /// An update or delete whose row is gone fails with
    /// [`DataError::ConcurrencyConflict`]; an insert on an existing key fails
    /// with [`DataError::Duplicate`]. On failure nothing is applied and the
    /// staged batch is discarded. Never retried here.
    fn commit(&mut self) -> impl Future<Output = Result<usize, DataError>> + Send;
}

/// A change staged on a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Change {
    Insert(CrudDemo),
    Update(CrudDemo),
    Delete(i32),
}
