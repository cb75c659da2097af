/// Errors that can occur in the data layer.
#[derive(Debug)]
pub enum DataError {
    /// The backing collection does not exist (table not created yet).
    NotProvisioned,
    /// An insert collided with an existing primary key.
    Duplicate { id: i32 },
    /// A staged update or delete targeted a row that changed since it was fetched.
    ConcurrencyConflict { id: i32 },
    Database(Box<dyn std::error::Error + Send + Sync>),
}

impl DataError {
    /// Construct a `Database` variant from any error type.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Database(Box::new(err))
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::NotProvisioned => write!(f, "Entity set '{}' is not provisioned", crate::CrudDemo::TABLE),
            DataError::Duplicate { id } => write!(f, "Id {id} already exists"),
            DataError::ConcurrencyConflict { id } => {
                write!(f, "Record {id} was modified or deleted since it was loaded")
            }
            DataError::Database(err) => write!(f, "Database error: {err}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Database(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.message().starts_with("no such table") => {
                DataError::NotProvisioned
            }
            _ => DataError::database(err),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DataError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DataError::database(err)
    }
}
