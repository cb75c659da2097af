use serde::{Deserialize, Serialize};

/// The single record managed by the service.
///
/// `id` is assigned by the client, never generated by the database, and is
/// the primary key. `name` is nullable.
///
/// Input also accepts the legacy key `demoName`. A body carrying both `name`
/// and `demoName` is rejected as a duplicate field rather than picking one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CrudDemo {
    pub id: i32,
    #[serde(default, alias = "demoName")]
    #[sqlx(rename = "demo_name")]
    pub name: Option<String>,
}

impl CrudDemo {
    /// Table backing the entity.
    pub const TABLE: &'static str = "crud_demo";

    pub fn new(id: i32, name: Option<&str>) -> Self {
        Self {
            id,
            name: name.map(str::to_string),
        }
    }
}
