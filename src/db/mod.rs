/// Generic read/upsert/delete over identifier-keyed rows
pub mod access;
/// Table-name allowlist and schema creation
pub mod schema;
/// Connection settings value object
pub mod token;

pub use access::{Delete, Query, Upsert, del_data, get_data, set_data};
pub use schema::create_tables;
pub use token::ConnectionToken;
