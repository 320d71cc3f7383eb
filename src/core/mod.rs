pub mod db;
pub mod error;

pub use error::{SessionError, StoreError, TableName};
