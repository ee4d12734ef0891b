pub mod query;
pub mod transaction;
