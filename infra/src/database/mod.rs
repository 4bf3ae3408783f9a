//! Database access: connection pooling and the MySQL session store.

pub mod connection;
pub mod mysql;
