//! Per-collection storage size scanner for MongoDB clusters.
//!
//! A single-endpoint HTTP service: each request names a cluster via query
//! parameters, gets one connection, a sequential metadata scan, and a flat
//! JSON array of `{database, collection, storageSize}` records.

pub mod connection;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod scan;
