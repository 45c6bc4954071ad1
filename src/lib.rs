//! Client for querying a remote genomic variant database.

pub mod common;
pub mod conf;
pub mod err;
pub mod pbs;
pub mod query;
pub mod tools;
