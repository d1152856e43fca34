#![forbid(unsafe_code)]

pub mod csv_source;
pub mod repository;
pub mod sqlite;
