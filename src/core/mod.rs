pub mod builder;
pub mod config;
pub mod contracts;
pub mod context;
pub mod error_relay;
pub mod executor;
pub mod mappers;
pub mod path;
pub mod registry;

#[cfg(feature = "json-schema")]
pub mod schema;
