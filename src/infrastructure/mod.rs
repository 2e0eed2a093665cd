//! Infrastructure layer module
//!
//! Configuration, logging, catalog loading, project setup and the startup
//! wiring that turns a [`Config`](crate::domain::models::Config) into a
//! running pipeline.

pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod setup;
