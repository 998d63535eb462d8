//! Configuration and the plain data types shared by every layer

pub mod config;
pub mod models;
