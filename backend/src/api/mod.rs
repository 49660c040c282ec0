//! Central module for organizing the application's API endpoints.

pub mod drinks;
