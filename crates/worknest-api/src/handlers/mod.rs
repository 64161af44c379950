//! API request handlers

pub mod lifecycle;
pub mod marketplace;
pub mod platform;
pub mod records;
pub mod security;
pub mod tasks;
pub mod templates;
pub mod workspaces;
