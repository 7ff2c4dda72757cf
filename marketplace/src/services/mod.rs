// marketplace/src/services/mod.rs

//! Collaborators (authentication, notification) and the operations built on them.

pub mod auth_service;
pub mod catalog_service;
pub mod email_mock;
pub mod order_service;
