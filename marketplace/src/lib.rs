// marketplace/src/lib.rs

//! Marketplace order API.
//!
//! Orders are placed through the `placement` pipeline (see
//! [`pipelines::placement_pipeline`]); everything else is plain reads and
//! small validated writes against a [`store::Store`].

pub mod config;
pub mod errors;
pub mod models;
pub mod money;
pub mod pipelines;
pub mod seed;
pub mod services;
pub mod state;
pub mod store;
pub mod views;
pub mod web;
