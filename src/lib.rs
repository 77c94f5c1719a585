//! Personal-trainer desk: accounts, clients, workout plans, progress and
//! monthly payment status, persisted as JSON documents.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod services;
pub mod storage;
