// Domain records persisted in the JSON documents

pub mod account;
pub mod catalog;
pub mod client;
pub mod validation;

pub use account::*;
pub use catalog::*;
pub use client::*;
