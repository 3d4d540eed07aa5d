//! Application services layer.

pub mod admin;
pub mod auth;
pub mod error;
pub mod feed;
pub mod popups;
pub mod profile;
pub mod render;
pub mod repos;
