//! Pressroom: a news site with an admin console for articles, popups and the about-me profile.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
