//! # Confluence API Endpoints

pub mod pages;
pub mod search;
pub mod spaces;
