//! # Jira API Endpoints
//!
//! Organized endpoint implementations for different Jira API resource types,
//! including issues, JQL search and transition management functionality.

pub mod issues;
pub mod search;
pub mod transitions;
