//! Infrastructure layer (adapters/implementations).
//!
//! This module contains IO-heavy integrations (Conduit over HTTP, git, config files).

pub mod app_config;
pub mod conduit;
pub mod vcs;
