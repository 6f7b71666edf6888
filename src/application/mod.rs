//! Application layer (use-cases, policies).
//!
//! This module orchestrates domain logic over the Conduit and working copy
//! seams without depending on a concrete transport or version control tool.

pub mod stack;
