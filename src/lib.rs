//! Fetch a Phabricator diff together with the diffs it depends on and lay
//! them out as an ordered patch stack for a local working copy.

pub mod application;
pub mod domain;
pub mod infra;
