//! Backend test support utilities
//!
//! Shared by the integration tests: unified logging initialization and
//! seeded game fixtures driven through the public service API.

pub mod fixtures;
pub mod logging;
