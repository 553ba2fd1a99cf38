//! Shared utilities for the git-atlas integration tests.
//!
//! Every test works against a real repository created in a temporary directory and
//! drives the compiled binary with `assert_cmd`.

pub mod assertions;
pub mod fixtures;
pub mod repository;
