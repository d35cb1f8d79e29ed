//! End-to-end tests for `docbuild` runs against scratch repositories.
//!
//! Build commands in these tests are POSIX shell snippets.

#![cfg(unix)]


mod build_tests;
