//! Tests for descriptor resolution
//!
//! Fixtures are written as TOML inventories (see `support`) and wired into a
//! fresh module per test.

mod support;

mod test_binary_scopes;
mod test_module;
mod test_names;
mod test_provider_precedence;
