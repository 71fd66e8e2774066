//! Tests that need a real Postgres; run with `cargo test -p ems-tests -- --ignored`.
