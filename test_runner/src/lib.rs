//! Cycle-accurate and end-to-end acceptance tests for `gb-core`, kept in a dedicated
//! crate rather than `#[cfg(test)]` blocks so they exercise only the public API a
//! frontend has access to.
