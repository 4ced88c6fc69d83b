#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Shared test helpers used across integration suites.
//! Layout: fixtures.rs (leaf and torrent builders), mocks.rs (in-memory daemon), assert.rs (tree invariant checks).

pub mod assert;
pub mod fixtures;
pub mod mocks;
