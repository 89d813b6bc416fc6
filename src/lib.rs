#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Turns a remote directory of live-stream sources into a deduplicated M3U playlist.
//!
//! The root document lists platforms under `pingtai`; each platform's address is fetched
//! and flattened by [`document::normalize`] before [`dedupe::dedupe`] and [`playlist::write`].

pub mod dedupe;
pub mod document;
pub mod error;
pub mod events;
pub mod fetch;
pub mod pipeline;
pub mod playlist;
pub mod resolve;
pub mod structs;
pub mod util;

pub use error::{FetchError, PipelineError};
pub use pipeline::{Config, Pipeline, Summary};
pub use structs::{Entry, Stats};
