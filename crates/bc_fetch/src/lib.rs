//! Versioned game data fetching and caching for the save editor.
//!
//! The remote repository publishes one version tag per region in
//! `latest.txt`; files are fetched from `{root}/{version}/{pack}/{file}`
//! and cached locally under the same key, so a second request never
//! touches the network. Missing versions, timeouts and non-200 responses
//! all degrade to absent data rather than errors.

pub mod client;
pub mod config;
pub mod error;
pub mod names;
pub mod region;

pub use client::GameDataClient;
pub use config::FetchConfig;
pub use error::{Error, Result};
pub use names::{EnigmaNames, NameTable, extract_heading};
pub use region::CountryCode;
