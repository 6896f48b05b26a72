// ABOUTME: Main library entry point for RSS/Atom feed discovery over HTTP.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, Options, DiscoverError, ErrorCode.

//! Feed discovery for lists of web sites.
//!
//! # Example
//!
//! ```no_run
//! use minitools_discover::{Client, DiscoverError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), DiscoverError> {
//!     let client = Client::builder().build()?;
//!     let sites = client.discover_text("example.com\nblog.rust-lang.org").await?;
//!     println!("{}", minitools_feed::generate_opml_now(&sites));
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod options;
pub mod resource;

pub use crate::client::Client;
pub use crate::error::{DiscoverError, ErrorCode};
pub use crate::options::{ClientBuilder, Options};
