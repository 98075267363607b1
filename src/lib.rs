#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! A compact URI library that strictly adheres to IETF [RFC 3986].
//!
//! A parsed URI reference is its text plus a [`Table`] of nine offsets,
//! one per component boundary, so that every component is sliced in
//! constant time without allocation. The text is borrowed by [`UriView<&str>`],
//! owned by [`UriView<String>`], shared by [`PersistedUri`] and edited in place
//! by [`Url`].
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986
//!
//! # Examples
//!
//! ```
//! use compact_uri::{parse_uri, HostType, Url};
//!
//! let uri = parse_uri("http://user@example.com:8080/a/b?id=42#top")?;
//! assert_eq!(uri.scheme().unwrap().as_str(), "http");
//! assert_eq!(uri.encoded_host(), "example.com");
//! assert_eq!(uri.host_type(), HostType::Name);
//! assert_eq!(uri.port_number(), Some(8080));
//! assert_eq!(uri.segments().collect::<Vec<_>>(), ["a", "b"]);
//! assert_eq!(uri.params().next().unwrap().value.unwrap(), "42");
//!
//! let mut url = Url::from_view(&uri);
//! url.set_host("example.org")?.remove_port().set_path("/c d")?;
//! assert_eq!(url.as_str(), "http://user@example.org/c%20d?id=42#top");
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! # Feature flags
//!
//! - `std` (default): Enables `std` support, including `impl-error`.
//! - `impl-error`: Implements [`Error`] for the error types.
//! - `net`: Adds `Ipv4Addr` and `Ipv6Addr` accessors on views.
//! - `serde`: Implements `Serialize` and `Deserialize` for [`UriView`] and [`Url`].
//! - `log`: Traces buffer growth, list edits and reference resolution with the `log` crate.

extern crate alloc;

#[macro_use]
mod macros;

#[cfg(feature = "impl-error")]
use core::error::Error;

pub mod grammar;
pub mod pct_enc;
pub mod rfc;

mod authority;
mod error;
mod fmt;
mod list;
mod normalize;
mod params;
mod resolve;
mod scheme;
mod segments;
mod table;
mod url;
mod view;

pub use authority::{parse_authority, AuthorityView};
pub use error::{ErrorKind, ParseError};
pub use normalize::remove_dot_segments;
pub use params::{Params, ParamsMut};
pub use resolve::resolve;
pub use rfc::{Host, HostType, QueryParam};
pub use scheme::{Scheme, SchemeId};
pub use segments::{Segments, SegmentsMut};
pub use table::{Component, Table, MAX_SIZE};
pub use url::Url;
pub use view::{
    parse_absolute_uri, parse_relative_ref, parse_uri, parse_uri_reference, PersistedUri,
    UriView,
};
