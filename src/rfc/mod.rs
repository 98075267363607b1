//! The productions of [RFC 3986] as grammar rules.
//!
//! The top-level rules ([`UriRule`], [`RelativeRefRule`], [`UriReferenceRule`]
//! and [`AbsoluteUriRule`]) yield a [`Table`](crate::Table) that indexes the
//! parsed text; the others yield the pieces they matched.
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986

mod authority;
mod host;
mod path;
mod query;
mod uri;

pub use authority::{Authority, AuthorityRule, Userinfo, UserinfoRule};
pub use host::{
    DecOctetRule, Host, HostRule, HostType, IpLiteralRule, IpvFutureRule, Ipv4AddressRule,
    Ipv6AddressRule, ParsedHost, Port, PortRule, REG_NAME_RULE,
};
pub use path::{
    Path, PathAbemptyRule, PathAbsoluteRule, PathEmptyRule, PathNoschemeRule, PathRootlessRule,
    SegmentNzNcRule, SegmentNzRule, SegmentRule,
};
pub use query::{Query, QueryParam, QueryParamsRule, FRAGMENT_RULE, QUERY_RULE};
pub use uri::{
    AbsoluteUriRule, HierPart, HierPartRule, RelativePartRule, RelativeRefRule, SchemeRule,
    UriReferenceRule, UriRule,
};

pub(crate) use host::port_number;
pub(crate) use path::{count_segments, path};
pub(crate) use query::count_params;
