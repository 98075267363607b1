//! Reference resolution.

use crate::{
    error::ErrorKind,
    grammar::parse_all,
    normalize::remove_dot_segments_clamped,
    rfc::UriRule,
    url::Url,
    view::UriView,
};
use alloc::string::String;
use borrow_or_share::Bos;

/// Resolves a URI reference against a base URI, per [Section 5.2 of RFC 3986][resolve].
///
/// The base must have a scheme, and either an authority or an absolute path.
/// A reference whose scheme equals the base's, ignoring case, and that has no
/// authority is resolved as if it had no scheme. The base query is kept only
/// when the reference has an empty path and no query; the base fragment is
/// never kept. Dot segments are removed from the resulting path, which never
/// climbs above its root or, for a relative path, above its start.
///
/// [resolve]: https://datatracker.ietf.org/doc/html/rfc3986#section-5.2
///
/// # Errors
///
/// Returns [`NotABase`](ErrorKind::NotABase) if the base is not suitable,
/// and [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
///
/// # Examples
///
/// ```
/// use compact_uri::{parse_uri, parse_uri_reference, resolve, ErrorKind};
///
/// let base = parse_uri("http://a/b/c/d;p?q")?;
/// let target = |r| resolve(&base, &parse_uri_reference(r).unwrap()).unwrap();
/// assert_eq!(target("../g").as_str(), "http://a/b/g");
/// assert_eq!(target("?y").as_str(), "http://a/b/c/d;p?y");
/// assert_eq!(target("").as_str(), "http://a/b/c/d;p?q");
/// assert_eq!(target("//g").as_str(), "http://g");
///
/// let opaque = parse_uri("mailto:someone")?;
/// assert_eq!(resolve(&opaque, &parse_uri_reference("x")?).unwrap_err(), ErrorKind::NotABase);
/// # Ok::<_, compact_uri::ParseError>(())
/// ```
pub fn resolve<T: Bos<str>, U: Bos<str>>(
    base: &UriView<T>,
    reference: &UriView<U>,
) -> Result<Url, ErrorKind> {
    let (base, r) = (base.as_view(), reference.as_view());
    let base_scheme = match base.scheme() {
        Some(s) if base.has_authority() || base.is_path_absolute() => s,
        _ => return Err(ErrorKind::NotABase),
    };

    let r_scheme = r
        .scheme()
        .filter(|s| r.has_authority() || !s.as_str().eq_ignore_ascii_case(base_scheme.as_str()));

    let (scheme, authority, path, query);
    if r_scheme.is_some() || r.has_authority() {
        scheme = r_scheme.unwrap_or(base_scheme).as_str();
        authority = r.has_authority().then(|| r.encoded_authority());
        path = remove_dot_segments_clamped(r.encoded_path().as_str());
        query = r.encoded_query();
    } else {
        scheme = base_scheme.as_str();
        authority = base.has_authority().then(|| base.encoded_authority());
        let r_path = r.encoded_path().as_str();
        if r_path.is_empty() {
            path = remove_dot_segments_clamped(base.encoded_path().as_str());
            query = r.encoded_query().or(base.encoded_query());
        } else {
            path = if r_path.starts_with('/') {
                remove_dot_segments_clamped(r_path)
            } else {
                remove_dot_segments_clamped(&merge(&base, r_path))
            };
            query = r.encoded_query();
        }
    }
    let fragment = r.encoded_fragment();

    let mut buf = String::with_capacity(
        scheme.len()
            + authority.map_or(0, |a| a.len() + 2)
            + path.len()
            + 2
            + query.map_or(0, |q| q.len() + 1)
            + fragment.map_or(0, |f| f.len() + 1),
    );
    buf.push_str(scheme);
    buf.push(':');
    if let Some(a) = authority {
        buf.push_str("//");
        buf.push_str(a);
    } else if path.starts_with("//") {
        buf.push_str("/.");
    }
    buf.push_str(&path);
    if let Some(q) = query {
        buf.push('?');
        buf.push_str(q.as_str());
    }
    if let Some(f) = fragment {
        buf.push('#');
        buf.push_str(f.as_str());
    }

    trace!("resolved {:?} against {:?} to {:?}", r.as_str(), base.as_str(), buf);
    let table = parse_all(&buf, &UriRule)?;
    Ok(Url::from_parts(buf, table))
}

/// Appends a relative path to the directory of the base path.
fn merge(base: &UriView<&str>, r_path: &str) -> String {
    let base_path = base.encoded_path().as_str();
    if base.has_authority() && base_path.is_empty() {
        return ["/", r_path].concat();
    }
    let dir = match base_path.rfind('/') {
        Some(i) => &base_path[..=i],
        None => "",
    };
    [dir, r_path].concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_uri, parse_uri_reference};

    fn resolved(base: &str, r: &str) -> String {
        let base = parse_uri(base).unwrap();
        resolve(&base, &parse_uri_reference(r).unwrap()).unwrap().into_string()
    }

    const BASE: &str = "http://a/b/c/d;p?q";

    #[test]
    fn normal_examples() {
        for (r, expected) in [
            ("g:h", "g:h"),
            ("g", "http://a/b/c/g"),
            ("./g", "http://a/b/c/g"),
            ("g/", "http://a/b/c/g/"),
            ("/g", "http://a/g"),
            ("//g", "http://g"),
            ("?y", "http://a/b/c/d;p?y"),
            ("g?y", "http://a/b/c/g?y"),
            ("#s", "http://a/b/c/d;p?q#s"),
            ("g#s", "http://a/b/c/g#s"),
            ("g?y#s", "http://a/b/c/g?y#s"),
            (";x", "http://a/b/c/;x"),
            ("g;x", "http://a/b/c/g;x"),
            ("g;x?y#s", "http://a/b/c/g;x?y#s"),
            ("", "http://a/b/c/d;p?q"),
            (".", "http://a/b/c/"),
            ("./", "http://a/b/c/"),
            ("..", "http://a/b/"),
            ("../", "http://a/b/"),
            ("../g", "http://a/b/g"),
            ("../..", "http://a/"),
            ("../../", "http://a/"),
            ("../../g", "http://a/g"),
        ] {
            assert_eq!(resolved(BASE, r), expected, "{r}");
        }
    }

    #[test]
    fn abnormal_examples() {
        for (r, expected) in [
            ("../../../g", "http://a/g"),
            ("../../../../g", "http://a/g"),
            ("/./g", "http://a/g"),
            ("/../g", "http://a/g"),
            ("g.", "http://a/b/c/g."),
            (".g", "http://a/b/c/.g"),
            ("g..", "http://a/b/c/g.."),
            ("..g", "http://a/b/c/..g"),
            ("./../g", "http://a/b/g"),
            ("./g/.", "http://a/b/c/g/"),
            ("g/./h", "http://a/b/c/g/h"),
            ("g/../h", "http://a/b/c/h"),
            ("g;x=1/./y", "http://a/b/c/g;x=1/y"),
            ("g;x=1/../y", "http://a/b/c/y"),
            ("g?y/./x", "http://a/b/c/g?y/./x"),
            ("g?y/../x", "http://a/b/c/g?y/../x"),
            ("g#s/./x", "http://a/b/c/g#s/./x"),
            ("g#s/../x", "http://a/b/c/g#s/../x"),
            ("http:g", "http://a/b/c/g"),
            ("HTTP:g", "http://a/b/c/g"),
        ] {
            assert_eq!(resolved(BASE, r), expected, "{r}");
        }
    }

    #[test]
    fn edge_cases() {
        assert_eq!(resolved("http://a", "b"), "http://a/b");
        assert_eq!(resolved("http://a?q#f", ""), "http://a?q");
        assert_eq!(resolved("file:/x/y", "z"), "file:/x/z");
        assert_eq!(resolved("file:/x", "..//y"), "file:/.//y");
        assert_eq!(resolved("http://a/b", "https:c/../d"), "https:d");
        assert_eq!(resolved("http://a/b", "https:../d"), "https:d");
        assert_eq!(resolved("http://a/b", "https:a/../../d/."), "https:d/");
        assert_eq!(resolved("http://a/b", "https:.."), "https:");
        assert_eq!(resolved("x:/p", "//h"), "x://h");

        let url = resolve(&parse_uri("http://a/b").unwrap(), &parse_uri_reference("c?d#e").unwrap())
            .unwrap();
        assert_eq!(url.table(), parse_uri("http://a/c?d#e").unwrap().table());
    }

    #[test]
    fn not_a_base() {
        for base in ["mailto:x", "x:", "urn:a:b"] {
            let base = parse_uri(base).unwrap();
            let r = parse_uri_reference("g").unwrap();
            assert_eq!(resolve(&base, &r).unwrap_err(), ErrorKind::NotABase);
        }
        let base = parse_uri_reference("/a/b").unwrap();
        let r = parse_uri_reference("g").unwrap();
        assert_eq!(base.resolve(&r).unwrap_err(), ErrorKind::NotABase);
    }
}
