use crate::{
    error::ErrorKind,
    grammar::{
        ch,
        charset::{FRAGMENT, PARAM_KEY, PARAM_VALUE},
        optional, range, Cursor, Range, RangeOf, RangeRule, Result, Rule,
    },
    pct_enc::{pct_encoded, PctEncodedRule, PctStr},
};

/// A query parameter.
///
/// A missing `'='` is "no value", which is distinct from an empty value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct QueryParam<'a> {
    /// The key, before the first `'='`.
    pub key: PctStr<'a>,
    /// The value after the first `'='`, if any.
    pub value: Option<PctStr<'a>>,
}

impl<'a> QueryParam<'a> {
    /// Splits a validated parameter text on its first `'='`.
    pub(crate) fn from_validated(s: &'a str) -> Self {
        match s.split_once('=') {
            Some((k, v)) => Self {
                key: PctStr::new_validated(k),
                value: Some(PctStr::new_validated(v)),
            },
            None => Self {
                key: PctStr::new_validated(s),
                value: None,
            },
        }
    }
}

/// A parsed query: its text, its parameter count and the parameters.
pub type Query<'a> = Range<'a, QueryParam<'a>>;

fn param<'a>(cur: &mut Cursor<'a>) -> Result<QueryParam<'a>> {
    let (key, value) =
        (pct_encoded(PARAM_KEY), optional((ch(b'='), pct_encoded(PARAM_VALUE)))).parse(cur)?;
    Ok(QueryParam {
        key,
        value: value.map(|((), v)| v),
    })
}

/// `query = *( pchar / "/" / "?" )`, read as `param *( "&" param )`
/// with `param = key [ "=" value ]`.
///
/// An empty query holds a single empty parameter.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryParamsRule;

impl<'a> RangeRule<'a> for QueryParamsRule {
    type Value = QueryParam<'a>;

    fn begin(&self, cur: &mut Cursor<'a>) -> Result<QueryParam<'a>> {
        param(cur)
    }

    fn increment(&self, cur: &mut Cursor<'a>) -> Result<QueryParam<'a>> {
        if cur.peek() != Some(b'&') {
            return Err(ErrorKind::EndOfRange);
        }
        cur.attempt(|cur| {
            cur.advance(1);
            param(cur)
        })
    }
}

/// Matches a query.
pub const QUERY_RULE: RangeOf<QueryParamsRule> = range(QueryParamsRule, 1, usize::MAX);

/// `fragment = *( pchar / "/" / "?" )`
pub const FRAGMENT_RULE: PctEncodedRule = pct_encoded(FRAGMENT);

/// Counts the parameters of a query text, `'?'` excluded.
pub(crate) fn count_params(query: &str) -> usize {
    query.bytes().filter(|&x| x == b'&').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parse_all;
    use alloc::vec::Vec;

    #[test]
    fn params() {
        let q = parse_all("a=1&b&c=&=d&&", &QUERY_RULE).unwrap();
        assert_eq!(q.len(), 6);
        assert_eq!(q.len(), count_params(q.as_str()));
        let ps: Vec<_> = q
            .iter()
            .map(|p| (p.key.as_str(), p.value.map(|v| v.as_str())))
            .collect();
        assert_eq!(
            ps,
            [
                ("a", Some("1")),
                ("b", None),
                ("c", Some("")),
                ("", Some("d")),
                ("", None),
                ("", None),
            ]
        );
    }

    #[test]
    fn empty_and_invalid() {
        let q = parse_all("", &QUERY_RULE).unwrap();
        assert_eq!(q.len(), 1);
        assert_eq!(q.iter().next(), Some(QueryParam::default()));

        assert!(parse_all("a=b=c?/", &QUERY_RULE).is_ok());
        assert!(parse_all("a#b", &QUERY_RULE).is_err());
        assert!(parse_all("%zz", &QUERY_RULE).is_err());
    }

    #[test]
    fn from_text() {
        let p = QueryParam::from_validated("k%3D=v=w");
        assert_eq!(p.key, "k=");
        assert_eq!(p.value.unwrap(), "v=w");
        assert_eq!(QueryParam::from_validated("k").value, None);
    }
}
