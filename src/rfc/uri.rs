use super::{
    authority::{Authority, AuthorityRule},
    path::{path, Path, PathAbemptyRule, PathAbsoluteRule, PathEmptyRule, PathNoschemeRule, PathRootlessRule},
    query::{Query, FRAGMENT_RULE, QUERY_RULE},
};
use crate::{
    grammar::{ch, charset, lit, optional, variant, Cursor, Result, Rule, Variant2, Variant4},
    pct_enc::PctStr,
    table::Table,
};

/// `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
#[derive(Clone, Copy, Debug, Default)]
pub struct SchemeRule;

impl<'a> Rule<'a> for SchemeRule {
    type Value = &'a str;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<&'a str> {
        if !cur.peek().is_some_and(|x| x.is_ascii_alphabetic()) {
            return Err(cur.unexpected());
        }
        let start = cur.pos();
        let n = charset::SCHEME.find_if_not(cur.remaining());
        cur.advance(n);
        Ok(cur.slice_from(start))
    }
}

/// The value of [`HierPartRule`] and [`RelativePartRule`].
#[derive(Clone, Debug)]
pub struct HierPart<'a> {
    /// The authority, if preceded by `"//"`.
    pub authority: Option<Authority<'a>>,
    /// The path.
    pub path: Path<'a>,
}

/// `hier-part = "//" authority path-abempty / path-absolute / path-rootless / path-empty`
#[derive(Clone, Copy, Debug, Default)]
pub struct HierPartRule;

impl<'a> Rule<'a> for HierPartRule {
    type Value = HierPart<'a>;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<HierPart<'a>> {
        let v = variant((
            (lit("//"), AuthorityRule, path(PathAbemptyRule)),
            path(PathAbsoluteRule),
            path(PathRootlessRule),
            path(PathEmptyRule),
        ))
        .parse(cur)?;
        Ok(match v {
            Variant4::V0(((), authority, path)) => HierPart {
                authority: Some(authority),
                path,
            },
            Variant4::V1(path) | Variant4::V2(path) | Variant4::V3(path) => HierPart {
                authority: None,
                path,
            },
        })
    }
}

/// `relative-part = "//" authority path-abempty / path-absolute / path-noscheme / path-empty`
#[derive(Clone, Copy, Debug, Default)]
pub struct RelativePartRule;

impl<'a> Rule<'a> for RelativePartRule {
    type Value = HierPart<'a>;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<HierPart<'a>> {
        let v = variant((
            (lit("//"), AuthorityRule, path(PathAbemptyRule)),
            path(PathAbsoluteRule),
            path(PathNoschemeRule),
            path(PathEmptyRule),
        ))
        .parse(cur)?;
        Ok(match v {
            Variant4::V0(((), authority, path)) => HierPart {
                authority: Some(authority),
                path,
            },
            Variant4::V1(path) | Variant4::V2(path) | Variant4::V3(path) => HierPart {
                authority: None,
                path,
            },
        })
    }
}

fn fold(
    scheme: Option<&str>,
    hier: &HierPart<'_>,
    query: Option<&Query<'_>>,
    fragment: Option<PctStr<'_>>,
) -> Table {
    let mut t = Table::default();
    if let Some(scheme) = scheme {
        t.apply_scheme(scheme);
    }
    if let Some(authority) = &hier.authority {
        t.apply_authority(authority);
    }
    t.apply_path(&hier.path);
    t.apply_query(query);
    t.apply_fragment(fragment);
    t
}

/// `URI = scheme ":" hier-part [ "?" query ] [ "#" fragment ]`
#[derive(Clone, Copy, Debug, Default)]
pub struct UriRule;

impl<'a> Rule<'a> for UriRule {
    type Value = Table;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<Table> {
        let (scheme, (), hier, query, fragment) = (
            SchemeRule,
            ch(b':'),
            HierPartRule,
            optional((ch(b'?'), QUERY_RULE)),
            optional((ch(b'#'), FRAGMENT_RULE)),
        )
            .parse(cur)?;
        Ok(fold(
            Some(scheme),
            &hier,
            query.as_ref().map(|(_, q)| q),
            fragment.map(|((), f)| f),
        ))
    }
}

/// `absolute-URI = scheme ":" hier-part [ "?" query ]`
#[derive(Clone, Copy, Debug, Default)]
pub struct AbsoluteUriRule;

impl<'a> Rule<'a> for AbsoluteUriRule {
    type Value = Table;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<Table> {
        let (scheme, (), hier, query) = (
            SchemeRule,
            ch(b':'),
            HierPartRule,
            optional((ch(b'?'), QUERY_RULE)),
        )
            .parse(cur)?;
        Ok(fold(Some(scheme), &hier, query.as_ref().map(|(_, q)| q), None))
    }
}

/// `relative-ref = relative-part [ "?" query ] [ "#" fragment ]`
#[derive(Clone, Copy, Debug, Default)]
pub struct RelativeRefRule;

impl<'a> Rule<'a> for RelativeRefRule {
    type Value = Table;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<Table> {
        let (hier, query, fragment) = (
            RelativePartRule,
            optional((ch(b'?'), QUERY_RULE)),
            optional((ch(b'#'), FRAGMENT_RULE)),
        )
            .parse(cur)?;
        Ok(fold(
            None,
            &hier,
            query.as_ref().map(|(_, q)| q),
            fragment.map(|((), f)| f),
        ))
    }
}

/// `URI-reference = URI / relative-ref`
#[derive(Clone, Copy, Debug, Default)]
pub struct UriReferenceRule;

impl<'a> Rule<'a> for UriReferenceRule {
    type Value = Table;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<Table> {
        match variant((UriRule, RelativeRefRule)).parse(cur)? {
            Variant2::V0(t) | Variant2::V1(t) => Ok(t),
        }
    }
}
