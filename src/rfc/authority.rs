use super::host::{HostRule, ParsedHost, Port, PortRule};
use crate::{
    grammar::{
        ch,
        charset::{PASSWORD, USER},
        optional, Cursor, Result, Rule,
    },
    pct_enc::{pct_encoded, PctStr},
};

/// The value of [`UserinfoRule`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Userinfo<'a> {
    /// The user, up to the first `':'`.
    pub user: PctStr<'a>,
    /// The password after the first `':'`, if any.
    pub password: Option<PctStr<'a>>,
}

/// `userinfo = user [ ":" password ]`
#[derive(Clone, Copy, Debug, Default)]
pub struct UserinfoRule;

impl<'a> Rule<'a> for UserinfoRule {
    type Value = Userinfo<'a>;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<Userinfo<'a>> {
        let (user, password) =
            (pct_encoded(USER), optional((ch(b':'), pct_encoded(PASSWORD)))).parse(cur)?;
        Ok(Userinfo {
            user,
            password: password.map(|((), pw)| pw),
        })
    }
}

/// The value of [`AuthorityRule`].
#[derive(Clone, Copy, Debug)]
pub struct Authority<'a> {
    /// The userinfo, if followed by `'@'`.
    pub userinfo: Option<Userinfo<'a>>,
    /// The host.
    pub host: ParsedHost<'a>,
    /// The port, if preceded by `':'`.
    pub port: Option<Port<'a>>,
    /// The authority text.
    pub raw: &'a str,
}

/// `authority = [ userinfo "@" ] host [ ":" port ]`
#[derive(Clone, Copy, Debug, Default)]
pub struct AuthorityRule;

impl<'a> Rule<'a> for AuthorityRule {
    type Value = Authority<'a>;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<Authority<'a>> {
        let start = cur.pos();
        let (userinfo, host, port) = (
            optional((UserinfoRule, ch(b'@'))),
            HostRule,
            optional((ch(b':'), PortRule)),
        )
            .parse(cur)?;
        Ok(Authority {
            userinfo: userinfo.map(|(ui, ())| ui),
            host,
            port: port.map(|((), p)| p),
            raw: cur.slice_from(start),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        grammar::parse_all,
        rfc::{Host, HostType},
    };

    #[test]
    fn userinfo() {
        let ui = parse_all("us%65r:pa:ss", &UserinfoRule).unwrap();
        assert_eq!(ui.user, "user");
        assert_eq!(ui.password.unwrap(), "pa:ss");

        let ui = parse_all("user", &UserinfoRule).unwrap();
        assert!(ui.password.is_none());

        let ui = parse_all("user:", &UserinfoRule).unwrap();
        assert_eq!(ui.password.map(|p| p.len()), Some(0));
    }

    #[test]
    fn authority() {
        let a = parse_all("u:p@example.com:8080", &AuthorityRule).unwrap();
        assert_eq!(a.userinfo.unwrap().user, "u");
        assert_eq!(a.host.raw, "example.com");
        assert_eq!(a.port.unwrap().number, Some(8080));
        assert_eq!(a.raw, "u:p@example.com:8080");

        let a = parse_all("host:80", &AuthorityRule).unwrap();
        assert!(a.userinfo.is_none());
        assert_eq!(a.host.raw, "host");
        assert_eq!(a.port.unwrap().raw, "80");

        let a = parse_all("[::1]:", &AuthorityRule).unwrap();
        assert_eq!(a.host.host.host_type(), HostType::Ipv6);
        assert_eq!(a.port.unwrap().raw, "");
        assert_eq!(a.port.unwrap().number, None);

        let a = parse_all("", &AuthorityRule).unwrap();
        assert_eq!(a.host.host, Host::RegName(PctStr::EMPTY));

        let e = parse_all("a@b@c", &AuthorityRule).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Syntax);
        assert!(parse_all("host:8x", &AuthorityRule).is_err());
    }
}
