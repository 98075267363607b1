use compact_uri::{parse_uri_reference, Component, ErrorKind, HostType, SchemeId, Url};

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

/// Checks the text, and that the table matches a fresh parse of it.
#[track_caller]
fn check(u: &Url, expected: &str) {
    assert_eq!(u.as_str(), expected);
    assert_eq!(u.table(), parse_uri_reference(expected).unwrap().table());
}

#[test]
fn build_from_empty() {
    let mut u = Url::new();
    assert!(u.is_empty());
    u.set_scheme("https").unwrap();
    check(&u, "https:");
    u.set_host("example.com").unwrap();
    check(&u, "https://example.com");
    u.set_port(8443).unwrap();
    u.set_path("/a b/c").unwrap();
    u.set_query("k=v w").unwrap();
    u.set_fragment("top").unwrap();
    check(&u, "https://example.com:8443/a%20b/c?k=v%20w#top");
    assert_eq!(u.scheme_id(), SchemeId::Https);
    assert_eq!(u.port_number(), Some(8443));
    assert_eq!(u.segments().len(), 2);
    assert_eq!(u.params().len(), 1);
}

#[test]
fn later_components_shift() {
    let mut u = url("http://user@host:8080/a/b?q=1#f");
    let before = *u.table();
    u.set_encoded_path("/longer/path/here").unwrap();
    check(&u, "http://user@host:8080/longer/path/here?q=1#f");

    let delta = u.len() - before.total_len();
    for c in [Component::Scheme, Component::User, Component::Password, Component::Host, Component::Port] {
        assert_eq!(u.table().offset(c), before.offset(c));
        assert_eq!(u.table().len(c), before.len(c));
    }
    for c in [Component::Query, Component::Fragment] {
        assert_eq!(u.table().offset(c), before.offset(c) + delta);
        assert_eq!(u.table().len(c), before.len(c));
    }
}

#[test]
fn rejected_edits_change_nothing() {
    let text = "http://u:p@h:1/p?q#f";
    let mut u = url(text);

    assert_eq!(u.set_scheme("1http").unwrap_err(), ErrorKind::Syntax);
    assert!(u.set_encoded_authority("a b").is_err());
    assert!(u.set_encoded_userinfo("a@b").is_err());
    assert!(u.set_encoded_host("[::1").is_err());
    assert!(u.set_encoded_port("8o").is_err());
    assert!(u.set_encoded_path("/a?b").is_err());
    assert!(u.set_encoded_path("/%zz").is_err());
    assert_eq!(u.set_encoded_query("%4").unwrap_err(), ErrorKind::Incomplete);
    assert!(u.set_encoded_fragment("a#b").is_err());
    check(&u, text);
}

#[test]
fn authority_parts() {
    let mut u = url("x:/p");
    u.set_encoded_authority("u:pw@[::1]:99").unwrap();
    check(&u, "x://u:pw@[::1]:99/p");
    assert_eq!(u.host_type(), HostType::Ipv6);
    assert_eq!(u.encoded_password().unwrap(), "pw");

    u.remove_userinfo();
    check(&u, "x://[::1]:99/p");
    u.set_userinfo("a b:c:d").unwrap();
    check(&u, "x://a%20b:c:d@[::1]:99/p");
    assert_eq!(u.encoded_user(), "a b");
    assert_eq!(u.encoded_password().unwrap(), "c:d");

    u.set_host("10.0.0.1").unwrap();
    assert_eq!(u.host_type(), HostType::Ipv4);
    u.set_host("ex ample").unwrap();
    check(&u, "x://a%20b:c:d@ex%20ample:99/p");
    assert_eq!(u.host_type(), HostType::Name);

    u.remove_port();
    u.set_encoded_port("").unwrap();
    check(&u, "x://a%20b:c:d@ex%20ample:/p");
    assert!(u.has_port());
    assert_eq!(u.port_number(), None);

    u.remove_authority();
    check(&u, "x:/p");
    assert_eq!(u.host_type(), HostType::None);
}

#[test]
fn adding_authority_roots_path() {
    let mut u = url("mailto:a@b");
    u.set_encoded_host("h").unwrap();
    check(&u, "mailto://h/a@b");

    let mut u = url("x:p");
    u.set_port(1).unwrap();
    check(&u, "x://:1/p");

    let mut u = url("x:p");
    u.set_encoded_userinfo("me").unwrap();
    check(&u, "x://me@/p");
}

#[test]
fn removals_keep_path_valid() {
    let mut u = url("http://h//x");
    u.remove_authority();
    check(&u, "http:/.//x");

    let mut u = url("a:b:c");
    u.remove_scheme();
    check(&u, "./b:c");

    let mut u = url("//h/p");
    u.remove_scheme().remove_authority();
    check(&u, "/p");

    let mut u = url("s:x");
    u.set_encoded_path("//y").unwrap();
    check(&u, "s:/.//y");
    u.set_encoded_path("").unwrap();
    check(&u, "s:");
}

#[test]
fn query_and_fragment() {
    let mut u = url("http://h/p");
    u.set_encoded_query("").unwrap();
    check(&u, "http://h/p?");
    assert_eq!(u.params().len(), 1);
    u.set_query("a=1&b=#").unwrap();
    check(&u, "http://h/p?a=1&b=%23");
    assert_eq!(u.params().get("b").unwrap().value.unwrap(), "#");

    u.set_encoded_fragment("x?y/z").unwrap();
    check(&u, "http://h/p?a=1&b=%23#x?y/z");
    u.remove_query();
    check(&u, "http://h/p#x?y/z");
    u.remove_fragment();
    check(&u, "http://h/p");
}

#[test]
fn normalize_path_and_clear() {
    let mut u = url("http://h/a/./b/../../../c/.?q");
    u.normalize_path().unwrap();
    check(&u, "http://h/c/?q");

    let mut u = url("a/../b:c");
    u.normalize_path().unwrap();
    check(&u, "./b:c");

    let cap = u.capacity();
    u.clear();
    check(&u, "");
    assert_eq!(u.capacity(), cap);
}

#[test]
fn buffer_growth() {
    let mut u = Url::new();
    u.reserve(10).unwrap();
    assert!(u.capacity() >= 10);
    let cap = u.capacity();
    u.reserve(cap + 1).unwrap();
    assert!(u.capacity() >= cap + cap / 2);
    assert_eq!(u.reserve(usize::MAX).unwrap_err(), ErrorKind::LengthExceeded);
}

#[test]
fn from_str_and_conversions() {
    let u: Url = "http://h/p".parse().unwrap();
    assert_eq!(String::from(u.clone()), "http://h/p");
    assert_eq!("a b".parse::<Url>().unwrap_err(), ErrorKind::InvalidArgument);

    let v = parse_uri_reference("s://h?q").unwrap();
    let mut u = Url::from(v);
    u.set_scheme("t").unwrap();
    assert_eq!(v.as_str(), "s://h?q");
    check(&u, "t://h?q");
}
