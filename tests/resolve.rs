use compact_uri::{parse_uri, parse_uri_reference, resolve, ErrorKind, Url, UriView};

#[track_caller]
fn pass(base: &str, r: &str, expected: &str) {
    let base = parse_uri(base).unwrap();
    let r = parse_uri_reference(r).unwrap();
    let url = resolve(&base, &r).unwrap();
    assert_eq!(url.as_str(), expected);
    assert_eq!(url.table(), parse_uri(expected).unwrap().table());
}

#[test]
fn rfc_examples() {
    // Section 5.4 of RFC 3986.
    let base = "http://a/b/c/d;p?q";

    pass(base, "g:h", "g:h");
    pass(base, "g", "http://a/b/c/g");
    pass(base, "./g", "http://a/b/c/g");
    pass(base, "g/", "http://a/b/c/g/");
    pass(base, "/g", "http://a/g");
    pass(base, "//g", "http://g");
    pass(base, "?y", "http://a/b/c/d;p?y");
    pass(base, "g?y", "http://a/b/c/g?y");
    pass(base, "#s", "http://a/b/c/d;p?q#s");
    pass(base, "g#s", "http://a/b/c/g#s");
    pass(base, "g?y#s", "http://a/b/c/g?y#s");
    pass(base, ";x", "http://a/b/c/;x");
    pass(base, "g;x", "http://a/b/c/g;x");
    pass(base, "g;x?y#s", "http://a/b/c/g;x?y#s");
    pass(base, "", "http://a/b/c/d;p?q");
    pass(base, ".", "http://a/b/c/");
    pass(base, "./", "http://a/b/c/");
    pass(base, "..", "http://a/b/");
    pass(base, "../", "http://a/b/");
    pass(base, "../g", "http://a/b/g");
    pass(base, "../..", "http://a/");
    pass(base, "../../", "http://a/");
    pass(base, "../../g", "http://a/g");

    pass(base, "../../../g", "http://a/g");
    pass(base, "../../../../g", "http://a/g");
    pass(base, "/./g", "http://a/g");
    pass(base, "/../g", "http://a/g");
    pass(base, "g.", "http://a/b/c/g.");
    pass(base, ".g", "http://a/b/c/.g");
    pass(base, "g..", "http://a/b/c/g..");
    pass(base, "..g", "http://a/b/c/..g");
    pass(base, "./../g", "http://a/b/g");
    pass(base, "./g/.", "http://a/b/c/g/");
    pass(base, "g/./h", "http://a/b/c/g/h");
    pass(base, "g/../h", "http://a/b/c/h");
    pass(base, "g;x=1/./y", "http://a/b/c/g;x=1/y");
    pass(base, "g;x=1/../y", "http://a/b/c/y");
    pass(base, "g?y/./x", "http://a/b/c/g?y/./x");
    pass(base, "g?y/../x", "http://a/b/c/g?y/../x");
    pass(base, "g#s/./x", "http://a/b/c/g#s/./x");
    pass(base, "g#s/../x", "http://a/b/c/g#s/../x");
    pass(base, "http:g", "http://a/b/c/g");
    pass(base, "HTTP:g", "http://a/b/c/g");
}

#[test]
fn base_without_authority() {
    pass("foo:/a/b", "c", "foo:/a/c");
    pass("foo:/a/b", "../../c", "foo:/c");
    pass("foo:/", ".//x", "foo:/.//x");
    pass("foo:/a", "//h/../x", "foo://h/x");
}

#[test]
fn base_with_empty_path() {
    pass("http://h", "x", "http://h/x");
    pass("http://h", "", "http://h");
    pass("http://h?q", "#f", "http://h?q#f");
    pass("http://h?q", "?", "http://h?");
}

#[test]
fn base_needs_dot_segment_removal() {
    pass("http://a/b/../c", "", "http://a/c");
    pass("http://a/./b", "d", "http://a/d");
}

#[test]
fn other_scheme_relative_path() {
    pass("http://a/b", "https:../d", "https:d");
    pass("http://a/b", "https:c/../../d", "https:d");
    pass("http://a/b", "https:./x:y/..", "https:");
    pass("http://a/b", "https:../..//e", "https:.//e");
}

#[test]
fn not_a_base() {
    let r = parse_uri_reference("x").unwrap();
    for base in ["//h/p", "/p", "p", "mailto:a@b", "urn:x:y", ""] {
        let base = parse_uri_reference(base).unwrap();
        assert_eq!(resolve(&base, &r).unwrap_err(), ErrorKind::NotABase);
    }
}

#[test]
fn owned_and_edited() {
    let base = Url::parse("https://example.com/docs/guide/").unwrap();
    let r: UriView<String> = parse_uri_reference("../api?v=2").unwrap().to_owned();
    let mut url = base.resolve(&r).unwrap();
    assert_eq!(url.as_str(), "https://example.com/docs/api?v=2");

    url.set_fragment("top").unwrap();
    let again = url.resolve(&parse_uri_reference("#bottom").unwrap()).unwrap();
    assert_eq!(again.as_str(), "https://example.com/docs/api?v=2#bottom");

    let persisted = parse_uri("s://h/a/b").unwrap().persist();
    let out = persisted.view().resolve(&parse_uri_reference("c").unwrap()).unwrap();
    assert_eq!(*out, parse_uri("s://h/a/c").unwrap());
}
