#![cfg(feature = "net")]

use std::net::{Ipv4Addr, Ipv6Addr};

use compact_uri::{parse_uri_reference, HostType};

fn parse_v4(s: &str) -> Option<Ipv4Addr> {
    let s = format!("//{s}");
    parse_uri_reference(&s).ok()?.ipv4_address()
}

fn parse_v6(s: &str) -> Option<Ipv6Addr> {
    let s = format!("//[{s}]");
    parse_uri_reference(&s).ok()?.ipv6_address()
}

#[test]
fn ipv4() {
    assert_eq!(parse_v4("0.0.0.0"), Some(Ipv4Addr::UNSPECIFIED));
    assert_eq!(parse_v4("127.0.0.1"), Some(Ipv4Addr::LOCALHOST));
    assert_eq!(parse_v4("255.255.255.255"), Some(Ipv4Addr::BROADCAST));
    assert_eq!(parse_v4("10.199.20.5"), Some(Ipv4Addr::new(10, 199, 20, 5)));

    // Registered names that look like addresses.
    for s in ["256.0.0.1", "01.2.3.4", "1.2.3", "1.2.3.4.5", "1.2.3.4a", "1.2.3.%34", ""] {
        assert_eq!(parse_v4(s), None, "{s}");
        let uri = format!("//{s}");
        assert_eq!(parse_uri_reference(&uri).unwrap().host_type(), HostType::Name, "{s}");
    }
}

#[test]
fn ipv6() {
    let cases = [
        ("::", Ipv6Addr::UNSPECIFIED),
        ("::1", Ipv6Addr::LOCALHOST),
        ("1::", Ipv6Addr::new(1, 0, 0, 0, 0, 0, 0, 0)),
        ("1:2:3:4:5:6:7:8", Ipv6Addr::new(1, 2, 3, 4, 5, 6, 7, 8)),
        ("1:2:3:4:5:6::8", Ipv6Addr::new(1, 2, 3, 4, 5, 6, 0, 8)),
        ("1::4:5:6:7:8", Ipv6Addr::new(1, 0, 0, 4, 5, 6, 7, 8)),
        ("2001:DB8::ff00:42:8329", Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0xff00, 0x42, 0x8329)),
        ("::ffff:192.0.2.128", Ipv6Addr::new(0, 0, 0, 0, 0, 0xffff, 0xc000, 0x280)),
        ("1:2:3:4:5:6:1.2.3.4", Ipv6Addr::new(1, 2, 3, 4, 5, 6, 0x102, 0x304)),
        ("::1.2.3.4", Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0x102, 0x304)),
    ];
    for (s, addr) in cases {
        assert_eq!(parse_v6(s), Some(addr), "{s}");
    }

    for s in [
        "",
        ":",
        ":::",
        "1:2:3:4:5:6:7",
        "1:2:3:4:5:6:7:8:9",
        "1:2:3:4:5:6:7::8",
        "1::2::3",
        ":1::",
        "1::2:",
        "12345::",
        "1:2:3:4:5:6:7:1.2.3.4",
        "::1.2.3",
        "::1.2.3.4:5",
        "g::",
    ] {
        assert_eq!(parse_v6(s), None, "{s}");
        assert!(parse_uri_reference(&format!("//[{s}]")).is_err(), "{s}");
    }
}

#[test]
fn non_ip_hosts() {
    let uri = parse_uri_reference("//example.com").unwrap();
    assert_eq!(uri.ipv4_address(), None);
    assert_eq!(uri.ipv6_address(), None);
    let uri = parse_uri_reference("//[v1.x]").unwrap();
    assert_eq!(uri.ipv6_address(), None);
}
