#![no_main]
use compact_uri::{parse_uri_reference, Url};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(r) = parse_uri_reference(data) else {
        return;
    };
    let mut buf = String::with_capacity(data.len());
    if let Some(s) = r.scheme() {
        buf.push_str(s.as_str());
        buf.push(':');
    }
    if let Some(a) = r.authority() {
        buf.push_str("//");
        let start = buf.len();
        if let Some(ui) = a.encoded_userinfo() {
            buf.push_str(ui.as_str());
            buf.push('@');
        }
        buf.push_str(a.encoded_host().as_str());
        if let Some(p) = a.port() {
            buf.push(':');
            buf.push_str(p);
        }
        assert_eq!(&buf[start..], a.as_str());
        assert_eq!(a.host_type(), r.host_type());
    }
    buf.push_str(r.encoded_path().as_str());
    if let Some(q) = r.encoded_query() {
        buf.push('?');
        buf.push_str(q.as_str());
    }
    if let Some(f) = r.encoded_fragment() {
        buf.push('#');
        buf.push_str(f.as_str());
    }
    assert_eq!(data, buf);

    let segments: Vec<_> = r.segments().collect();
    assert_eq!(segments.len(), r.segments().len());
    assert_eq!(r.params().count(), r.params().len());

    let url = Url::from_view(&r);
    assert_eq!(url.table(), r.table());
    assert_eq!(*url, r);
});
