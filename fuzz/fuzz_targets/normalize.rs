#![no_main]
use compact_uri::{parse_uri_reference, Url};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(mut url) = Url::parse(data) else {
        return;
    };
    url.normalize().unwrap();

    let reparsed = parse_uri_reference(url.as_str()).unwrap();
    assert_eq!(url.table(), reparsed.table());
    assert_eq!(url.has_scheme(), reparsed.has_scheme());
    assert_eq!(url.host_type(), reparsed.host_type());

    // Normalization is idempotent.
    let once = url.clone();
    url.normalize().unwrap();
    assert_eq!(url.as_str(), once.as_str());
});
