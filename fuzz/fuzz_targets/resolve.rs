#![no_main]
use compact_uri::{parse_uri_reference, remove_dot_segments};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, &str)| {
    let (Ok(base), Ok(r)) = (parse_uri_reference(data.0), parse_uri_reference(data.1)) else {
        return;
    };

    let Ok(u1) = base.resolve(&r) else { return };
    let u2 = parse_uri_reference(u1.as_str()).unwrap();
    assert_eq!(u1.table(), u2.table());

    assert!(u1.has_scheme());
    assert_eq!(u1.encoded_fragment(), r.encoded_fragment());

    // The result has no dot segments left to remove.
    let path = u1.encoded_path().as_str();
    if u1.is_path_absolute() && !path.starts_with("/./") {
        assert_eq!(remove_dot_segments(path), path);
    }
});
