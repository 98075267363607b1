#![no_main]
use compact_uri::{parse_uri_reference, Url};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, u8, &str)| {
    let (text, op, arg) = data;
    let Ok(mut url) = Url::parse(text) else {
        return;
    };
    let before = url.clone();

    let res = match op % 16 {
        0 => url.set_scheme(arg).map(drop),
        1 => url.set_encoded_authority(arg).map(drop),
        2 => url.set_encoded_userinfo(arg).map(drop),
        3 => url.set_userinfo(arg).map(drop),
        4 => url.set_encoded_host(arg).map(drop),
        5 => url.set_host(arg).map(drop),
        6 => url.set_encoded_port(arg).map(drop),
        7 => url.set_encoded_path(arg).map(drop),
        8 => url.set_path(arg).map(drop),
        9 => url.set_encoded_query(arg).map(drop),
        10 => url.set_query(arg).map(drop),
        11 => url.set_fragment(arg).map(drop),
        12 => url.params_mut().push(arg, Some(arg)).map(drop),
        13 => url.segments_mut().push(arg).map(drop),
        14 => url.segments_mut().insert(0, arg).map(drop),
        _ => {
            url.remove_scheme().remove_authority().remove_query();
            Ok(())
        }
    };

    if res.is_err() {
        // A rejected edit leaves the text and the table as they were.
        assert_eq!(url.as_str(), before.as_str());
        assert_eq!(url.table(), before.table());
        return;
    }

    let reparsed = parse_uri_reference(url.as_str()).unwrap();
    assert_eq!(url.table(), reparsed.table());
});
