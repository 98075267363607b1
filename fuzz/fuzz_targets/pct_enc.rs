#![no_main]
use compact_uri::{
    grammar::charset::{PCHAR, QUERY, UNRESERVED},
    pct_enc::{self, PctStr},
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    for cs in [UNRESERVED, PCHAR, QUERY] {
        let enc = pct_enc::encode(data, cs);
        assert_eq!(enc.len(), pct_enc::encoded_len(data.as_bytes(), cs));
        assert_eq!(pct_enc::validate(enc.as_bytes(), cs), Ok(data.len()));

        let s = PctStr::new(&enc).unwrap();
        assert_eq!(s.decoded_len(), data.len());
        assert_eq!(s.decode_utf8().unwrap(), data);
        assert_eq!(s, data);
    }

    if let Ok(s) = PctStr::new(data) {
        assert_eq!(s.decoded_len(), pct_enc::decoded_len_unchecked(data.as_bytes()));
        assert_eq!(s.bytes().count(), s.decoded_len());
    }
});
