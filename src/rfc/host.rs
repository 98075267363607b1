use crate::{
    error::ErrorKind,
    grammar::{
        ch,
        charset::{DIGIT, HEXDIG, IPV_FUTURE, REG_NAME},
        delim, token, CharSet, Cursor, Result, Rule,
    },
    pct_enc::{pct_encoded, PctEncodedRule, PctStr},
};

/// The kind of a host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HostType {
    /// No authority is present.
    #[default]
    None,
    /// An IPv4 address.
    Ipv4,
    /// An IPv6 address in brackets.
    Ipv6,
    /// An IP address of future version in brackets.
    IpvFuture,
    /// A registered name, possibly empty.
    Name,
}

/// A parsed host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Host<'a> {
    /// An IPv4 address, in network byte order.
    Ipv4([u8; 4]),
    /// An IPv6 address, in network byte order.
    Ipv6([u8; 16]),
    /// An IP address of future version, without the brackets.
    IpvFuture(&'a str),
    /// A registered name.
    RegName(PctStr<'a>),
}

impl Host<'_> {
    /// Returns the kind of the host.
    #[must_use]
    pub fn host_type(&self) -> HostType {
        match self {
            Host::Ipv4(_) => HostType::Ipv4,
            Host::Ipv6(_) => HostType::Ipv6,
            Host::IpvFuture(_) => HostType::IpvFuture,
            Host::RegName(_) => HostType::Name,
        }
    }

    /// Returns the address bytes, IPv4 in the first four.
    pub(crate) fn address(&self) -> [u8; 16] {
        let mut buf = [0; 16];
        match self {
            Host::Ipv4(a) => buf[..4].copy_from_slice(a),
            Host::Ipv6(a) => buf = *a,
            _ => {}
        }
        buf
    }
}

/// The value of [`HostRule`]: the host and its text.
#[derive(Clone, Copy, Debug)]
pub struct ParsedHost<'a> {
    /// The host.
    pub host: Host<'a>,
    /// The host text, brackets included.
    pub raw: &'a str,
}

impl ParsedHost<'_> {
    /// Returns the decoded length of the host text.
    #[must_use]
    pub fn decoded_len(&self) -> usize {
        match self.host {
            Host::RegName(name) => name.decoded_len(),
            _ => self.raw.len(),
        }
    }
}

/// `dec-octet = DIGIT / %x31-39 DIGIT / "1" 2DIGIT / "2" %x30-34 DIGIT / "25" %x30-35`
#[derive(Clone, Copy, Debug, Default)]
pub struct DecOctetRule;

impl<'a> Rule<'a> for DecOctetRule {
    type Value = u8;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<u8> {
        let digit = |cur: &Cursor<'a>, i| cur.peek_at(i).filter(u8::is_ascii_digit).map(|x| x - b'0');

        let Some(first) = digit(cur, 0) else {
            return Err(cur.unexpected());
        };
        if first == 0 {
            cur.advance(1);
            return Ok(0);
        }

        let mut res = u32::from(first);
        let mut i = 1;
        while i < 3 {
            let Some(x) = digit(cur, i) else { break };
            res = res * 10 + u32::from(x);
            i += 1;
        }
        match u8::try_from(res) {
            Ok(x) => {
                cur.advance(i);
                Ok(x)
            }
            Err(_) => {
                let start = cur.pos();
                cur.advance(i);
                cur.reset(start);
                Err(ErrorKind::Syntax)
            }
        }
    }
}

/// `IPv4address = dec-octet "." dec-octet "." dec-octet "." dec-octet`
#[derive(Clone, Copy, Debug, Default)]
pub struct Ipv4AddressRule;

impl<'a> Rule<'a> for Ipv4AddressRule {
    type Value = [u8; 4];

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<[u8; 4]> {
        let dot = ch(b'.');
        let (a, (), b, (), c, (), d) =
            (DecOctetRule, dot, DecOctetRule, dot, DecOctetRule, dot, DecOctetRule).parse(cur)?;
        Ok([a, b, c, d])
    }
}

enum Seg {
    // *1":" 1*4HEXDIG
    Normal(u16, bool),
    // "::"
    Ellipsis,
    // *1":" 1*4HEXDIG "."
    MaybeV4(bool),
    // ":"
    SingleColon,
}

fn read_v6_segment(cur: &mut Cursor<'_>) -> Option<Seg> {
    let colon = cur.peek() == Some(b':');
    if colon {
        cur.advance(1);
    }
    let Some(first) = cur.peek() else {
        return colon.then_some(Seg::SingleColon);
    };

    let mut x = match (first as char).to_digit(16) {
        Some(v) => v as u16,
        None => {
            return colon.then(|| {
                if first == b':' {
                    cur.advance(1);
                    Seg::Ellipsis
                } else {
                    Seg::SingleColon
                }
            });
        }
    };
    let mut i = 1;

    while i < 4 {
        let Some(b) = cur.peek_at(i) else { break };
        match (b as char).to_digit(16) {
            Some(v) => {
                x = (x << 4) | v as u16;
                i += 1;
            }
            None if b == b'.' => return Some(Seg::MaybeV4(colon)),
            None => break,
        }
    }
    cur.advance(i);
    Some(Seg::Normal(x, colon))
}

fn read_v6(cur: &mut Cursor<'_>) -> Option<[u16; 8]> {
    let mut segs = [0; 8];
    let mut ellipsis_idx = 8;

    let mut i = 0;
    while i < 8 {
        match read_v6_segment(cur) {
            Some(Seg::Normal(seg, colon)) => {
                if colon == (i == 0 || i == ellipsis_idx) {
                    // Leading colon, triple colons, or no colon.
                    return None;
                }
                segs[i] = seg;
                i += 1;
            }
            Some(Seg::Ellipsis) => {
                if ellipsis_idx != 8 {
                    // Multiple ellipses.
                    return None;
                }
                ellipsis_idx = i;
            }
            Some(Seg::MaybeV4(colon)) => {
                if i > 6 || colon == (i == ellipsis_idx) {
                    // Not enough space, triple colons, or no colon.
                    return None;
                }
                let octets = Ipv4AddressRule.parse(cur).ok()?;
                segs[i] = u16::from_be_bytes([octets[0], octets[1]]);
                segs[i + 1] = u16::from_be_bytes([octets[2], octets[3]]);
                i += 2;
                break;
            }
            Some(Seg::SingleColon) => return None,
            None => break,
        }
    }

    if ellipsis_idx == 8 {
        // No ellipsis.
        if i != 8 {
            // Too short.
            return None;
        }
    } else if i == 8 {
        // Eliding nothing.
        return None;
    } else {
        // Shift the segments after the ellipsis to the right.
        for j in (ellipsis_idx..i).rev() {
            segs[8 - (i - j)] = segs[j];
            segs[j] = 0;
        }
    }

    Some(segs)
}

/// `IPv6address`, in any of the nine RFC 3986 forms.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ipv6AddressRule;

impl<'a> Rule<'a> for Ipv6AddressRule {
    type Value = [u8; 16];

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<[u8; 16]> {
        let start = cur.pos();
        match read_v6(cur) {
            Some(segs) => {
                let mut out = [0; 16];
                for (chunk, seg) in out.chunks_exact_mut(2).zip(segs) {
                    chunk.copy_from_slice(&seg.to_be_bytes());
                }
                Ok(out)
            }
            None => {
                let kind = cur.unexpected();
                cur.reset(start);
                Err(kind)
            }
        }
    }
}

/// `IPvFuture = "v" 1*HEXDIG "." 1*( unreserved / sub-delims / ":" )`
#[derive(Clone, Copy, Debug, Default)]
pub struct IpvFutureRule;

const V: CharSet = CharSet::new(b"vV");

impl<'a> Rule<'a> for IpvFutureRule {
    type Value = &'a str;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<&'a str> {
        let start = cur.pos();
        (delim(V), token(HEXDIG), ch(b'.'), token(IPV_FUTURE)).parse(cur)?;
        Ok(cur.slice_from(start))
    }
}

/// `IP-literal = "[" ( IPv6address / IPvFuture  ) "]"`
#[derive(Clone, Copy, Debug, Default)]
pub struct IpLiteralRule;

impl<'a> Rule<'a> for IpLiteralRule {
    type Value = Host<'a>;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<Host<'a>> {
        cur.attempt(|cur| {
            ch(b'[').parse(cur)?;
            let host = match cur.peek() {
                Some(b'v' | b'V') => Host::IpvFuture(IpvFutureRule.parse(cur)?),
                _ => Host::Ipv6(Ipv6AddressRule.parse(cur)?),
            };
            ch(b']').parse(cur)?;
            Ok(host)
        })
    }
}

/// `reg-name = *( unreserved / pct-encoded / sub-delims )`
pub const REG_NAME_RULE: PctEncodedRule = pct_encoded(REG_NAME);

/// `host = IP-literal / IPv4address / reg-name`
///
/// A dotted-decimal address followed by more reg-name characters is a reg-name.
#[derive(Clone, Copy, Debug, Default)]
pub struct HostRule;

impl<'a> Rule<'a> for HostRule {
    type Value = ParsedHost<'a>;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<ParsedHost<'a>> {
        let start = cur.pos();
        let host = if cur.peek() == Some(b'[') {
            IpLiteralRule.parse(cur)?
        } else {
            let mut probe = *cur;
            match Ipv4AddressRule.parse(&mut probe) {
                Ok(addr) if !probe.peek().is_some_and(|x| REG_NAME.contains(x) || x == b'%') => {
                    *cur = probe;
                    Host::Ipv4(addr)
                }
                _ => Host::RegName(REG_NAME_RULE.parse(cur)?),
            }
        };
        Ok(ParsedHost {
            host,
            raw: cur.slice_from(start),
        })
    }
}

/// The value of [`PortRule`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Port<'a> {
    /// The digits, possibly empty.
    pub raw: &'a str,
    /// The numeric value, if the digits are non-empty and fit `u16`.
    pub number: Option<u16>,
}

/// `port = *DIGIT`
#[derive(Clone, Copy, Debug, Default)]
pub struct PortRule;

impl<'a> Rule<'a> for PortRule {
    type Value = Port<'a>;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<Port<'a>> {
        let start = cur.pos();
        let n = DIGIT.find_if_not(cur.remaining());
        cur.advance(n);
        let raw = cur.slice_from(start);
        Ok(Port {
            raw,
            number: port_number(raw),
        })
    }
}

pub(crate) fn port_number(digits: &str) -> Option<u16> {
    if digits.is_empty() {
        return None;
    }
    digits.bytes().try_fold(0u16, |acc, x| {
        acc.checked_mul(10)?.checked_add(u16::from(x - b'0'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parse_all;

    #[test]
    fn ipv4() {
        assert_eq!(parse_all("127.0.0.1", &Ipv4AddressRule), Ok([127, 0, 0, 1]));
        assert_eq!(parse_all("255.255.255.255", &Ipv4AddressRule), Ok([255; 4]));
        assert!(parse_all("256.0.0.1", &Ipv4AddressRule).is_err());
        assert!(parse_all("01.0.0.1", &Ipv4AddressRule).is_err());
        assert!(parse_all("1.2.3", &Ipv4AddressRule).is_err());
        assert!(parse_all("1.2.3.4.5", &Ipv4AddressRule).is_err());
    }

    #[test]
    fn ipv6() {
        let v6 = |s| parse_all(s, &Ipv6AddressRule).ok();
        let mut lo = [0; 16];
        lo[15] = 1;
        assert_eq!(v6("::1"), Some(lo));
        assert_eq!(v6("0:0:0:0:0:0:0:1"), Some(lo));
        assert_eq!(v6("::"), Some([0; 16]));

        let mut mapped = [0; 16];
        mapped[10..].copy_from_slice(&[0xff, 0xff, 192, 0, 2, 1]);
        assert_eq!(v6("::ffff:192.0.2.1"), Some(mapped));

        let mut addr = [0; 16];
        addr[..2].copy_from_slice(&[0x20, 0x01]);
        addr[2..4].copy_from_slice(&[0x0d, 0xb8]);
        addr[15] = 1;
        assert_eq!(v6("2001:DB8::1"), Some(addr));

        assert_eq!(v6(":::"), None);
        assert_eq!(v6("1::2::3"), None);
        assert_eq!(v6("1:2:3:4:5:6:7"), None);
        assert_eq!(v6("1:2:3:4:5:6:7:8:9"), None);
        assert_eq!(v6("1:2:3:4:5:6:7::8"), None);
        assert_eq!(v6(":1::"), None);
        assert_eq!(v6("12345::"), None);
        assert_eq!(v6("::1.2.3"), None);
    }

    #[test]
    fn host_tie_break() {
        let host = |s| parse_all(s, &HostRule).map(|h| h.host.host_type()).ok();
        assert_eq!(host("1.2.3.4"), Some(HostType::Ipv4));
        assert_eq!(host("1.2.3.4.5"), Some(HostType::Name));
        assert_eq!(host("1.2.3.256"), Some(HostType::Name));
        assert_eq!(host("1.2.3.4%41"), Some(HostType::Name));
        assert_eq!(host("example.com"), Some(HostType::Name));
        assert_eq!(host(""), Some(HostType::Name));
        assert_eq!(host("[::1]"), Some(HostType::Ipv6));
        assert_eq!(host("[v7.x:y]"), Some(HostType::IpvFuture));
        assert_eq!(host("[V7.x]"), Some(HostType::IpvFuture));
        assert_eq!(host("[v7.]"), None);
        assert_eq!(host("[::1"), None);
        assert_eq!(host("[1.2.3.4]"), None);
        assert_eq!(host("a b"), None);

        let h = parse_all("[vF.a:b]", &HostRule).unwrap();
        assert_eq!(h.host, Host::IpvFuture("vF.a:b"));
        assert_eq!(h.raw, "[vF.a:b]");
    }

    #[test]
    fn ports() {
        let port = |s| parse_all(s, &PortRule).map(|p| p.number);
        assert_eq!(port(""), Ok(None));
        assert_eq!(port("0"), Ok(Some(0)));
        assert_eq!(port("443"), Ok(Some(443)));
        assert_eq!(port("0080"), Ok(Some(80)));
        assert_eq!(port("65535"), Ok(Some(65535)));
        assert_eq!(port("65536"), Ok(None));
        assert_eq!(port("99999999999"), Ok(None));
        assert!(port("x").is_err());
        assert!(port("80x").is_err());
        assert!(port(":443").is_err());
    }
}
