use alloc::{string::String, vec::Vec};

/// Removes the `"."` and `".."` segments of a path.
///
/// An absolute path never climbs above its root. A relative path keeps the
/// `".."` segments that climb above its start, so that resolving it against
/// a base later gives the same result as resolving the original.
/// A path that ends in a dot segment keeps a trailing `'/'`.
/// `"%2E"` and `"%2e"` count as `'.'`.
///
/// The function is idempotent. It works on encoded text and never decodes.
///
/// # Examples
///
/// ```
/// use compact_uri::remove_dot_segments;
///
/// assert_eq!(remove_dot_segments("/a/b/c/./../../g"), "/a/g");
/// assert_eq!(remove_dot_segments("mid/content=5/../6"), "mid/6");
/// assert_eq!(remove_dot_segments("/../a"), "/a");
/// assert_eq!(remove_dot_segments("../a/./.."), "../");
/// assert_eq!(remove_dot_segments("/a/%2E%2e"), "/");
/// ```
#[must_use]
pub fn remove_dot_segments(path: &str) -> String {
    remove_dots(path, false)
}

/// Like [`remove_dot_segments`], but a relative path never climbs above its
/// start either: `".."` segments with nothing left to cancel are dropped.
pub(crate) fn remove_dot_segments_clamped(path: &str) -> String {
    remove_dots(path, true)
}

fn remove_dots(path: &str, clamp: bool) -> String {
    let (absolute, rest) = match path.strip_prefix('/') {
        Some(rest) => (true, rest),
        None if path.is_empty() => return String::new(),
        None => (false, path),
    };

    let mut out: Vec<&str> = Vec::new();
    let mut trailing = false;
    for seg in rest.split('/') {
        trailing = true;
        match classify(seg) {
            Seg::Dot => {}
            Seg::DoubleDot => match out.last() {
                Some(&last) if absolute || classify(last) != Seg::DoubleDot => {
                    out.pop();
                }
                _ if absolute || clamp => {}
                _ => out.push(seg),
            },
            Seg::Normal => {
                out.push(seg);
                trailing = false;
            }
        }
    }

    let mut buf = String::with_capacity(path.len() + 2);
    if absolute {
        buf.push('/');
    } else if out.first() == Some(&"") {
        // Keep a relative path from turning absolute.
        buf.push_str("./");
    }
    for (i, seg) in out.iter().enumerate() {
        if i > 0 {
            buf.push('/');
        }
        buf.push_str(seg);
    }
    if trailing && !out.is_empty() {
        buf.push('/');
    }
    buf
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Seg {
    Dot,
    DoubleDot,
    Normal,
}

fn is_dot(s: &str) -> bool {
    matches!(s, "." | "%2E" | "%2e")
}

fn classify(seg: &str) -> Seg {
    if is_dot(seg) {
        return Seg::Dot;
    }
    for n in [1, 3] {
        if seg.len() > n && is_dot(&seg[..n]) && is_dot(&seg[n..]) {
            return Seg::DoubleDot;
        }
    }
    Seg::Normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute() {
        for (input, expected) in [
            ("/", "/"),
            ("/a/b/c/./../../g", "/a/g"),
            ("/a/..", "/"),
            ("/a/.", "/a/"),
            ("/..", "/"),
            ("/../../x", "/x"),
            ("/a/..//b", "//b"),
            ("/a//..", "/a/"),
            ("/a/b/", "/a/b/"),
            ("/.a/..b/...", "/.a/..b/..."),
            ("/a/%2e/%2E./.%2E", "/"),
        ] {
            assert_eq!(remove_dot_segments(input), expected, "{input}");
        }
    }

    #[test]
    fn relative() {
        for (input, expected) in [
            ("", ""),
            (".", ""),
            ("..", "../"),
            ("a/..", ""),
            ("../..", "../../"),
            ("a/../..", "../"),
            ("../a/../b", "../b"),
            ("./a:b", "a:b"),
            ("a/..//b", ".//b"),
            ("a/b/../c/.", "a/c/"),
        ] {
            assert_eq!(remove_dot_segments(input), expected, "{input}");
        }
    }

    #[test]
    fn relative_clamped() {
        for (input, expected) in [
            ("..", ""),
            ("../d", "d"),
            ("../../d/", "d/"),
            ("a/../../d", "d"),
            ("c/../d", "d"),
            ("%2E%2E/a/..", ""),
            ("../..//x", ".//x"),
            ("/../a", "/a"),
        ] {
            assert_eq!(remove_dot_segments_clamped(input), expected, "{input}");
        }
    }

    #[test]
    fn idempotent() {
        for input in ["/a/./b/../../..", "../../x/.", "a/..//b", "/a/..//b/..", "%2E%2E/a", ""] {
            let once = remove_dot_segments(input);
            assert_eq!(remove_dot_segments(&once), once, "{input}");
        }
    }
}
