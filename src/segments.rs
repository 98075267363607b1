use crate::{
    error::ErrorKind,
    grammar::charset::PCHAR,
    list::{self, Split},
    pct_enc::{self, PctStr},
    url::Url,
};
use alloc::string::String;
use core::{iter::FusedIterator, ops::Range};

/// An iterator over the segments of a path.
///
/// Created by [`UriView::segments`](crate::UriView::segments). The leading
/// `'/'` of an absolute path precedes the first segment, so `"/"` has
/// none and `"/a/"` has two, the second being empty.
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    inner: Split<'a>,
    absolute: bool,
}

impl<'a> Segments<'a> {
    pub(crate) fn new(path: &'a str, count: usize) -> Self {
        let (absolute, region) = match path.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, path),
        };
        Self {
            inner: Split::new(region, b'/', count),
            absolute,
        }
    }

    /// Checks whether the path starts with `'/'`.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = PctStr<'a>;

    fn next(&mut self) -> Option<PctStr<'a>> {
        self.inner.next().map(PctStr::new_validated)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.inner.len(), Some(self.inner.len()))
    }
}

impl DoubleEndedIterator for Segments<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(PctStr::new_validated)
    }
}

impl ExactSizeIterator for Segments<'_> {}

impl FusedIterator for Segments<'_> {}

/// A proxy that edits the path segments of a [`Url`].
///
/// Created by [`Url::segments_mut`]. Segments are given decoded and are
/// percent-encoded on the way in, `'/'` included. The path keeps its leading
/// `'/'`, if any, through every edit, and the prefixes that keep the path
/// valid are added as for [`Url::set_encoded_path`].
///
/// # Examples
///
/// ```
/// use compact_uri::Url;
///
/// let mut url = Url::parse("http://h/a/b/c?q")?;
/// let mut segs = url.segments_mut();
/// segs.erase(1)?;
/// segs.push("d/e")?;
/// segs.insert(0, "z")?;
/// assert_eq!(url.as_str(), "http://h/z/a/c/d%2Fe?q");
///
/// url.segments_mut().clear();
/// assert_eq!(url.as_str(), "http://h/?q");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct SegmentsMut<'u> {
    url: &'u mut Url,
}

impl<'u> SegmentsMut<'u> {
    pub(crate) fn new(url: &'u mut Url) -> Self {
        Self { url }
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.url.table().segment_count()
    }

    /// Checks whether there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the segments.
    pub fn iter(&self) -> Segments<'_> {
        self.url.segments()
    }

    /// Returns the segment at index `i`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<PctStr<'_>> {
        self.iter().nth(i)
    }

    /// Returns the segment at index `i`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`](ErrorKind::OutOfRange) if `i >= self.len()`.
    pub fn get_or_err(&self, i: usize) -> Result<PctStr<'_>, ErrorKind> {
        self.get(i).ok_or(ErrorKind::OutOfRange)
    }

    fn splice(&mut self, Range { start, end }: Range<usize>, new: &str, k: usize) -> Result<(), ErrorKind> {
        let n = self.len();
        if start > end || end > n {
            return Err(ErrorKind::OutOfRange);
        }
        trace!("splicing {} segments over {}..{} of {}", k, start, end, n);
        let path = self.url.encoded_path().as_str();
        let (root, region) = match path.strip_prefix('/') {
            Some(rest) => ("/", rest),
            None => ("", path),
        };
        let path = if n == 0 {
            if k == 0 {
                return Ok(());
            }
            [root, new].concat()
        } else {
            [root, list::splice(region, b'/', n, (start, end), new, k).as_str()].concat()
        };
        self.url.write_path(&path)
    }

    /// Inserts a segment before index `i`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`](ErrorKind::OutOfRange) if `i > self.len()`,
    /// and [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn insert(&mut self, i: usize, segment: &str) -> Result<&mut Self, ErrorKind> {
        self.splice(i..i, &pct_enc::encode(segment, PCHAR), 1)?;
        Ok(self)
    }

    /// Appends a segment.
    ///
    /// # Errors
    ///
    /// Returns [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn push(&mut self, segment: &str) -> Result<&mut Self, ErrorKind> {
        let n = self.len();
        self.insert(n, segment)
    }

    /// Erases the segment at index `i`.
    ///
    /// An absolute path left with a single empty segment collapses into
    /// the root, which has no segments: erasing one segment of `"//"` gives
    /// `"/"`, and `len()` drops by two.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`](ErrorKind::OutOfRange) if `i >= self.len()`.
    pub fn erase(&mut self, i: usize) -> Result<&mut Self, ErrorKind> {
        if i >= self.len() {
            return Err(ErrorKind::OutOfRange);
        }
        self.erase_range(i..i + 1)
    }

    /// Erases the segments in a range of indexes.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`](ErrorKind::OutOfRange) if the range is not within `0..self.len()`,
    /// and [`LengthExceeded`](ErrorKind::LengthExceeded) if a prefix the path
    /// needs makes the result too long.
    pub fn erase_range(&mut self, range: Range<usize>) -> Result<&mut Self, ErrorKind> {
        self.splice(range, "", 0)?;
        Ok(self)
    }

    /// Replaces the segment at index `i`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`](ErrorKind::OutOfRange) if `i >= self.len()`,
    /// and [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn replace(&mut self, i: usize, segment: &str) -> Result<&mut Self, ErrorKind> {
        if i >= self.len() {
            return Err(ErrorKind::OutOfRange);
        }
        self.replace_range(i..i + 1, [segment])
    }

    /// Replaces the segments in a range of indexes with new ones.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`](ErrorKind::OutOfRange) if the range is not within `0..self.len()`,
    /// and [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn replace_range<'s, I>(&mut self, range: Range<usize>, segments: I) -> Result<&mut Self, ErrorKind>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut new = String::new();
        let mut k = 0;
        for seg in segments {
            if k > 0 {
                new.push('/');
            }
            pct_enc::encode_into(&mut new, seg.as_bytes(), PCHAR);
            k += 1;
        }
        self.splice(range, &new, k)?;
        Ok(self)
    }

    /// Removes every segment, keeping the leading `'/'` of an absolute path.
    pub fn clear(&mut self) -> &mut Self {
        self.url.truncate_path();
        self
    }

    /// Replaces every segment with new ones.
    ///
    /// # Errors
    ///
    /// Returns [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn assign<'s, I>(&mut self, segments: I) -> Result<&mut Self, ErrorKind>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let n = self.len();
        self.replace_range(0..n, segments)
    }
}
