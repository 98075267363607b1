use crate::{
    error::ErrorKind,
    grammar::charset::{PARAM_KEY, PARAM_VALUE},
    list::{self, Split},
    pct_enc,
    rfc::QueryParam,
    url::Url,
};
use alloc::string::String;
use core::{iter::FusedIterator, ops::Range};

/// An iterator over the parameters of a query.
///
/// Created by [`UriView::params`](crate::UriView::params). Parameters are
/// separated by `'&'`, and a key is separated from its value by the first `'='`.
///
/// # Examples
///
/// ```
/// use compact_uri::parse_uri;
///
/// let uri = parse_uri("http://h/?a=1&b&a=%332&=")?;
/// let params = uri.params();
/// assert_eq!(params.len(), 4);
/// assert_eq!(params.get("a").unwrap().value.unwrap(), "1");
/// assert_eq!(params.count_key("a"), 2);
/// assert_eq!(params.find_key("b"), Some(1));
/// assert!(params.get("b").unwrap().value.is_none());
/// assert!(!params.contains("c"));
///
/// let last = params.rev().next().unwrap();
/// assert_eq!(last.key, "");
/// assert_eq!(last.value.unwrap(), "");
/// # Ok::<_, compact_uri::ParseError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Params<'a> {
    inner: Split<'a>,
}

impl<'a> Params<'a> {
    pub(crate) fn new(query: &'a str, count: usize) -> Self {
        Self {
            inner: Split::new(query, b'&', count),
        }
    }

    /// Returns the first parameter whose decoded key equals `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<QueryParam<'a>> {
        self.clone().find(|p| p.key == key)
    }

    /// Checks whether a parameter has the decoded key `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Counts the parameters whose decoded key equals `key`.
    #[must_use]
    pub fn count_key(&self, key: &str) -> usize {
        self.clone().filter(|p| p.key == key).count()
    }

    /// Returns the position among the remaining parameters of the first
    /// one whose decoded key equals `key`.
    #[must_use]
    pub fn find_key(&self, key: &str) -> Option<usize> {
        self.clone().position(|p| p.key == key)
    }
}

impl<'a> Iterator for Params<'a> {
    type Item = QueryParam<'a>;

    fn next(&mut self) -> Option<QueryParam<'a>> {
        self.inner.next().map(QueryParam::from_validated)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.inner.len(), Some(self.inner.len()))
    }
}

impl DoubleEndedIterator for Params<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(QueryParam::from_validated)
    }
}

impl ExactSizeIterator for Params<'_> {}

impl FusedIterator for Params<'_> {}

/// Appends `key[=value]`, encoding both.
fn push_param(buf: &mut String, key: &str, value: Option<&str>) {
    pct_enc::encode_into(buf, key.as_bytes(), PARAM_KEY);
    if let Some(value) = value {
        buf.push('=');
        pct_enc::encode_into(buf, value.as_bytes(), PARAM_VALUE);
    }
}

/// Joins and encodes parameters, returning the text and the count.
fn join<'p, I>(params: I) -> (String, usize)
where
    I: IntoIterator<Item = (&'p str, Option<&'p str>)>,
{
    let mut buf = String::new();
    let mut k = 0;
    for (key, value) in params {
        if k > 0 {
            buf.push('&');
        }
        push_param(&mut buf, key, value);
        k += 1;
    }
    (buf, k)
}

/// A proxy that edits the query parameters of a [`Url`].
///
/// Created by [`Url::params_mut`]. Keys and values are given decoded and
/// are percent-encoded on the way in; `'&'` and `'='` in a key, and `'&'`
/// in a value, are encoded too. Indexes that are out of range give
/// [`OutOfRange`](ErrorKind::OutOfRange).
///
/// Inserting into a `Url` without a query adds one, and erasing every
/// parameter removes it.
///
/// # Examples
///
/// ```
/// use compact_uri::Url;
///
/// let mut url = Url::parse("http://h/?a=1&b=2")?;
/// let mut params = url.params_mut();
/// params.remove("a");
/// params.push("c d", Some("x&y"))?;
/// params.insert(0, "first", None)?;
/// assert_eq!(params.len(), 3);
/// assert_eq!(url.as_str(), "http://h/?first&b=2&c%20d=x%26y");
///
/// url.params_mut().clear();
/// assert_eq!(url.as_str(), "http://h/");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct ParamsMut<'u> {
    url: &'u mut Url,
}

impl<'u> ParamsMut<'u> {
    pub(crate) fn new(url: &'u mut Url) -> Self {
        Self { url }
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.url.table().param_count()
    }

    /// Checks whether there are no parameters, that is, no query.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> Params<'_> {
        self.url.params()
    }

    /// Returns the parameter at index `i`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<QueryParam<'_>> {
        self.iter().nth(i)
    }

    /// Returns the parameter at index `i`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`](ErrorKind::OutOfRange) if `i >= self.len()`.
    pub fn get_or_err(&self, i: usize) -> Result<QueryParam<'_>, ErrorKind> {
        self.get(i).ok_or(ErrorKind::OutOfRange)
    }

    /// Replaces the parameters in `first..last` with `k` parameters joined in `new`.
    fn splice(&mut self, Range { start, end }: Range<usize>, new: &str, k: usize) -> Result<(), ErrorKind> {
        let n = self.len();
        if start > end || end > n {
            return Err(ErrorKind::OutOfRange);
        }
        trace!("splicing {} parameters over {}..{} of {}", k, start, end, n);
        let Some(q) = self.url.encoded_query() else {
            return if k == 0 { Ok(()) } else { self.url.write_query(new) };
        };
        if k == 0 && start == 0 && end == n {
            self.url.remove_query();
            return Ok(());
        }
        let spliced = list::splice(q.as_str(), b'&', n, (start, end), new, k);
        self.url.write_query(&spliced)
    }

    /// Inserts a parameter before index `i`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`](ErrorKind::OutOfRange) if `i > self.len()`,
    /// and [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn insert(&mut self, i: usize, key: &str, value: Option<&str>) -> Result<&mut Self, ErrorKind> {
        let (new, k) = join([(key, value)]);
        self.splice(i..i, &new, k)?;
        Ok(self)
    }

    /// Appends a parameter.
    ///
    /// # Errors
    ///
    /// Returns [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn push(&mut self, key: &str, value: Option<&str>) -> Result<&mut Self, ErrorKind> {
        let n = self.len();
        self.insert(n, key, value)
    }

    /// Erases the parameter at index `i`.
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

    /// Erases the parameters in a range of indexes.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`](ErrorKind::OutOfRange) if the range is not within `0..self.len()`.
    pub fn erase_range(&mut self, range: Range<usize>) -> Result<&mut Self, ErrorKind> {
        self.splice(range, "", 0)?;
        Ok(self)
    }

    /// Erases every parameter whose decoded key equals `key`,
    /// returning how many were erased.
    pub fn remove(&mut self, key: &str) -> usize {
        let mut removed = 0;
        while let Some(i) = self.iter().find_key(key) {
            // Erasing never grows the text, so it cannot fail.
            if self.erase(i).is_err() {
                break;
            }
            removed += 1;
        }
        removed
    }

    /// Replaces the parameter at index `i`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`](ErrorKind::OutOfRange) if `i >= self.len()`,
    /// and [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn replace(&mut self, i: usize, key: &str, value: Option<&str>) -> Result<&mut Self, ErrorKind> {
        if i >= self.len() {
            return Err(ErrorKind::OutOfRange);
        }
        self.replace_range(i..i + 1, [(key, value)])
    }

    /// Replaces the parameters in a range of indexes with new ones.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`](ErrorKind::OutOfRange) if the range is not within `0..self.len()`,
    /// and [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn replace_range<'p, I>(&mut self, range: Range<usize>, params: I) -> Result<&mut Self, ErrorKind>
    where
        I: IntoIterator<Item = (&'p str, Option<&'p str>)>,
    {
        let (new, k) = join(params);
        self.splice(range, &new, k)?;
        Ok(self)
    }

    /// Sets the value of the parameter at index `i`, keeping its key.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`](ErrorKind::OutOfRange) if `i >= self.len()`,
    /// and [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn set_value(&mut self, i: usize, value: Option<&str>) -> Result<&mut Self, ErrorKind> {
        let key = self.get_or_err(i)?.key;
        let mut new = String::from(key.as_str());
        if let Some(value) = value {
            new.push('=');
            pct_enc::encode_into(&mut new, value.as_bytes(), PARAM_VALUE);
        }
        self.splice(i..i + 1, &new, 1)?;
        Ok(self)
    }

    /// Removes every parameter, and with them the query.
    pub fn clear(&mut self) -> &mut Self {
        self.url.remove_query();
        self
    }

    /// Replaces every parameter with new ones.
    ///
    /// Assigning no parameters removes the query.
    ///
    /// # Errors
    ///
    /// Returns [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn assign<'p, I>(&mut self, params: I) -> Result<&mut Self, ErrorKind>
    where
        I: IntoIterator<Item = (&'p str, Option<&'p str>)>,
    {
        let n = self.len();
        self.replace_range(0..n, params)
    }
}
