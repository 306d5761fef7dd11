use std::ops::{Deref, DerefMut, Index};

use bytes::BytesMut;
use http::header::{
    AsHeaderName, HeaderMap, HeaderName, HeaderValue, IntoHeaderName, Iter, IterMut, Keys, Values,
};

use crate::error::DecodeError;

/// Headers transmitted after the terminal zero-length chunk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trailers {
    headers: HeaderMap,
}

impl Trailers {
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl IntoHeaderName, value: HeaderValue) -> Option<HeaderValue> {
        self.headers.insert(name, value)
    }

    pub fn append(&mut self, name: impl IntoHeaderName, value: HeaderValue) -> bool {
        self.headers.append(name, value)
    }

    pub fn get(&self, name: impl AsHeaderName) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    pub fn get_mut(&mut self, name: impl AsHeaderName) -> Option<&mut HeaderValue> {
        self.headers.get_mut(name)
    }

    pub fn remove(&mut self, name: impl AsHeaderName) -> Option<HeaderValue> {
        self.headers.remove(name)
    }

    pub fn iter(&self) -> Iter<'_, HeaderValue> {
        self.headers.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, HeaderValue> {
        self.headers.iter_mut()
    }

    pub fn names(&self) -> Keys<'_, HeaderValue> {
        self.headers.keys()
    }

    pub fn values(&self) -> Values<'_, HeaderValue> {
        self.headers.values()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Collect parsed trailer lines into the map.
    pub(crate) fn extend_parsed(
        &mut self,
        parsed: &[httparse::Header<'_>],
    ) -> Result<(), DecodeError> {
        for header in parsed {
            let name = HeaderName::from_bytes(header.name.as_bytes())
                .map_err(|_| DecodeError::MalformedTrailer(httparse::Error::HeaderName))?;
            let value = HeaderValue::from_bytes(header.value)
                .map_err(|_| DecodeError::MalformedTrailer(httparse::Error::HeaderValue))?;
            self.headers.append(name, value);
        }
        Ok(())
    }

    /// Serialized length of the trailer lines, `Name: value\r\n` each.
    pub fn wire_len(&self) -> usize {
        self.headers
            .iter()
            .map(|(name, value)| name.as_str().len() + value.len() + 4)
            .sum()
    }

    /// Write the trailer lines in wire form.
    pub(crate) fn write_wire(&self, dst: &mut BytesMut) {
        for (name, value) in self.headers.iter() {
            dst.extend_from_slice(name.as_str().as_bytes());
            dst.extend_from_slice(b": ");
            dst.extend_from_slice(value.as_bytes());
            dst.extend_from_slice(b"\r\n");
        }
    }
}

impl From<HeaderMap> for Trailers {
    fn from(headers: HeaderMap) -> Self {
        Self { headers }
    }
}

impl From<Trailers> for HeaderMap {
    fn from(trailers: Trailers) -> Self {
        trailers.headers
    }
}

impl Deref for Trailers {
    type Target = HeaderMap;

    fn deref(&self) -> &Self::Target {
        &self.headers
    }
}

impl DerefMut for Trailers {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.headers
    }
}

impl Index<&HeaderName> for Trailers {
    type Output = HeaderValue;

    #[inline]
    fn index(&self, name: &HeaderName) -> &HeaderValue {
        self.headers
            .get(name)
            .expect("no value for the indexed trailer name")
    }
}

impl Index<&str> for Trailers {
    type Output = HeaderValue;

    #[inline]
    fn index(&self, name: &str) -> &HeaderValue {
        self.headers
            .get(name)
            .expect("no value for the indexed trailer name")
    }
}
