//! UTF-8 encoded path stored in place. Paths are the identity of cache entries,
//! so keeping them inline avoids a heap allocation per slot.

use std::borrow::Borrow;
use std::convert::TryFrom;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::{fmt, str};

use crate::errors::*;

/// The maximum length of a path in bytes.
pub const MAX_PATH_LEN: usize = 128;

/// A bounded, inline path string. Two `FixedPath`s are equal if their visible
/// contents are equal, whatever lingers in the unused tail of the buffer.
#[derive(Clone, Copy)]
pub struct FixedPath {
    len: u8,
    buf: [u8; MAX_PATH_LEN],
}

impl FixedPath {
    /// Creates a `FixedPath` from `v`, failing if it does not fit.
    pub fn new<T: AsRef<str>>(v: T) -> Result<Self> {
        let mut path = FixedPath::default();
        path.assign(v)?;
        Ok(path)
    }

    /// Replaces the contents with `v`. The path is left untouched on failure.
    pub fn assign<T: AsRef<str>>(&mut self, v: T) -> Result<()> {
        let v = v.as_ref();
        if v.len() > MAX_PATH_LEN {
            return Err(Error::PathTooLong(v.len(), MAX_PATH_LEN));
        }

        self.buf[..v.len()].copy_from_slice(v.as_bytes());
        self.len = v.len() as u8;
        Ok(())
    }

    /// Gets the len of path.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Checks if the path is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        // The buffer is only ever filled from `&str`.
        unsafe { str::from_utf8_unchecked(&self.buf[0..self.len as usize]) }
    }
}

impl Default for FixedPath {
    #[inline]
    fn default() -> Self {
        FixedPath {
            len: 0,
            buf: [0; MAX_PATH_LEN],
        }
    }
}

impl<'a> TryFrom<&'a str> for FixedPath {
    type Error = Error;

    fn try_from(v: &'a str) -> Result<Self> {
        FixedPath::new(v)
    }
}

impl PartialEq for FixedPath {
    #[inline]
    fn eq(&self, rhs: &Self) -> bool {
        self.as_str() == rhs.as_str()
    }
}

impl Eq for FixedPath {}

impl PartialEq<str> for FixedPath {
    #[inline]
    fn eq(&self, rhs: &str) -> bool {
        self.as_str() == rhs
    }
}

impl<'a> PartialEq<&'a str> for FixedPath {
    #[inline]
    fn eq(&self, rhs: &&'a str) -> bool {
        self.as_str() == *rhs
    }
}

impl Hash for FixedPath {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl Borrow<str> for FixedPath {
    #[inline]
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl Deref for FixedPath {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for FixedPath {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Debug for FixedPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FixedPath({:?})", self.as_str())
    }
}

impl fmt::Display for FixedPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::hash::FastHashMap;

    #[test]
    fn basic() {
        let v = FixedPath::new("textures/crate.png").unwrap();
        assert_eq!(v.len(), 18);
        assert_eq!(v.as_str(), "textures/crate.png");
        assert_eq!(v, "textures/crate.png");
        assert!(FixedPath::default().is_empty());
    }

    #[test]
    fn trimmed_equality() {
        let mut a = FixedPath::new("meshes/a_very_long_name.msh").unwrap();
        a.assign("meshes/b.msh").unwrap();
        let b = FixedPath::new("meshes/b.msh").unwrap();

        assert_eq!(a, b);

        let mut map = FastHashMap::default();
        map.insert(a, 1);
        assert_eq!(map.get(&b), Some(&1));
        assert_eq!(map.get("meshes/b.msh"), Some(&1));
    }

    #[test]
    fn too_long() {
        let long = "x".repeat(MAX_PATH_LEN + 1);
        assert!(FixedPath::new(&long).is_err());
        assert!(FixedPath::new(&long[1..]).is_ok());

        let mut v = FixedPath::new("keep").unwrap();
        match v.assign(&long) {
            Err(Error::PathTooLong(len, max)) => {
                assert_eq!(len, MAX_PATH_LEN + 1);
                assert_eq!(max, MAX_PATH_LEN);
            }
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(v, "keep");
    }

    #[test]
    fn layout() {
        assert_eq!(::std::mem::size_of::<FixedPath>(), MAX_PATH_LEN + 1);
    }
}
