//! Shared response body buffer.
//!
//! A [`Body`] is a handle: clones point at the same bytes. The recorder, the mock
//! connection and the hijacked writer all append to one buffer through their own
//! handles, so the bytes end up in the order the writes happened.

use std::cell::{Ref, RefCell};
use std::io::Write;
use std::rc::Rc;

#[derive(Clone, Default)]
pub struct Body(Rc<RefCell<Vec<u8>>>);

impl Body {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `data` to the buffer.
    pub fn extend(&self, data: &[u8]) {
        self.0.borrow_mut().extend_from_slice(data);
    }

    /// Borrows the recorded bytes.
    ///
    /// # Panics
    ///
    /// If a write through another handle is in progress, which cannot happen
    /// from single-threaded callers.
    #[must_use]
    pub fn bytes(&self) -> Ref<'_, [u8]> {
        Ref::map(self.0.borrow(), Vec::as_slice)
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    #[must_use]
    pub fn contains(&self, needle: &[u8]) -> bool {
        let haystack = self.0.borrow();
        needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Drops all recorded bytes, for every handle.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Returns `true` when both handles share one buffer.
    #[must_use]
    pub fn ptr_eq(&self, other: &Body) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Write for Body {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.extend(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl core::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Body").field(&self.to_string_lossy()).finish()
    }
}

impl core::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_lossy())
    }
}

impl PartialEq for Body {
    fn eq(&self, other: &Self) -> bool {
        *self.0.borrow() == *other.0.borrow()
    }
}

impl PartialEq<[u8]> for Body {
    fn eq(&self, other: &[u8]) -> bool {
        self.0.borrow().as_slice() == other
    }
}

impl PartialEq<&[u8]> for Body {
    fn eq(&self, other: &&[u8]) -> bool {
        self.0.borrow().as_slice() == *other
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for Body {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.0.borrow().as_slice() == other.as_slice()
    }
}

impl PartialEq<str> for Body {
    fn eq(&self, other: &str) -> bool {
        self.0.borrow().as_slice() == other.as_bytes()
    }
}

impl PartialEq<&str> for Body {
    fn eq(&self, other: &&str) -> bool {
        self.0.borrow().as_slice() == other.as_bytes()
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }
}
