//! Typed identifiers
//!
//! A UUID tagged with the entity it names, so an inquiry id cannot be passed
//! where some other id is expected.

use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// UUID v4 tagged with a marker type
///
/// ```
/// use kernel::id::InquiryId;
/// let id = InquiryId::new();
/// assert_eq!(id.to_string().len(), 36);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: Uuid,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new() -> Self {
        Uuid::new_v4().into()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.value
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Uuid> for Id<T> {
    fn from(value: Uuid) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.value).finish()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

pub mod markers {
    /// Contact inquiry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Inquiry;
}

pub type InquiryId = Id<markers::Inquiry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_differ() {
        assert_ne!(InquiryId::new(), InquiryId::new());
    }

    #[test]
    fn test_wraps_given_uuid() {
        let uuid = Uuid::new_v4();
        let id = InquiryId::from(uuid);
        assert_eq!(id.as_uuid(), &uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }
}
