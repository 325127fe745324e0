//! Per-concern authority resolution
//!
//! Each of sort, filter and pagination is either owned by the table itself
//! (local) or by an external owner that supplies the current value and/or a
//! change callback. Every read and write of a concern goes through
//! [`ConcernSlot`], which decides on each access which side is in charge.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three independently controlled concerns of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Concern {
    Sort,
    Filter,
    Pagination,
}

impl fmt::Display for Concern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concern::Sort => f.write_str("sort"),
            Concern::Filter => f.write_str("filter"),
            Concern::Pagination => f.write_str("pagination"),
        }
    }
}

/// Who is the source of truth for a concern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorityKind {
    Local,
    External,
}

/// Resolved view of a concern at one point in time
pub enum Authority<'a, T, C: ?Sized> {
    /// The table owns the state and may mutate it
    Local(&'a mut T),
    /// An external owner is in charge
    External {
        current: Option<&'a T>,
        callback: Option<&'a mut C>,
    },
}

/// What to do with a mutation request
pub enum Route<'a, T, C: ?Sized> {
    /// Mutate local state
    Apply(&'a mut T),
    /// Forward to the external owner's callback
    Notify(&'a mut C),
    /// External owner without a callback: drop the request
    Reject,
}

impl<'a, T, C: ?Sized> Authority<'a, T, C> {
    pub fn kind(&self) -> AuthorityKind {
        match self {
            Authority::Local(_) => AuthorityKind::Local,
            Authority::External { .. } => AuthorityKind::External,
        }
    }

    /// Route a mutation request. A callback always wins, even when no
    /// external value is supplied; an external value without a callback is
    /// read-only.
    pub fn route(self) -> Route<'a, T, C> {
        match self {
            Authority::Local(state) => Route::Apply(state),
            Authority::External {
                callback: Some(callback),
                ..
            } => Route::Notify(callback),
            Authority::External { callback: None, .. } => Route::Reject,
        }
    }
}

/// Storage for one concern: local fallback state, optional external value,
/// optional change callback.
pub struct ConcernSlot<T, C: ?Sized> {
    concern: Concern,
    local: T,
    external: Option<T>,
    callback: Option<Box<C>>,
}

impl<T, C: ?Sized> ConcernSlot<T, C> {
    pub fn new(concern: Concern, local: T) -> Self {
        Self {
            concern,
            local,
            external: None,
            callback: None,
        }
    }

    pub fn concern(&self) -> Concern {
        self.concern
    }

    /// External iff an external value or a change callback is present
    pub fn kind(&self) -> AuthorityKind {
        if self.external.is_some() || self.callback.is_some() {
            AuthorityKind::External
        } else {
            AuthorityKind::Local
        }
    }

    pub fn is_external(&self) -> bool {
        self.kind() == AuthorityKind::External
    }

    pub fn resolve(&mut self) -> Authority<'_, T, C> {
        if self.external.is_some() || self.callback.is_some() {
            Authority::External {
                current: self.external.as_ref(),
                callback: self.callback.as_deref_mut(),
            }
        } else {
            Authority::Local(&mut self.local)
        }
    }

    /// Value to read: the external value when supplied, else local state
    pub fn current(&self) -> &T {
        self.external.as_ref().unwrap_or(&self.local)
    }

    pub fn local(&self) -> &T {
        &self.local
    }

    pub fn external(&self) -> Option<&T> {
        self.external.as_ref()
    }

    pub fn set_external(&mut self, value: Option<T>) {
        self.external = value;
    }

    pub fn set_callback(&mut self, callback: Option<Box<C>>) {
        self.callback = callback;
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }
}

impl<T: fmt::Debug, C: ?Sized> fmt::Debug for ConcernSlot<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcernSlot")
            .field("concern", &self.concern)
            .field("local", &self.local)
            .field("external", &self.external)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Notify = dyn FnMut(usize) + Send;

    #[test]
    fn test_local_by_default() {
        let mut slot: ConcernSlot<usize, Notify> = ConcernSlot::new(Concern::Pagination, 1);
        assert_eq!(slot.kind(), AuthorityKind::Local);
        match slot.resolve().route() {
            Route::Apply(page) => *page = 2,
            _ => panic!("expected local route"),
        }
        assert_eq!(*slot.current(), 2);
    }

    #[test]
    fn test_callback_without_value_forwards() {
        let mut seen = Vec::new();
        {
            let mut slot: ConcernSlot<usize, dyn FnMut(usize) + '_> =
                ConcernSlot::new(Concern::Pagination, 1);
            slot.set_callback(Some(Box::new(|page| seen.push(page))));
            assert_eq!(slot.kind(), AuthorityKind::External);
            match slot.resolve().route() {
                Route::Notify(cb) => cb(3),
                _ => panic!("expected notify route"),
            }
            // Local fallback is untouched
            assert_eq!(*slot.current(), 1);
        }
        assert_eq!(seen, vec![3]);
    }

    #[test]
    fn test_value_without_callback_is_read_only() {
        let mut slot: ConcernSlot<usize, Notify> = ConcernSlot::new(Concern::Pagination, 1);
        slot.set_external(Some(4));
        assert_eq!(slot.kind(), AuthorityKind::External);
        assert_eq!(*slot.current(), 4);
        assert!(matches!(slot.resolve().route(), Route::Reject));
    }
}
