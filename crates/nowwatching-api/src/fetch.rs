//! Outcome of a best-effort provider call.
//!
//! Playback, history and catalog lookups never fail the caller: a request
//! that returns nothing and a request that could not be completed both end up
//! as "no data". [`Fetched`] keeps the two apart so logs and tests can tell
//! them from each other, while [`Fetched::data`] collapses them the same way.

/// Result of a provider call that degrades instead of erroring.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    /// The provider answered with a payload.
    Data(T),
    /// The provider answered, but had nothing to report (or the call was
    /// skipped because an identifier or credential was missing).
    Empty,
    /// Transport failure, unexpected status, or an unparseable body.
    Unavailable(String),
}

impl<T> Fetched<T> {
    pub fn data(self) -> Option<T> {
        match self {
            Self::Data(value) => Some(value),
            Self::Empty | Self::Unavailable(_) => None,
        }
    }

    pub fn as_data(&self) -> Option<&T> {
        match self {
            Self::Data(value) => Some(value),
            Self::Empty | Self::Unavailable(_) => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Self::Data(value) => Fetched::Data(f(value)),
            Self::Empty => Fetched::Empty,
            Self::Unavailable(reason) => Fetched::Unavailable(reason),
        }
    }
}

impl<T: Default> Fetched<T> {
    pub fn unwrap_or_default(self) -> T {
        self.data().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_unavailable_collapse() {
        let empty: Fetched<Vec<u32>> = Fetched::Empty;
        let down: Fetched<Vec<u32>> = Fetched::Unavailable("timeout".into());
        assert!(!empty.is_unavailable());
        assert!(down.is_unavailable());
        assert_eq!(empty.unwrap_or_default(), Vec::<u32>::new());
        assert_eq!(down.unwrap_or_default(), Vec::<u32>::new());
    }

    #[test]
    fn test_map_keeps_variant() {
        let fetched = Fetched::Data(2).map(|v| v * 10);
        assert_eq!(fetched, Fetched::Data(20));

        let down: Fetched<u32> = Fetched::Unavailable("502".into());
        assert_eq!(down.map(|v| v + 1), Fetched::Unavailable("502".into()));
    }
}
