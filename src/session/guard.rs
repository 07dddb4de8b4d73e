//! In-flight guard: at most one draw-history fetch per lottery

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::common::errors::{AppError, Result};
use crate::common::types::INVALID_LOTTERY;

/// Notice text for a rejected selection
pub const INVALID_HOUSE_MESSAGE: &str = "Casa de aposta inválida";

/// Lottery identifiers with a fetch currently outstanding
#[derive(Debug, Clone, Default)]
pub struct InFlightSet {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl InFlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Move `lottery` from idle to in-flight
    ///
    /// Fails with [`AppError::Validation`] when the identifier is the
    /// placeholder, blank, or already in flight. The returned ticket moves it
    /// back to idle when dropped, whatever the fetch's outcome.
    pub fn try_acquire(&self, lottery: &str) -> Result<InFlightTicket> {
        if lottery.trim().is_empty() || lottery == INVALID_LOTTERY {
            return Err(AppError::Validation(INVALID_HOUSE_MESSAGE.to_string()));
        }

        let mut set = self.lock();
        if !set.insert(lottery.to_string()) {
            debug!(lottery, "fetch already in flight");
            return Err(AppError::Validation(INVALID_HOUSE_MESSAGE.to_string()));
        }

        Ok(InFlightTicket {
            set: self.clone(),
            lottery: lottery.to_string(),
        })
    }

    pub fn contains(&self, lottery: &str) -> bool {
        self.lock().contains(lottery)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Membership of one lottery in the [`InFlightSet`], released on drop
#[derive(Debug)]
pub struct InFlightTicket {
    set: InFlightSet,
    lottery: String,
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        self.set.lock().remove(&self.lottery);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_rejected_until_release() {
        let set = InFlightSet::new();
        let ticket = set.try_acquire("rio").unwrap();
        assert!(set.contains("rio"));
        assert!(matches!(set.try_acquire("rio"), Err(AppError::Validation(_))));

        // Other lotteries are independent.
        let other = set.try_acquire("look").unwrap();
        assert_eq!(set.len(), 2);

        drop(ticket);
        assert!(!set.contains("rio"));
        assert!(set.try_acquire("rio").is_ok());
        drop(other);
    }

    #[test]
    fn test_placeholder_and_blank_rejected() {
        let set = InFlightSet::new();
        assert!(set.try_acquire(INVALID_LOTTERY).is_err());
        assert!(set.try_acquire("").is_err());
        assert!(set.is_empty());
    }

    #[test]
    fn test_released_on_error_path() {
        fn failing_fetch(set: &InFlightSet) -> Result<()> {
            let _ticket = set.try_acquire("rio")?;
            Err(AppError::RemoteCall("não há atualizações pendentes".into()))
        }

        let set = InFlightSet::new();
        assert!(failing_fetch(&set).is_err());
        assert!(set.is_empty());
    }
}
