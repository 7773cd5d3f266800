use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, MutexGuard, PoisonError, TryLockError,
};

use ahash::AHashMap;
use bytes::Bytes;

use super::Fetch;
use crate::error::Result;

type Slot = Arc<Mutex<Option<Bytes>>>;

/// Process-lifetime memo of downloaded archives, keyed by URL.
///
/// Entries are never evicted. A successful download is performed at most once
/// per URL: callers racing on the same URL wait on that URL's slot, while
/// callers for other URLs are not blocked. Failures leave the slot empty so the
/// next caller tries again.
pub struct SourceCache<F: Fetch> {
    fetcher: F,
    slots: Mutex<AHashMap<String, Slot>>,
    fetches: AtomicUsize,
}

impl<F: Fetch> SourceCache<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher, slots: Mutex::new(AHashMap::new()), fetches: AtomicUsize::new(0) }
    }

    /// Return the bytes for `url`, downloading them on first use.
    pub fn get(&self, url: &str) -> Result<Bytes> {
        let slot = self.slot(url);
        let mut entry = slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(bytes) = entry.as_ref() {
            log::debug!("[source::cache] hit {url}");
            return Ok(bytes.clone());
        }

        let bytes = self.fetcher.fetch(url)?;
        self.fetches.fetch_add(1, Ordering::Relaxed);
        *entry = Some(bytes.clone());
        Ok(bytes)
    }

    /// True once `url` has been downloaded successfully.
    pub fn contains(&self, url: &str) -> bool {
        let slot = self.slots().get(url).cloned();
        slot.is_some_and(|slot| filled(&slot))
    }

    /// Number of successful downloads performed so far.
    pub fn fetch_count(&self) -> usize { self.fetches.load(Ordering::Relaxed) }

    /// Number of URLs with a cached payload.
    pub fn len(&self) -> usize {
        // Slot locks are taken only after the map guard is released.
        let slots: Vec<Slot> = self.slots().values().cloned().collect();
        slots.iter().filter(|slot| filled(slot)).count()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    fn slot(&self, url: &str) -> Slot {
        self.slots().entry(url.to_string()).or_default().clone()
    }

    fn slots(&self) -> MutexGuard<'_, AHashMap<String, Slot>> {
        // The map is only ever mutated by inserting empty slots.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A slot that is mid-download counts as not yet cached.
fn filled(slot: &Slot) -> bool {
    match slot.try_lock() {
        Ok(entry) => entry.is_some(),
        Err(TryLockError::Poisoned(e)) => e.into_inner().is_some(),
        Err(TryLockError::WouldBlock) => false,
    }
}
