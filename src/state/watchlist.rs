use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;

/// One tracked underlying.
#[derive(Debug, Clone, Serialize)]
pub struct WatchlistEntry {
    pub symbol: String,
    /// Nanosecond UTC epoch timestamp.
    pub added_at_ns: u64,
}

/// In-memory watchlist keyed by underlying symbol. Symbols are stored
/// uppercase; adding an existing symbol keeps the original timestamp.
pub struct Watchlist {
    entries: DashMap<String, WatchlistEntry>,
}

impl Watchlist {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entries: DashMap::new(),
        })
    }

    /// Returns true if the symbol was newly added. Insertion goes through
    /// the entry API so two racing adds for the same symbol resolve to one
    /// winner and the first timestamp survives.
    pub fn add(&self, symbol: &str, now_ns: u64) -> bool {
        let key = symbol.trim().to_uppercase();
        if key.is_empty() {
            return false;
        }
        match self.entries.entry(key.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(WatchlistEntry {
                    symbol: key,
                    added_at_ns: now_ns,
                });
                true
            }
        }
    }

    /// Returns true if the symbol was present.
    pub fn remove(&self, symbol: &str) -> bool {
        self.entries.remove(&symbol.trim().to_uppercase()).is_some()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(&symbol.trim().to_uppercase())
    }

    /// All entries, oldest first, ties broken by symbol.
    pub fn all(&self) -> Vec<WatchlistEntry> {
        let mut entries: Vec<WatchlistEntry> =
            self.entries.iter().map(|e| e.value().clone()).collect();
        entries.sort_by(|a, b| {
            a.added_at_ns
                .cmp(&b.added_at_ns)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_normalizes_and_deduplicates() {
        let wl = Watchlist::new();
        assert!(wl.add("aapl", 1));
        assert!(!wl.add("AAPL", 2));
        assert_eq!(wl.len(), 1);
        assert!(wl.contains("Aapl"));
        // Original timestamp survives the duplicate add.
        assert_eq!(wl.all()[0].added_at_ns, 1);
    }

    #[test]
    fn empty_symbol_not_added() {
        let wl = Watchlist::new();
        assert!(!wl.add("   ", 1));
        assert!(wl.is_empty());
    }

    #[test]
    fn remove_reports_presence() {
        let wl = Watchlist::new();
        wl.add("MSFT", 1);
        assert!(wl.remove("msft"));
        assert!(!wl.remove("msft"));
        assert!(wl.is_empty());
    }

    #[test]
    fn racing_adds_produce_one_winner() {
        let wl = Watchlist::new();
        let handles: Vec<_> = (0..8u64)
            .map(|i| {
                let wl = Arc::clone(&wl);
                std::thread::spawn(move || wl.add("AAPL", i + 1))
            })
            .collect();
        let added: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(added.iter().filter(|&&b| b).count(), 1);
        assert_eq!(wl.len(), 1);
        // The stored timestamp belongs to the one thread that won.
        let winner = added.iter().position(|&b| b).unwrap() as u64 + 1;
        assert_eq!(wl.all()[0].added_at_ns, winner);
    }

    #[test]
    fn all_orders_by_added_time() {
        let wl = Watchlist::new();
        wl.add("MSFT", 3);
        wl.add("AAPL", 1);
        wl.add("SPY", 2);
        let symbols: Vec<_> = wl.all().into_iter().map(|e| e.symbol).collect();
        assert_eq!(symbols, vec!["AAPL", "SPY", "MSFT"]);
    }
}
