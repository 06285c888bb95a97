use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::GameId;

/// One exclusive lock per game.
///
/// Whoever holds a game's lock owns the read-modify-write of its record.
#[derive(Default)]
pub struct GameLocks {
    locks: Mutex<HashMap<GameId, Arc<Mutex<()>>>>,
}

impl GameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock handle for `game_id`, created on first use
    pub fn get(&self, game_id: GameId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(game_id).or_default())
    }

    /// Number of games with a lock entry. Entries live as long as the
    /// registry, so a cleared and re-created game id keeps its lock.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Acquire `lock`, recovering it if a previous holder panicked
pub fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn same_game_shares_a_lock() {
        let locks = GameLocks::new();
        assert!(Arc::ptr_eq(&locks.get(1), &locks.get(1)));
        assert!(!Arc::ptr_eq(&locks.get(1), &locks.get(2)));
    }

    #[test]
    fn lock_serializes_critical_sections() {
        let locks = Arc::new(GameLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let lock = locks.get(7);
                        let _guard = acquire(&lock);
                        assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
