//! Process-wide registry of list screens keyed by session screen key.
//!
//! Only authenticated sessions get a screen. The registry is bounded: screens
//! idle for longer than the idle limit are evicted when a new one is
//! created, and at capacity the least recently used screen goes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::models::config::{ScreenSettings, ServerConfig};
use crate::resource::{Resource, RiskContexts, Users};
use crate::screen::ListScreen;

pub const DEFAULT_CAPACITY: usize = 10_000;
pub const DEFAULT_IDLE: Duration = Duration::from_secs(8 * 60 * 60);

struct Slot<R: Resource> {
    screen: ListScreen<R>,
    touched: Instant,
    /// Use order, for least-recently-used eviction.
    used: u64,
}

/// Screens of one resource kind. Closures passed to [`ScreenStore::with`]
/// run under the lock and must not await.
pub struct ScreenStore<R: Resource> {
    settings: ScreenSettings,
    capacity: usize,
    idle: Duration,
    clock: AtomicU64,
    screens: Mutex<HashMap<String, Slot<R>>>,
}

impl<R: Resource> ScreenStore<R> {
    pub fn new(settings: ScreenSettings) -> Self {
        Self::with_limits(settings, DEFAULT_CAPACITY, DEFAULT_IDLE)
    }

    pub fn with_limits(settings: ScreenSettings, capacity: usize, idle: Duration) -> Self {
        Self {
            settings,
            capacity: capacity.max(1),
            idle,
            clock: AtomicU64::new(0),
            screens: Mutex::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> ScreenSettings {
        self.settings
    }

    /// Runs `f` on the screen of `key`, creating it on first use.
    pub fn with<T>(&self, key: &str, f: impl FnOnce(&mut ListScreen<R>) -> T) -> T {
        let mut screens = self.screens.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        if !screens.contains_key(key) {
            self.make_room(&mut screens, now);
        }
        let slot = screens.entry(key.to_string()).or_insert_with(|| Slot {
            screen: ListScreen::new(self.settings),
            touched: now,
            used: 0,
        });
        slot.touched = now;
        slot.used = self.tick();
        f(&mut slot.screen)
    }

    /// Runs `f` on the screen of `key` if the session already has one.
    pub fn with_existing<T>(
        &self,
        key: &str,
        f: impl FnOnce(&mut ListScreen<R>) -> T,
    ) -> Option<T> {
        let mut screens = self.screens.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = screens.get_mut(key)?;
        slot.touched = Instant::now();
        slot.used = self.tick();
        Some(f(&mut slot.screen))
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn make_room(&self, screens: &mut HashMap<String, Slot<R>>, now: Instant) {
        let before = screens.len();
        screens.retain(|_, slot| now.duration_since(slot.touched) < self.idle);
        while screens.len() >= self.capacity {
            let oldest = screens
                .iter()
                .min_by_key(|(_, slot)| slot.used)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => screens.remove(&key),
                None => break,
            };
        }
        let evicted = before - screens.len();
        if evicted > 0 {
            log::debug!("Evicted {evicted} {} screens", R::KIND.label());
        }
    }

    pub fn discard(&self, key: &str) {
        let mut screens = self.screens.lock().unwrap_or_else(PoisonError::into_inner);
        screens.remove(key);
    }

    pub fn len(&self) -> usize {
        self.screens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Screen stores of every resource served by the console.
pub struct ConsoleScreens {
    pub users: ScreenStore<Users>,
    pub contexts: ScreenStore<RiskContexts>,
}

impl ConsoleScreens {
    pub fn new(config: &ServerConfig) -> Self {
        let idle = Duration::from_secs(config.screen_idle_secs);
        Self {
            users: ScreenStore::with_limits(config.users, config.screen_capacity, idle),
            contexts: ScreenStore::with_limits(config.contexts, config.screen_capacity, idle),
        }
    }

    /// Drops every screen owned by a session.
    pub fn discard(&self, key: &str) {
        self.users.discard(key);
        self.contexts.discard(key);
    }
}
