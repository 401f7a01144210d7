//! Per-order retry deferral. A direct simplification of a route-level
//! cooldown table to flat wall-clock suppression: one fixed `COOLDOWN`
//! duration, no escalating backoff, keyed by `order_id` instead of a DEX
//! route. A confirmed execution clears the entry instantly; a failure or
//! timeout leaves it in place so the next sweep skips the order until the
//! deferral elapses.

use std::collections::HashMap;

use tracing::debug;

/// Tracks the last attempt timestamp (unix seconds) per order id.
pub struct CooldownTable {
    attempted_orders: HashMap<u64, u64>,
    cooldown_s: u64,
}

impl CooldownTable {
    pub fn new(cooldown_s: u64) -> Self {
        Self {
            attempted_orders: HashMap::new(),
            cooldown_s,
        }
    }

    /// True if `order_id` was attempted more recently than `cooldown_s` ago.
    pub fn is_cooling_down(&self, order_id: u64, now: u64) -> bool {
        match self.attempted_orders.get(&order_id) {
            Some(&last_attempt) => now.saturating_sub(last_attempt) < self.cooldown_s,
            None => false,
        }
    }

    /// Records an attempt at `now`, called before submission so a crash
    /// leaves a cooldown in place rather than allowing an immediate retry.
    pub fn record_attempt(&mut self, order_id: u64, now: u64) {
        self.attempted_orders.insert(order_id, now);
    }

    /// Clears the entry — called on confirmed success, and whenever an order
    /// is found to be missing or already expired so the table doesn't grow
    /// unboundedly for orders that left the pending set.
    pub fn clear(&mut self, order_id: u64) {
        if self.attempted_orders.remove(&order_id).is_some() {
            debug!(order_id, "cooldown entry cleared");
        }
    }

    pub fn clear_all(&mut self) {
        self.attempted_orders.clear();
    }

    pub fn attempted_count(&self) -> usize {
        self.attempted_orders.len()
    }
}
