//! Per-customer rate gate
//!
//! Guards the service-list read path: each customer gets one call per
//! cooldown window. The gate is an explicit collaborator keyed by customer
//! id with an inspectable next-eligible time, injected wherever gating is
//! needed.

use chrono::{DateTime, Duration, Utc};
use fusion_core::{AppError, AppResult};
use parking_lot::Mutex;
use std::collections::HashMap;

/// In-memory per-customer cooldown gate
pub struct RateGate {
    cooldown: Duration,
    next_eligible: Mutex<HashMap<i64, DateTime<Utc>>>,
}

impl RateGate {
    /// Create a gate with the given cooldown window in minutes
    pub fn new(cooldown_minutes: i64) -> Self {
        Self {
            cooldown: Duration::minutes(cooldown_minutes),
            next_eligible: Mutex::new(HashMap::new()),
        }
    }

    /// Admit the customer and arm the cooldown, or reject with the whole
    /// minutes remaining (at least 1)
    pub fn check_and_arm(&self, customer_id: i64) -> AppResult<()> {
        let now = Utc::now();
        let mut gate = self.next_eligible.lock();

        if let Some(next) = gate.get(&customer_id) {
            if *next > now {
                let remaining = *next - now;
                let minutes = (remaining.num_seconds() + 59) / 60;
                return Err(AppError::RateLimited {
                    minutes: minutes.max(1),
                });
            }
        }

        gate.insert(customer_id, now + self.cooldown);
        Ok(())
    }

    /// Next time the customer may call, if a cooldown is armed
    pub fn next_eligible(&self, customer_id: i64) -> Option<DateTime<Utc>> {
        self.next_eligible.lock().get(&customer_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_admitted_and_armed() {
        let gate = RateGate::new(5);
        assert!(gate.next_eligible(1).is_none());

        gate.check_and_arm(1).unwrap();

        let next = gate.next_eligible(1).expect("cooldown armed");
        assert!(next > Utc::now());
    }

    #[test]
    fn test_second_call_rejected_with_minutes() {
        let gate = RateGate::new(5);
        gate.check_and_arm(1).unwrap();

        match gate.check_and_arm(1) {
            Err(AppError::RateLimited { minutes }) => {
                assert!((1..=5).contains(&minutes));
            }
            other => panic!("expected rate limit, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_customers_gated_independently() {
        let gate = RateGate::new(5);
        gate.check_and_arm(1).unwrap();
        gate.check_and_arm(2).unwrap();
        assert!(gate.check_and_arm(1).is_err());
    }

    #[test]
    fn test_zero_cooldown_always_admits() {
        let gate = RateGate::new(0);
        gate.check_and_arm(1).unwrap();
        gate.check_and_arm(1).unwrap();
    }
}
