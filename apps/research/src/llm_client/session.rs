//! Session budget state.
//!
//! One `Session` per run, passed by reference to every gateway call. The spend
//! counter is only mutated by the gateway and only grows. A call's estimate is
//! reserved while it is in flight and moved into `spent` once it succeeds, so
//! the ceiling is soft: spend may exceed the limit by at most one call.

use std::sync::Mutex;

use uuid::Uuid;

use super::LlmError;

#[derive(Debug, Default)]
struct Ledger {
    spent: f64,
    /// Estimates of calls admitted but not yet settled.
    reserved: f64,
    in_flight: usize,
}

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    limit: f64,
    ledger: Mutex<Ledger>,
}

impl Session {
    pub fn new(limit: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            limit,
            ledger: Mutex::new(Ledger::default()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn spent(&self) -> f64 {
        self.lock().spent
    }

    pub fn remaining(&self) -> f64 {
        (self.limit - self.spent()).max(0.0)
    }

    /// Checks whether a call with the given estimated cost may start.
    ///
    /// Refused when the session has already reached its limit, or when the
    /// call alone costs more than the whole limit. Never mutates the ledger.
    pub(crate) fn admit(&self, estimated_cost: f64) -> Result<(), LlmError> {
        let spent = self.lock().spent;
        if spent >= self.limit || estimated_cost > self.limit {
            return Err(self.exceeded(spent));
        }
        Ok(())
    }

    /// Admits a call and holds its estimate until the reservation is settled.
    ///
    /// With nothing in flight the rule is the same as [`Session::admit`].
    /// Otherwise the call is admitted only while spend plus every in-flight
    /// estimate stays below the limit, which bounds overshoot to one call.
    pub(crate) fn reserve(&self, estimated_cost: f64) -> Result<Reservation<'_>, LlmError> {
        let cost = estimated_cost.max(0.0);
        let mut ledger = self.lock();
        let committed = if ledger.in_flight == 0 {
            ledger.spent
        } else {
            ledger.spent + ledger.reserved
        };
        if committed >= self.limit || cost > self.limit {
            return Err(self.exceeded(ledger.spent));
        }
        ledger.reserved += cost;
        ledger.in_flight += 1;
        Ok(Reservation {
            session: self,
            cost,
            settled: false,
        })
    }

    fn settle(&self, cost: f64, charge: bool) -> f64 {
        let mut ledger = self.lock();
        ledger.in_flight = ledger.in_flight.saturating_sub(1);
        ledger.reserved = if ledger.in_flight == 0 {
            0.0
        } else {
            (ledger.reserved - cost).max(0.0)
        };
        if charge {
            ledger.spent += cost;
        }
        ledger.spent
    }

    fn exceeded(&self, spent: f64) -> LlmError {
        LlmError::BudgetExceeded {
            spent,
            limit: self.limit,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Ledger> {
        // A poisoned lock still holds valid totals.
        self.ledger.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// An in-flight call's hold on the budget. Dropping it without
/// [`Reservation::commit`] releases the estimate uncharged.
#[derive(Debug)]
pub(crate) struct Reservation<'a> {
    session: &'a Session,
    cost: f64,
    settled: bool,
}

impl Reservation<'_> {
    /// Charges the estimate and returns the new cumulative spend.
    pub(crate) fn commit(mut self) -> f64 {
        self.settled = true;
        self.session.settle(self.cost, true)
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.session.settle(self.cost, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_at_zero() {
        let session = Session::new(10.0);
        assert_eq!(session.spent(), 0.0);
        assert_eq!(session.limit(), 10.0);
        assert_eq!(session.remaining(), 10.0);
    }

    fn spend(session: &Session, cost: f64) -> f64 {
        session.reserve(cost).unwrap().commit()
    }

    #[test]
    fn test_admit_below_limit() {
        let session = Session::new(1.0);
        spend(&session, 0.5);
        assert!(session.admit(0.4).is_ok());
    }

    #[test]
    fn test_admit_is_soft_ceiling() {
        // Spent is below the limit, so a call that will overshoot is still admitted.
        let session = Session::new(1.0);
        spend(&session, 0.9);
        assert!(session.admit(0.5).is_ok());
        assert!(session.reserve(0.5).is_ok());
    }

    #[test]
    fn test_admit_refused_at_limit() {
        let session = Session::new(1.0);
        spend(&session, 1.0);
        match session.admit(0.001) {
            Err(LlmError::BudgetExceeded { spent, limit }) => {
                assert_eq!(spent, 1.0);
                assert_eq!(limit, 1.0);
            }
            other => panic!("expected BudgetExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_admit_refuses_call_larger_than_limit() {
        let session = Session::new(0.01);
        assert!(matches!(
            session.admit(0.02),
            Err(LlmError::BudgetExceeded { .. })
        ));
        assert_eq!(session.spent(), 0.0);
    }

    #[test]
    fn test_commit_is_monotonic() {
        let session = Session::new(1.0);
        assert_eq!(spend(&session, 0.25), 0.25);
        assert_eq!(spend(&session, -3.0), 0.25);
        assert_eq!(spend(&session, 0.25), 0.5);
    }

    #[test]
    fn test_reservation_is_not_spend() {
        let session = Session::new(1.0);
        let held = session.reserve(0.4).unwrap();
        assert_eq!(session.spent(), 0.0);
        assert_eq!(held.commit(), 0.4);
        assert_eq!(session.spent(), 0.4);
    }

    #[test]
    fn test_dropped_reservation_is_released_uncharged() {
        let session = Session::new(0.05);
        {
            let _held = session.reserve(0.05).unwrap();
            assert!(session.reserve(0.01).is_err());
        }
        assert_eq!(session.spent(), 0.0);
        // Both slots are free again.
        let a = session.reserve(0.03).unwrap();
        let b = session.reserve(0.001).unwrap();
        drop((a, b));
        assert_eq!(session.spent(), 0.0);
    }

    #[test]
    fn test_in_flight_estimates_count_against_limit() {
        let session = Session::new(0.05);
        let first = session.reserve(0.03003).unwrap();
        let second = session.reserve(0.03003).unwrap();
        // 0.06006 is held, so a third call could push spend past one call of overshoot.
        assert!(matches!(
            session.reserve(0.03003),
            Err(LlmError::BudgetExceeded { .. })
        ));
        first.commit();
        second.commit();
        assert!(session.spent() <= session.limit() + 0.03003);
    }

    #[test]
    fn test_lone_call_admitted_below_limit_even_if_it_overshoots() {
        let session = Session::new(0.05);
        spend(&session, 0.04);
        let held = session.reserve(0.03).unwrap();
        assert!(session.reserve(0.001).is_err());
        assert!((held.commit() - 0.07).abs() < 1e-12);
    }

    #[test]
    fn test_sessions_are_independent() {
        let a = Session::new(1.0);
        let b = Session::new(1.0);
        spend(&a, 0.75);
        assert_eq!(b.spent(), 0.0);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_remaining_never_negative() {
        let session = Session::new(1.0);
        spend(&session, 0.9);
        spend(&session, 0.6);
        assert_eq!(session.remaining(), 0.0);
    }
}
