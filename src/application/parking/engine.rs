//! Session engine: the entry/exit state machine
//!
//! Each operation runs under the vehicle's lock inside one unit of work.
//! Exit resolves the tariff, prices the stay, closes the session and debits
//! the owner in the same transaction; any failure drops the unit of work and
//! nothing is persisted. Events are published only after commit.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::locks::{VehicleGuard, VehicleLocks};
use crate::application::billing::{charge, TariffResolver};
use crate::application::events::{Event, SessionClosedEvent, SessionOpenedEvent, SharedEventBus};
use crate::domain::{
    BalancePolicy, DomainError, DomainResult, NewParkingSession, ParkingSession, SessionClosing,
    Settlement, UnitOfWorkFactory,
};
use crate::shared::money::{round_currency, to_minor};

pub struct SessionEngine {
    units: Arc<dyn UnitOfWorkFactory>,
    resolver: TariffResolver,
    balance_policy: BalancePolicy,
    locks: VehicleLocks,
    events: SharedEventBus,
}

impl SessionEngine {
    pub fn new(
        units: Arc<dyn UnitOfWorkFactory>,
        resolver: TariffResolver,
        balance_policy: BalancePolicy,
        locks: VehicleLocks,
        events: SharedEventBus,
    ) -> Self {
        Self {
            units,
            resolver,
            balance_policy,
            locks,
            events,
        }
    }

    pub fn resolver(&self) -> &TariffResolver {
        &self.resolver
    }

    /// Open a session for `vehicle_number` starting at `now`.
    pub async fn enter(&self, vehicle_number: &str, now: DateTime<Utc>) -> DomainResult<ParkingSession> {
        let result = self.open_session(vehicle_number, now).await;
        record_busy(&result);
        let session = result?;

        metrics::counter!("parking_sessions_opened_total").increment(1);
        info!(
            session_id = session.id,
            vehicle_number = %session.vehicle_number,
            start = %session.start,
            "Parking session opened"
        );
        self.events.publish(Event::SessionOpened(SessionOpenedEvent {
            session_id: session.id,
            vehicle_number: session.vehicle_number.clone(),
            start: session.start,
        }));
        Ok(session)
    }

    /// Close the open session for `vehicle_number` at `now`, charging the
    /// owner `total - discount` (never below zero).
    pub async fn exit(
        &self,
        vehicle_number: &str,
        now: DateTime<Utc>,
        discount: Decimal,
    ) -> DomainResult<ParkingSession> {
        if discount < Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "Discount must not be negative, got {}",
                discount
            )));
        }

        let result = self.close_session(vehicle_number, now, round_currency(discount)).await;
        record_busy(&result);
        let (session, balance_after) = result?;

        let total = session.total.unwrap_or_default();
        let due = session.amount_due().unwrap_or_default();
        let settlement = session.settlement.unwrap_or(Settlement::Cash);

        metrics::counter!("parking_sessions_closed_total", "settlement" => settlement.as_str())
            .increment(1);
        if let Ok(minor) = to_minor(due) {
            metrics::counter!("parking_revenue_minor_total").increment(minor.max(0) as u64);
        }
        info!(
            session_id = session.id,
            vehicle_number = %session.vehicle_number,
            total = %total,
            discount = %session.discount,
            due = %due,
            settlement = settlement.as_str(),
            account_id = ?session.account_id,
            "Parking session closed"
        );

        self.events.publish(Event::SessionClosed(SessionClosedEvent {
            session_id: session.id,
            vehicle_number: session.vehicle_number.clone(),
            start: session.start,
            stop: session.stop.unwrap_or(session.start),
            total,
            discount: session.discount,
            tariff_id: session.tariff_id.unwrap_or_default(),
            settlement: settlement.as_str().to_string(),
            account_id: session.account_id.clone(),
            balance_after,
        }));
        Ok(session)
    }

    // ── Transactional bodies ────────────────────────────────────

    async fn lock(&self, vehicle_number: &str) -> DomainResult<VehicleGuard> {
        self.locks.acquire(vehicle_number).await
    }

    async fn open_session(&self, vehicle_number: &str, now: DateTime<Utc>) -> DomainResult<ParkingSession> {
        let _guard = self.lock(vehicle_number).await?;
        let uow = self.units.begin().await?;

        if let Some(open) = uow.sessions().find_open_by_vehicle(vehicle_number).await? {
            warn!(
                session_id = open.id,
                vehicle_number,
                "Entry rejected: session already open"
            );
            return Err(DomainError::SessionAlreadyOpen(vehicle_number.to_string()));
        }

        let session = uow
            .sessions()
            .insert(NewParkingSession {
                vehicle_number: vehicle_number.to_string(),
                start: now,
            })
            .await?;
        uow.commit().await?;
        Ok(session)
    }

    async fn close_session(
        &self,
        vehicle_number: &str,
        now: DateTime<Utc>,
        discount: Decimal,
    ) -> DomainResult<(ParkingSession, Option<Decimal>)> {
        let _guard = self.lock(vehicle_number).await?;
        let uow = self.units.begin().await?;

        let mut session = uow
            .sessions()
            .find_open_by_vehicle(vehicle_number)
            .await?
            .ok_or_else(|| DomainError::SessionNotFound(vehicle_number.to_string()))?;

        let tariff = self.resolver.resolve(uow.tariffs(), session.start).await?;
        let stop = session.stop_at(now);
        if stop != now {
            warn!(
                session_id = session.id,
                start = %session.start,
                now = %now,
                "Exit time precedes entry; stop clamped to start"
            );
        }
        let total = charge(&tariff, session.elapsed_at(stop))?;

        let account_id = uow
            .vehicles()
            .find_by_number(vehicle_number)
            .await?
            .and_then(|vehicle| vehicle.account_id);
        let settlement = match account_id {
            Some(_) => Settlement::Balance,
            None => Settlement::Cash,
        };

        session.close(SessionClosing {
            stop,
            total,
            discount,
            tariff_id: tariff.id,
            account_id: account_id.clone(),
            settlement,
        })?;
        uow.sessions().close_and_persist(&session).await?;

        let balance_after = match &account_id {
            Some(account_id) => {
                let due = session.amount_due().unwrap_or_default();
                let account = uow
                    .accounts()
                    .debit(account_id, due, self.balance_policy)
                    .await?;
                Some(account.balance)
            }
            None => None,
        };

        uow.commit().await?;
        Ok((session, balance_after))
    }
}

fn record_busy<T>(result: &DomainResult<T>) {
    if let Err(e) = result {
        if e.is_transient() {
            metrics::counter!("parking_session_busy_total").increment(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration as StdDuration;

    use chrono::{Duration, TimeZone, Weekday};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rust_decimal_macros::dec;
    use sea_orm::DatabaseConnection;

    use super::*;
    use crate::application::billing::{ResolverPolicy, TariffMatching, TieBreak};
    use crate::application::events::create_event_bus;
    use crate::domain::RepositoryProvider;
    use crate::infrastructure::database::repositories::{SeaOrmRepositoryProvider, SeaOrmUnitOfWorkFactory};
    use crate::infrastructure::database::testing::{
        clear_tariffs, seed_account, seed_tariff, seed_vehicle, seed_window, test_db, WindowSeed,
    };

    /// Monday 2024-03-04 10:00 UTC
    fn monday_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap()
    }

    fn engine_with(db: &DatabaseConnection, policy: BalancePolicy, lock_timeout: StdDuration) -> SessionEngine {
        SessionEngine::new(
            Arc::new(SeaOrmUnitOfWorkFactory::new(db.clone())),
            TariffResolver::new(
                ResolverPolicy::new(TariffMatching::DayAndTime, TieBreak::Narrowest, 0).unwrap(),
            ),
            policy,
            VehicleLocks::new(lock_timeout),
            create_event_bus(),
        )
    }

    fn engine(db: &DatabaseConnection) -> SessionEngine {
        engine_with(db, BalancePolicy::AllowNegative, StdDuration::from_secs(5))
    }

    async fn balance(db: &DatabaseConnection, account_id: &str) -> Decimal {
        let repos = SeaOrmRepositoryProvider::new(db.clone());
        repos.accounts().find_by_id(account_id).await.unwrap().unwrap().balance
    }

    #[tokio::test]
    async fn enter_then_exit_charges_the_owner() {
        let db = test_db().await;
        seed_account(&db, "acc-1", 10_000).await;
        seed_vehicle(&db, "AA1234BB", Some("acc-1")).await;
        let engine = engine(&db);
        let start = monday_morning();

        let opened = engine.enter("AA1234BB", start).await.unwrap();
        assert!(opened.in_parking);
        assert_eq!(opened.start, start);

        let closed = engine
            .exit("AA1234BB", start + Duration::minutes(90), dec!(0))
            .await
            .unwrap();
        assert!(!closed.in_parking);
        assert_eq!(closed.total, Some(dec!(15.00)));
        assert_eq!(closed.stop, Some(start + Duration::minutes(90)));
        assert_eq!(closed.settlement, Some(Settlement::Balance));
        assert_eq!(closed.account_id.as_deref(), Some("acc-1"));
        assert_eq!(balance(&db, "acc-1").await, dec!(85.00));
    }

    #[tokio::test]
    async fn double_enter_is_rejected() {
        let db = test_db().await;
        let engine = engine(&db);

        engine.enter("AA1234BB", monday_morning()).await.unwrap();
        let err = engine.enter("AA1234BB", monday_morning()).await.unwrap_err();
        assert!(matches!(err, DomainError::SessionAlreadyOpen(_)));
    }

    #[tokio::test]
    async fn exit_without_entry_is_not_found() {
        let db = test_db().await;
        let engine = engine(&db);

        let err = engine.exit("AA1234BB", monday_morning(), dec!(0)).await.unwrap_err();
        assert!(matches!(err, DomainError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn second_exit_is_not_found_and_debits_once() {
        let db = test_db().await;
        seed_account(&db, "acc-1", 0).await;
        seed_vehicle(&db, "AA1234BB", Some("acc-1")).await;
        let engine = engine(&db);
        let start = monday_morning();

        engine.enter("AA1234BB", start).await.unwrap();
        engine.exit("AA1234BB", start + Duration::minutes(30), dec!(0)).await.unwrap();
        let err = engine
            .exit("AA1234BB", start + Duration::minutes(60), dec!(0))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::SessionNotFound(_)));
        assert_eq!(balance(&db, "acc-1").await, dec!(-5.00));
    }

    #[tokio::test]
    async fn discount_reduces_the_debit_but_not_below_zero() {
        let db = test_db().await;
        seed_account(&db, "acc-1", 2_000).await;
        seed_vehicle(&db, "AA1234BB", Some("acc-1")).await;
        let engine = engine(&db);
        let start = monday_morning();

        engine.enter("AA1234BB", start).await.unwrap();
        let closed = engine
            .exit("AA1234BB", start + Duration::minutes(30), dec!(2.50))
            .await
            .unwrap();
        assert_eq!(closed.total, Some(dec!(5.00)));
        assert_eq!(closed.discount, dec!(2.50));
        assert_eq!(balance(&db, "acc-1").await, dec!(17.50));

        engine.enter("AA1234BB", start + Duration::hours(1)).await.unwrap();
        engine
            .exit("AA1234BB", start + Duration::minutes(66), dec!(50))
            .await
            .unwrap();
        assert_eq!(balance(&db, "acc-1").await, dec!(17.50));
    }

    #[tokio::test]
    async fn negative_discount_is_rejected_before_any_write() {
        let db = test_db().await;
        let engine = engine(&db);
        engine.enter("AA1234BB", monday_morning()).await.unwrap();

        let err = engine
            .exit("AA1234BB", monday_morning() + Duration::minutes(5), dec!(-1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let repos = SeaOrmRepositoryProvider::new(db.clone());
        assert!(repos.sessions().find_open_by_vehicle("AA1234BB").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unregistered_plate_settles_in_cash() {
        let db = test_db().await;
        let engine = engine(&db);
        let start = monday_morning();

        engine.enter("KA0001AA", start).await.unwrap();
        let closed = engine
            .exit("KA0001AA", start + Duration::minutes(30), dec!(0))
            .await
            .unwrap();

        assert_eq!(closed.settlement, Some(Settlement::Cash));
        assert!(closed.account_id.is_none());
        assert_eq!(closed.total, Some(dec!(5.00)));
    }

    #[tokio::test]
    async fn clock_skew_clamps_stop_to_start() {
        let db = test_db().await;
        let engine = engine(&db);
        let start = monday_morning();

        engine.enter("AA1234BB", start).await.unwrap();
        let closed = engine
            .exit("AA1234BB", start - Duration::minutes(3), dec!(0))
            .await
            .unwrap();

        assert_eq!(closed.stop, Some(start));
        assert_eq!(closed.total, Some(Decimal::ZERO));
    }

    #[tokio::test]
    async fn missing_tariff_leaves_the_session_open() {
        let db = test_db().await;
        clear_tariffs(&db).await;
        let weekend = seed_tariff(&db, "Weekend", 800, 60).await;
        seed_window(
            &db,
            WindowSeed {
                tariff_id: weekend,
                days: &[Weekday::Sat, Weekday::Sun],
                start: None,
                stop: None,
            },
        )
        .await;
        let engine = engine(&db);

        engine.enter("AA1234BB", monday_morning()).await.unwrap();
        let err = engine
            .exit("AA1234BB", monday_morning() + Duration::minutes(30), dec!(0))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NoTariffForTimestamp(t) if t == monday_morning()));
        let repos = SeaOrmRepositoryProvider::new(db.clone());
        let open = repos.sessions().find_open_by_vehicle("AA1234BB").await.unwrap();
        assert!(open.is_some_and(|s| s.total.is_none()));
    }

    #[tokio::test]
    async fn tariff_is_resolved_at_entry_time() {
        let db = test_db().await;
        let night = seed_tariff(&db, "Night", 500, 60).await;
        seed_window(
            &db,
            WindowSeed {
                tariff_id: night,
                days: &[Weekday::Mon],
                start: chrono::NaiveTime::from_hms_opt(22, 0, 0),
                stop: chrono::NaiveTime::from_hms_opt(6, 0, 0),
            },
        )
        .await;
        let engine = engine(&db);
        let late = Utc.with_ymd_and_hms(2024, 3, 4, 23, 0, 0).unwrap();

        engine.enter("AA1234BB", late).await.unwrap();
        let closed = engine
            .exit("AA1234BB", late + Duration::hours(10), dec!(0))
            .await
            .unwrap();

        assert_eq!(closed.tariff_id, Some(night));
        assert_eq!(closed.total, Some(dec!(50.00)));
    }

    #[tokio::test]
    async fn overnight_window_applies_after_midnight() {
        let db = test_db().await;
        let night = seed_tariff(&db, "Night", 500, 60).await;
        seed_window(
            &db,
            WindowSeed {
                tariff_id: night,
                days: &[Weekday::Mon],
                start: chrono::NaiveTime::from_hms_opt(22, 0, 0),
                stop: chrono::NaiveTime::from_hms_opt(6, 0, 0),
            },
        )
        .await;
        let engine = engine(&db);

        // Tuesday 03:00 is still Monday night
        let tuesday_early = Utc.with_ymd_and_hms(2024, 3, 5, 3, 0, 0).unwrap();
        engine.enter("AA1234BB", tuesday_early).await.unwrap();
        let closed = engine
            .exit("AA1234BB", tuesday_early + Duration::hours(1), dec!(0))
            .await
            .unwrap();
        assert_eq!(closed.tariff_id, Some(night));

        // Monday 03:00 belongs to Sunday night, which has no Night window
        let monday_early = Utc.with_ymd_and_hms(2024, 3, 4, 3, 0, 0).unwrap();
        engine.enter("KA0001AA", monday_early).await.unwrap();
        let closed = engine
            .exit("KA0001AA", monday_early + Duration::hours(1), dec!(0))
            .await
            .unwrap();
        assert_ne!(closed.tariff_id, Some(night));
    }

    #[tokio::test]
    async fn invalid_tariff_fails_without_writes() {
        let db = test_db().await;
        clear_tariffs(&db).await;
        seed_account(&db, "acc-1", 1_000).await;
        seed_vehicle(&db, "AA1234BB", Some("acc-1")).await;
        let broken = seed_tariff(&db, "Broken", 1000, 0).await;
        seed_window(
            &db,
            WindowSeed {
                tariff_id: broken,
                days: &[Weekday::Mon],
                start: None,
                stop: None,
            },
        )
        .await;
        let engine = engine(&db);

        engine.enter("AA1234BB", monday_morning()).await.unwrap();
        let err = engine
            .exit("AA1234BB", monday_morning() + Duration::minutes(30), dec!(0))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidTariffConfiguration(_)));
        assert_eq!(balance(&db, "acc-1").await, dec!(10.00));
    }

    #[tokio::test]
    async fn strict_policy_rolls_back_the_close() {
        let db = test_db().await;
        seed_account(&db, "acc-1", 100).await;
        seed_vehicle(&db, "AA1234BB", Some("acc-1")).await;
        let engine = engine_with(&db, BalancePolicy::RejectInsufficient, StdDuration::from_secs(5));
        let start = monday_morning();

        engine.enter("AA1234BB", start).await.unwrap();
        let err = engine
            .exit("AA1234BB", start + Duration::minutes(30), dec!(0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientBalance { .. }));

        let repos = SeaOrmRepositoryProvider::new(db.clone());
        let open = repos.sessions().find_open_by_vehicle("AA1234BB").await.unwrap();
        assert!(open.is_some_and(|s| s.in_parking && s.total.is_none()));
        assert_eq!(balance(&db, "acc-1").await, dec!(1.00));
    }

    #[tokio::test]
    async fn events_follow_commits() {
        let db = test_db().await;
        let engine = engine(&db);
        let mut events = engine.events.subscribe();
        let start = monday_morning();

        engine.enter("AA1234BB", start).await.unwrap();
        let _ = engine.enter("AA1234BB", start).await.unwrap_err();
        engine.exit("AA1234BB", start + Duration::minutes(30), dec!(0)).await.unwrap();

        let first = events.try_recv().unwrap();
        assert_eq!(first.event.event_type(), "session_opened");
        match events.try_recv().unwrap().event {
            Event::SessionClosed(closed) => {
                assert_eq!(closed.total, dec!(5.00));
                assert_eq!(closed.settlement, "cash");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(events.try_recv().is_none());
    }

    #[tokio::test]
    async fn held_vehicle_lock_times_out_as_busy() {
        let db = test_db().await;
        let engine = engine_with(&db, BalancePolicy::AllowNegative, StdDuration::from_millis(50));
        let _held = engine.locks.acquire("AA1234BB").await.unwrap();

        let err = engine.enter("AA1234BB", monday_morning()).await.unwrap_err();
        assert!(matches!(err, DomainError::SessionBusy(_)));
        assert!(err.is_transient());
    }

    /// Random interleavings of Enter/Exit over a few plates never leave more
    /// than one open session per plate, and every success matches a model of
    /// the state machine.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_enter_exit_keeps_one_open_session_per_plate() {
        let db = test_db().await;
        let engine = Arc::new(engine(&db));
        let plates = ["AA0001AA", "AA0002AA", "AA0003AA"];
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let start = monday_morning();

        let mut tasks = Vec::new();
        for i in 0..60 {
            let plate = plates[rng.gen_range(0..plates.len())];
            let entering = rng.gen_bool(0.5);
            let now = start + Duration::seconds(i);
            let engine = Arc::clone(&engine);
            tasks.push(tokio::spawn(async move {
                let outcome = if entering {
                    engine.enter(plate, now).await.map(|_| ())
                } else {
                    engine.exit(plate, now, dec!(0)).await.map(|_| ())
                };
                (plate, entering, outcome)
            }));
        }

        let mut successes: HashMap<&str, (i32, i32)> = HashMap::new();
        for task in tasks {
            let (plate, entering, outcome) = task.await.unwrap();
            match outcome {
                Ok(()) => {
                    let entry = successes.entry(plate).or_default();
                    if entering {
                        entry.0 += 1;
                    } else {
                        entry.1 += 1;
                    }
                }
                Err(DomainError::SessionAlreadyOpen(_)) => assert!(entering),
                Err(DomainError::SessionNotFound(_)) => assert!(!entering),
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        let repos = SeaOrmRepositoryProvider::new(db.clone());
        for plate in plates {
            let (entered, exited) = successes.get(plate).copied().unwrap_or_default();
            let history = repos.sessions().list_for_vehicle(plate, None, None).await.unwrap();
            let open = history.iter().filter(|s| s.in_parking).count() as i32;

            assert!(open <= 1, "{plate} has {open} open sessions");
            assert_eq!(history.len() as i32, entered);
            assert_eq!(entered - exited, open);
        }
    }
}
