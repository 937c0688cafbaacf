//! Gate service: plate identification in front of the session engine
//!
//! Raw plates from cameras or operators are normalized here, and transient
//! `SessionBusy` failures are retried with backoff.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::engine::SessionEngine;
use crate::domain::{normalize_plate, DomainError, DomainResult, ParkingSession};
use crate::shared::retry::{retry_with_backoff, RetryConfig};

/// External plate-recognition collaborator (camera / ANPR).
#[async_trait]
pub trait PlateRecognizer: Send + Sync {
    /// Raw plate text read from `image`, or `PlateNotRecognized`.
    async fn recognize(&self, image: &[u8]) -> DomainResult<String>;
}

pub struct GateService {
    engine: Arc<SessionEngine>,
    recognizer: Option<Arc<dyn PlateRecognizer>>,
    retry: RetryConfig,
}

impl GateService {
    pub fn new(engine: Arc<SessionEngine>, retry: RetryConfig) -> Self {
        Self {
            engine,
            recognizer: None,
            retry,
        }
    }

    pub fn with_recognizer(mut self, recognizer: Arc<dyn PlateRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn engine(&self) -> &SessionEngine {
        &self.engine
    }

    /// Entry for a plate typed or forwarded as text.
    pub async fn enter(&self, raw_plate: &str) -> DomainResult<ParkingSession> {
        let plate = plate(raw_plate)?;
        retry_with_backoff(
            &self.retry,
            || self.engine.enter(&plate, Utc::now()),
            DomainError::is_transient,
            "gate_enter",
        )
        .await
    }

    /// Exit for a plate typed or forwarded as text.
    pub async fn exit(&self, raw_plate: &str, discount: Decimal) -> DomainResult<ParkingSession> {
        let plate = plate(raw_plate)?;
        retry_with_backoff(
            &self.retry,
            || self.engine.exit(&plate, Utc::now(), discount),
            DomainError::is_transient,
            "gate_exit",
        )
        .await
    }

    /// Entry camera fired.
    pub async fn vehicle_arrived(&self, image: &[u8]) -> DomainResult<ParkingSession> {
        let raw = self.recognize(image).await?;
        self.enter(&raw).await
    }

    /// Exit camera fired.
    pub async fn vehicle_departed(&self, image: &[u8], discount: Decimal) -> DomainResult<ParkingSession> {
        let raw = self.recognize(image).await?;
        self.exit(&raw, discount).await
    }

    async fn recognize(&self, image: &[u8]) -> DomainResult<String> {
        let recognizer = self.recognizer.as_ref().ok_or_else(|| {
            DomainError::PlateNotRecognized("no plate recognizer configured".to_string())
        })?;
        let raw = recognizer.recognize(image).await.inspect_err(|e| {
            warn!(bytes = image.len(), error = %e, "Plate recognition failed");
        })?;
        debug!(raw_plate = %raw, "Plate recognized");
        Ok(raw)
    }
}

/// Normalized plate or `PlateNotRecognized`.
pub fn plate(raw: &str) -> DomainResult<String> {
    normalize_plate(raw).ok_or_else(|| DomainError::PlateNotRecognized(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal_macros::dec;

    use super::*;
    use crate::application::billing::TariffResolver;
    use crate::application::events::create_event_bus;
    use crate::application::parking::VehicleLocks;
    use crate::domain::BalancePolicy;
    use crate::infrastructure::database::repositories::SeaOrmUnitOfWorkFactory;
    use crate::infrastructure::database::testing::test_db;

    struct FixedPlate(&'static str);

    #[async_trait]
    impl PlateRecognizer for FixedPlate {
        async fn recognize(&self, _image: &[u8]) -> DomainResult<String> {
            Ok(self.0.to_string())
        }
    }

    struct Blind;

    #[async_trait]
    impl PlateRecognizer for Blind {
        async fn recognize(&self, _image: &[u8]) -> DomainResult<String> {
            Err(DomainError::PlateNotRecognized("glare".into()))
        }
    }

    async fn gate() -> GateService {
        let db = test_db().await;
        let engine = SessionEngine::new(
            Arc::new(SeaOrmUnitOfWorkFactory::new(db)),
            TariffResolver::default(),
            BalancePolicy::AllowNegative,
            VehicleLocks::new(Duration::from_secs(1)),
            create_event_bus(),
        );
        GateService::new(Arc::new(engine), RetryConfig::default())
    }

    #[test]
    fn plates_are_normalized() {
        assert_eq!(plate(" aa 1234-bb ").unwrap(), "AA1234BB");
        assert!(matches!(plate(" - "), Err(DomainError::PlateNotRecognized(_))));
    }

    #[tokio::test]
    async fn spellings_of_one_plate_share_a_session() {
        let gate = gate().await;

        gate.enter("aa 1234 bb").await.unwrap();
        let err = gate.enter("AA-1234-BB").await.unwrap_err();
        assert!(matches!(err, DomainError::SessionAlreadyOpen(ref p) if p == "AA1234BB"));

        let closed = gate.exit("aa1234bb", dec!(0)).await.unwrap();
        assert_eq!(closed.vehicle_number, "AA1234BB");
    }

    #[tokio::test]
    async fn camera_events_drive_the_engine() {
        let gate = gate().await.with_recognizer(Arc::new(FixedPlate("ka 0001 aa")));

        let opened = gate.vehicle_arrived(b"jpeg").await.unwrap();
        assert_eq!(opened.vehicle_number, "KA0001AA");

        let closed = gate.vehicle_departed(b"jpeg", dec!(0)).await.unwrap();
        assert!(!closed.in_parking);
    }

    #[tokio::test]
    async fn recognition_failure_is_reported() {
        let blind = gate().await.with_recognizer(Arc::new(Blind));
        let err = blind.vehicle_arrived(b"jpeg").await.unwrap_err();
        assert!(matches!(err, DomainError::PlateNotRecognized(_)));

        let no_camera = gate().await;
        assert!(matches!(
            no_camera.vehicle_arrived(b"jpeg").await,
            Err(DomainError::PlateNotRecognized(_))
        ));
    }
}
