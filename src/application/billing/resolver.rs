//! Tariff resolution for a timestamp
//!
//! Two steps: fetch the candidate windows for the local weekday, then pick
//! one according to [`ResolverPolicy`].

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::tariff::weekday_name;
use crate::domain::{DomainError, DomainResult, Tariff, TariffStore, TariffWindow};

/// Which windows of the local weekday are candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffMatching {
    /// Every window flagged for the weekday; time of day is ignored
    DayOfWeek,
    /// Windows flagged for the weekday whose time range covers the timestamp;
    /// an overnight window flagged for the previous day covers its early hours
    #[default]
    DayAndTime,
}

/// How to choose among several matching windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Lowest window id
    First,
    /// Shortest window, then lowest window id
    #[default]
    Narrowest,
    /// More than one distinct tariff is a configuration error
    Reject,
}

#[derive(Debug, Clone, Copy)]
pub struct ResolverPolicy {
    pub matching: TariffMatching,
    pub tie_break: TieBreak,
    /// Offset of the car park's wall clock from UTC
    pub utc_offset: FixedOffset,
}

impl ResolverPolicy {
    pub fn new(
        matching: TariffMatching,
        tie_break: TieBreak,
        utc_offset_minutes: i32,
    ) -> DomainResult<Self> {
        let utc_offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "utc_offset_minutes {} is outside ±24h",
                    utc_offset_minutes
                ))
            })?;
        Ok(Self {
            matching,
            tie_break,
            utc_offset,
        })
    }
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            matching: TariffMatching::default(),
            tie_break: TieBreak::default(),
            utc_offset: Utc.fix(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TariffResolver {
    policy: ResolverPolicy,
}

impl TariffResolver {
    pub fn new(policy: ResolverPolicy) -> Self {
        Self { policy }
    }

    /// Tariff in force at `at`.
    pub async fn resolve(&self, tariffs: &dyn TariffStore, at: DateTime<Utc>) -> DomainResult<Tariff> {
        let day = at.with_timezone(&self.policy.utc_offset).weekday();
        let mut candidates = tariffs.list_windows_for_day(day).await?;
        if self.policy.matching == TariffMatching::DayAndTime {
            // Overnight windows flagged for yesterday still run this morning.
            let overnight = tariffs
                .list_windows_for_day(day.pred())
                .await?
                .into_iter()
                .filter(|(_, w)| w.wraps_midnight());
            candidates.extend(overnight);
            candidates.sort_by_key(|(_, w)| w.id);
            candidates.dedup_by_key(|(_, w)| w.id);
        }
        debug!(
            at = %at,
            day = weekday_name(day),
            candidates = candidates.len(),
            "Resolving tariff"
        );
        self.select(candidates, at)
    }

    /// Pick one tariff among the candidate windows (ordered by window id).
    pub fn select(&self, candidates: Vec<(Tariff, TariffWindow)>, at: DateTime<Utc>) -> DomainResult<Tariff> {
        let local = at.with_timezone(&self.policy.utc_offset);
        let (day, time) = (local.weekday(), local.time());
        let matching: Vec<(Tariff, TariffWindow)> = candidates
            .into_iter()
            .filter(|(_, window)| match self.policy.matching {
                TariffMatching::DayOfWeek => window.is_active_on(day),
                TariffMatching::DayAndTime => window.covers(day, time),
            })
            .collect();

        let chosen = match self.policy.tie_break {
            TieBreak::First => matching.into_iter().min_by_key(|(_, w)| w.id),
            TieBreak::Narrowest => matching
                .into_iter()
                .min_by_key(|(_, w)| (w.span_seconds(), w.id)),
            TieBreak::Reject => {
                let distinct: BTreeSet<i32> = matching.iter().map(|(t, _)| t.id).collect();
                if distinct.len() > 1 {
                    let names: Vec<&str> = matching.iter().map(|(t, _)| t.name.as_str()).collect();
                    return Err(DomainError::InvalidTariffConfiguration(format!(
                        "{} tariffs match {}: {}",
                        distinct.len(),
                        at,
                        names.join(", ")
                    )));
                }
                matching.into_iter().next()
            }
        };

        let (tariff, window) = chosen.ok_or(DomainError::NoTariffForTimestamp(at))?;
        debug!(tariff_id = tariff.id, window_id = window.id, tariff = %tariff.name, "Tariff resolved");
        Ok(tariff)
    }
}
