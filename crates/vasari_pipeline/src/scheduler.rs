//! Clock-driven sweep over due scheduled drafts, plus user datetime parsing.
//!
//! The runner is stateless beyond its timezone: it reads the clock, converts
//! to UTC, and delegates to the pipeline's sweep. It is meant to be invoked
//! by an external periodic trigger, not to self-schedule.

use crate::{Pipeline, PublisherRegistry, SweepOutcome};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::info;
use vasari_core::VasariConfig;
use vasari_error::{ConfigError, ConfigErrorKind, ParseError, ParseErrorKind, VasariResult};
use vasari_interface::Store;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// Runs scheduled-publish sweeps in a deployment timezone.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerRunner {
    tz: Tz,
}

impl SchedulerRunner {
    /// Create a runner for an explicit timezone.
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Create a runner from the configured IANA timezone name.
    pub fn from_config(config: &VasariConfig) -> VasariResult<Self> {
        let tz: Tz = config.scheduler.timezone.parse().map_err(|_| {
            ConfigError::new(ConfigErrorKind::UnknownTimezone(
                config.scheduler.timezone.clone(),
            ))
        })?;
        Ok(Self { tz })
    }

    /// The runner's timezone.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Interpret a user-supplied local datetime in the runner's timezone.
    pub fn parse_user_datetime(&self, text: &str) -> VasariResult<DateTime<Utc>> {
        parse_user_datetime(text, self.tz)
    }

    /// Run one sweep with the current clock.
    pub async fn run_once<S: Store>(
        &self,
        pipeline: &Pipeline<S>,
        publishers: &PublisherRegistry,
    ) -> VasariResult<SweepOutcome> {
        let now = Utc::now();
        info!(%now, tz = %self.tz, "scheduler sweep");
        pipeline.run_scheduler_once(now, publishers).await
    }
}

/// Parse a `YYYY-MM-DD HH:MM` (or `T`-separated) local datetime in the
/// given timezone, returning UTC.
///
/// Ambiguous local times (DST fold) resolve to the earlier instant;
/// nonexistent local times (DST gap) are rejected.
pub fn parse_user_datetime(text: &str, tz: Tz) -> VasariResult<DateTime<Utc>> {
    let trimmed = text.trim();
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|local| local.with_timezone(&Utc))
                .ok_or_else(|| {
                    ParseError::new(ParseErrorKind::Datetime(trimmed.to_string())).into()
                });
        }
    }
    Err(ParseError::new(ParseErrorKind::Datetime(trimmed.to_string())).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_both_accepted_formats() {
        let a = parse_user_datetime("2026-03-01 09:30", chrono_tz::UTC).unwrap();
        let b = parse_user_datetime("2026-03-01T09:30", chrono_tz::UTC).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.hour(), 9);
    }

    #[test]
    fn converts_local_time_to_utc() {
        // Berlin is UTC+1 in January.
        let parsed = parse_user_datetime("2026-01-15 10:00", chrono_tz::Europe::Berlin).unwrap();
        assert_eq!(parsed.hour(), 9);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_user_datetime("tomorrow at noon", chrono_tz::UTC).is_err());
        assert!(parse_user_datetime("2026-13-40 99:99", chrono_tz::UTC).is_err());
    }

    #[test]
    fn runner_from_config_validates_timezone() {
        let mut config = VasariConfig::default();
        config.scheduler.timezone = "Mars/Olympus".to_string();
        assert!(SchedulerRunner::from_config(&config).is_err());

        config.scheduler.timezone = "Europe/Berlin".to_string();
        let runner = SchedulerRunner::from_config(&config).unwrap();
        assert_eq!(runner.timezone(), chrono_tz::Europe::Berlin);
    }
}
