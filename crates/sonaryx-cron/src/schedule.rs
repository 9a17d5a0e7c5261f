// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cron expressions evaluated in a named timezone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use croner::Cron;
use sonaryx_core::SonaryxError;

/// A parsed recurring schedule.
#[derive(Debug, Clone)]
pub struct Schedule {
    expression: String,
    cron: Cron,
    tz: Tz,
}

impl Schedule {
    /// Parse a standard five-field cron expression, evaluated in `tz`.
    pub fn parse(expression: &str, tz: Tz) -> Result<Self, SonaryxError> {
        let cron = expression
            .trim()
            .parse::<Cron>()
            .map_err(|e| SonaryxError::Schedule {
                expression: expression.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            expression: expression.trim().to_string(),
            cron,
            tz,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The first fire time strictly after `after`.
    ///
    /// `None` when the expression can never match again.
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.cron
            .find_next_occurrence(&after.with_timezone(&self.tz), false)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn daily_schedule_fires_in_its_timezone() {
        let schedule = Schedule::parse("0 9 * * *", chrono_tz::Asia::Seoul).unwrap();
        // 2024-01-05 09:00 KST is 00:00 UTC.
        let before = Utc.with_ymd_and_hms(2024, 1, 4, 23, 0, 0).unwrap();
        assert_eq!(
            schedule.next_after(before),
            Some(Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn next_fire_is_strictly_after() {
        let schedule = Schedule::parse("0 20 * * *", Tz::UTC).unwrap();
        let at_fire = Utc.with_ymd_and_hms(2024, 1, 5, 20, 0, 0).unwrap();
        assert_eq!(
            schedule.next_after(at_fire),
            Some(Utc.with_ymd_and_hms(2024, 1, 6, 20, 0, 0).unwrap())
        );
    }

    #[test]
    fn invalid_expression_is_a_schedule_error() {
        let err = Schedule::parse("every morning", Tz::UTC).unwrap_err();
        match err {
            SonaryxError::Schedule { expression, .. } => assert_eq!(expression, "every morning"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(Schedule::parse("61 9 * * *", Tz::UTC).is_err());
    }

    #[test]
    fn expression_is_trimmed() {
        let schedule = Schedule::parse("  0 9 * * *\n", Tz::UTC).unwrap();
        assert_eq!(schedule.expression(), "0 9 * * *");
        assert_eq!(schedule.timezone(), Tz::UTC);
    }
}
