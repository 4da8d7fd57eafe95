//! Date-time generator.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime, Utc};

use super::value_hints;
use crate::core::types::{TypeKey, Value};
use crate::generator::{GenerateError, Generator, GeneratorContext, Hints, Random};

/// Seconds in fifty 365-day years.
const FIFTY_YEARS: i64 = 50 * 365 * 86_400;

/// Granularity a generated date-time is truncated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn seconds(self) -> i64 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Minutes => 60,
            TimeUnit::Hours => 3_600,
            TimeUnit::Days => 86_400,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Window {
    #[default]
    Any,
    Past,
    Future,
}

/// Date-times with second precision, in UTC.
///
/// The default window is the Unix epoch up to fifty years from now.
/// `past()` and `future()` are relative to the moment of initialization.
#[derive(Debug, Clone, Default)]
pub struct DateTimeSpec {
    min: Option<NaiveDateTime>,
    max: Option<NaiveDateTime>,
    window: Window,
    truncate_to: Option<TimeUnit>,
    nullable: bool,
    bounds: OnceLock<(i64, i64)>,
}

impl DateTimeSpec {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Strictly before now.
    pub fn past(mut self) -> Self {
        self.window = Window::Past;
        self.min = None;
        self.max = None;
        self
    }

    /// At least a minute after now.
    pub fn future(mut self) -> Self {
        self.window = Window::Future;
        self.min = None;
        self.max = None;
        self
    }

    pub fn min(mut self, min: NaiveDateTime) -> Self {
        self.window = Window::Any;
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: NaiveDateTime) -> Self {
        self.window = Window::Any;
        self.max = Some(max);
        self
    }

    pub fn range(self, min: NaiveDateTime, max: NaiveDateTime) -> Self {
        self.min(min).max(max)
    }

    pub fn truncated_to(mut self, unit: TimeUnit) -> Self {
        self.truncate_to = Some(unit);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    fn resolve(&self, now: i64) -> (i64, i64) {
        match self.window {
            Window::Past => (0, now - 1),
            Window::Future => (now + 60, now + FIFTY_YEARS),
            Window::Any => (
                self.min.map_or(0, |t| t.and_utc().timestamp()),
                self.max
                    .map_or(now + FIFTY_YEARS, |t| t.and_utc().timestamp()),
            ),
        }
    }

    /// Draw an instant as seconds since the epoch.
    pub(super) fn draw_timestamp(&self, random: &mut Random) -> Result<i64, GenerateError> {
        let (min, max) = self
            .bounds
            .get()
            .copied()
            .unwrap_or_else(|| self.resolve(Utc::now().timestamp()));
        if min > max {
            return Err(GenerateError::InvalidRange {
                what: "datetimes",
                detail: format!("start {min} is after end {max}"),
            });
        }
        let secs = random.int_range(min, max);
        Ok(match self.truncate_to {
            Some(unit) => secs - secs.rem_euclid(unit.seconds()),
            None => secs,
        })
    }
}

impl Generator for DateTimeSpec {
    fn init(&self, _context: &GeneratorContext) {
        self.bounds
            .get_or_init(|| self.resolve(Utc::now().timestamp()));
    }

    fn generate(&self, random: &mut Random) -> Result<Value, GenerateError> {
        let secs = self.draw_timestamp(random)?;
        let instant = DateTime::from_timestamp(secs, 0).ok_or_else(|| GenerateError::InvalidRange {
            what: "datetimes",
            detail: format!("{secs} is outside the representable range"),
        })?;
        Ok(Value::DateTime(instant.naive_utc()))
    }

    fn hints(&self) -> Hints {
        value_hints(self.nullable)
    }

    fn target_type(&self) -> Option<TypeKey> {
        Some(TypeKey::datetime())
    }

    fn name(&self) -> &str {
        "datetimes()"
    }
}
