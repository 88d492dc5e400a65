use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{AppError, AppResult};

/// Timestamp format the analytics API expects for `start`, `end` and `threshold`.
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format of user-entered custom range bounds.
pub const INPUT_FORMAT: &str = "%Y-%m-%d";

/// Trait for filter params that support date filtering with presets and custom bounds.
#[allow(clippy::wrong_self_convention)]
pub trait DateFilterable {
    fn from_date(&self) -> Option<&String>;
    fn to_date(&self) -> Option<&String>;
    fn preset(&self) -> Option<&String>;

    /// Resolve the params into a concrete range relative to `now`.
    ///
    /// Without a preset, explicit dates imply `custom`; with neither, the
    /// dashboard default (`last_30`) applies.
    fn resolve_date_range(&self, now: NaiveDateTime) -> AppResult<DateRange> {
        let from = non_empty(self.from_date());
        let to = non_empty(self.to_date());

        let preset = match non_empty(self.preset()) {
            Some(p) => p.parse::<DatePreset>()?,
            None if from.is_some() || to.is_some() => DatePreset::Custom,
            None => DatePreset::default(),
        };

        match resolve(preset, now) {
            Some(range) => Ok(range),
            None => DateRange::custom(from, to),
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    Last7,
    #[default]
    Last30,
    Last90,
    ThisMonth,
    ThisYear,
    LastYear,
    Custom,
}

impl FromStr for DatePreset {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last_7" => Ok(Self::Last7),
            "last_30" => Ok(Self::Last30),
            "last_90" => Ok(Self::Last90),
            "this_month" => Ok(Self::ThisMonth),
            "this_year" => Ok(Self::ThisYear),
            "last_year" => Ok(Self::LastYear),
            "custom" => Ok(Self::Custom),
            other => Err(AppError::Validation(format!("Unknown date preset '{}'", other))),
        }
    }
}

impl DatePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Last7 => "last_7",
            Self::Last30 => "last_30",
            Self::Last90 => "last_90",
            Self::ThisMonth => "this_month",
            Self::ThisYear => "this_year",
            Self::LastYear => "last_year",
            Self::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Last7 => "Last 7 days",
            Self::Last30 => "Last 30 days",
            Self::Last90 => "Last 90 days",
            Self::ThisMonth => "This month",
            Self::ThisYear => "This year",
            Self::LastYear => "Last year",
            Self::Custom => "Custom range",
        }
    }

    pub fn all() -> &'static [DatePreset] {
        &[
            Self::Last7,
            Self::Last30,
            Self::Last90,
            Self::ThisMonth,
            Self::ThisYear,
            Self::LastYear,
            Self::Custom,
        ]
    }
}

/// Turn a preset into concrete bounds. `Custom` has no computed range.
pub fn resolve(preset: DatePreset, now: NaiveDateTime) -> Option<DateRange> {
    let today = now.date();
    let (start, end) = match preset {
        DatePreset::Last7 => (today - Duration::days(7), today),
        DatePreset::Last30 => (today - Duration::days(30), today),
        DatePreset::Last90 => (today - Duration::days(90), today),
        DatePreset::ThisMonth => (month_start(today), month_end(today)),
        DatePreset::ThisYear => (year_start(today), year_end(today)),
        DatePreset::LastYear => {
            let last_year = year_start(today) - Duration::days(1);
            (year_start(last_year), year_end(last_year))
        }
        DatePreset::Custom => return None,
    };

    Some(DateRange {
        start: day_start(start),
        end: day_end(end),
        preset: Some(preset),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub preset: Option<DatePreset>,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> AppResult<Self> {
        if start > end {
            return Err(AppError::InvalidRange(
                "Start date must be before the end date.".into(),
            ));
        }
        Ok(Self {
            start,
            end,
            preset: None,
        })
    }

    /// Build a range from user-entered `YYYY-MM-DD` bounds covering both whole days.
    pub fn custom(from: Option<&str>, to: Option<&str>) -> AppResult<Self> {
        let (Some(from), Some(to)) = (from, to) else {
            return Err(AppError::InvalidRange(
                "Please select both start and end dates for a custom range.".into(),
            ));
        };

        let from_date = parse_input_date(from)?;
        let to_date = parse_input_date(to)?;

        let mut range = Self::new(day_start(from_date), day_end(to_date))?;
        range.preset = Some(DatePreset::Custom);
        range.previous_period()?;
        Ok(range)
    }

    /// The immediately preceding interval of identical duration, ending 1ms before `start`.
    ///
    /// Fails when that interval would start before the earliest representable date.
    pub fn previous_period(&self) -> AppResult<Self> {
        let length = self.end - self.start;
        let end = self.start.checked_sub_signed(Duration::milliseconds(1));
        match end.and_then(|end| Some((end.checked_sub_signed(length)?, end))) {
            Some((start, end)) => Ok(Self {
                start,
                end,
                preset: None,
            }),
            None => Err(AppError::InvalidRange(
                "The range has no comparable previous period.".into(),
            )),
        }
    }

    pub fn start_param(&self) -> String {
        self.start.format(WIRE_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(WIRE_FORMAT).to_string()
    }

    pub fn start_ymd(&self) -> String {
        self.start.format(INPUT_FORMAT).to_string()
    }

    pub fn end_ymd(&self) -> String {
        self.end.format(INPUT_FORMAT).to_string()
    }

    pub fn is_preset(&self, preset: &DatePreset) -> bool {
        self.preset == Some(*preset)
    }

    /// Human-readable label, e.g. "Last 30 days" or "Jan 1 – Mar 15, 2026".
    pub fn display_label(&self) -> String {
        match self.preset {
            Some(preset) if preset != DatePreset::Custom => preset.label().to_string(),
            _ => {
                let from = self.start.date();
                let to = self.end.date();
                if from.year() == to.year() {
                    format!("{} – {}, {}", from.format("%b %-d"), to.format("%b %-d"), to.year())
                } else {
                    format!(
                        "{}, {} – {}, {}",
                        from.format("%b %-d"),
                        from.year(),
                        to.format("%b %-d"),
                        to.year()
                    )
                }
            }
        }
    }

    /// Query string preserving the range in links: `preset=X` or the custom bounds.
    pub fn query_string(&self) -> String {
        let pairs: Vec<(&str, String)> = match self.preset {
            Some(preset) if preset != DatePreset::Custom => {
                vec![("preset", preset.as_str().to_string())]
            }
            _ => vec![
                ("preset", DatePreset::Custom.as_str().to_string()),
                ("from_date", self.start_ymd()),
                ("to_date", self.end_ymd()),
            ],
        };
        serde_urlencoded::to_string(pairs).unwrap_or_default()
    }
}

fn parse_input_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, INPUT_FORMAT).map_err(|_| {
        AppError::InvalidRange(format!("Invalid date '{}', expected YYYY-MM-DD", value))
    })
}

/// Midnight `days` days before `now`, as sent in the customer `threshold` param.
pub fn days_ago_start(now: NaiveDateTime, days: i64) -> NaiveDateTime {
    let date = Duration::try_days(days)
        .and_then(|delta| now.date().checked_sub_signed(delta))
        .unwrap_or(NaiveDate::MIN);
    day_start(date)
}

pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last millisecond of `date`.
pub fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| day_start(date))
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

fn month_end(date: NaiveDate) -> NaiveDate {
    month_start(month_start(date) + Duration::days(32)) - Duration::days(1)
}

fn year_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.ordinal0() as i64)
}

fn year_end(date: NaiveDate) -> NaiveDate {
    year_start(year_start(date) + Duration::days(366)) - Duration::days(1)
}
