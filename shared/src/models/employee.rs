//! Employee Model
//!
//! Schedule-type-specific fields (`shift_parity`, `sunday_offs`) are
//! only meaningful for their corresponding schedule type; the other
//! variants simply ignore them.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Closed two-value gender set, normalized from free-text sheet cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
}

impl Gender {
    /// Case-insensitive match against the tokens the sheet emits.
    /// Unrecognized input falls back to the default (`Female`).
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_uppercase().as_str() {
            "M" | "MALE" | "MASCULINO" => Self::Male,
            _ => Self::Female,
        }
    }
}

/// Work schedule pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScheduleType {
    /// Six days on, one fixed day off per week, plus selected Sundays
    /// off by occurrence index.
    #[default]
    #[serde(rename = "6x1")]
    WeeklyRotation,
    /// 12 hours on, 36 off; works either even or odd calendar days.
    #[serde(rename = "12x36")]
    TwelveHour,
    /// Called in on demand, never auto-scheduled.
    #[serde(rename = "ON_CALL")]
    OnCall,
}

/// Which calendar-day parity a 12x36 employee works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftParity {
    #[default]
    Even,
    Odd,
}

/// Vacation entitlement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VacationStatus {
    #[default]
    Pending,
    Granted,
}

/// One uniform piece and how many units are held/required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
}

/// A staff member assigned to exactly one sector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub sector_id: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub schedule_type: ScheduleType,
    /// Only meaningful when `schedule_type` is `TwelveHour`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_parity: Option<ShiftParity>,
    #[serde(default)]
    pub working_hours: String,
    /// Fixed weekly day off (English weekday name). WeeklyRotation only.
    #[serde(default)]
    pub weekly_day_off: String,
    /// Which Sunday occurrences of the month are off (1-based).
    /// WeeklyRotation only.
    #[serde(default)]
    pub sunday_offs: Vec<u32>,
    #[serde(default)]
    pub vacation_status: VacationStatus,
    #[serde(default)]
    pub uniforms: Vec<UniformItem>,
}

impl Employee {
    /// Parsed fixed weekly day off, if the stored string is a weekday.
    pub fn weekly_day_off(&self) -> Option<Weekday> {
        self.weekly_day_off.trim().parse().ok()
    }

    /// Whether this employee is on shift on `date`.
    ///
    /// Inactive employees are never scheduled. OnCall workers are
    /// never auto-scheduled; they are picked from the extras roster.
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        if !self.active {
            return false;
        }
        match self.schedule_type {
            ScheduleType::WeeklyRotation => {
                if self.weekly_day_off() == Some(date.weekday()) {
                    return false;
                }
                if date.weekday() == Weekday::Sun
                    && self.sunday_offs.contains(&sunday_occurrence(date))
                {
                    return false;
                }
                true
            }
            ScheduleType::TwelveHour => {
                let parity = if date.day() % 2 == 0 {
                    ShiftParity::Even
                } else {
                    ShiftParity::Odd
                };
                self.shift_parity.unwrap_or_default() == parity
            }
            ScheduleType::OnCall => false,
        }
    }
}

/// Which nth Sunday of its month `date` is (1-based). Returns 0 for
/// non-Sundays.
pub fn sunday_occurrence(date: NaiveDate) -> u32 {
    if date.weekday() != Weekday::Sun {
        return 0;
    }
    (date.day() - 1) / 7 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly(day_off: &str, sunday_offs: &[u32]) -> Employee {
        Employee {
            id: "1".into(),
            name: "Ana".into(),
            active: true,
            schedule_type: ScheduleType::WeeklyRotation,
            weekly_day_off: day_off.into(),
            sunday_offs: sunday_offs.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn gender_parses_known_tokens_case_insensitively() {
        assert_eq!(Gender::parse("masculino"), Gender::Male);
        assert_eq!(Gender::parse(" M "), Gender::Male);
        assert_eq!(Gender::parse("Feminino"), Gender::Female);
        assert_eq!(Gender::parse("???"), Gender::Female);
    }

    #[test]
    fn sunday_occurrence_counts_within_month() {
        // 2026-08: Sundays fall on 2, 9, 16, 23, 30.
        assert_eq!(sunday_occurrence(date(2026, 8, 2)), 1);
        assert_eq!(sunday_occurrence(date(2026, 8, 23)), 4);
        assert_eq!(sunday_occurrence(date(2026, 8, 30)), 5);
        assert_eq!(sunday_occurrence(date(2026, 8, 24)), 0);
    }

    #[test]
    fn weekly_rotation_respects_fixed_day_off() {
        let emp = weekly("Monday", &[]);
        assert!(!emp.is_scheduled_on(date(2026, 8, 24))); // Monday
        assert!(emp.is_scheduled_on(date(2026, 8, 25))); // Tuesday
    }

    #[test]
    fn weekly_rotation_respects_sunday_occurrences() {
        let emp = weekly("Monday", &[1, 3]);
        assert!(!emp.is_scheduled_on(date(2026, 8, 2))); // 1st Sunday
        assert!(emp.is_scheduled_on(date(2026, 8, 9))); // 2nd Sunday
        assert!(!emp.is_scheduled_on(date(2026, 8, 16))); // 3rd Sunday
    }

    #[test]
    fn twelve_hour_shift_follows_day_parity() {
        let mut emp = weekly("", &[]);
        emp.schedule_type = ScheduleType::TwelveHour;
        emp.shift_parity = Some(ShiftParity::Odd);
        assert!(emp.is_scheduled_on(date(2026, 8, 23)));
        assert!(!emp.is_scheduled_on(date(2026, 8, 24)));
    }

    #[test]
    fn on_call_and_inactive_are_never_scheduled() {
        let mut emp = weekly("Friday", &[]);
        emp.schedule_type = ScheduleType::OnCall;
        assert!(!emp.is_scheduled_on(date(2026, 8, 25)));

        let mut idle = weekly("Friday", &[]);
        idle.active = false;
        assert!(!idle.is_scheduled_on(date(2026, 8, 25)));
    }

    #[test]
    fn schedule_type_wire_tokens() {
        assert_eq!(
            serde_json::to_string(&ScheduleType::WeeklyRotation).unwrap(),
            "\"6x1\""
        );
        let t: ScheduleType = serde_json::from_str("\"12x36\"").unwrap();
        assert_eq!(t, ScheduleType::TwelveHour);
    }
}
