use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

use shared_config::AppConfig;

use crate::models::SLOT_LABEL_FORMAT;

/// Hourly slot grid over a look-ahead window.
///
/// Labels are computed on demand and never stored; a label stops being valid
/// once its hour is earlier than the current hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCalendar {
    pub days: u32,
    pub start_hour: u32,
    pub end_hour: u32,
    pub per_doctor: usize,
}

impl Default for SlotCalendar {
    fn default() -> Self {
        Self {
            days: 3,
            start_hour: 9,
            end_hour: 16,
            per_doctor: 5,
        }
    }
}

impl SlotCalendar {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            days: config.slot_days,
            start_hour: config.slot_start_hour,
            end_hour: config.slot_end_hour,
            per_doctor: config.slots_per_doctor,
        }
    }

    /// Every slot from the current hour through the end of the window.
    pub fn slots_at(&self, now: NaiveDateTime) -> Vec<String> {
        let current_hour = truncate_to_hour(now);
        let end_hour = self.end_hour.min(23);
        let mut out = Vec::new();

        for day in 0..self.days {
            let date = current_hour.date() + Duration::days(i64::from(day));
            for hour in self.start_hour..=end_hour {
                let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0) else {
                    continue;
                };
                let slot = date.and_time(time);
                if slot >= current_hour {
                    out.push(slot.format(SLOT_LABEL_FORMAT).to_string());
                }
            }
        }

        out
    }

    /// Whether `label` is part of the grid valid at `now`.
    pub fn contains_at(&self, label: &str, now: NaiveDateTime) -> bool {
        self.slots_at(now).iter().any(|slot| slot == label)
    }
}

fn truncate_to_hour(now: NaiveDateTime) -> NaiveDateTime {
    now.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}
