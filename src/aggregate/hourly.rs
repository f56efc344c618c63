use chrono::{TimeZone, Timelike};

use super::Activity;

pub const HOURS_IN_DAY: usize = 24;

/// Hours of activity for every hour of the day, indexed by the local hour the activity started
/// in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HourlyUsage([f64; HOURS_IN_DAY]);

impl HourlyUsage {
    /// Activities without a readable timestamp don't belong to any hour and are left out.
    pub fn from_activities<Tz: TimeZone>(activities: &[Activity], tz: &Tz) -> Self {
        let slots = activities
            .iter()
            .filter_map(|activity| {
                activity
                    .timestamp
                    .map(|v| (v.with_timezone(tz).hour() as usize, activity.hours()))
            })
            .fold([0.; HOURS_IN_DAY], |mut slots, (hour, hours)| {
                slots[hour] += hours;
                slots
            });
        Self(slots)
    }

    pub fn get(&self, hour: usize) -> f64 {
        self.0[hour]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}
