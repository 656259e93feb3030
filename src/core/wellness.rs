//! Digital wellness score: a 0-100 rating of daily screen habits.

use serde::{Deserialize, Serialize};

use super::error::CalcError;

const MAX_SCORE: f64 = 100.0;
const HOURS_PER_DAY: f64 = 24.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgeGroup {
    Child,
    Teen,
    Adult,
}

impl AgeGroup {
    /// Recommended daily recreational screen time in hours.
    pub fn recreational_guideline(self) -> f64 {
        match self {
            AgeGroup::Child => 1.0,
            AgeGroup::Teen | AgeGroup::Adult => 2.0,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WellnessBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl WellnessBand {
    fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            WellnessBand::Excellent
        } else if score >= 60.0 {
            WellnessBand::Good
        } else if score >= 40.0 {
            WellnessBand::Fair
        } else {
            WellnessBand::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenTimeLog {
    pub social_media: f64,
    pub entertainment: f64,
    pub gaming: f64,
    pub productive: f64,
    pub educational: f64,
    pub pickups_per_day: u32,
    pub screen_before_bed_minutes: u32,
    pub age_group: AgeGroup,
}

impl ScreenTimeLog {
    pub fn recreational_hours(&self) -> f64 {
        self.social_media + self.entertainment + self.gaming
    }

    pub fn total_hours(&self) -> f64 {
        self.recreational_hours() + self.productive + self.educational
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Penalty {
    pub area: &'static str,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessReport {
    pub score: f64,
    pub band: WellnessBand,
    pub daily_hours: f64,
    pub weekly_hours: f64,
    pub yearly_hours: f64,
    pub days_per_year: f64,
    pub recreational_percent: f64,
    pub penalties: Vec<Penalty>,
    pub bonus: f64,
    pub recommendations: Vec<String>,
}

pub fn score(log: &ScreenTimeLog) -> Result<WellnessReport, CalcError> {
    for (field, hours) in [
        ("socialMedia", log.social_media),
        ("entertainment", log.entertainment),
        ("gaming", log.gaming),
        ("productive", log.productive),
        ("educational", log.educational),
    ] {
        if !hours.is_finite() || !(0.0..=HOURS_PER_DAY).contains(&hours) {
            return Err(CalcError::invalid_range(
                field,
                format!("must be between 0 and 24 hours, got {hours}"),
            ));
        }
    }

    let daily_hours = log.total_hours();
    if daily_hours > HOURS_PER_DAY {
        return Err(CalcError::invalid_range(
            "totalHours",
            format!("daily screen time cannot exceed 24 hours, got {daily_hours}"),
        ));
    }

    let guideline = log.age_group.recreational_guideline();
    let recreational = log.recreational_hours();
    let mut penalties = Vec::new();
    let mut recommendations = Vec::new();

    let mut apply = |area: &'static str, points: f64, cap: f64, advice: String| {
        let points = points.clamp(0.0, cap);
        if points > 0.0 {
            penalties.push(Penalty { area, points });
            recommendations.push(advice);
        }
    };

    apply(
        "recreational",
        (recreational - guideline) * 10.0,
        40.0,
        format!("Keep recreational screen time under {guideline} hours a day."),
    );
    apply(
        "social-media",
        (log.social_media - 1.0) * 8.0,
        20.0,
        "Limit social media to about an hour a day.".to_string(),
    );
    apply(
        "pickups",
        (log.pickups_per_day.saturating_sub(50) / 10) as f64 * 2.0,
        15.0,
        "Turn off non-essential notifications to cut down on pickups.".to_string(),
    );
    apply(
        "bedtime",
        (log.screen_before_bed_minutes.saturating_sub(30) / 15) as f64 * 3.0,
        15.0,
        "Put screens away at least 30 minutes before bed.".to_string(),
    );
    apply(
        "total",
        (daily_hours - 10.0) * 2.0,
        10.0,
        "Schedule screen-free blocks during the day.".to_string(),
    );

    let bonus = ((log.productive + log.educational) * 2.0).min(10.0);
    let penalty_total: f64 = penalties.iter().map(|p| p.points).sum();
    let score = (MAX_SCORE - penalty_total + bonus).clamp(0.0, MAX_SCORE);

    let yearly_hours = daily_hours * 365.0;
    let recreational_percent = if daily_hours > 0.0 {
        recreational / daily_hours * 100.0
    } else {
        0.0
    };

    Ok(WellnessReport {
        score,
        band: WellnessBand::from_score(score),
        daily_hours,
        weekly_hours: daily_hours * 7.0,
        yearly_hours,
        days_per_year: yearly_hours / HOURS_PER_DAY,
        recreational_percent,
        penalties,
        bonus,
        recommendations,
    })
}
