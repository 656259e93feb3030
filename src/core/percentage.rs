use serde::{Deserialize, Serialize};

use super::arith::percent_to_rate;
use super::error::CalcError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PercentageKind {
    #[serde(alias = "percentOf")]
    PercentOf,
    #[serde(alias = "whatPercent")]
    WhatPercent,
    #[serde(alias = "percentChange")]
    PercentChange,
    #[serde(alias = "increaseBy")]
    IncreaseBy,
    #[serde(alias = "decreaseBy")]
    DecreaseBy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentageQuery {
    pub kind: PercentageKind,
    pub value1: f64,
    pub value2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageOutcome {
    pub kind: PercentageKind,
    pub value1: f64,
    pub value2: f64,
    pub result: f64,
    pub formula: String,
}

/// `percent`% of `value`.
pub fn percent_of(percent: f64, value: f64) -> f64 {
    value * percent_to_rate(percent)
}

/// What percent `part` is of `whole`.
pub fn what_percent(part: f64, whole: f64) -> Result<f64, CalcError> {
    if whole == 0.0 {
        return Err(CalcError::division_by_zero("what-percent whole"));
    }
    Ok(part / whole * 100.0)
}

/// Relative change, always measured against `original`.
pub fn percent_change(original: f64, updated: f64) -> Result<f64, CalcError> {
    if original == 0.0 {
        return Err(CalcError::division_by_zero("percent-change original"));
    }
    Ok((updated - original) / original * 100.0)
}

pub fn increase_by(percent: f64, value: f64) -> f64 {
    value * (1.0 + percent_to_rate(percent))
}

pub fn decrease_by(percent: f64, value: f64) -> f64 {
    value * (1.0 - percent_to_rate(percent))
}

pub fn evaluate(query: &PercentageQuery) -> Result<PercentageOutcome, CalcError> {
    let PercentageQuery {
        kind,
        value1: x,
        value2: y,
    } = *query;
    let (result, formula) = match kind {
        PercentageKind::PercentOf => {
            let r = percent_of(x, y);
            (r, format!("{y} × ({x} / 100) = {r}"))
        }
        PercentageKind::WhatPercent => {
            let r = what_percent(x, y)?;
            (r, format!("({x} / {y}) × 100 = {r}%"))
        }
        PercentageKind::PercentChange => {
            let r = percent_change(x, y)?;
            (r, format!("(({y} - {x}) / {x}) × 100 = {r}%"))
        }
        PercentageKind::IncreaseBy => {
            let r = increase_by(x, y);
            (r, format!("{y} × (1 + {x} / 100) = {r}"))
        }
        PercentageKind::DecreaseBy => {
            let r = decrease_by(x, y);
            (r, format!("{y} × (1 - {x} / 100) = {r}"))
        }
    };

    Ok(PercentageOutcome {
        kind,
        value1: x,
        value2: y,
        result,
        formula,
    })
}
