use serde::Serialize;

/// Which age decides the catch-up contribution limit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum CatchUpBasis {
    /// Age at the start of the projection, evaluated once for every year.
    #[default]
    StartingAge,
    /// Simulated age, re-evaluated each year.
    SimulatedAge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetirementPlan {
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_balance: f64,
    pub annual_salary: f64,
    pub contribution_percent: f64,
    pub annual_return_percent: f64,
    pub employer_match_percent: f64,
    pub match_limit_percent: f64,
    pub salary_growth_percent: f64,
}

impl RetirementPlan {
    pub fn years_to_retirement(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }
}

/// 2025 IRS 401(k) limits and the fixed planning assumptions.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionPolicy {
    pub base_limit: f64,
    pub catch_up_limit: f64,
    pub catch_up_age: u32,
    pub catch_up_basis: CatchUpBasis,
    pub inflation_rate: f64,
    pub safe_withdrawal_rate: f64,
}

impl Default for ProjectionPolicy {
    fn default() -> Self {
        Self {
            base_limit: 23_500.0,
            catch_up_limit: 31_000.0,
            catch_up_age: 50,
            catch_up_basis: CatchUpBasis::StartingAge,
            inflation_rate: 0.03,
            safe_withdrawal_rate: 0.04,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyProjection {
    pub year: u32,
    pub age: u32,
    pub salary: f64,
    pub contribution_limit: f64,
    pub employee_contribution: f64,
    pub max_matchable: f64,
    pub matchable: f64,
    pub employer_match: f64,
    pub cumulative_contributed: f64,
    pub cumulative_interest: f64,
    pub total_balance: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub years_to_retirement: u32,
    pub starting_balance: f64,
    pub final_balance: f64,
    pub total_employee_contributions: f64,
    pub total_employer_contributions: f64,
    pub total_contributions: f64,
    pub investment_growth: f64,
    pub purchasing_power: f64,
    pub starting_balance_percent: f64,
    pub employee_percent: f64,
    pub employer_percent: f64,
    pub growth_percent: f64,
    pub estimated_annual_income: f64,
    pub estimated_monthly_income: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub years: Vec<YearlyProjection>,
    pub summary: ProjectionSummary,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhatIfKind {
    HigherContribution,
    DelayedRetirement,
    Combined,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatIfScenario {
    pub kind: WhatIfKind,
    pub contribution_percent: f64,
    pub retirement_age: u32,
    pub final_balance: f64,
    pub difference: f64,
}
