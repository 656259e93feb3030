//! Salary/hourly conversion and a federal income tax estimate using the 2025
//! brackets and standard deductions.

use serde::{Deserialize, Serialize};

use super::error::CalcError;

const SOCIAL_SECURITY_RATE: f64 = 0.062;
const SOCIAL_SECURITY_WAGE_BASE: f64 = 176_100.0;
const MEDICARE_RATE: f64 = 0.0145;
const WORKDAYS_PER_WEEK: f64 = 5.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayPeriod {
    Hourly,
    Daily,
    Weekly,
    Biweekly,
    #[serde(alias = "semiMonthly")]
    SemiMonthly,
    Monthly,
    #[serde(alias = "yearly")]
    Annual,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilingStatus {
    Single,
    #[serde(alias = "marriedFilingJointly", alias = "married")]
    MarriedFilingJointly,
    #[serde(alias = "headOfHousehold")]
    HeadOfHousehold,
}

/// Upper bound of each bracket and its rate; the last bracket is unbounded.
type Brackets = [(f64, f64); 7];

const SINGLE_BRACKETS: Brackets = [
    (11_925.0, 0.10),
    (48_475.0, 0.12),
    (103_350.0, 0.22),
    (197_300.0, 0.24),
    (250_525.0, 0.32),
    (626_350.0, 0.35),
    (f64::INFINITY, 0.37),
];

const JOINT_BRACKETS: Brackets = [
    (23_850.0, 0.10),
    (96_950.0, 0.12),
    (206_700.0, 0.22),
    (394_600.0, 0.24),
    (501_050.0, 0.32),
    (751_600.0, 0.35),
    (f64::INFINITY, 0.37),
];

const HEAD_OF_HOUSEHOLD_BRACKETS: Brackets = [
    (17_000.0, 0.10),
    (64_850.0, 0.12),
    (103_350.0, 0.22),
    (197_300.0, 0.24),
    (250_500.0, 0.32),
    (626_350.0, 0.35),
    (f64::INFINITY, 0.37),
];

impl FilingStatus {
    pub fn standard_deduction(self) -> f64 {
        match self {
            FilingStatus::Single => 15_000.0,
            FilingStatus::MarriedFilingJointly => 30_000.0,
            FilingStatus::HeadOfHousehold => 22_500.0,
        }
    }

    fn brackets(self) -> &'static Brackets {
        match self {
            FilingStatus::Single => &SINGLE_BRACKETS,
            FilingStatus::MarriedFilingJointly => &JOINT_BRACKETS,
            FilingStatus::HeadOfHousehold => &HEAD_OF_HOUSEHOLD_BRACKETS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalaryInput {
    pub amount: f64,
    pub period: PayPeriod,
    pub hours_per_week: f64,
    pub weeks_per_year: f64,
    pub filing_status: FilingStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryBreakdown {
    pub annual: f64,
    pub monthly: f64,
    pub semi_monthly: f64,
    pub biweekly: f64,
    pub weekly: f64,
    pub daily: f64,
    pub hourly: f64,
    pub hours_per_year: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxEstimate {
    pub filing_status: FilingStatus,
    pub gross_income: f64,
    pub standard_deduction: f64,
    pub taxable_income: f64,
    pub federal_tax: f64,
    pub social_security: f64,
    pub medicare: f64,
    pub total_tax: f64,
    pub marginal_rate: f64,
    pub effective_rate: f64,
    pub take_home_annual: f64,
    pub take_home_monthly: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryReport {
    pub breakdown: SalaryBreakdown,
    pub tax: TaxEstimate,
    pub take_home_hourly: f64,
}

pub fn annualize(input: &SalaryInput) -> Result<f64, CalcError> {
    let weeks = input.weeks_per_year;
    let hours = input.hours_per_week;
    let annual = match input.period {
        PayPeriod::Hourly => input.amount * hours * weeks,
        PayPeriod::Daily => input.amount * WORKDAYS_PER_WEEK * weeks,
        PayPeriod::Weekly => input.amount * weeks,
        PayPeriod::Biweekly => input.amount * weeks / 2.0,
        PayPeriod::SemiMonthly => input.amount * 24.0,
        PayPeriod::Monthly => input.amount * 12.0,
        PayPeriod::Annual => input.amount,
    };
    if !annual.is_finite() {
        return Err(CalcError::invalid_range(
            "amount",
            format!("annualized salary is not a finite number: {annual}"),
        ));
    }
    Ok(annual)
}

pub fn breakdown(input: &SalaryInput) -> Result<SalaryBreakdown, CalcError> {
    if input.hours_per_week == 0.0 {
        return Err(CalcError::division_by_zero("hours per week"));
    }
    if input.weeks_per_year == 0.0 {
        return Err(CalcError::division_by_zero("weeks per year"));
    }

    let annual = annualize(input)?;
    let hours_per_year = input.hours_per_week * input.weeks_per_year;
    let weekly = annual / input.weeks_per_year;

    Ok(SalaryBreakdown {
        annual,
        monthly: annual / 12.0,
        semi_monthly: annual / 24.0,
        biweekly: weekly * 2.0,
        weekly,
        daily: weekly / WORKDAYS_PER_WEEK,
        hourly: annual / hours_per_year,
        hours_per_year,
    })
}

pub fn estimate_tax(gross_income: f64, filing_status: FilingStatus) -> TaxEstimate {
    let gross = gross_income.max(0.0);
    let standard_deduction = filing_status.standard_deduction();
    let taxable_income = (gross - standard_deduction).max(0.0);

    let mut federal_tax = 0.0;
    let mut lower = 0.0;
    let mut marginal_rate = 0.0;
    for &(upper, rate) in filing_status.brackets() {
        if taxable_income <= lower {
            break;
        }
        federal_tax += (taxable_income.min(upper) - lower) * rate;
        marginal_rate = rate;
        lower = upper;
    }

    let social_security = gross.min(SOCIAL_SECURITY_WAGE_BASE) * SOCIAL_SECURITY_RATE;
    let medicare = gross * MEDICARE_RATE;
    let total_tax = federal_tax + social_security + medicare;
    let effective_rate = if gross > 0.0 {
        total_tax / gross * 100.0
    } else {
        0.0
    };
    let take_home_annual = gross - total_tax;

    TaxEstimate {
        filing_status,
        gross_income: gross,
        standard_deduction,
        taxable_income,
        federal_tax,
        social_security,
        medicare,
        total_tax,
        marginal_rate: marginal_rate * 100.0,
        effective_rate,
        take_home_annual,
        take_home_monthly: take_home_annual / 12.0,
    }
}

pub fn salary_report(input: &SalaryInput) -> Result<SalaryReport, CalcError> {
    let breakdown = breakdown(input)?;
    let tax = estimate_tax(breakdown.annual, input.filing_status);
    let take_home_hourly = tax.take_home_annual / breakdown.hours_per_year;
    Ok(SalaryReport {
        breakdown,
        tax,
        take_home_hourly,
    })
}
