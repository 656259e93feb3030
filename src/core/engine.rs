use super::arith::percent_to_rate;
use super::error::CalcError;
use super::types::{
    CatchUpBasis, Projection, ProjectionPolicy, ProjectionSummary, RetirementPlan, WhatIfKind,
    WhatIfScenario, YearlyProjection,
};

const WHAT_IF_CONTRIBUTION_BOOST: f64 = 5.0;
const WHAT_IF_CONTRIBUTION_CAP: f64 = 50.0;
const WHAT_IF_RETIREMENT_DELAY: u32 = 3;

#[derive(Debug, Clone, Copy)]
struct ContributionFlow {
    limit: f64,
    employee: f64,
    max_matchable: f64,
    matchable: f64,
    employer: f64,
}

impl ContributionFlow {
    fn total(self) -> f64 {
        self.employee + self.employer
    }
}

#[derive(Debug)]
struct Account {
    balance: f64,
    salary: f64,
    employee_total: f64,
    employer_total: f64,
}

impl Account {
    fn contributed(&self) -> f64 {
        self.employee_total + self.employer_total
    }
}

pub fn run_projection(plan: &RetirementPlan) -> Projection {
    run_projection_with_policy(plan, &ProjectionPolicy::default())
}

/// Year-by-year simulation. Inputs are not validated here: callers clamp or
/// call [`validate_plan`] first, and invalid numbers propagate as NaN.
pub fn run_projection_with_policy(plan: &RetirementPlan, policy: &ProjectionPolicy) -> Projection {
    let years_to_retirement = plan.years_to_retirement();
    let return_rate = percent_to_rate(plan.annual_return_percent);
    let salary_growth = percent_to_rate(plan.salary_growth_percent);

    let mut account = Account {
        balance: plan.current_balance,
        salary: plan.annual_salary,
        employee_total: 0.0,
        employer_total: 0.0,
    };
    let mut years = Vec::with_capacity(years_to_retirement as usize);

    for year in 1..=years_to_retirement {
        if year > 1 {
            account.salary *= 1.0 + salary_growth;
        }

        let flow = contribution_flow(plan, policy, account.salary, year);
        account.balance += flow.total();
        account.employee_total += flow.employee;
        account.employer_total += flow.employer;

        // Growth lands after the year's contributions, so new money earns a full year.
        account.balance *= 1.0 + return_rate;

        years.push(YearlyProjection {
            year,
            age: plan.current_age + year,
            salary: account.salary,
            contribution_limit: flow.limit,
            employee_contribution: flow.employee,
            max_matchable: flow.max_matchable,
            matchable: flow.matchable,
            employer_match: flow.employer,
            cumulative_contributed: account.contributed(),
            cumulative_interest: account.balance - account.contributed() - plan.current_balance,
            total_balance: account.balance,
        });
    }

    let summary = summarize(plan, policy, &account, years_to_retirement);
    Projection { years, summary }
}

pub fn validate_plan(plan: &RetirementPlan) -> Result<(), CalcError> {
    if plan.retirement_age <= plan.current_age {
        return Err(CalcError::invalid_range(
            "retirementAge",
            format!(
                "must be greater than current age {}, got {}",
                plan.current_age, plan.retirement_age
            ),
        ));
    }

    for (field, value) in [
        ("currentBalance", plan.current_balance),
        ("annualSalary", plan.annual_salary),
        ("contributionPercent", plan.contribution_percent),
        ("employerMatchPercent", plan.employer_match_percent),
        ("matchLimitPercent", plan.match_limit_percent),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(CalcError::invalid_range(
                field,
                format!("must be a non-negative number, got {value}"),
            ));
        }
    }

    for (field, value) in [
        ("annualReturnPercent", plan.annual_return_percent),
        ("salaryGrowthPercent", plan.salary_growth_percent),
    ] {
        if !value.is_finite() || value <= -100.0 {
            return Err(CalcError::invalid_range(
                field,
                format!("must be greater than -100, got {value}"),
            ));
        }
    }

    Ok(())
}

/// Three independent re-runs of the plan: a higher contribution rate, a
/// later retirement, and both together.
pub fn run_what_if_scenarios(
    plan: &RetirementPlan,
    policy: &ProjectionPolicy,
    baseline_final_balance: f64,
) -> Vec<WhatIfScenario> {
    let boosted_contribution =
        (plan.contribution_percent + WHAT_IF_CONTRIBUTION_BOOST).min(WHAT_IF_CONTRIBUTION_CAP);
    let delayed_retirement = plan.retirement_age + WHAT_IF_RETIREMENT_DELAY;

    [
        (
            WhatIfKind::HigherContribution,
            boosted_contribution,
            plan.retirement_age,
        ),
        (
            WhatIfKind::DelayedRetirement,
            plan.contribution_percent,
            delayed_retirement,
        ),
        (
            WhatIfKind::Combined,
            boosted_contribution,
            delayed_retirement,
        ),
    ]
    .into_iter()
    .map(|(kind, contribution_percent, retirement_age)| {
        let variant = RetirementPlan {
            contribution_percent,
            retirement_age,
            ..plan.clone()
        };
        let final_balance = run_projection_with_policy(&variant, policy)
            .summary
            .final_balance;
        WhatIfScenario {
            kind,
            contribution_percent,
            retirement_age,
            final_balance,
            difference: final_balance - baseline_final_balance,
        }
    })
    .collect()
}

fn contribution_limit(plan: &RetirementPlan, policy: &ProjectionPolicy, year: u32) -> f64 {
    let age = match policy.catch_up_basis {
        CatchUpBasis::StartingAge => plan.current_age,
        CatchUpBasis::SimulatedAge => plan.current_age + year,
    };
    if age >= policy.catch_up_age {
        policy.catch_up_limit
    } else {
        policy.base_limit
    }
}

fn contribution_flow(
    plan: &RetirementPlan,
    policy: &ProjectionPolicy,
    salary: f64,
    year: u32,
) -> ContributionFlow {
    let limit = contribution_limit(plan, policy, year);
    let desired = salary * percent_to_rate(plan.contribution_percent);
    let employee = desired.min(limit);

    let max_matchable = salary * percent_to_rate(plan.match_limit_percent);
    let matchable = employee.min(max_matchable);
    let employer = matchable * percent_to_rate(plan.employer_match_percent);

    ContributionFlow {
        limit,
        employee,
        max_matchable,
        matchable,
        employer,
    }
}

fn summarize(
    plan: &RetirementPlan,
    policy: &ProjectionPolicy,
    account: &Account,
    years_to_retirement: u32,
) -> ProjectionSummary {
    let final_balance = account.balance;
    let total_contributions = account.contributed();
    let investment_growth = final_balance - total_contributions - plan.current_balance;
    let purchasing_power =
        final_balance / (1.0 + policy.inflation_rate).powi(years_to_retirement as i32);

    let share = |component: f64| {
        if final_balance == 0.0 {
            0.0
        } else {
            component / final_balance * 100.0
        }
    };
    let estimated_annual_income = final_balance * policy.safe_withdrawal_rate;

    ProjectionSummary {
        years_to_retirement,
        starting_balance: plan.current_balance,
        final_balance,
        total_employee_contributions: account.employee_total,
        total_employer_contributions: account.employer_total,
        total_contributions,
        investment_growth,
        purchasing_power,
        starting_balance_percent: share(plan.current_balance),
        employee_percent: share(account.employee_total),
        employer_percent: share(account.employer_total),
        growth_percent: share(investment_growth),
        estimated_annual_income,
        estimated_monthly_income: estimated_annual_income / 12.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_plan() -> RetirementPlan {
        RetirementPlan {
            current_age: 35,
            retirement_age: 65,
            current_balance: 50_000.0,
            annual_salary: 80_000.0,
            contribution_percent: 10.0,
            annual_return_percent: 7.0,
            employer_match_percent: 50.0,
            match_limit_percent: 6.0,
            salary_growth_percent: 3.0,
        }
    }

    #[test]
    fn reference_scenario_runs_thirty_increasing_years() {
        let plan = sample_plan();
        let projection = run_projection(&plan);

        assert_eq!(projection.summary.years_to_retirement, 30);
        assert_eq!(projection.years.len(), 30);
        for (idx, year) in projection.years.iter().enumerate() {
            assert_eq!(year.year as usize, idx + 1);
            assert_eq!(year.age, plan.current_age + year.year);
        }
        for pair in projection.years.windows(2) {
            assert!(pair[1].total_balance > pair[0].total_balance);
        }
        let last = projection.years.last().expect("thirty years");
        assert_approx(projection.summary.final_balance, last.total_balance);
    }

    #[test]
    fn single_year_matches_hand_calculation() {
        let plan = RetirementPlan {
            current_age: 40,
            retirement_age: 41,
            current_balance: 1_000.0,
            annual_salary: 50_000.0,
            contribution_percent: 10.0,
            annual_return_percent: 10.0,
            employer_match_percent: 50.0,
            match_limit_percent: 6.0,
            salary_growth_percent: 3.0,
        };
        let projection = run_projection(&plan);
        let year = &projection.years[0];

        assert_approx(year.salary, 50_000.0);
        assert_approx(year.employee_contribution, 5_000.0);
        assert_approx(year.max_matchable, 3_000.0);
        assert_approx(year.matchable, 3_000.0);
        assert_approx(year.employer_match, 1_500.0);
        assert_approx(year.total_balance, 8_250.0);
        assert_approx(year.cumulative_contributed, 6_500.0);
        assert_approx(year.cumulative_interest, 750.0);

        let summary = &projection.summary;
        assert_approx(summary.total_contributions, 6_500.0);
        assert_approx(summary.investment_growth, 750.0);
        assert_approx(summary.purchasing_power, 8_250.0 / 1.03);
        assert_approx(summary.estimated_annual_income, 330.0);
        assert_approx(summary.estimated_monthly_income, 27.5);
        assert_approx(
            summary.starting_balance_percent
                + summary.employee_percent
                + summary.employer_percent
                + summary.growth_percent,
            100.0,
        );
    }

    #[test]
    fn salary_grows_from_the_second_year() {
        let projection = run_projection(&sample_plan());
        assert_approx(projection.years[0].salary, 80_000.0);
        assert_approx(projection.years[1].salary, 80_000.0 * 1.03);
    }

    #[test]
    fn contribution_is_capped_at_limit() {
        let mut plan = sample_plan();
        plan.annual_salary = 400_000.0;
        let projection = run_projection(&plan);

        for year in &projection.years {
            assert!(year.salary * (plan.contribution_percent / 100.0) > year.contribution_limit);
            assert_eq!(year.employee_contribution, year.contribution_limit);
            assert_eq!(year.employee_contribution, 23_500.0);
        }
    }

    #[test]
    fn catch_up_limit_uses_starting_age_by_default() {
        let mut plan = sample_plan();
        plan.annual_salary = 400_000.0;
        let projection = run_projection(&plan);
        assert!(projection.years.iter().all(|y| y.contribution_limit == 23_500.0));

        plan.current_age = 52;
        let projection = run_projection(&plan);
        assert!(projection.years.iter().all(|y| y.contribution_limit == 31_000.0));
    }

    #[test]
    fn catch_up_limit_can_follow_simulated_age() {
        let mut plan = sample_plan();
        plan.current_age = 45;
        plan.annual_salary = 400_000.0;
        let policy = ProjectionPolicy {
            catch_up_basis: CatchUpBasis::SimulatedAge,
            ..ProjectionPolicy::default()
        };
        let projection = run_projection_with_policy(&plan, &policy);

        for year in &projection.years {
            let expected = if year.age >= 50 { 31_000.0 } else { 23_500.0 };
            assert_eq!(year.contribution_limit, expected, "age {}", year.age);
        }
        assert_eq!(projection.years[3].contribution_limit, 23_500.0);
        assert_eq!(projection.years[4].contribution_limit, 31_000.0);
    }

    #[test]
    fn zero_contribution_means_no_match() {
        let mut plan = sample_plan();
        plan.contribution_percent = 0.0;
        let projection = run_projection(&plan);
        for year in &projection.years {
            assert_eq!(year.employee_contribution, 0.0);
            assert_eq!(year.employer_match, 0.0);
        }
        assert_eq!(projection.summary.total_contributions, 0.0);
    }

    #[test]
    fn all_zero_inputs_do_not_divide_by_zero() {
        let plan = RetirementPlan {
            current_age: 30,
            retirement_age: 40,
            current_balance: 0.0,
            annual_salary: 0.0,
            contribution_percent: 0.0,
            annual_return_percent: 0.0,
            employer_match_percent: 0.0,
            match_limit_percent: 0.0,
            salary_growth_percent: 0.0,
        };
        let summary = run_projection(&plan).summary;
        assert_eq!(summary.final_balance, 0.0);
        assert_eq!(summary.employee_percent, 0.0);
        assert_eq!(summary.growth_percent, 0.0);
        assert!(summary.purchasing_power.is_finite());
    }

    #[test]
    fn invalid_numbers_propagate_as_nan() {
        let mut plan = sample_plan();
        plan.annual_return_percent = f64::NAN;
        let summary = run_projection(&plan).summary;
        assert!(summary.final_balance.is_nan());
        assert!(summary.growth_percent.is_nan());
    }

    #[test]
    fn inverted_ages_produce_no_years() {
        let mut plan = sample_plan();
        plan.retirement_age = 30;
        let projection = run_projection(&plan);
        assert!(projection.years.is_empty());
        assert_approx(projection.summary.final_balance, plan.current_balance);
    }

    #[test]
    fn validate_plan_rejects_bad_ranges() {
        assert!(validate_plan(&sample_plan()).is_ok());

        let mut plan = sample_plan();
        plan.retirement_age = plan.current_age;
        assert!(matches!(
            validate_plan(&plan),
            Err(CalcError::InvalidRange {
                field: "retirementAge",
                ..
            })
        ));

        let mut plan = sample_plan();
        plan.annual_salary = -1.0;
        assert!(matches!(
            validate_plan(&plan),
            Err(CalcError::InvalidRange {
                field: "annualSalary",
                ..
            })
        ));

        let mut plan = sample_plan();
        plan.annual_return_percent = -100.0;
        assert!(validate_plan(&plan).is_err());
    }

    #[test]
    fn what_if_scenarios_are_independent_reruns() {
        let plan = sample_plan();
        let policy = ProjectionPolicy::default();
        let baseline = run_projection(&plan).summary.final_balance;
        let scenarios = run_what_if_scenarios(&plan, &policy, baseline);

        assert_eq!(scenarios.len(), 3);
        assert_eq!(scenarios[0].kind, WhatIfKind::HigherContribution);
        assert_approx(scenarios[0].contribution_percent, 15.0);
        assert_eq!(scenarios[0].retirement_age, 65);
        assert_eq!(scenarios[1].kind, WhatIfKind::DelayedRetirement);
        assert_eq!(scenarios[1].retirement_age, 68);
        assert_approx(scenarios[1].contribution_percent, 10.0);
        assert_eq!(scenarios[2].kind, WhatIfKind::Combined);

        for scenario in &scenarios {
            assert!(scenario.difference > 0.0);
            assert_approx(scenario.final_balance - baseline, scenario.difference);
        }
        assert!(scenarios[2].final_balance > scenarios[0].final_balance);
        assert!(scenarios[2].final_balance > scenarios[1].final_balance);

        let mut high = plan.clone();
        high.contribution_percent = 48.0;
        let capped = run_what_if_scenarios(&high, &policy, 0.0);
        assert_approx(capped[0].contribution_percent, 50.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_contribution_and_match_caps_hold(
            current_age in 18u32..70,
            span in 1u32..40,
            salary in 0u32..600_000,
            balance in 0u32..2_000_000,
            contribution_bp in 0u32..10_000,
            match_bp in 0u32..20_000,
            match_limit_bp in 0u32..10_000,
            return_bp in -2_000i32..2_000,
            growth_bp in -500i32..1_000,
            simulated_age in proptest::bool::ANY
        ) {
            let plan = RetirementPlan {
                current_age,
                retirement_age: current_age + span,
                current_balance: balance as f64,
                annual_salary: salary as f64,
                contribution_percent: contribution_bp as f64 / 100.0,
                annual_return_percent: return_bp as f64 / 100.0,
                employer_match_percent: match_bp as f64 / 100.0,
                match_limit_percent: match_limit_bp as f64 / 100.0,
                salary_growth_percent: growth_bp as f64 / 100.0,
            };
            let policy = ProjectionPolicy {
                catch_up_basis: if simulated_age {
                    CatchUpBasis::SimulatedAge
                } else {
                    CatchUpBasis::StartingAge
                },
                ..ProjectionPolicy::default()
            };
            let projection = run_projection_with_policy(&plan, &policy);
            prop_assert_eq!(projection.years.len() as u32, span);

            for year in &projection.years {
                prop_assert!(year.employee_contribution <= year.contribution_limit);
                prop_assert!(year.matchable <= year.max_matchable);
                prop_assert!(year.matchable <= year.employee_contribution);
                prop_assert!(year.employer_match >= 0.0);
                if year.salary * (plan.contribution_percent / 100.0) > year.contribution_limit {
                    prop_assert_eq!(year.employee_contribution, year.contribution_limit);
                }
            }

            let summary = &projection.summary;
            prop_assert!(
                (summary.total_contributions
                    - summary.total_employee_contributions
                    - summary.total_employer_contributions)
                    .abs()
                    < 1e-6
            );
        }

        #[test]
        fn prop_balance_increases_with_positive_inputs(
            salary in 1_000u32..300_000,
            contribution_bp in 1u32..5_000,
            return_bp in 1i32..1_500,
            span in 1u32..45
        ) {
            let mut plan = sample_plan();
            plan.current_age = 25;
            plan.retirement_age = 25 + span;
            plan.annual_salary = salary as f64;
            plan.contribution_percent = contribution_bp as f64 / 100.0;
            plan.annual_return_percent = return_bp as f64 / 100.0;
            let projection = run_projection(&plan);

            let mut previous = plan.current_balance;
            for year in &projection.years {
                prop_assert!(year.total_balance > previous);
                previous = year.total_balance;
            }
        }
    }
}
