use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::warn;
use serde::Serialize;

use super::{
    ApiCatchUpBasis, ApiFractionOperation, FractionPayload, PaintPayload, PercentagePayload,
    RequestError, RetirementPayload, SalaryPayload, WellnessPayload, fraction_response,
    paint_response, percentage_response, retirement_response, salary_response, wellness_response,
};
use crate::core::faq::{FaqCatalog, StaticFaqProvider, UnavailableFaqProvider};
use crate::core::fraction::{self, Fraction, FractionOp};
use crate::core::paint::{ProjectType, RoomPreset, SurfaceTexture};
use crate::core::percentage::PercentageKind;
use crate::core::salary::{FilingStatus, PayPeriod};
use crate::core::wellness::AgeGroup;

#[derive(Parser, Debug)]
#[command(
    name = "calcdesk",
    about = "Everyday calculators: 401(k) projection, fractions, percentages, salary, paint and screen time"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the web UI and JSON API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
        #[arg(long, help = "JSON file of FAQ entries keyed by page id")]
        faq_file: Option<PathBuf>,
    },
    #[command(flatten)]
    Calc(CalcCommand),
}

#[derive(Subcommand, Debug)]
pub enum CalcCommand {
    /// Project a 401(k) balance to retirement.
    Retirement(RetirementArgs),
    /// Combine two fractions, e.g. `fraction 1/2 add 1/3`.
    Fraction {
        #[arg(allow_hyphen_values = true)]
        left: Fraction,
        #[arg(value_enum)]
        op: CliFractionOp,
        #[arg(allow_hyphen_values = true)]
        right: Fraction,
    },
    /// Reduce a fraction to lowest terms.
    #[command(allow_negative_numbers = true)]
    Simplify { numerator: i64, denominator: i64 },
    /// Percentage arithmetic.
    #[command(allow_negative_numbers = true)]
    Percent {
        #[arg(value_enum)]
        kind: CliPercentageKind,
        value1: f64,
        value2: f64,
    },
    /// Convert pay between periods and estimate federal tax.
    Salary(SalaryArgs),
    /// Estimate paint for a room.
    Paint(PaintArgs),
    /// Score a day of screen time.
    Wellness(WellnessArgs),
    /// Print the FAQ for a calculator page.
    Faq {
        page: String,
        #[arg(long)]
        faq_file: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct RetirementArgs {
    #[arg(long)]
    current_age: Option<u32>,
    #[arg(long)]
    retirement_age: Option<u32>,
    #[arg(long)]
    current_balance: Option<f64>,
    #[arg(long)]
    annual_salary: Option<f64>,
    #[arg(long, help = "Employee contribution in percent of salary, e.g. 10")]
    contribution_percent: Option<f64>,
    #[arg(long, allow_negative_numbers = true, help = "Expected annual return in percent")]
    annual_return: Option<f64>,
    #[arg(long, help = "Employer match in percent of the employee contribution")]
    employer_match: Option<f64>,
    #[arg(long, help = "Salary percent up to which the employer matches")]
    match_limit: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    salary_increase: Option<f64>,
    #[arg(long, value_enum)]
    catch_up_basis: Option<CliCatchUpBasis>,
}

#[derive(Args, Debug)]
pub struct SalaryArgs {
    amount: f64,
    #[arg(long, value_enum, default_value_t = CliPayPeriod::Annual)]
    period: CliPayPeriod,
    #[arg(long)]
    hours_per_week: Option<f64>,
    #[arg(long)]
    weeks_per_year: Option<f64>,
    #[arg(long, value_enum, default_value_t = CliFilingStatus::Single)]
    filing_status: CliFilingStatus,
}

#[derive(Args, Debug)]
pub struct PaintArgs {
    #[arg(long, value_enum)]
    preset: Option<CliRoomPreset>,
    #[arg(long)]
    length: Option<f64>,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    #[arg(long)]
    doors: Option<u32>,
    #[arg(long)]
    windows: Option<u32>,
    #[arg(long)]
    coats: Option<u32>,
    #[arg(long, value_enum)]
    texture: Option<CliSurfaceTexture>,
    #[arg(long, value_enum)]
    project_type: Option<CliProjectType>,
    #[arg(long)]
    include_ceiling: bool,
    #[arg(long)]
    primer: bool,
    #[arg(long)]
    price_per_gallon: Option<f64>,
}

#[derive(Args, Debug)]
pub struct WellnessArgs {
    #[arg(long)]
    social_media: Option<f64>,
    #[arg(long)]
    entertainment: Option<f64>,
    #[arg(long)]
    gaming: Option<f64>,
    #[arg(long)]
    productive: Option<f64>,
    #[arg(long)]
    educational: Option<f64>,
    #[arg(long)]
    pickups: Option<u32>,
    #[arg(long, help = "Minutes of screen use in the hour before bed")]
    bedtime_minutes: Option<u32>,
    #[arg(long, value_enum)]
    age_group: Option<CliAgeGroup>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliCatchUpBasis {
    StartingAge,
    SimulatedAge,
}

impl From<CliCatchUpBasis> for ApiCatchUpBasis {
    fn from(value: CliCatchUpBasis) -> Self {
        match value {
            CliCatchUpBasis::StartingAge => ApiCatchUpBasis::StartingAge,
            CliCatchUpBasis::SimulatedAge => ApiCatchUpBasis::SimulatedAge,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliFractionOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl From<CliFractionOp> for FractionOp {
    fn from(value: CliFractionOp) -> Self {
        match value {
            CliFractionOp::Add => FractionOp::Add,
            CliFractionOp::Subtract => FractionOp::Subtract,
            CliFractionOp::Multiply => FractionOp::Multiply,
            CliFractionOp::Divide => FractionOp::Divide,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliPercentageKind {
    PercentOf,
    WhatPercent,
    PercentChange,
    IncreaseBy,
    DecreaseBy,
}

impl From<CliPercentageKind> for PercentageKind {
    fn from(value: CliPercentageKind) -> Self {
        match value {
            CliPercentageKind::PercentOf => PercentageKind::PercentOf,
            CliPercentageKind::WhatPercent => PercentageKind::WhatPercent,
            CliPercentageKind::PercentChange => PercentageKind::PercentChange,
            CliPercentageKind::IncreaseBy => PercentageKind::IncreaseBy,
            CliPercentageKind::DecreaseBy => PercentageKind::DecreaseBy,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliPayPeriod {
    Hourly,
    Daily,
    Weekly,
    Biweekly,
    SemiMonthly,
    Monthly,
    Annual,
}

impl From<CliPayPeriod> for PayPeriod {
    fn from(value: CliPayPeriod) -> Self {
        match value {
            CliPayPeriod::Hourly => PayPeriod::Hourly,
            CliPayPeriod::Daily => PayPeriod::Daily,
            CliPayPeriod::Weekly => PayPeriod::Weekly,
            CliPayPeriod::Biweekly => PayPeriod::Biweekly,
            CliPayPeriod::SemiMonthly => PayPeriod::SemiMonthly,
            CliPayPeriod::Monthly => PayPeriod::Monthly,
            CliPayPeriod::Annual => PayPeriod::Annual,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliFilingStatus {
    Single,
    MarriedFilingJointly,
    HeadOfHousehold,
}

impl From<CliFilingStatus> for FilingStatus {
    fn from(value: CliFilingStatus) -> Self {
        match value {
            CliFilingStatus::Single => FilingStatus::Single,
            CliFilingStatus::MarriedFilingJointly => FilingStatus::MarriedFilingJointly,
            CliFilingStatus::HeadOfHousehold => FilingStatus::HeadOfHousehold,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliRoomPreset {
    Bedroom,
    LivingRoom,
    Kitchen,
    Bathroom,
    Office,
}

impl From<CliRoomPreset> for RoomPreset {
    fn from(value: CliRoomPreset) -> Self {
        match value {
            CliRoomPreset::Bedroom => RoomPreset::Bedroom,
            CliRoomPreset::LivingRoom => RoomPreset::LivingRoom,
            CliRoomPreset::Kitchen => RoomPreset::Kitchen,
            CliRoomPreset::Bathroom => RoomPreset::Bathroom,
            CliRoomPreset::Office => RoomPreset::Office,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliSurfaceTexture {
    Smooth,
    LightTexture,
    HeavyTexture,
    Rough,
}

impl From<CliSurfaceTexture> for SurfaceTexture {
    fn from(value: CliSurfaceTexture) -> Self {
        match value {
            CliSurfaceTexture::Smooth => SurfaceTexture::Smooth,
            CliSurfaceTexture::LightTexture => SurfaceTexture::LightTexture,
            CliSurfaceTexture::HeavyTexture => SurfaceTexture::HeavyTexture,
            CliSurfaceTexture::Rough => SurfaceTexture::Rough,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliProjectType {
    Interior,
    Exterior,
    Ceiling,
}

impl From<CliProjectType> for ProjectType {
    fn from(value: CliProjectType) -> Self {
        match value {
            CliProjectType::Interior => ProjectType::Interior,
            CliProjectType::Exterior => ProjectType::Exterior,
            CliProjectType::Ceiling => ProjectType::Ceiling,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliAgeGroup {
    Child,
    Teen,
    Adult,
}

impl From<CliAgeGroup> for AgeGroup {
    fn from(value: CliAgeGroup) -> Self {
        match value {
            CliAgeGroup::Child => AgeGroup::Child,
            CliAgeGroup::Teen => AgeGroup::Teen,
            CliAgeGroup::Adult => AgeGroup::Adult,
        }
    }
}

/// FAQ catalog backed by `faq_file` when it loads, otherwise by built-in
/// content only.
pub fn faq_catalog(faq_file: Option<&Path>) -> FaqCatalog {
    let Some(path) = faq_file else {
        return FaqCatalog::with_builtin_fallbacks(Box::new(UnavailableFaqProvider));
    };
    match StaticFaqProvider::from_file(path) {
        Ok(provider) => FaqCatalog::with_builtin_fallbacks(Box::new(provider)),
        Err(e) => {
            warn!("could not load FAQ file {}: {e}", path.display());
            FaqCatalog::with_builtin_fallbacks(Box::new(UnavailableFaqProvider))
        }
    }
}

/// Runs a one-shot calculation and renders the result as pretty JSON.
pub fn run(command: CalcCommand) -> Result<String, RequestError> {
    match command {
        CalcCommand::Retirement(args) => to_json(&retirement_response(args.into())?),
        CalcCommand::Fraction { left, op, right } => {
            to_json(&fraction::evaluate(left, op.into(), right)?)
        }
        CalcCommand::Simplify {
            numerator,
            denominator,
        } => to_json(&fraction_response(FractionPayload {
            numerator1: Some(numerator),
            denominator1: Some(denominator),
            operation: Some(ApiFractionOperation::Simplify),
            ..FractionPayload::default()
        })?),
        CalcCommand::Percent {
            kind,
            value1,
            value2,
        } => to_json(&percentage_response(PercentagePayload {
            kind: Some(kind.into()),
            value1: Some(value1),
            value2: Some(value2),
        })?),
        CalcCommand::Salary(args) => to_json(&salary_response(args.into())?),
        CalcCommand::Paint(args) => to_json(&paint_response(args.into())?),
        CalcCommand::Wellness(args) => to_json(&wellness_response(args.into())?),
        CalcCommand::Faq { page, faq_file } => {
            let catalog = faq_catalog(faq_file.as_deref());
            to_json(&catalog.resolve(&page))
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, RequestError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| RequestError::Invalid(format!("failed to render JSON: {e}")))
}

impl From<RetirementArgs> for RetirementPayload {
    fn from(args: RetirementArgs) -> Self {
        RetirementPayload {
            current_age: args.current_age,
            retirement_age: args.retirement_age,
            current_balance: args.current_balance,
            annual_salary: args.annual_salary,
            contribution_percent: args.contribution_percent,
            annual_return: args.annual_return,
            employer_match: args.employer_match,
            match_limit: args.match_limit,
            salary_increase: args.salary_increase,
            catch_up_basis: args.catch_up_basis.map(ApiCatchUpBasis::from),
        }
    }
}

impl From<SalaryArgs> for SalaryPayload {
    fn from(args: SalaryArgs) -> Self {
        SalaryPayload {
            amount: Some(args.amount),
            period: Some(args.period.into()),
            hours_per_week: args.hours_per_week,
            weeks_per_year: args.weeks_per_year,
            filing_status: Some(args.filing_status.into()),
        }
    }
}

impl From<PaintArgs> for PaintPayload {
    fn from(args: PaintArgs) -> Self {
        PaintPayload {
            preset: args.preset.map(RoomPreset::from),
            length: args.length,
            width: args.width,
            height: args.height,
            doors: args.doors,
            windows: args.windows,
            coats: args.coats,
            texture: args.texture.map(SurfaceTexture::from),
            project_type: args.project_type.map(ProjectType::from),
            include_ceiling: Some(args.include_ceiling),
            primer: Some(args.primer),
            price_per_gallon: args.price_per_gallon,
        }
    }
}

impl From<WellnessArgs> for WellnessPayload {
    fn from(args: WellnessArgs) -> Self {
        WellnessPayload {
            social_media: args.social_media,
            entertainment: args.entertainment,
            gaming: args.gaming,
            productive: args.productive,
            educational: args.educational,
            pickups: args.pickups,
            bedtime_minutes: args.bedtime_minutes,
            age_group: args.age_group.map(AgeGroup::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CalcError;

    fn calc(args: &[&str]) -> CalcCommand {
        let cli = Cli::try_parse_from(args).expect("args should parse");
        match cli.command {
            Command::Calc(command) => command,
            other => panic!("expected a calculator command, got {other:?}"),
        }
    }

    fn json(args: &[&str]) -> serde_json::Value {
        let rendered = run(calc(args)).expect("command should succeed");
        serde_json::from_str(&rendered).expect("output is JSON")
    }

    #[test]
    fn serve_defaults_to_port_8080() {
        let cli = Cli::try_parse_from(["calcdesk", "serve"]).expect("args should parse");
        assert!(matches!(
            cli.command,
            Command::Serve {
                port: 8080,
                faq_file: None
            }
        ));
    }

    #[test]
    fn fraction_command_parses_fraction_literals() {
        let out = json(&["calcdesk", "fraction", "-1/2", "add", "1 1/3"]);
        assert_eq!(out["result"]["numerator"], 5);
        assert_eq!(out["result"]["denominator"], 6);
    }

    #[test]
    fn fraction_divide_by_zero_reports_undefined() {
        let err = run(calc(&["calcdesk", "fraction", "1/2", "divide", "0"]))
            .expect_err("zero divisor");
        assert!(matches!(err, RequestError::Calc(ref e) if e.is_undefined()));
        assert!(err.to_string().starts_with("undefined"));
    }

    #[test]
    fn simplify_and_percent_commands() {
        let out = json(&["calcdesk", "simplify", "-6", "8"]);
        assert_eq!(out["result"]["numerator"], -3);
        assert_eq!(out["result"]["denominator"], 4);

        let out = json(&["calcdesk", "percent", "percent-change", "50", "75"]);
        assert_eq!(out["display"], "50.00%");
    }

    #[test]
    fn simplify_out_of_range_is_an_error() {
        let err = run(calc(&["calcdesk", "simplify", "-9223372036854775808", "1"]))
            .expect_err("outside the fraction range");
        assert!(matches!(err, RequestError::Calc(CalcError::Overflow)));
    }

    #[test]
    fn retirement_command_uses_form_defaults() {
        let out = json(&[
            "calcdesk",
            "retirement",
            "--current-age",
            "60",
            "--retirement-age",
            "65",
            "--catch-up-basis",
            "simulated-age",
        ]);
        assert_eq!(out["years"].as_array().map(Vec::len), Some(5));
        assert_eq!(out["whatIf"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn salary_paint_and_wellness_commands() {
        let out = json(&["calcdesk", "salary", "20", "--period", "hourly"]);
        assert_eq!(out["breakdown"]["annual"], 41_600.0);

        let out = json(&["calcdesk", "paint", "--preset", "office", "--primer"]);
        assert!(out["primerCans"].as_u64().is_some_and(|cans| cans > 0));

        let out = json(&["calcdesk", "wellness", "--social-media", "0", "--entertainment", "0"]);
        assert_eq!(out["band"], "excellent");
    }

    #[test]
    fn faq_command_falls_back_without_a_file() {
        let out = json(&["calcdesk", "faq", "paint-calculator"]);
        assert!(out.as_array().is_some_and(|faqs| !faqs.is_empty()));
    }

    #[test]
    fn missing_faq_file_falls_back() {
        let catalog = faq_catalog(Some(Path::new("/nonexistent/faqs.json")));
        assert!(!catalog.resolve("401k-calculator").is_empty());
    }
}
