//! Exact rational arithmetic.
//!
//! Every public operation returns a [`FractionOutcome`]: the simplified result
//! together with the ordered derivation steps shown to the user. Intermediate
//! products are carried in `i128` and narrowed back to `i64` at the end.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::arith::{gcd, lcm};
use super::error::CalcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MixedNumber {
    pub whole: i64,
    pub numerator: i64,
    pub denominator: i64,
    /// Sign of the whole value; needed when `whole` is zero.
    pub negative: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FractionOutcome {
    pub result: Fraction,
    pub mixed: MixedNumber,
    pub decimal: f64,
    pub steps: Vec<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FractionOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl FractionOp {
    fn symbol(self) -> char {
        match self {
            FractionOp::Add => '+',
            FractionOp::Subtract => '-',
            FractionOp::Multiply => '×',
            FractionOp::Divide => '÷',
        }
    }
}

impl Fraction {
    pub const ZERO: Fraction = Fraction {
        numerator: 0,
        denominator: 1,
    };

    /// Builds a simplified fraction, rejecting a zero denominator.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, CalcError> {
        if denominator == 0 {
            return Err(CalcError::division_by_zero("fraction denominator"));
        }
        reduce(numerator as i128, denominator as i128)
    }

    pub fn from_integer(value: i64) -> Result<Self, CalcError> {
        reduce(value as i128, 1)
    }

    pub fn numerator(self) -> i64 {
        self.numerator
    }

    pub fn denominator(self) -> i64 {
        self.denominator
    }

    pub fn is_zero(self) -> bool {
        self.numerator == 0
    }

    pub fn reciprocal(self) -> Result<Self, CalcError> {
        if self.is_zero() {
            return Err(CalcError::division_by_zero("reciprocal of zero"));
        }
        reduce(self.denominator as i128, self.numerator as i128)
    }

    pub fn to_decimal(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn to_mixed_number(self) -> MixedNumber {
        let n = self.numerator.unsigned_abs();
        let d = self.denominator.unsigned_abs();
        let negative = (self.numerator < 0) != (self.denominator < 0) && self.numerator != 0;
        let whole = (n / d) as i64;
        MixedNumber {
            whole: if negative { -whole } else { whole },
            numerator: (n % d) as i64,
            denominator: d as i64,
            negative,
        }
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl fmt::Display for MixedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { "-" } else { "" };
        let whole = self.whole.unsigned_abs();
        match (whole, self.numerator) {
            (0, 0) => write!(f, "0"),
            (w, 0) => write!(f, "{sign}{w}"),
            (0, n) => write!(f, "{sign}{n}/{}", self.denominator),
            (w, n) => write!(f, "{sign}{w} {n}/{}", self.denominator),
        }
    }
}

/// Accepts `"n/d"`, a bare integer `"n"`, or a mixed number `"w n/d"`.
impl FromStr for Fraction {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || CalcError::Parse {
            input: s.to_string(),
        };
        let parse_int = |part: &str| part.trim().parse::<i64>().map_err(|_| parse_err());

        let trimmed = s.trim();
        let mut parts = trimmed.split_whitespace();
        let (whole, frac) = match (parts.next(), parts.next(), parts.next()) {
            (Some(only), None, None) => (None, only),
            (Some(whole), Some(frac), None) => (Some(parse_int(whole)?), frac),
            _ => return Err(parse_err()),
        };

        let base = match frac.split_once('/') {
            Some((n, d)) => Fraction::new(parse_int(n)?, parse_int(d)?)?,
            None if whole.is_none() => Fraction::from_integer(parse_int(frac)?)?,
            None => return Err(parse_err()),
        };

        match whole {
            None => Ok(base),
            Some(w) => {
                if base.numerator < 0 {
                    return Err(parse_err());
                }
                let magnitude = (w.unsigned_abs() as i128) * base.denominator as i128
                    + base.numerator as i128;
                let signed = if w < 0 || trimmed.starts_with('-') {
                    -magnitude
                } else {
                    magnitude
                };
                reduce(signed, base.denominator as i128)
            }
        }
    }
}

/// Reduces `n/d` to lowest terms with a positive denominator. A zero
/// denominator yields `0/1`; a result outside the `i64` range is `Overflow`.
pub fn simplify(numerator: i64, denominator: i64) -> Result<Fraction, CalcError> {
    reduce(numerator as i128, denominator as i128)
}

pub fn simplify_outcome(numerator: i64, denominator: i64) -> Result<FractionOutcome, CalcError> {
    let mut steps = Vec::new();
    if denominator == 0 {
        steps.push(format!(
            "{numerator}/0 has no value; using 0/1 as the degenerate result"
        ));
        return Ok(outcome(Fraction::ZERO, steps));
    }

    let divisor = gcd(numerator as i128, denominator as i128);
    steps.push(format!("GCD({numerator}, {denominator}) = {divisor}"));
    let result = simplify(numerator, denominator)?;
    steps.push(format!(
        "Divide both by {divisor}: {numerator}/{denominator} = {result}"
    ));
    if denominator < 0 {
        steps.push("Move the sign to the numerator so the denominator is positive".to_string());
    }
    Ok(outcome(result, steps))
}

pub fn add(a: Fraction, b: Fraction) -> Result<FractionOutcome, CalcError> {
    combine(a, b, FractionOp::Add)
}

pub fn subtract(a: Fraction, b: Fraction) -> Result<FractionOutcome, CalcError> {
    combine(a, b, FractionOp::Subtract)
}

pub fn multiply(a: Fraction, b: Fraction) -> Result<FractionOutcome, CalcError> {
    let n = a.numerator as i128 * b.numerator as i128;
    let d = a.denominator as i128 * b.denominator as i128;
    let result = reduce(n, d)?;
    let steps = vec![
        format!(
            "Multiply numerators: {} × {} = {n}",
            a.numerator, b.numerator
        ),
        format!(
            "Multiply denominators: {} × {} = {d}",
            a.denominator, b.denominator
        ),
        format!("Simplify {n}/{d} = {result}"),
    ];
    Ok(outcome(result, steps))
}

pub fn divide(a: Fraction, b: Fraction) -> Result<FractionOutcome, CalcError> {
    if b.is_zero() {
        return Err(CalcError::division_by_zero("fraction divisor"));
    }
    let flipped = b.reciprocal()?;
    let mut product = multiply(a, flipped)?;
    product.steps.insert(
        0,
        format!("Dividing by {b} is multiplying by its reciprocal {flipped}"),
    );
    Ok(product)
}

pub fn evaluate(a: Fraction, op: FractionOp, b: Fraction) -> Result<FractionOutcome, CalcError> {
    let mut result = match op {
        FractionOp::Add => add(a, b),
        FractionOp::Subtract => subtract(a, b),
        FractionOp::Multiply => multiply(a, b),
        FractionOp::Divide => divide(a, b),
    }?;
    result
        .steps
        .insert(0, format!("{a} {} {b}", op.symbol()));
    Ok(result)
}

fn combine(a: Fraction, b: Fraction, op: FractionOp) -> Result<FractionOutcome, CalcError> {
    let common = lcm(a.denominator as i128, b.denominator as i128);
    let scaled_a = a.numerator as i128 * (common / a.denominator as i128);
    let scaled_b = b.numerator as i128 * (common / b.denominator as i128);
    let (combined, verb) = match op {
        FractionOp::Subtract => (scaled_a - scaled_b, "Subtract"),
        _ => (scaled_a + scaled_b, "Add"),
    };
    let result = reduce(combined, common)?;

    let mut steps = Vec::with_capacity(5);
    steps.push(format!(
        "Least common denominator: LCM({}, {}) = {common}",
        a.denominator, b.denominator
    ));
    steps.push(format!("Rewrite {a} as {scaled_a}/{common}"));
    steps.push(format!("Rewrite {b} as {scaled_b}/{common}"));
    steps.push(format!(
        "{verb} numerators: {scaled_a} {} {scaled_b} = {combined}",
        op.symbol()
    ));
    steps.push(format!("Simplify {combined}/{common} = {result}"));
    Ok(outcome(result, steps))
}

/// Every `Fraction` is built here, so numerators stay within
/// `-i64::MAX..=i64::MAX` and negating one never overflows.
fn reduce(numerator: i128, denominator: i128) -> Result<Fraction, CalcError> {
    if denominator == 0 {
        return Ok(Fraction::ZERO);
    }
    let divisor = gcd(numerator, denominator).max(1);
    let sign = if denominator < 0 { -1 } else { 1 };
    let n = numerator / divisor * sign;
    let d = denominator / divisor * sign;
    if n == i64::MIN as i128 {
        return Err(CalcError::Overflow);
    }
    Ok(Fraction {
        numerator: i64::try_from(n).map_err(|_| CalcError::Overflow)?,
        denominator: i64::try_from(d).map_err(|_| CalcError::Overflow)?,
    })
}

fn outcome(result: Fraction, steps: Vec<String>) -> FractionOutcome {
    FractionOutcome {
        result,
        mixed: result.to_mixed_number(),
        decimal: result.to_decimal(),
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, prop_assume, proptest};

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d).expect("valid fraction")
    }

    #[test]
    fn simplify_normalizes_sign_and_terms() {
        assert_eq!(simplify(6, 8), Ok(frac(3, 4)));
        assert_eq!(simplify(3, -9), Ok(frac(-1, 3)));
        assert_eq!(simplify(-4, -10), Ok(frac(2, 5)));
        assert_eq!(simplify(0, 5), Ok(Fraction::ZERO));
        assert_eq!(simplify(7, 0), Ok(Fraction::ZERO));
        assert_eq!(simplify(3, -9).map(Fraction::denominator), Ok(3));
    }

    #[test]
    fn simplify_reports_overflow_instead_of_zero() {
        assert_eq!(simplify(i64::MIN, -1), Err(CalcError::Overflow));
        assert_eq!(simplify(i64::MIN, -3), Err(CalcError::Overflow));
        assert_eq!(simplify(i64::MIN, 2), Ok(frac(i64::MIN / 2, 1)));
        assert_eq!(
            simplify_outcome(i64::MIN, -3).expect_err("overflow"),
            CalcError::Overflow
        );
    }

    #[test]
    fn most_negative_numerator_is_rejected() {
        assert_eq!(simplify_outcome(i64::MIN, 1).expect_err("overflow"), CalcError::Overflow);
        assert_eq!(Fraction::new(i64::MIN, 1), Err(CalcError::Overflow));
        assert_eq!(Fraction::from_integer(i64::MIN), Err(CalcError::Overflow));
        assert!(matches!(
            "-9223372036854775808".parse::<Fraction>(),
            Err(CalcError::Overflow)
        ));

        let m = frac(-i64::MAX, 1).to_mixed_number();
        assert_eq!(m.whole, -i64::MAX);
        assert!(m.negative);

        let min_plus_one = Fraction::from_integer(i64::MIN + 1).expect("fits");
        let err = subtract(min_plus_one, frac(1, 1)).expect_err("below range");
        assert_eq!(err, CalcError::Overflow);
    }

    #[test]
    fn new_rejects_zero_denominator() {
        let err = Fraction::new(1, 0).expect_err("zero denominator");
        assert!(err.is_undefined());
    }

    #[test]
    fn add_and_subtract_use_common_denominator() {
        let sum = add(frac(1, 4), frac(1, 6)).expect("sum");
        assert_eq!(sum.result, frac(5, 12));
        assert!(sum.steps[0].contains("LCM(4, 6) = 12"));
        assert_eq!(sum.steps.len(), 5);

        let diff = subtract(frac(1, 2), frac(3, 4)).expect("difference");
        assert_eq!(diff.result, frac(-1, 4));
    }

    #[test]
    fn multiply_and_divide() {
        assert_eq!(multiply(frac(2, 3), frac(9, 4)).expect("product").result, frac(3, 2));
        assert_eq!(divide(frac(1, 2), frac(3, 4)).expect("quotient").result, frac(2, 3));
        let err = divide(frac(1, 2), Fraction::ZERO).expect_err("zero divisor");
        assert_eq!(err, CalcError::division_by_zero("fraction divisor"));
    }

    #[test]
    fn mixed_number_carries_sign() {
        let m = frac(7, 3).to_mixed_number();
        assert_eq!((m.whole, m.numerator, m.denominator), (2, 1, 3));
        assert_eq!(m.to_string(), "2 1/3");

        let m = frac(-7, 3).to_mixed_number();
        assert_eq!((m.whole, m.numerator, m.denominator), (-2, 1, 3));
        assert_eq!(m.to_string(), "-2 1/3");

        let m = frac(-1, 2).to_mixed_number();
        assert_eq!(m.whole, 0);
        assert!(m.negative);
        assert_eq!(m.to_string(), "-1/2");

        assert_eq!(frac(4, 2).to_mixed_number().to_string(), "2");
    }

    #[test]
    fn parses_simple_and_mixed_input() {
        assert_eq!("3/4".parse::<Fraction>().expect("parse"), frac(3, 4));
        assert_eq!(" -6/8 ".parse::<Fraction>().expect("parse"), frac(-3, 4));
        assert_eq!("5".parse::<Fraction>().expect("parse"), frac(5, 1));
        assert_eq!("1 1/2".parse::<Fraction>().expect("parse"), frac(3, 2));
        assert_eq!("-2 1/4".parse::<Fraction>().expect("parse"), frac(-9, 4));
        assert!("1/0".parse::<Fraction>().expect_err("zero").is_undefined());
        assert!(matches!(
            "a/b".parse::<Fraction>(),
            Err(CalcError::Parse { .. })
        ));
        assert!("1 2".parse::<Fraction>().is_err());
    }

    #[test]
    fn evaluate_prefixes_expression() {
        let out = evaluate(frac(1, 3), FractionOp::Add, frac(1, 6)).expect("sum");
        assert_eq!(out.steps[0], "1/3 + 1/6");
        assert_eq!(out.result, frac(1, 2));
        assert!((out.decimal - 0.5).abs() < 1e-12);
    }

    #[test]
    fn overflow_is_reported() {
        let big = Fraction::from_integer(i64::MAX).expect("fits");
        let err = multiply(big, big).expect_err("overflow");
        assert_eq!(err, CalcError::Overflow);
    }

    #[test]
    fn simplify_outcome_explains_degenerate_input() {
        let out = simplify_outcome(5, 0).expect("degenerate");
        assert_eq!(out.result, Fraction::ZERO);
        assert_eq!(out.steps.len(), 1);

        let out = simplify_outcome(10, -4).expect("reduces");
        assert_eq!(out.result, frac(-5, 2));
        assert_eq!(out.steps.len(), 3);
    }

    proptest! {
        #[test]
        fn prop_simplify_is_reduced_and_exact(n in -10_000i64..10_000, d in -10_000i64..10_000) {
            prop_assume!(d != 0);
            let f = simplify(n, d).unwrap();
            prop_assert!(f.denominator() > 0);
            prop_assert_eq!(gcd(f.numerator() as i128, f.denominator() as i128).max(1), 1);
            prop_assert!((f.to_decimal() - n as f64 / d as f64).abs() < 1e-12);
        }

        #[test]
        fn prop_add_and_multiply_commute(
            a in -500i64..500, b in 1i64..500, c in -500i64..500, d in 1i64..500
        ) {
            let x = frac(a, b);
            let y = frac(c, d);
            prop_assert_eq!(add(x, y).unwrap().result, add(y, x).unwrap().result);
            prop_assert_eq!(multiply(x, y).unwrap().result, multiply(y, x).unwrap().result);
            prop_assert_eq!(add(x, Fraction::ZERO).unwrap().result, x);
        }

        #[test]
        fn prop_divide_is_multiply_by_reciprocal(
            a in -500i64..500, b in 1i64..500, c in -500i64..500, d in 1i64..500
        ) {
            prop_assume!(c != 0);
            let x = frac(a, b);
            let y = frac(c, d);
            let quotient = divide(x, y).unwrap().result;
            let product = multiply(x, y.reciprocal().unwrap()).unwrap().result;
            prop_assert_eq!(quotient, product);
        }
    }
}
