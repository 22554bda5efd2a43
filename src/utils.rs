use std::fmt::{Display, Formatter, Result as ResultFmt};
use num_traits::ToPrimitive;

/// Placeholder printed for values that are undefined in a snapshot
pub const PLACEHOLDER: &str = "--";

/// Mean of two counters, kept as an exact fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    num: u64,
    den: u64,
}

impl Ratio {
    pub fn to_f64(&self) -> f64 {
        let num = self.num.to_f64().unwrap_or(f64::NAN);
        let den = self.den.to_f64().unwrap_or(f64::NAN);
        num / den
    }
}

/// Displays with six fractional digits like printf's `%Lf`. The integer
/// part is exact, the fraction is rounded half up.
impl Display for Ratio {
    fn fmt(&self, f: &mut Formatter) -> ResultFmt {
        let (num, den) = (self.num as u128, self.den as u128);
        let mut whole = num / den;
        let mut frac = ((num % den) * 2_000_000 + den) / (2 * den);
        if frac == 1_000_000 {
            whole += 1;
            frac = 0;
        }
        write!(f, "{}.{:06}", whole, frac)
    }
}

/// `num / den`, or `None` when the divisor is zero
pub fn mean(num: u64, den: u64) -> Option<Ratio> {
    if den == 0 {
        return None;
    }
    Some(Ratio { num, den })
}

/// Renders an optional mean, or the placeholder
pub fn fmt_mean(val: Option<Ratio>) -> String {
    match val {
        Some(r) => r.to_string(),
        None => String::from(PLACEHOLDER),
    }
}

/// Renders a counter that is only meaningful when `valid` holds
pub fn fmt_guarded(val: u64, valid: bool) -> String {
    if valid {
        val.to_string()
    } else {
        String::from(PLACEHOLDER)
    }
}

#[test]
fn test_mean() {
    assert_eq!(mean(25, 10).map(|r| r.to_f64()), Some(2.5));
    assert_eq!(mean(15000, 10).map(|r| r.to_f64()), Some(1500.0));
    assert_eq!(mean(5, 0), None);
    assert_eq!(mean(0, 0), None);
}

#[test]
fn test_fmt() {
    assert_eq!(fmt_mean(mean(25, 10)), "2.500000");
    assert_eq!(fmt_mean(mean(1000, 3)), "333.333333");
    assert_eq!(fmt_mean(mean(2, 3)), "0.666667");
    assert_eq!(fmt_mean(mean(0, 7)), "0.000000");
    assert_eq!(fmt_mean(mean(5, 0)), "--");
    // rounding carries into the integer part
    assert_eq!(fmt_mean(mean(19_999_999, 10_000_000)), "2.000000");
    assert_eq!(fmt_guarded(64, true), "64");
    assert_eq!(fmt_guarded(64, false), "--");
}

#[test]
fn test_fmt_large_counters() {
    assert_eq!(fmt_mean(mean(u64::MAX, 3)), "6148914691236517205.000000");
    assert_eq!(fmt_mean(mean(u64::MAX, 1)), "18446744073709551615.000000");
    assert_eq!(fmt_mean(mean(u64::MAX, u64::MAX)), "1.000000");
}
