use apptrack_core::models::Compensation;

/// Monthly rates are written in thousands.
const THOUSAND: f64 = 1000.0;

/// Convert a compensation to a single annualized number.
///
/// Returns `None` ("incomparable") for negotiable compensation and for
/// salary text that does not parse. A total package is taken as written;
/// a monthly expression `<rate>k×<months>` becomes `rate × 1000 × months`.
pub fn normalize(value: &Compensation) -> Option<f64> {
    match value {
        Compensation::TotalPackage(amount) => parse_amount(amount),
        Compensation::Monthly(expression) => {
            let (rate, months) = parse_monthly(expression)?;
            Some(rate * THOUSAND * f64::from(months))
        }
        Compensation::Negotiable => None,
    }
}

/// Split a `<rate>k×<months>` expression into its rate (in thousands) and
/// number of paid months.
pub fn parse_monthly(expression: &str) -> Option<(f64, u32)> {
    let (rate, months) = expression.trim().split_once('×')?;
    let rate = rate
        .trim_end()
        .strip_suffix(['k', 'K'])?
        .trim_end();
    let rate = parse_amount(rate)?;
    let months = months.trim().parse::<u32>().ok()?;
    Some((rate, months))
}

// Plain decimal digits only, so "inf", "NaN" and exponents are incomparable
fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    let (whole, fraction) = text.split_once('.').unwrap_or((text, "0"));
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || !digits(fraction) {
        return None;
    }
    text.parse().ok()
}

/// Whether a compensation clears `threshold`. Incomparable values never do.
pub fn meets(value: Option<&Compensation>, threshold: f64) -> bool {
    value
        .and_then(normalize)
        .is_some_and(|annual| annual >= threshold)
}
