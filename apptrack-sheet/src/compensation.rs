//! Compensation cell text.

use apptrack_core::models::Compensation;

/// Suffix marking an annualized total package, in units of 10k.
const TOTAL_SUFFIX: char = 'w';
/// Infix marking a monthly rate.
const MONTHLY_INFIX: &str = "k×";

/// Render a compensation for the salary column.
pub fn render(value: &Compensation) -> String {
    match value {
        Compensation::TotalPackage(amount) => format!("{amount}{TOTAL_SUFFIX}"),
        Compensation::Monthly(expression) => expression.clone(),
        Compensation::Negotiable => Compensation::NEGOTIABLE.to_owned(),
    }
}

/// Classify salary column text.
///
/// Blank text is `None`. Text that matches none of the markers is assumed
/// to be a bare total package.
pub fn classify(text: &str) -> Option<Compensation> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else if text == Compensation::NEGOTIABLE {
        Some(Compensation::Negotiable)
    } else if text.ends_with(TOTAL_SUFFIX) {
        Some(Compensation::TotalPackage(text.replace(TOTAL_SUFFIX, "")))
    } else if text.contains(MONTHLY_INFIX) {
        Some(Compensation::Monthly(text.to_owned()))
    } else {
        Some(Compensation::TotalPackage(text.to_owned()))
    }
}
