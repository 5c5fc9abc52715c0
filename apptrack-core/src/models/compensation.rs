/// Expected compensation for a submission.
///
/// The numeric text is stored verbatim: a value the user typed that does not
/// parse is still kept (and rendered back), it simply cannot be compared
/// against a salary threshold.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "value", rename_all = "snake_case")
)]
pub enum Compensation {
    /// An annualized total package, e.g. `"35"` or `"350000"`
    TotalPackage(String),
    /// A monthly rate in thousands times a number of paid months, e.g. `"20k×13"`
    Monthly(String),
    /// Still to be negotiated
    Negotiable,
}

impl Compensation {
    /// The marker used for a negotiable compensation in spreadsheets.
    pub const NEGOTIABLE: &'static str = "待商议";

    /// An annualized total package
    pub fn total(amount: f64) -> Self {
        Self::TotalPackage(amount.to_string())
    }

    /// A monthly rate (in thousands) paid over `months` months
    pub fn monthly(rate: f64, months: u32) -> Self {
        Self::Monthly(format!("{rate}k×{months}"))
    }

    /// The storage discriminant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TotalPackage(_) => "total",
            Self::Monthly(_) => "monthly",
            Self::Negotiable => "negotiable",
        }
    }

    /// The stored text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::TotalPackage(text) | Self::Monthly(text) => Some(text),
            Self::Negotiable => None,
        }
    }

    /// Rebuild from the storage discriminant and text.
    ///
    /// Returns `None` for an unknown discriminant.
    pub fn from_parts(kind: &str, text: Option<String>) -> Option<Self> {
        match kind {
            "total" => Some(Self::TotalPackage(text.unwrap_or_default())),
            "monthly" => Some(Self::Monthly(text.unwrap_or_default())),
            "negotiable" => Some(Self::Negotiable),
            _ => None,
        }
    }
}
