/// Currency symbol shown in front of every amount (Bangladeshi taka)
pub const CURRENCY_SYMBOL: &str = "৳";

/// Decimal precision for dashboard amounts
pub const DISPLAY_DECIMAL_PRECISION: usize = 2;

/// Date format used in tables (e.g. `01 Oct 2025`)
pub const DISPLAY_DATE_FORMAT: &str = "%d %b %Y";

/// Date format accepted by the date inputs of the cycle forms
pub const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Label for cycles created without a name
pub const UNNAMED_CYCLE_LABEL: &str = "Unnamed";
