/// Decimal places kept for stored quantity and average price
pub const STORAGE_DECIMAL_PRECISION: u32 = 4;

/// Integer digits allowed in a buy quantity or price
pub const MAX_AMOUNT_INTEGER_DIGITS: u32 = 16;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Maximum length of a normalized ticker symbol
pub const MAX_SYMBOL_LENGTH: usize = 20;

/// Maximum length of a portfolio name
pub const MAX_PORTFOLIO_NAME_LENGTH: usize = 120;

/// Base currency assigned when a portfolio is created without one
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// Maximum length of a base currency code
pub const MAX_CURRENCY_CODE_LENGTH: usize = 10;
