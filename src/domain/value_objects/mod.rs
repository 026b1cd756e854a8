//! Value Objects for the storefront

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use validator::ValidationError;

pub const DEFAULT_CURRENCY: &str = "VND";

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money { amount: Decimal, currency: String }

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self { Self { amount, currency: currency.to_string() } }
    pub fn vnd(amount: Decimal) -> Self { Self::new(amount, DEFAULT_CURRENCY) }
    pub fn zero(currency: &str) -> Self { Self::new(Decimal::ZERO, currency) }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn is_zero(&self) -> bool { self.amount.is_zero() }
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency { return Err(MoneyError::CurrencyMismatch); }
        Ok(Money::new(self.amount + other.amount, &self.currency))
    }
    pub fn multiply(&self, qty: u32) -> Money { Money::new(self.amount * Decimal::from(qty), &self.currency) }

    /// Renders the amount the way the shop displays prices: whole units with
    /// dot-grouped thousands, e.g. `1.250.000 ₫`.
    pub fn format(&self) -> String {
        let whole = self.amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let negative = whole.is_sign_negative() && !whole.is_zero();
        let digits = whole.abs().to_u128().unwrap_or_default().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 { grouped.push('.'); }
            grouped.push(ch);
        }
        let symbol = if self.currency == DEFAULT_CURRENCY { "₫" } else { self.currency.as_str() };
        format!("{}{} {}", if negative { "-" } else { "" }, grouped, symbol)
    }
}

impl Default for Money { fn default() -> Self { Self::zero(DEFAULT_CURRENCY) } }

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.format()) }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("Currency mismatch")]
    CurrencyMismatch,
}

/// Quantity value object
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Self { Self(value) }
    pub fn value(&self) -> u32 { self.0 }
    pub fn add(&self, other: u32) -> Self { Self(self.0.saturating_add(other)) }
    pub fn subtract(&self, other: u32) -> Option<Self> {
        if other > self.0 { None } else { Some(Self(self.0 - other)) }
    }
    pub fn is_zero(&self) -> bool { self.0 == 0 }
    /// Clamps into `1..=stock`; with nothing in stock the only valid quantity is zero.
    pub fn clamp_to(&self, stock: u32) -> Self {
        if stock == 0 { Self(0) } else { Self(self.0.clamp(1, stock)) }
    }
}

/// Star rating, always within 1..=5
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub fn new(value: u8) -> Result<Self, RatingError> {
        if (Self::MIN..=Self::MAX).contains(&value) { Ok(Self(value)) } else { Err(RatingError::OutOfRange(value)) }
    }
    pub fn value(&self) -> u8 { self.0 }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;
    fn try_from(value: u8) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Rating> for u8 { fn from(r: Rating) -> u8 { r.0 } }

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingError {
    #[error("Rating {0} is outside 1..=5")]
    OutOfRange(u8),
}

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page coordinates sent upstream as `page` / `pageSize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest { page: u32, page_size: u32 }

impl PageRequest {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }
    pub fn page(&self) -> u32 { self.page }
    pub fn page_size(&self) -> u32 { self.page_size }
}

impl Default for PageRequest { fn default() -> Self { Self::new(None, None) } }

/// One page of server-paginated records.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
}

impl<T> Paged<T> {
    pub fn empty(request: PageRequest) -> Self {
        Self { items: vec![], page: request.page(), page_size: request.page_size(), total_count: 0 }
    }

    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 { return 0; }
        self.total_count.div_ceil(u64::from(self.page_size)) as u32
    }
    pub fn has_prev(&self) -> bool { self.page > 1 }
    pub fn has_next(&self) -> bool { self.page < self.total_pages() }

    /// Page numbers to link around the current page, at most `width` of them.
    pub fn page_window(&self, width: u32) -> Vec<u32> {
        let total = self.total_pages();
        if total == 0 || width == 0 { return vec![]; }
        let width = width.min(total);
        let current = self.page.clamp(1, total);
        let start = current.saturating_sub(width / 2).max(1).min(total - width + 1);
        (start..start + width).collect()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged { items: self.items.into_iter().map(f).collect(), page: self.page, page_size: self.page_size, total_count: self.total_count }
    }
}

/// Form check: rejects whitespace-only text.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() { Err(message("blank", "must not be empty")) } else { Ok(()) }
}

/// Form check: 9 to 11 digits with an optional leading `+`.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits = value.trim().strip_prefix('+').unwrap_or(value.trim());
    if (9..=11).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) { Ok(()) }
    else { Err(message("phone", "must be 9 to 11 digits")) }
}

pub(crate) fn message(code: &'static str, text: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(text.into());
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_phone() {
        assert!(validate_phone("0901234567").is_ok());
        assert!(validate_phone("+84901234567").is_ok());
        assert!(validate_phone("09-0123").is_err());
        assert!(not_blank("   ").is_err());
    }
    #[test]
    fn test_money_add() {
        let a = Money::vnd(Decimal::new(100_000, 0));
        let b = Money::vnd(Decimal::new(50_000, 0));
        assert_eq!(a.add(&b).unwrap().amount(), Decimal::new(150_000, 0));
        assert_eq!(a.add(&Money::new(Decimal::ONE, "USD")), Err(MoneyError::CurrencyMismatch));
    }
    #[test]
    fn test_money_format() {
        assert_eq!(Money::vnd(Decimal::new(1_250_000, 0)).format(), "1.250.000 ₫");
        assert_eq!(Money::vnd(Decimal::new(999, 0)).format(), "999 ₫");
        assert_eq!(Money::vnd(Decimal::ZERO).format(), "0 ₫");
        assert_eq!(Money::new(Decimal::new(12345, 0), "USD").format(), "12.345 USD");
    }
    #[test]
    fn test_quantity_clamp() {
        assert_eq!(Quantity::new(0).clamp_to(5).value(), 1);
        assert_eq!(Quantity::new(9).clamp_to(5).value(), 5);
        assert_eq!(Quantity::new(3).clamp_to(0).value(), 0);
        assert_eq!(Quantity::new(2).subtract(3), None);
    }
    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert_eq!(Rating::new(4).unwrap().value(), 4);
        assert!(serde_json::from_str::<Rating>("7").is_err());
    }
    #[test]
    fn test_page_request_clamps() {
        let p = PageRequest::new(Some(0), Some(500));
        assert_eq!((p.page(), p.page_size()), (1, MAX_PAGE_SIZE));
    }
    #[test]
    fn test_page_window() {
        let paged: Paged<()> = Paged { items: vec![], page: 1, page_size: 10, total_count: 95 };
        assert_eq!(paged.total_pages(), 10);
        assert_eq!(paged.page_window(5), vec![1, 2, 3, 4, 5]);
        let paged = Paged { page: 10, ..paged };
        assert_eq!(paged.page_window(5), vec![6, 7, 8, 9, 10]);
        assert!(!paged.has_next());
        let paged = Paged { page: 5, ..paged };
        assert_eq!(paged.page_window(5), vec![3, 4, 5, 6, 7]);
        assert!(paged.has_prev() && paged.has_next());
    }
}
