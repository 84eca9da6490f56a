//! Checkout pricing: delivery fees, tax, and credit amortization.
//!
//! All arithmetic is done in [`Decimal`]; money never passes through
//! binary floats. The rates here are fixed store policy, re-checked
//! server-side when the order is submitted.

use heartwood_core::DeliveryOption;
use rust_decimal::Decimal;

/// VAT applied to the cart subtotal.
#[must_use]
pub fn tax_rate() -> Decimal {
    Decimal::new(15, 2) // 0.15
}

/// Monthly interest rate for installment credit.
#[must_use]
pub fn monthly_interest_rate() -> Decimal {
    Decimal::new(2, 2) // 0.02
}

/// Flat delivery fee for each option.
#[must_use]
pub fn delivery_fee(option: DeliveryOption) -> Decimal {
    match option {
        DeliveryOption::Standard => Decimal::new(10, 0),
        DeliveryOption::Express => Decimal::new(20, 0),
        DeliveryOption::Pickup => Decimal::ZERO,
    }
}

/// A fully-derived checkout quote.
///
/// Never stored: recomputed from the current cart and form whenever it is
/// needed, so it cannot drift from its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl Quote {
    /// Price a subtotal under the given delivery option.
    #[must_use]
    pub fn compute(subtotal: Decimal, option: DeliveryOption) -> Self {
        let delivery_fee = delivery_fee(option);
        let tax = (subtotal * tax_rate()).round_dp(2);
        Self {
            subtotal,
            delivery_fee,
            tax,
            total: subtotal + delivery_fee + tax,
        }
    }
}

/// Fixed monthly installment for paying `total` over `term_months` at the
/// store's monthly interest rate, rounded to cents.
///
/// A zero term renders as zero until the form validates it away.
#[must_use]
pub fn monthly_payment(total: Decimal, term_months: u32) -> Decimal {
    monthly_payment_at(total, monthly_interest_rate(), term_months)
}

fn monthly_payment_at(total: Decimal, rate: Decimal, term_months: u32) -> Decimal {
    if term_months == 0 {
        return Decimal::ZERO;
    }

    // A zero rate means equal installments, not a degenerate annuity.
    if rate.is_zero() {
        return (total / Decimal::from(term_months)).round_dp(2);
    }

    // (1 + r)^n by repeated multiplication; the term is capped at 36 months.
    let monthly = Decimal::ONE + rate;
    let mut factor = Decimal::ONE;
    for _ in 0..term_months {
        factor *= monthly;
    }

    (total * (rate * factor) / (factor - Decimal::ONE)).round_dp(2)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_fee_table() {
        assert_eq!(delivery_fee(DeliveryOption::Standard), Decimal::new(10, 0));
        assert_eq!(delivery_fee(DeliveryOption::Express), Decimal::new(20, 0));
        assert_eq!(delivery_fee(DeliveryOption::Pickup), Decimal::ZERO);
    }

    #[test]
    fn test_quote_express() {
        let quote = Quote::compute(Decimal::new(100, 0), DeliveryOption::Express);
        assert_eq!(quote.subtotal, Decimal::new(100, 0));
        assert_eq!(quote.delivery_fee, Decimal::new(20, 0));
        assert_eq!(quote.tax, Decimal::new(15, 0));
        assert_eq!(quote.total, Decimal::new(135, 0));
    }

    #[test]
    fn test_quote_pickup_has_no_fee() {
        let quote = Quote::compute(Decimal::new(200, 0), DeliveryOption::Pickup);
        assert_eq!(quote.delivery_fee, Decimal::ZERO);
        assert_eq!(quote.total, Decimal::new(230, 0));
    }

    #[test]
    fn test_quote_tax_rounds_to_cents() {
        // 99.99 * 0.15 = 14.9985 -> 15.00
        let quote = Quote::compute(Decimal::new(9999, 2), DeliveryOption::Standard);
        assert_eq!(quote.tax, Decimal::new(1500, 2));
    }

    #[test]
    fn test_monthly_payment_from_formula() {
        // 135 * (0.02 * 1.02^6) / (1.02^6 - 1) = 24.10 to the cent
        let payment = monthly_payment(Decimal::new(135, 0), 6);
        assert_eq!(payment, Decimal::new(2410, 2));
    }

    #[test]
    fn test_monthly_payment_single_month() {
        // One installment repays the total plus one month of interest.
        let payment = monthly_payment(Decimal::new(100, 0), 1);
        assert_eq!(payment, Decimal::new(10200, 2));
    }

    #[test]
    fn test_zero_rate_means_equal_installments() {
        let payment = monthly_payment_at(Decimal::new(135, 0), Decimal::ZERO, 6);
        assert_eq!(payment, Decimal::new(2250, 2));
    }

    #[test]
    fn test_zero_term_yields_zero() {
        assert_eq!(monthly_payment(Decimal::new(135, 0), 0), Decimal::ZERO);
    }
}
