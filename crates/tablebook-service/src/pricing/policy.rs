//! Pluggable base-fee policies.

use rust_decimal::Decimal;

/// Computes the unadjusted fee for a party.
pub trait PricingPolicy: Send + Sync + 'static {
    /// Fee before any popularity markup.
    fn base_fee(&self, guest_count: u32, base_rate: Decimal) -> Decimal;
}

/// Default policy: `guest_count × base_rate`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerGuestPricing;

impl PricingPolicy for PerGuestPricing {
    fn base_fee(&self, guest_count: u32, base_rate: Decimal) -> Decimal {
        Decimal::from(guest_count) * base_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_per_guest() {
        assert_eq!(PerGuestPricing.base_fee(4, dec!(10)), dec!(40));
        assert_eq!(PerGuestPricing.base_fee(3, dec!(12.50)), dec!(37.50));
    }
}
