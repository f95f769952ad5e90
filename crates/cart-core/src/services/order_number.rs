//! Display-only order numbers

use cart_shared::constants::{ORDER_NUMBER_MAX, ORDER_NUMBER_MIN};
use rand::rngs::OsRng;
use rand::{Rng, TryRngCore};
use tracing::debug;

pub trait OrderNumberSource: Send + Sync {
    /// A number in `ORDER_NUMBER_MIN..=ORDER_NUMBER_MAX`. Not unique.
    fn next_order_number(&self) -> u16;
}

/// OS randomness, falling back to the thread RNG when it is unavailable.
pub struct RandomOrderNumber;

const SPAN: u32 = (ORDER_NUMBER_MAX - ORDER_NUMBER_MIN) as u32 + 1;

/// Map a raw draw onto the order-number range. Draws past the last whole
/// multiple of the span are rejected so every number is equally likely.
fn order_number_from(value: u32) -> Option<u16> {
    let zone = (u32::MAX / SPAN) * SPAN;
    (value < zone).then(|| ORDER_NUMBER_MIN + (value % SPAN) as u16)
}

fn os_order_number() -> Option<u16> {
    loop {
        let value = match OsRng.try_next_u32() {
            Ok(value) => value,
            Err(e) => {
                debug!("OS randomness unavailable, using thread RNG: {}", e);
                return None;
            }
        };
        if let Some(number) = order_number_from(value) {
            return Some(number);
        }
    }
}

impl OrderNumberSource for RandomOrderNumber {
    fn next_order_number(&self) -> u16 {
        os_order_number()
            .unwrap_or_else(|| rand::rng().random_range(ORDER_NUMBER_MIN..=ORDER_NUMBER_MAX))
    }
}

/// Always the same number.
pub struct FixedOrderNumber(pub u16);

impl OrderNumberSource for FixedOrderNumber {
    fn next_order_number(&self) -> u16 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_numbers_in_range() {
        let source = RandomOrderNumber;
        for _ in 0..1000 {
            let n = source.next_order_number();
            assert!((ORDER_NUMBER_MIN..=ORDER_NUMBER_MAX).contains(&n));
        }
    }

    #[test]
    fn test_draws_past_last_full_span_rejected() {
        let zone = (u32::MAX / SPAN) * SPAN;
        assert_eq!(order_number_from(0), Some(ORDER_NUMBER_MIN));
        assert_eq!(order_number_from(SPAN - 1), Some(ORDER_NUMBER_MAX));
        assert_eq!(order_number_from(zone - 1), Some(ORDER_NUMBER_MAX));
        assert_eq!(order_number_from(zone), None);
        assert_eq!(order_number_from(u32::MAX), None);
    }
}
