//! # Delivery Pricing
//!
//! Cost and deadline of a shipment from its class, weight and declared value.
//!
//! ```text
//! deliveryCost     = costPerKg(class) * weight
//! totalCost        = deliveryCost + declaredValue * declaredValueRate
//! deliveryDeadline = now + leadTimeDays(class) * dayLength
//! ```

use crate::domain::{ContractConfig, DeliveryClass, LedgerError};
use rust_decimal::Decimal;

/// Priced shipment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeliveryQuote {
    /// Per-weight delivery cost.
    pub delivery_cost: Decimal,
    /// Amount charged to the payer.
    pub total_cost: Decimal,
    /// Absolute deadline, unix seconds.
    pub delivery_deadline: u64,
}

/// Price a shipment accepted at `now`.
pub fn quote(
    config: &ContractConfig,
    class: DeliveryClass,
    weight: Decimal,
    declared_value: Decimal,
    now: u64,
) -> Result<DeliveryQuote, LedgerError> {
    let tariff = config.tariffs.for_class(class);

    let delivery_cost = tariff
        .cost_per_kg
        .checked_mul(weight)
        .ok_or_else(|| LedgerError::invalid("delivery cost overflow"))?;
    let fee = declared_value
        .checked_mul(config.declared_value_rate)
        .ok_or_else(|| LedgerError::invalid("declared value fee overflow"))?;
    let total_cost = delivery_cost
        .checked_add(fee)
        .ok_or_else(|| LedgerError::invalid("total cost overflow"))?;

    let delivery_deadline = now.saturating_add(config.days_to_secs(tariff.lead_time_days));

    Ok(DeliveryQuote {
        delivery_cost: delivery_cost.normalize(),
        total_cost: total_cost.normalize(),
        delivery_deadline,
    })
}
