//! Typed parameter extraction from request data entries.

use crate::domain::{Address, DeliveryClass, LedgerError, ShipmentType};
use crate::events::{ActionRequest, ParamValue};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Read-only view over a request's parameters.
pub(crate) struct Params<'a> {
    request: &'a ActionRequest,
}

impl<'a> Params<'a> {
    pub(crate) fn new(request: &'a ActionRequest) -> Self {
        Self { request }
    }

    fn required(&self, key: &str) -> Result<&'a ParamValue, LedgerError> {
        self.request
            .param(key)
            .ok_or_else(|| LedgerError::invalid(format!("missing parameter {key}")))
    }

    pub(crate) fn string(&self, key: &str) -> Result<String, LedgerError> {
        match self.required(key)? {
            ParamValue::String(s) => Ok(s.clone()),
            other => Err(type_mismatch(key, "string", other)),
        }
    }

    /// Absent entries and empty strings read as `None`.
    pub(crate) fn optional_string(&self, key: &str) -> Result<Option<String>, LedgerError> {
        match self.request.param(key) {
            None => Ok(None),
            Some(ParamValue::String(s)) if s.is_empty() => Ok(None),
            Some(ParamValue::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(type_mismatch(key, "string", other)),
        }
    }

    pub(crate) fn address(&self, key: &str) -> Result<Address, LedgerError> {
        let raw = self.string(key)?;
        if raw.trim().is_empty() {
            return Err(LedgerError::invalid(format!("parameter {key} is empty")));
        }
        Ok(Address::new(raw))
    }

    /// Integer entry or decimal string.
    pub(crate) fn decimal(&self, key: &str) -> Result<Decimal, LedgerError> {
        match self.required(key)? {
            ParamValue::Integer(i) => Ok(Decimal::from(*i)),
            ParamValue::String(s) => Decimal::from_str(s.trim()).map_err(|e| {
                LedgerError::invalid(format!("parameter {key}: {s:?} is not a number ({e})"))
            }),
            other => Err(type_mismatch(key, "number", other)),
        }
    }

    /// Non-negative whole number, integer entry or numeric string.
    pub(crate) fn whole(&self, key: &str) -> Result<u64, LedgerError> {
        match self.required(key)? {
            ParamValue::Integer(i) => u64::try_from(*i).map_err(|_| {
                LedgerError::invalid(format!("parameter {key} must not be negative, got {i}"))
            }),
            ParamValue::String(s) => s.trim().parse::<u64>().map_err(|_| {
                LedgerError::invalid(format!("parameter {key}: {s:?} is not a whole number"))
            }),
            other => Err(type_mismatch(key, "number", other)),
        }
    }

    pub(crate) fn shipment_type(&self, key: &str) -> Result<ShipmentType, LedgerError> {
        let raw = self.string(key)?;
        ShipmentType::parse(&raw).ok_or_else(|| {
            LedgerError::invalid(format!(
                "parameter {key} must be letter, parcel or package, got {raw:?}"
            ))
        })
    }

    /// Delivery class, defaulting to class 3 when absent or zero.
    pub(crate) fn delivery_class(&self, key: &str) -> Result<DeliveryClass, LedgerError> {
        if self.request.param(key).is_none() {
            return Ok(DeliveryClass::default());
        }
        match self.whole(key)? {
            0 => Ok(DeliveryClass::default()),
            n => u8::try_from(n)
                .map_err(|_| LedgerError::invalid(format!("delivery class {n} out of range")))
                .and_then(|n| DeliveryClass::try_from(n).map_err(LedgerError::invalid)),
        }
    }
}

fn type_mismatch(key: &str, expected: &str, got: &ParamValue) -> LedgerError {
    LedgerError::invalid(format!(
        "parameter {key} must be {expected}, got {}",
        got.type_name()
    ))
}
