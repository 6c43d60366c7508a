//! Shared fixtures for the postal contract integration tests.

#![allow(dead_code)]

use postal_contract::{
    ActionOutcome, ActionRequest, Address, ContractConfig, CounterKey, DataEntry,
    InMemoryStateBackend, LedgerError, MoneyTransfer, PostalContractApi, PostalContractService,
    Shipment, StateKey, User,
};
use rust_decimal::Decimal;

pub const ADMIN: &str = "3N...admin...";
pub const ROSTOV: &str = "3N...rostov...";
pub const TAGANROG: &str = "3N...taganrog...";
pub const USER: &str = "3N...user...";

/// 2026-10-17T12:00:00Z in milliseconds.
pub const NOON_MS: u64 = 1_792_238_400_000;

/// Seconds in one default tariff day.
pub const DAY_SECS: u64 = 7_200;

pub type TestService = PostalContractService<InMemoryStateBackend>;

/// Service over an empty backend, genesis not yet run.
pub fn create_bare_service() -> TestService {
    PostalContractService::new(InMemoryStateBackend::new(), ContractConfig::default())
        .expect("default config is valid")
}

/// Service with genesis applied.
pub async fn create_test_service() -> TestService {
    let service = create_bare_service();
    service
        .execute(ActionRequest::new(ADMIN, NOON_MS, "init", vec![]))
        .await
        .expect("init succeeds on an empty backend");
    service
}

pub async fn exec(
    service: &TestService,
    sender: &str,
    at_ms: u64,
    action: &str,
    params: Vec<DataEntry>,
) -> Result<ActionOutcome, LedgerError> {
    service
        .execute(ActionRequest::new(sender, at_ms, action, params))
        .await
}

pub async fn user(service: &TestService, addr: &str) -> User {
    service
        .user_info(&Address::from(addr))
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("user {addr} missing"))
}

pub async fn balance(service: &TestService, addr: &str) -> Decimal {
    user(service, addr).await.balance
}

pub fn counter(service: &TestService, counter: CounterKey) -> u64 {
    let value = service
        .backend()
        .raw(&StateKey::Counter(counter).storage_key())
        .expect("counter seeded");
    serde_json::from_value(value).unwrap()
}

/// `createShipment` parameters for a parcel handed to `USER`.
pub fn shipment_params(class: Option<i64>, weight: &str, declared_value: i64) -> Vec<DataEntry> {
    let mut params = vec![
        DataEntry::string("recipient", USER),
        DataEntry::string("type", "parcel"),
        DataEntry::string("weight", weight),
        DataEntry::integer("declaredValue", declared_value),
        DataEntry::string("fromAddress", "Rostov-on-Don, Sadovaya 1"),
        DataEntry::string("toAddress", "Taganrog, Petrova 10, 347900"),
    ];
    if let Some(class) = class {
        params.push(DataEntry::integer("class", class));
    }
    params
}

/// `sendMoneyTransfer` parameters.
pub fn transfer_params(recipient: &str, amount: &str, lifetime_days: i64) -> Vec<DataEntry> {
    vec![
        DataEntry::string("recipient", recipient),
        DataEntry::string("amount", amount),
        DataEntry::integer("lifetimeDays", lifetime_days),
    ]
}

pub fn all_users(service: &TestService) -> Vec<User> {
    records(service, StateKey::USERS)
}

pub fn all_shipments(service: &TestService) -> Vec<Shipment> {
    records(service, StateKey::SHIPMENTS)
}

pub fn all_transfers(service: &TestService) -> Vec<MoneyTransfer> {
    records(service, StateKey::TRANSFERS)
}

fn records<T: serde::de::DeserializeOwned>(service: &TestService, collection: &str) -> Vec<T> {
    let prefix = format!("{collection}_");
    let mut entries: Vec<_> = service
        .backend()
        .snapshot()
        .into_iter()
        .filter(|(key, _)| key.starts_with(&prefix))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
        .into_iter()
        .map(|(_, value)| serde_json::from_value(value).unwrap())
        .collect()
}
