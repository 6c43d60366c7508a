//! Property-based tests for ledger invariants.
//!
//! Random action sequences from a small cast of actors must preserve:
//! 1. No balance is ever negative
//! 2. Money is conserved: balances + shipment charges + open or refused escrow = genesis supply
//! 3. Shipment status paths are prefixes of created -> in_transit -> delivered,
//!    or end in refused from created or in_transit
//! 4. A transfer leaves pending at most once
//! 5. A failed action changes nothing

mod common;

use common::*;
use postal_contract::{
    quote, ContractConfig, DataEntry, DeliveryClass, ShipmentStatus, TransferStatus,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

const CAST: [&str; 6] = [ADMIN, ROSTOV, TAGANROG, USER, "3Nextra0", "3Nextra1"];
const OFFICES: [&str; 3] = ["RR344000", "RR347900", "RR346400"];

// =============================================================================
// Strategy helpers
// =============================================================================

#[derive(Clone, Debug)]
enum Op {
    Register(usize),
    Promote { target: usize, office: usize },
    Demote { target: usize },
    CreateShipment {
        actor: usize,
        weight_tenths: i64,
        class: i64,
        declared: i64,
    },
    Transit { actor: usize, pick: usize },
    Deliver { actor: usize, pick: usize },
    RefuseShipment { actor: usize, pick: usize },
    Send {
        actor: usize,
        to: usize,
        amount: i64,
        days: i64,
    },
    Accept { actor: usize, pick: usize },
    Cancel { actor: usize, pick: usize },
    RefuseTransfer { actor: usize, pick: usize },
    Wait(u64),
}

fn actor() -> impl Strategy<Value = usize> {
    0..CAST.len()
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        actor().prop_map(Op::Register),
        (actor(), 0..OFFICES.len()).prop_map(|(target, office)| Op::Promote { target, office }),
        actor().prop_map(|target| Op::Demote { target }),
        (actor(), 0i64..=120, 1i64..=3, 0i64..=300).prop_map(
            |(actor, weight_tenths, class, declared)| Op::CreateShipment {
                actor,
                weight_tenths,
                class,
                declared,
            }
        ),
        (actor(), any::<usize>()).prop_map(|(actor, pick)| Op::Transit { actor, pick }),
        (actor(), any::<usize>()).prop_map(|(actor, pick)| Op::Deliver { actor, pick }),
        (actor(), any::<usize>()).prop_map(|(actor, pick)| Op::RefuseShipment { actor, pick }),
        (actor(), actor(), 0i64..=60, 0i64..=3).prop_map(|(actor, to, amount, days)| Op::Send {
            actor,
            to,
            amount,
            days,
        }),
        (actor(), any::<usize>()).prop_map(|(actor, pick)| Op::Accept { actor, pick }),
        (actor(), any::<usize>()).prop_map(|(actor, pick)| Op::Cancel { actor, pick }),
        (actor(), any::<usize>()).prop_map(|(actor, pick)| Op::RefuseTransfer { actor, pick }),
        (0u64..=40_000).prop_map(Op::Wait),
    ]
}

fn pick_track(service: &TestService, pick: usize) -> Option<Vec<DataEntry>> {
    let shipments = all_shipments(service);
    if shipments.is_empty() {
        return None;
    }
    let track = shipments[pick % shipments.len()].track_number.to_string();
    Some(vec![DataEntry::string("trackNumber", track)])
}

fn pick_transfer(service: &TestService, pick: usize) -> Option<Vec<DataEntry>> {
    let transfers = all_transfers(service);
    if transfers.is_empty() {
        return None;
    }
    let id = transfers[pick % transfers.len()].id.to_string();
    Some(vec![DataEntry::string("transferId", id)])
}

/// Translate an op into (sender, action, params). `None` when nothing to target.
fn build(service: &TestService, op: &Op) -> Option<(&'static str, &'static str, Vec<DataEntry>)> {
    let request = match op {
        Op::Register(a) => (
            CAST[*a],
            "register",
            vec![DataEntry::string("name", format!("actor {a}"))],
        ),
        Op::Promote { target, office } => (
            ADMIN,
            "adminAddEmployee",
            vec![
                DataEntry::string("userAddress", CAST[*target]),
                DataEntry::string("officeId", OFFICES[*office]),
            ],
        ),
        Op::Demote { target } => (
            ADMIN,
            "adminRemoveEmployee",
            vec![DataEntry::string("userAddress", CAST[*target])],
        ),
        Op::CreateShipment {
            actor,
            weight_tenths,
            class,
            declared,
        } => (
            CAST[*actor],
            "createShipment",
            vec![
                DataEntry::string("recipient", CAST[(*actor + 3) % CAST.len()]),
                DataEntry::string("type", "letter"),
                DataEntry::integer("class", *class),
                DataEntry::string("weight", Decimal::new(*weight_tenths, 1).to_string()),
                DataEntry::integer("declaredValue", *declared),
                DataEntry::string("fromAddress", "Rostov"),
                DataEntry::string("toAddress", "Taganrog 347900"),
            ],
        ),
        Op::Transit { actor, pick } => (CAST[*actor], "transitShipment", pick_track(service, *pick)?),
        Op::Deliver { actor, pick } => (CAST[*actor], "deliverShipment", pick_track(service, *pick)?),
        Op::RefuseShipment { actor, pick } => {
            (CAST[*actor], "refuseShipment", pick_track(service, *pick)?)
        }
        Op::Send {
            actor,
            to,
            amount,
            days,
        } => (
            CAST[*actor],
            "sendMoneyTransfer",
            vec![
                DataEntry::string("recipient", CAST[*to]),
                DataEntry::integer("amount", *amount),
                DataEntry::integer("lifetimeDays", *days),
            ],
        ),
        Op::Accept { actor, pick } => {
            (CAST[*actor], "acceptMoneyTransfer", pick_transfer(service, *pick)?)
        }
        Op::Cancel { actor, pick } => {
            (CAST[*actor], "cancelMoneyTransfer", pick_transfer(service, *pick)?)
        }
        Op::RefuseTransfer { actor, pick } => {
            (CAST[*actor], "refuseMoneyTransfer", pick_transfer(service, *pick)?)
        }
        Op::Wait(_) => return None,
    };
    Some(request)
}

fn valid_shipment_path(path: &[ShipmentStatus]) -> bool {
    use ShipmentStatus::*;
    matches!(
        path,
        [Created]
            | [Created, InTransit]
            | [Created, InTransit, Delivered]
            | [Created, Refused]
            | [Created, InTransit, Refused]
    )
}

async fn check_ledger(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let service = create_test_service().await;
    let supply: Decimal = all_users(&service).iter().map(|u| u.balance).sum();

    let mut now_ms = NOON_MS;
    let mut shipment_paths: HashMap<String, Vec<ShipmentStatus>> = HashMap::new();
    let mut history_lens: HashMap<String, usize> = HashMap::new();
    let mut settled: HashMap<String, TransferStatus> = HashMap::new();

    for op in &ops {
        now_ms += 1_000;
        if let Op::Wait(secs) = op {
            now_ms += secs * 1_000;
            continue;
        }
        let Some((sender, action, params)) = build(&service, op) else {
            continue;
        };

        let before = service.backend().snapshot();
        let result = exec(&service, sender, now_ms, action, params).await;
        if result.is_err() {
            prop_assert_eq!(&service.backend().snapshot(), &before, "{} changed state", action);
        }

        let users = all_users(&service);
        for user in &users {
            prop_assert!(!user.balance.is_sign_negative(), "negative balance {:?}", user);
        }

        let shipments = all_shipments(&service);
        let transfers = all_transfers(&service);
        let held: Decimal = transfers
            .iter()
            .filter(|t| matches!(t.status, TransferStatus::Pending | TransferStatus::Refused))
            .map(|t| t.amount)
            .sum();
        let charged: Decimal = shipments.iter().map(|s| s.total_cost).sum();
        let balances: Decimal = users.iter().map(|u| u.balance).sum();
        prop_assert_eq!(balances + charged + held, supply);

        for shipment in &shipments {
            let key = shipment.track_number.to_string();
            let path = shipment_paths.entry(key.clone()).or_default();
            if path.last() != Some(&shipment.status) {
                path.push(shipment.status);
            }
            prop_assert!(valid_shipment_path(path), "shipment path {:?}", path);

            let len = history_lens.entry(key).or_insert(0);
            prop_assert!(shipment.history.len() >= *len);
            prop_assert!(!shipment.history.is_empty());
            *len = shipment.history.len();
        }

        for transfer in &transfers {
            let key = transfer.id.to_string();
            if let Some(previous) = settled.get(&key) {
                prop_assert_eq!(*previous, transfer.status, "transfer {} resolved twice", key);
            } else if transfer.status.is_terminal() {
                settled.insert(key, transfer.status);
            }
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_ledger_invariants(ops in prop::collection::vec(op_strategy(), 1..60)) {
        tokio_test::block_on(check_ledger(ops))?;
    }

    #[test]
    fn prop_pricing_formula(
        class in 1u8..=3,
        weight_tenths in 1i64..=100,
        declared in 0i64..=10_000,
    ) {
        let config = ContractConfig::default();
        let class = DeliveryClass::try_from(class).unwrap();
        let weight = Decimal::new(weight_tenths, 1);
        let declared = Decimal::from(declared);

        let q = quote(&config, class, weight, declared, 0).unwrap();
        let rate = config.tariffs.for_class(class).cost_per_kg;
        prop_assert_eq!(q.delivery_cost, rate * weight);
        prop_assert_eq!(q.total_cost, rate * weight + declared * Decimal::new(1, 1));
        prop_assert!(q.total_cost >= q.delivery_cost);
    }
}
