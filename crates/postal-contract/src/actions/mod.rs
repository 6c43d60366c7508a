//! # Action Catalogue
//!
//! Every named handler, its parameters and the exact keys it touches.
//!
//! Execution of one action:
//! 1. `Action::parse` turns the request into a typed action.
//! 2. `read_set` names the static keys; they are preloaded.
//! 3. `derived_keys` names keys computed from preloaded state (the next
//!    tracking number or transfer id); they are preloaded too.
//! 4. `apply` runs the handler against the staged `ContractState`.
//!
//! Handlers never perform I/O. A key missing from steps 2-3 surfaces as
//! `KeyNotPreloaded`.

mod params;
mod queries;
mod shipments;
mod transfers;
mod users;

use crate::adapters::ContractState;
use crate::domain::{
    Address, ContractConfig, CounterKey, DeliveryClass, LedgerError, ReadSet, ShipmentType,
    StateKey, TrackNumber, TransferId,
};
use crate::events::{ActionOutcome, ActionRequest};
use params::Params;
use rust_decimal::Decimal;

/// Per-request execution context.
#[derive(Clone, Copy, Debug)]
pub struct ActionContext<'a> {
    /// Verified caller.
    pub sender: &'a Address,
    /// Block time, unix seconds.
    pub now: u64,
    /// Block time, unix milliseconds.
    pub timestamp_ms: u64,
    /// Contract configuration.
    pub config: &'a ContractConfig,
}

impl<'a> ActionContext<'a> {
    /// Context for `request` under `config`.
    pub fn new(request: &'a ActionRequest, config: &'a ContractConfig) -> Self {
        Self {
            sender: &request.sender,
            now: request.now_secs(),
            timestamp_ms: request.timestamp,
            config,
        }
    }
}

/// Parameters of `createShipment`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewShipment {
    /// Addressee.
    pub recipient: Address,
    /// Item kind.
    pub shipment_type: ShipmentType,
    /// Delivery class.
    pub class: DeliveryClass,
    /// Weight in kg.
    pub weight: Decimal,
    /// Declared value.
    pub declared_value: Decimal,
    /// Origin postal address.
    pub from_address: String,
    /// Destination postal address.
    pub to_address: String,
}

/// A parsed action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Seed counters and genesis users.
    Init,
    /// Self-registration.
    Register {
        /// Display name.
        name: String,
        /// Postal address.
        home_address: Option<String>,
    },
    /// Edit own profile.
    UpdateProfile {
        /// Display name.
        name: String,
        /// Postal address.
        home_address: Option<String>,
    },
    /// Promote a user to employee.
    AdminAddEmployee {
        /// Target user.
        user_address: Address,
        /// Office to bind.
        office_id: String,
    },
    /// Demote an employee.
    AdminRemoveEmployee {
        /// Target employee.
        user_address: Address,
    },
    /// Move an employee to another office.
    AdminChangeOffice {
        /// Target employee.
        user_address: Address,
        /// New office.
        new_office_id: String,
    },
    /// Accept a shipment at the employee's office.
    CreateShipment(NewShipment),
    /// Record a handling event.
    TransitShipment {
        /// Shipment.
        track_number: TrackNumber,
    },
    /// Hand the shipment over.
    DeliverShipment {
        /// Shipment.
        track_number: TrackNumber,
    },
    /// Refuse a shipment.
    RefuseShipment {
        /// Shipment.
        track_number: TrackNumber,
    },
    /// Escrow funds for a recipient.
    SendMoneyTransfer {
        /// Payee.
        recipient: Address,
        /// Amount.
        amount: Decimal,
        /// Resolution window in (scaled) days.
        lifetime_days: u64,
    },
    /// Recipient takes the funds.
    AcceptMoneyTransfer {
        /// Transfer.
        transfer_id: TransferId,
    },
    /// Sender takes the funds back.
    CancelMoneyTransfer {
        /// Transfer.
        transfer_id: TransferId,
    },
    /// Recipient declines.
    RefuseMoneyTransfer {
        /// Transfer.
        transfer_id: TransferId,
    },
    /// Read a user record.
    GetUserInfo {
        /// User.
        address: Address,
    },
    /// Read a shipment.
    GetShipment {
        /// Shipment.
        track_number: TrackNumber,
    },
}

impl Action {
    /// Every action name, in catalogue order.
    pub const NAMES: [&'static str; 16] = [
        "init",
        "register",
        "updateProfile",
        "adminAddEmployee",
        "adminRemoveEmployee",
        "adminChangeOffice",
        "createShipment",
        "transitShipment",
        "deliverShipment",
        "refuseShipment",
        "sendMoneyTransfer",
        "acceptMoneyTransfer",
        "cancelMoneyTransfer",
        "refuseMoneyTransfer",
        "getUserInfo",
        "getShipment",
    ];

    /// Parse the request's action name and parameters.
    pub fn parse(request: &ActionRequest) -> Result<Self, LedgerError> {
        let p = Params::new(request);
        let action = match request.action.as_str() {
            "init" => Self::Init,
            "register" => Self::Register {
                name: p.string("name")?,
                home_address: p.optional_string("homeAddress")?,
            },
            "updateProfile" => Self::UpdateProfile {
                name: p.string("name")?,
                home_address: p.optional_string("homeAddress")?,
            },
            "adminAddEmployee" => Self::AdminAddEmployee {
                user_address: p.address("userAddress")?,
                office_id: p.string("officeId")?,
            },
            "adminRemoveEmployee" => Self::AdminRemoveEmployee {
                user_address: p.address("userAddress")?,
            },
            "adminChangeOffice" => Self::AdminChangeOffice {
                user_address: p.address("userAddress")?,
                new_office_id: p.string("newOfficeId")?,
            },
            "createShipment" => Self::CreateShipment(NewShipment {
                recipient: p.address("recipient")?,
                shipment_type: p.shipment_type("type")?,
                class: p.delivery_class("class")?,
                weight: p.decimal("weight")?,
                declared_value: p.decimal("declaredValue")?,
                from_address: p.string("fromAddress")?,
                to_address: p.string("toAddress")?,
            }),
            "transitShipment" => Self::TransitShipment {
                track_number: p.string("trackNumber")?.into(),
            },
            "deliverShipment" => Self::DeliverShipment {
                track_number: p.string("trackNumber")?.into(),
            },
            "refuseShipment" => Self::RefuseShipment {
                track_number: p.string("trackNumber")?.into(),
            },
            "sendMoneyTransfer" => Self::SendMoneyTransfer {
                recipient: p.address("recipient")?,
                amount: p.decimal("amount")?,
                lifetime_days: p.whole("lifetimeDays")?,
            },
            "acceptMoneyTransfer" => Self::AcceptMoneyTransfer {
                transfer_id: p.string("transferId")?.into(),
            },
            "cancelMoneyTransfer" => Self::CancelMoneyTransfer {
                transfer_id: p.string("transferId")?.into(),
            },
            "refuseMoneyTransfer" => Self::RefuseMoneyTransfer {
                transfer_id: p.string("transferId")?.into(),
            },
            "getUserInfo" => Self::GetUserInfo {
                address: p.address("address")?,
            },
            "getShipment" => Self::GetShipment {
                track_number: p.string("trackNumber")?.into(),
            },
            other => return Err(LedgerError::UnknownAction(other.to_string())),
        };
        Ok(action)
    }

    /// Wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Register { .. } => "register",
            Self::UpdateProfile { .. } => "updateProfile",
            Self::AdminAddEmployee { .. } => "adminAddEmployee",
            Self::AdminRemoveEmployee { .. } => "adminRemoveEmployee",
            Self::AdminChangeOffice { .. } => "adminChangeOffice",
            Self::CreateShipment(_) => "createShipment",
            Self::TransitShipment { .. } => "transitShipment",
            Self::DeliverShipment { .. } => "deliverShipment",
            Self::RefuseShipment { .. } => "refuseShipment",
            Self::SendMoneyTransfer { .. } => "sendMoneyTransfer",
            Self::AcceptMoneyTransfer { .. } => "acceptMoneyTransfer",
            Self::CancelMoneyTransfer { .. } => "cancelMoneyTransfer",
            Self::RefuseMoneyTransfer { .. } => "refuseMoneyTransfer",
            Self::GetUserInfo { .. } => "getUserInfo",
            Self::GetShipment { .. } => "getShipment",
        }
    }

    /// Read-only actions stage nothing.
    pub fn is_query(&self) -> bool {
        matches!(self, Self::GetUserInfo { .. } | Self::GetShipment { .. })
    }

    /// Keys known before any state is read.
    pub fn read_set(&self, ctx: &ActionContext<'_>) -> ReadSet {
        let sender = || StateKey::User(ctx.sender.clone());
        let mut keys = ReadSet::new();
        match self {
            Self::Init => {
                keys.extend(CounterKey::ALL.into_iter().map(StateKey::Counter));
                keys.extend(
                    ctx.config
                        .genesis
                        .users
                        .iter()
                        .map(|u| StateKey::User(u.address.clone())),
                );
            }
            Self::Register { .. } => {
                keys.insert(CounterKey::UserCount.into());
                keys.insert(sender());
            }
            Self::UpdateProfile { .. } => {
                keys.insert(sender());
            }
            Self::AdminAddEmployee { user_address, .. }
            | Self::AdminRemoveEmployee { user_address }
            | Self::AdminChangeOffice { user_address, .. } => {
                keys.insert(sender());
                keys.insert(StateKey::User(user_address.clone()));
            }
            Self::CreateShipment(new) => {
                keys.insert(CounterKey::ShipmentCount.into());
                keys.insert(sender());
                keys.insert(StateKey::User(new.recipient.clone()));
            }
            Self::TransitShipment { track_number }
            | Self::DeliverShipment { track_number }
            | Self::RefuseShipment { track_number } => {
                keys.insert(sender());
                keys.insert(StateKey::Shipment(track_number.clone()));
            }
            Self::SendMoneyTransfer { recipient, .. } => {
                keys.insert(CounterKey::TransferCount.into());
                keys.insert(sender());
                keys.insert(StateKey::User(recipient.clone()));
            }
            Self::AcceptMoneyTransfer { transfer_id }
            | Self::CancelMoneyTransfer { transfer_id }
            | Self::RefuseMoneyTransfer { transfer_id } => {
                keys.insert(sender());
                keys.insert(StateKey::Transfer(transfer_id.clone()));
            }
            Self::GetUserInfo { address } => {
                keys.insert(StateKey::User(address.clone()));
            }
            Self::GetShipment { track_number } => {
                keys.insert(StateKey::Shipment(track_number.clone()));
            }
        }
        keys
    }

    /// Keys computed from the preloaded read set.
    ///
    /// Empty when the inputs are missing; the handler then fails on its own
    /// checks before reaching the derived key.
    pub fn derived_keys(
        &self,
        ctx: &ActionContext<'_>,
        state: &ContractState,
    ) -> Result<ReadSet, LedgerError> {
        let mut keys = ReadSet::new();
        match self {
            Self::CreateShipment(new) => {
                if let Some((track, _)) = shipments::next_track_number(ctx, state, &new.to_address)? {
                    keys.insert(StateKey::Shipment(track));
                }
            }
            Self::SendMoneyTransfer { .. } => {
                if let Some((id, _)) = transfers::next_transfer_id(ctx, state)? {
                    keys.insert(StateKey::Transfer(id));
                }
            }
            _ => {}
        }
        Ok(keys)
    }

    /// Run the handler against preloaded state.
    pub fn apply(
        &self,
        ctx: &ActionContext<'_>,
        state: &mut ContractState,
    ) -> Result<ActionOutcome, LedgerError> {
        match self {
            Self::Init => users::init(ctx, state),
            Self::Register { name, home_address } => {
                users::register(ctx, state, name, home_address.clone())
            }
            Self::UpdateProfile { name, home_address } => {
                users::update_profile(ctx, state, name, home_address.clone())
            }
            Self::AdminAddEmployee {
                user_address,
                office_id,
            } => users::add_employee(ctx, state, user_address, office_id),
            Self::AdminRemoveEmployee { user_address } => {
                users::remove_employee(ctx, state, user_address)
            }
            Self::AdminChangeOffice {
                user_address,
                new_office_id,
            } => users::change_office(ctx, state, user_address, new_office_id),
            Self::CreateShipment(new) => shipments::create(ctx, state, new),
            Self::TransitShipment { track_number } => shipments::transit(ctx, state, track_number),
            Self::DeliverShipment { track_number } => shipments::deliver(ctx, state, track_number),
            Self::RefuseShipment { track_number } => shipments::refuse(ctx, state, track_number),
            Self::SendMoneyTransfer {
                recipient,
                amount,
                lifetime_days,
            } => transfers::send(ctx, state, recipient, *amount, *lifetime_days),
            Self::AcceptMoneyTransfer { transfer_id } => transfers::accept(ctx, state, transfer_id),
            Self::CancelMoneyTransfer { transfer_id } => transfers::cancel(ctx, state, transfer_id),
            Self::RefuseMoneyTransfer { transfer_id } => transfers::refuse(ctx, state, transfer_id),
            Self::GetUserInfo { address } => queries::user_info(state, address),
            Self::GetShipment { track_number } => queries::shipment(state, track_number),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DataEntry;

    #[test]
    fn test_unknown_action() {
        let request = ActionRequest::new("3Nuser", 0, "mintMoney", vec![]);
        assert!(matches!(
            Action::parse(&request),
            Err(LedgerError::UnknownAction(name)) if name == "mintMoney"
        ));
    }

    #[test]
    fn test_names_round_trip() {
        // Every catalogue name parses far enough to reach parameter checks
        for name in Action::NAMES {
            let request = ActionRequest::new("3Nuser", 0, name, vec![]);
            match Action::parse(&request) {
                Ok(action) => assert_eq!(action.name(), name),
                Err(err) => assert!(!matches!(err, LedgerError::UnknownAction(_))),
            }
        }
    }

    #[test]
    fn test_create_shipment_read_set() {
        let config = ContractConfig::default();
        let request = ActionRequest::new(
            "3Nemp",
            0,
            "createShipment",
            vec![
                DataEntry::string("recipient", "3Nrcpt"),
                DataEntry::string("type", "letter"),
                DataEntry::string("weight", "1"),
                DataEntry::integer("declaredValue", 0),
                DataEntry::string("fromAddress", "a"),
                DataEntry::string("toAddress", "b"),
            ],
        );
        let action = Action::parse(&request).unwrap();
        let ctx = ActionContext::new(&request, &config);
        let keys = action.read_set(&ctx);

        assert!(keys.contains(&StateKey::Counter(CounterKey::ShipmentCount)));
        assert!(keys.contains(&StateKey::User(Address::from("3Nemp"))));
        assert!(keys.contains(&StateKey::User(Address::from("3Nrcpt"))));
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_init_read_set_covers_genesis() {
        let config = ContractConfig::default();
        let request = ActionRequest::new("3Nadmin", 0, "init", vec![]);
        let ctx = ActionContext::new(&request, &config);
        let keys = Action::Init.read_set(&ctx);
        assert_eq!(keys.len(), 4 + config.genesis.users.len());
    }

    #[test]
    fn test_query_flag() {
        let query = Action::GetUserInfo {
            address: Address::from("a"),
        };
        assert!(query.is_query());
        assert!(!Action::Init.is_query());
    }
}
