//! # Contract Configuration
//!
//! Tariff table, time scale, identifier prefixes and the genesis user set.
//! Every field has a default so a partial TOML table is enough.

use super::entities::User;
use super::value_objects::{Address, DeliveryClass, Role};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Seconds in one sandbox "day" (24 * 60 * 5).
pub const SANDBOX_DAY_LENGTH_SECS: u64 = 24 * 60 * 5;

/// Seconds in a calendar day.
pub const REAL_DAY_LENGTH_SECS: u64 = 86_400;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Day length must be positive.
    #[error("day_length_secs must be greater than zero")]
    ZeroDayLength,

    /// Tariff entry is unusable.
    #[error("Invalid tariff for class {class}: {reason}")]
    InvalidTariff {
        /// Delivery class number
        class: u8,
        /// What is wrong
        reason: String,
    },

    /// Invalid scalar setting.
    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting {
        /// Setting name
        name: &'static str,
        /// What is wrong
        reason: String,
    },

    /// Genesis user set is inconsistent.
    #[error("Invalid genesis user {address}: {reason}")]
    InvalidGenesisUser {
        /// User address
        address: String,
        /// What is wrong
        reason: String,
    },
}

/// Price and lead time of one delivery class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassTariff {
    /// Cost per kilogram.
    pub cost_per_kg: Decimal,
    /// Lead time in (scaled) days.
    pub lead_time_days: u64,
}

impl ClassTariff {
    fn new(cost_per_kg: Decimal, lead_time_days: u64) -> Self {
        Self {
            cost_per_kg,
            lead_time_days,
        }
    }
}

/// Tariff table, one entry per class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffTable {
    /// Class 1.
    pub first: ClassTariff,
    /// Class 2.
    pub second: ClassTariff,
    /// Class 3.
    pub third: ClassTariff,
}

impl TariffTable {
    /// Look up the tariff for a class.
    pub fn for_class(&self, class: DeliveryClass) -> &ClassTariff {
        match class {
            DeliveryClass::First => &self.first,
            DeliveryClass::Second => &self.second,
            DeliveryClass::Third => &self.third,
        }
    }
}

impl Default for TariffTable {
    fn default() -> Self {
        Self {
            first: ClassTariff::new(Decimal::new(5, 1), 5),
            second: ClassTariff::new(Decimal::new(3, 1), 10),
            third: ClassTariff::new(Decimal::new(1, 1), 15),
        }
    }
}

/// A user seeded by `init`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisUser {
    /// Identity.
    pub address: Address,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: Role,
    /// Opening balance.
    pub balance: Decimal,
    /// Postal address.
    #[serde(default)]
    pub home_address: Option<String>,
    /// Office code, employees only.
    #[serde(default)]
    pub office_id: Option<String>,
}

impl GenesisUser {
    /// Materialise the user record.
    pub fn to_user(&self) -> User {
        User {
            name: self.name.clone(),
            address: self.address.clone(),
            balance: self.balance,
            role: self.role,
            home_address: self.home_address.clone(),
            office_id: self.office_id.clone(),
        }
    }
}

/// Genesis state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisConfig {
    /// Predefined users.
    pub users: Vec<GenesisUser>,
}

impl GenesisConfig {
    /// Number of admins among the genesis users.
    pub fn admin_count(&self) -> u64 {
        self.users.iter().filter(|u| u.role == Role::Admin).count() as u64
    }
}

impl Default for GenesisConfig {
    fn default() -> Self {
        let opening = Decimal::from(50);
        Self {
            users: vec![
                GenesisUser {
                    address: Address::from("3N...admin..."),
                    name: "Semenov Semen Semenovich".to_string(),
                    role: Role::Admin,
                    balance: opening,
                    home_address: Some("Rostov-on-Don, Lenina st. 1".to_string()),
                    office_id: None,
                },
                GenesisUser {
                    address: Address::from("3N...rostov..."),
                    name: "Petrov Petr Petrovich".to_string(),
                    role: Role::Employee,
                    balance: opening,
                    home_address: Some("Rostov-on-Don, Sotsialisticheskaya st. 50".to_string()),
                    office_id: Some("RR344000".to_string()),
                },
                GenesisUser {
                    address: Address::from("3N...taganrog..."),
                    name: "Antonov Anton Antonovich".to_string(),
                    role: Role::Employee,
                    balance: opening,
                    home_address: Some("Taganrog, Petrova st. 10".to_string()),
                    office_id: Some("RR347900".to_string()),
                },
                GenesisUser {
                    address: Address::from("3N...user..."),
                    name: "Yuriev Yuri Yurievich".to_string(),
                    role: Role::User,
                    balance: opening,
                    home_address: Some("Rostov-on-Don, Pushkina st. 25".to_string()),
                    office_id: None,
                },
            ],
        }
    }
}

/// Contract configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Length of one tariff "day" in seconds. Scales delivery deadlines and
    /// transfer lifetimes.
    pub day_length_secs: u64,
    /// Per-class tariffs.
    pub tariffs: TariffTable,
    /// Fee charged on the declared value.
    pub declared_value_rate: Decimal,
    /// Upper weight bound in kg (inclusive).
    pub max_weight_kg: Decimal,
    /// Tracking number prefix.
    pub track_prefix: String,
    /// Transfer id prefix.
    pub transfer_prefix: String,
    /// Users seeded by `init`.
    pub genesis: GenesisConfig,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            day_length_secs: SANDBOX_DAY_LENGTH_SECS,
            tariffs: TariffTable::default(),
            declared_value_rate: Decimal::new(1, 1),
            max_weight_kg: Decimal::from(10),
            track_prefix: "RR".to_string(),
            transfer_prefix: "TR".to_string(),
            genesis: GenesisConfig::default(),
        }
    }
}

impl ContractConfig {
    /// Configuration with calendar-length days.
    pub fn production() -> Self {
        Self {
            day_length_secs: REAL_DAY_LENGTH_SECS,
            ..Default::default()
        }
    }

    /// Duration of `days` scaled days in seconds.
    pub fn days_to_secs(&self, days: u64) -> u64 {
        days.saturating_mul(self.day_length_secs)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.day_length_secs == 0 {
            return Err(ConfigError::ZeroDayLength);
        }

        for class in DeliveryClass::ALL {
            let tariff = self.tariffs.for_class(class);
            if tariff.cost_per_kg <= Decimal::ZERO {
                return Err(ConfigError::InvalidTariff {
                    class: class.number(),
                    reason: "cost_per_kg must be positive".to_string(),
                });
            }
            if tariff.lead_time_days == 0 {
                return Err(ConfigError::InvalidTariff {
                    class: class.number(),
                    reason: "lead_time_days must be positive".to_string(),
                });
            }
        }

        if self.declared_value_rate.is_sign_negative() {
            return Err(ConfigError::InvalidSetting {
                name: "declared_value_rate",
                reason: "must not be negative".to_string(),
            });
        }
        if self.max_weight_kg <= Decimal::ZERO {
            return Err(ConfigError::InvalidSetting {
                name: "max_weight_kg",
                reason: "must be positive".to_string(),
            });
        }
        if self.track_prefix.chars().count() != 2 || self.transfer_prefix.chars().count() != 2 {
            return Err(ConfigError::InvalidSetting {
                name: "prefix",
                reason: "identifier prefixes are two characters".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for user in &self.genesis.users {
            let reject = |reason: &str| ConfigError::InvalidGenesisUser {
                address: user.address.to_string(),
                reason: reason.to_string(),
            };
            if !seen.insert(&user.address) {
                return Err(reject("duplicate address"));
            }
            if user.balance.is_sign_negative() {
                return Err(reject("negative balance"));
            }
            if (user.role == Role::Employee) != user.office_id.is_some() {
                return Err(reject("office_id must be set exactly for employees"));
            }
        }

        Ok(())
    }
}
