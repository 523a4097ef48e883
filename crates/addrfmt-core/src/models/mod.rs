//! Data models: addresses, territory rulesets and configuration.

pub mod address;
pub mod config;
pub mod embedded;
pub mod ruleset;

pub use address::{Address, AddressField, AddressInput};
pub use config::AddrConfig;
pub use ruleset::{ScriptFormat, StartAt, TerritoryRuleset};
