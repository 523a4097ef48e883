//! Core library for rule-driven postal address parsing and formatting.
//!
//! This crate provides:
//! - Free-text address parsing into structured fields
//! - Locale-correct address formatting, including addresses bound for
//!   another territory
//! - Form descriptions (labels and constraints) for address input UIs
//! - Per-territory rules kept as data, resolved through a load-once cache
//!
//! ```no_run
//! use std::sync::Arc;
//! use addrfmt_core::{AddressFmt, AddressParser, FormatOptions, LocaleStore};
//!
//! let store = Arc::new(LocaleStore::embedded());
//! let address = AddressParser::new(store.clone())
//!     .with_locale("en-US")
//!     .parse("1600 Amphitheatre Pkwy, Mountain View CA 94043, USA");
//!
//! let fmt = AddressFmt::new(store, FormatOptions::new().with_locale("en-US"));
//! println!("{}", fmt.format(&address));
//! ```

pub mod address;
pub mod data;
pub mod error;
pub mod format;
pub mod locale;
pub mod models;
pub mod rules;

pub use address::AddressParser;
pub use data::{DirectoryData, EmbeddedData, LayeredData, LocaleDataProvider, LocaleStore};
pub use error::{AddrError, DataError, Result};
pub use format::{AddressFmt, Constraint, FormatComponent, FormatOptions, FormatRow};
pub use locale::Locale;
pub use models::{AddrConfig, Address, AddressField, AddressInput, ScriptFormat};
