//! Live price board for the CryptoVault landing page.
//!
//! [`ticker::board::PriceBoard`] holds the published snapshot of the six
//! catalog assets, [`ticker::scheduler::start`] keeps it fresh on a fixed
//! cadence, and [`format`] turns the numbers into display strings.

pub mod catalog;
pub mod config;
pub mod format;
pub mod quote;
pub mod render;
pub mod ticker;
