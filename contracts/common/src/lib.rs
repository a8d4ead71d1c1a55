//! USC Common Library
//!
//! Shared types, constants and pure accounting logic for the USC
//! multi-collateral stable token module.
//!
//! Everything in this crate is side-effect free: it never touches balances
//! or storage. The stateful module (`usc-module`) wires these pieces to a
//! ledger and a key-value store.
//!
//! ## Components
//!
//! - **Token Metadata**: per-denom precision ([`TokenMeta`]) and the host
//!   registry of known metadata ([`MetadataRegistry`])
//! - **Decimal Conversion**: exact integer conversion between precisions
//!   ([`math`])
//! - **Params**: runtime configuration and its validation ([`Params`])
//! - **Collateral Conversion**: valuing a deposited basket in the stable
//!   denom ([`collaterals_to_stable`])
//! - **Redemption Distribution**: ordering the Active pool and greedily
//!   filling a redemption ([`stable_to_collaterals`])
//! - **Events**: typed module events and an [`EventLog`]

pub mod constants;
pub mod errors;
pub mod types;
pub mod validation;
pub mod math;
pub mod meta;
pub mod params;
pub mod collateral;
pub mod redemption;
pub mod events;

// Re-exports for convenience
pub use errors::*;
pub use types::*;
pub use math::{convert_amount, pow10};
pub use meta::{DecimalUnit, MetadataRegistry, TokenMeta};
pub use params::Params;
pub use collateral::{collaterals_to_stable, MintConversion};
pub use redemption::{rank_pool, stable_to_collaterals, RankedCoin, RedeemDistribution};
pub use events::*;
