//! Protocol Constants
//!
//! Module names, storage layout bytes and default parameter values for the
//! USC module.
//!
//! # Network Configuration
//!
//! Use feature flags to compile for different networks:
//! - `mainnet` - Production values (two week redeem delay)
//! - Default (no feature) - Testnet values (short delay for testing)
//!
//! ```toml
//! # For mainnet deployment:
//! usc-common = { path = "...", features = ["mainnet"] }
//! ```

/// Module naming
pub mod module {
    /// Module name, also used as the minter/burner account seed
    pub const NAME: &str = "usc";
    /// Active pool account seed (collateral backing the outstanding supply)
    pub const ACTIVE_POOL: &str = "usc_active_pool";
    /// Redeeming pool account seed (collateral in transit to redeemers)
    pub const REDEEMING_POOL: &str = "usc_redeeming_pool";
}

/// Decimal precision limits
pub mod precision {
    /// Highest supported decimals value.
    ///
    /// Bounds every conversion factor by 10^18, leaving u128 room for
    /// amounts up to ~3.4e20 whole tokens at the finest precision.
    pub const MAX_DECIMALS: u32 = 18;
}

/// Denomination rules
pub mod denom {
    /// Minimum denom length
    pub const MIN_LEN: usize = 3;
    /// Maximum denom length
    pub const MAX_LEN: usize = 128;
    /// Prefix of a bridged (IBC) stable alias denom
    pub const ALIAS_PREFIX: &str = "ibc/";
    /// Hex length of the hash part of an alias denom
    pub const ALIAS_HASH_HEX_LEN: usize = 64;
}

/// Default parameter values
///
/// Values differ between mainnet and testnet to allow easier testing.
pub mod defaults {
    /// Default stable token denom (atto-USC)
    pub const STABLE_DENOM: &str = "ausc";
    /// Default stable token decimals
    pub const STABLE_DECIMALS: u32 = 18;
    /// Default stable token description
    pub const STABLE_DESCRIPTION: &str = "USC native stable token";

    /// Redeem delay in seconds
    /// - Mainnet: 2 weeks
    /// - Testnet: 10 minutes
    #[cfg(feature = "mainnet")]
    pub const REDEEM_DELAY_SECS: u64 = 2 * 7 * 24 * 60 * 60;
    #[cfg(not(feature = "mainnet"))]
    pub const REDEEM_DELAY_SECS: u64 = 10 * 60;

    /// Maximum number of pending redeem entries per account (0 = unlimited)
    pub const MAX_REDEEM_ENTRIES: u32 = 7;

    /// Helper to check if running in mainnet mode
    #[cfg(feature = "mainnet")]
    pub const IS_MAINNET: bool = true;
    #[cfg(not(feature = "mainnet"))]
    pub const IS_MAINNET: bool = false;
}
