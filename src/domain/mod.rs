pub mod deal;
pub mod epoch;
pub mod error;
pub mod filter;
pub mod size;

// Re-export commonly used types
pub use deal::{DealProposal, DealRecord, DealState, INACTIVE_SECTOR_EPOCH, MarketDeal};
pub use epoch::{ChainClock, DEFAULT_UTC_OFFSET_HOURS, MAINNET_GENESIS_UNIX, SECONDS_PER_EPOCH};
pub use error::DomainError;
pub use filter::{EpochWindow, FilterCriteria};
pub use size::{TIB, to_tib, to_tib_string};
