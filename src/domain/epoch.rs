use chrono::{FixedOffset, NaiveDateTime, TimeZone};

use super::error::DomainError;

/// Unix timestamp of mainnet genesis (2020-08-25 06:00:00 +08:00)
pub const MAINNET_GENESIS_UNIX: i64 = 1_598_306_400;

/// Duration of one chain epoch
pub const SECONDS_PER_EPOCH: i64 = 30;

/// Local-time offset the default timestamps are written in
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Converts wall-clock timestamps into chain epochs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainClock {
    genesis_unix: i64,
    offset: FixedOffset,
}

impl ChainClock {
    /// Mainnet clock reading timestamps in the given UTC offset
    pub fn mainnet(utc_offset_hours: i32) -> Result<Self, DomainError> {
        let offset = utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or(DomainError::InvalidUtcOffset(utc_offset_hours))?;
        Ok(Self {
            genesis_unix: MAINNET_GENESIS_UNIX,
            offset,
        })
    }

    /// Epoch containing the given unix timestamp, rounded down
    pub fn epoch_at_unix(&self, unix: i64) -> i64 {
        (unix - self.genesis_unix).div_euclid(SECONDS_PER_EPOCH)
    }

    /// Parse `YYYY-MM-DD HH:MM:SS` in the clock's offset and convert to an epoch
    pub fn epoch_at(&self, timestamp: &str) -> Result<i64, DomainError> {
        let invalid = || DomainError::InvalidTimestamp(timestamp.to_string());

        let naive = NaiveDateTime::parse_from_str(timestamp.trim(), TIMESTAMP_FORMAT)
            .map_err(|_| invalid())?;
        let local = self
            .offset
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(invalid)?;

        Ok(self.epoch_at_unix(local.timestamp()))
    }
}

impl Default for ChainClock {
    fn default() -> Self {
        Self {
            genesis_unix: MAINNET_GENESIS_UNIX,
            offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600)
                .expect("default offset is within +/-24h"),
        }
    }
}
