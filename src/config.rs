//! Stream timing and interrupt priority configuration

use ufmt::derive::uDebug;

/// Number of NVIC priority bits implemented on the TM4C123
pub const NVIC_PRIO_BITS: u8 = 3;

/// Lowest-urgency priority level (levels run 0 = most urgent ..= 7)
pub const MAX_PRIORITY_LEVEL: u8 = (1 << NVIC_PRIO_BITS) - 1;

/// Invalid configuration values
#[derive(Clone, Copy, Debug, uDebug, Eq, PartialEq)]
pub enum ConfigError {
    /// A period of zero was requested
    ZeroPeriod,
    /// Period is shorter than one timer clock cycle
    PeriodTooShort,
    /// Period does not fit in a 32-bit timer
    PeriodTooLong,
    /// Priority level beyond what the NVIC implements
    PriorityOutOfRange,
    /// Debounce settle interval is not shorter than the tick period
    SettleNotShorterThanTick,
    /// Mode-change priority is not more urgent than the tick priority
    PriorityInversion,
}

/// Timing and priority settings for the waveform stream
#[derive(Clone, Copy, Debug, uDebug, Eq, PartialEq)]
pub struct StreamConfig {
    /// Sample period [us]
    pub tick_period_us: u32,
    /// Button settle interval before the press is confirmed [us]
    pub settle_us: u32,
    /// Sample stream baud rate
    pub baud: u32,
    /// Diagnostic log baud rate
    pub log_baud: u32,
    /// NVIC level of the tick timer interrupt
    pub tick_priority: u8,
    /// NVIC level of the button edge and settle timer interrupts
    pub edge_priority: u8,
}

impl StreamConfig {
    /// 5 ms ticks, 0.5 ms settle, 9600 baud samples, button above tick
    pub const DEFAULT: StreamConfig = StreamConfig {
        tick_period_us: 5_000,
        settle_us: 500,
        baud: 9600,
        log_baud: 115_200,
        tick_priority: 5,
        edge_priority: 2,
    };

    /// Check the settings for consistency before touching any hardware
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_us == 0 || self.settle_us == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.settle_us >= self.tick_period_us {
            return Err(ConfigError::SettleNotShorterThanTick);
        }
        nvic_priority(self.tick_priority)?;
        nvic_priority(self.edge_priority)?;
        if self.edge_priority >= self.tick_priority {
            return Err(ConfigError::PriorityInversion);
        }
        Ok(())
    }

    /// Timer reload value for the tick period at `sysclk_hz`
    pub fn tick_reload(&self, sysclk_hz: u32) -> Result<u32, ConfigError> {
        timer_reload(sysclk_hz, self.tick_period_us)
    }

    /// Timer reload value for the settle interval at `sysclk_hz`
    pub fn settle_reload(&self, sysclk_hz: u32) -> Result<u32, ConfigError> {
        timer_reload(sysclk_hz, self.settle_us)
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Load value for a down-counting timer so that it expires every `period_us`.
///
/// The timer counts `reload..=0`, so the value is one less than the number of
/// clock cycles in the period.
pub fn timer_reload(sysclk_hz: u32, period_us: u32) -> Result<u32, ConfigError> {
    if period_us == 0 {
        return Err(ConfigError::ZeroPeriod);
    }
    let cycles = (sysclk_hz as u64) * (period_us as u64) / 1_000_000;
    if cycles == 0 {
        return Err(ConfigError::PeriodTooShort);
    }
    u32::try_from(cycles - 1).map_err(|_| ConfigError::PeriodTooLong)
}

/// Hardware priority byte for a priority level; the TM4C123 only
/// implements the top three bits.
pub fn nvic_priority(level: u8) -> Result<u8, ConfigError> {
    if level > MAX_PRIORITY_LEVEL {
        return Err(ConfigError::PriorityOutOfRange);
    }
    Ok(level << (8 - NVIC_PRIO_BITS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(StreamConfig::DEFAULT.validate(), Ok(()));
        assert_eq!(StreamConfig::default(), StreamConfig::DEFAULT);
    }

    #[test]
    fn reload_matches_reference_timing() {
        // 5 ms at 40 MHz is a 200_000 cycle load
        assert_eq!(timer_reload(40_000_000, 5_000), Ok(199_999));
        // 0.5 ms at 80 MHz
        assert_eq!(timer_reload(80_000_000, 500), Ok(39_999));
        assert_eq!(StreamConfig::DEFAULT.tick_reload(80_000_000), Ok(399_999));
        assert_eq!(StreamConfig::DEFAULT.settle_reload(80_000_000), Ok(39_999));
    }

    #[test]
    fn reload_rejects_out_of_range_periods() {
        assert_eq!(timer_reload(80_000_000, 0), Err(ConfigError::ZeroPeriod));
        assert_eq!(timer_reload(500_000, 1), Err(ConfigError::PeriodTooShort));
        // 60 s at 80 MHz does not fit in 32 bits
        assert_eq!(
            timer_reload(80_000_000, 60_000_000),
            Err(ConfigError::PeriodTooLong)
        );
        // Exactly 2^32 cycles still fits once the -1 is applied
        assert_eq!(timer_reload(1_000_000, u32::MAX), Ok(u32::MAX - 1));
    }

    #[test]
    fn priority_levels_map_to_top_bits() {
        assert_eq!(nvic_priority(0), Ok(0x00));
        assert_eq!(nvic_priority(2), Ok(0x40));
        assert_eq!(nvic_priority(5), Ok(0xA0));
        assert_eq!(nvic_priority(7), Ok(0xE0));
        assert_eq!(nvic_priority(8), Err(ConfigError::PriorityOutOfRange));
    }

    #[test]
    fn inconsistent_configs_are_rejected() {
        let base = StreamConfig::DEFAULT;

        let c = StreamConfig { settle_us: 0, ..base };
        assert_eq!(c.validate(), Err(ConfigError::ZeroPeriod));

        let c = StreamConfig { settle_us: 5_000, ..base };
        assert_eq!(c.validate(), Err(ConfigError::SettleNotShorterThanTick));

        let c = StreamConfig { tick_priority: 9, ..base };
        assert_eq!(c.validate(), Err(ConfigError::PriorityOutOfRange));

        let c = StreamConfig { edge_priority: 5, ..base };
        assert_eq!(c.validate(), Err(ConfigError::PriorityInversion));
    }
}
