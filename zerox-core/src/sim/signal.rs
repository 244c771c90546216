//! Synthetic signal generators

/// A periodic or constant signal, in raw counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimSignal {
    /// Fixed reading
    Constant(u16),
    /// Square wave: `high` for `high_ticks` of every `period`, zero otherwise
    Square {
        /// Period in ticks
        period: u64,
        /// Ticks spent high at the start of each period
        high_ticks: u64,
        /// Lag behind t = 0 in ticks (negative leads)
        delay: i64,
        /// Reading while high
        high: u16,
    },
    /// Half-wave rectified triangle: rises from zero to `peak` and back in
    /// the first half of each period, zero for the second half
    ///
    /// Stands in for a rectified sine as seen by a unipolar ADC.
    HalfWave {
        /// Period in ticks
        period: u64,
        /// Reading at the top of the positive half
        peak: u16,
        /// Lag behind t = 0 in ticks (negative leads)
        delay: i64,
    },
}

impl SimSignal {
    /// Reading at time `t` (ticks)
    pub fn value_at(&self, t: u64) -> u16 {
        match *self {
            SimSignal::Constant(value) => value,
            SimSignal::Square {
                period,
                high_ticks,
                delay,
                high,
            } => {
                if phase(t, period, delay) < high_ticks {
                    high
                } else {
                    0
                }
            }
            SimSignal::HalfWave {
                period,
                peak,
                delay,
            } => {
                let half = period / 2;
                let x = phase(t, period, delay);
                if half == 0 || x >= half {
                    return 0;
                }
                let distance = x.min(half - x);
                (peak as u64 * 2 * distance / half) as u16
            }
        }
    }
}

/// Position of `t` within the period, after applying the lag
fn phase(t: u64, period: u64, delay: i64) -> u64 {
    if period == 0 {
        return 0;
    }
    (t as i128 - delay as i128).rem_euclid(period as i128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_wave() {
        let s = SimSignal::Square {
            period: 100,
            high_ticks: 50,
            delay: 0,
            high: 1,
        };
        assert_eq!(s.value_at(0), 1);
        assert_eq!(s.value_at(49), 1);
        assert_eq!(s.value_at(50), 0);
        assert_eq!(s.value_at(100), 1);
        assert_eq!(s.value_at(150), 0);
    }

    #[test]
    fn test_half_wave_shape() {
        let s = SimSignal::HalfWave {
            period: 1000,
            peak: 1000,
            delay: 0,
        };
        assert_eq!(s.value_at(0), 0);
        assert_eq!(s.value_at(250), 1000);
        assert_eq!(s.value_at(125), 500);
        assert_eq!(s.value_at(500), 0);
        assert_eq!(s.value_at(999), 0);
    }

    #[test]
    fn test_delay_and_lead() {
        let lag = SimSignal::HalfWave {
            period: 1000,
            peak: 1000,
            delay: 250,
        };
        assert_eq!(lag.value_at(500), 1000);

        let lead = SimSignal::HalfWave {
            period: 1000,
            peak: 1000,
            delay: -250,
        };
        assert_eq!(lead.value_at(0), 1000);
    }
}
