//! Signal levels and edges

/// Logic level of a sample relative to the detection threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// At or below the threshold
    Low,
    /// Above the threshold
    High,
}

impl Level {
    /// Classify a raw sample
    pub const fn of(raw: u16, threshold: u16) -> Self {
        if raw > threshold {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Signal transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Low sample followed by a high sample
    Rising,
    /// High sample followed by a low sample
    Falling,
}

impl Edge {
    /// Levels that must be seen, in order, to detect this edge
    pub const fn levels(self) -> (Level, Level) {
        match self {
            Edge::Rising => (Level::Low, Level::High),
            Edge::Falling => (Level::High, Level::Low),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_threshold() {
        assert_eq!(Level::of(0, 0), Level::Low);
        assert_eq!(Level::of(1, 0), Level::High);
    }

    #[test]
    fn test_threshold_is_inclusive_low() {
        assert_eq!(Level::of(100, 100), Level::Low);
        assert_eq!(Level::of(101, 100), Level::High);
    }

    #[test]
    fn test_edge_levels() {
        assert_eq!(Edge::Rising.levels(), (Level::Low, Level::High));
        assert_eq!(Edge::Falling.levels(), (Level::High, Level::Low));
    }
}
