/// A set of integers: a stepped range or a sorted list of discrete values.
///
/// Ranges are normalized on construction so that `from <= to`, `step > 0`
/// and `to` is the last value actually reached by the step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntSet {
    Range { from: i32, to: i32, step: i32 },
    Values(Vec<i32>),
}

impl Default for IntSet {
    fn default() -> Self {
        Self::Values(Vec::new())
    }
}

impl IntSet {
    pub fn single(value: i32) -> Self {
        Self::Range {
            from: value,
            to: value,
            step: 1,
        }
    }

    /// Contiguous range; the ends may be given in any order.
    pub fn range(from: i32, to: i32) -> Self {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        Self::Range { from, to, step: 1 }
    }

    /// Stepped range. A reversed range with a negative step starts at
    /// `from` and walks down, so its lowest member is the last value the
    /// step reaches. A zero step is treated as 1.
    pub fn range_with_step(from: i32, to: i32, step: i32) -> Self {
        if from == to {
            return Self::single(from);
        }
        let from = i64::from(from);
        let to = i64::from(to);
        let step = if step == 0 { 1 } else { i64::from(step) };
        let (low, high, step) = if from < to {
            (from, to, step.abs())
        } else if step < 0 {
            (from + ((to - from) / step) * step, from, -step)
        } else {
            (to, from, step)
        };
        let high = low + ((high - low) / step) * step;
        Self::Range {
            from: low as i32,
            to: high as i32,
            step: step as i32,
        }
    }

    /// Sorts and deduplicates; a single value collapses into a range.
    pub fn from_values(mut values: Vec<i32>) -> Self {
        values.sort_unstable();
        values.dedup();
        if values.len() == 1 {
            return Self::single(values[0]);
        }
        Self::Values(values)
    }

    pub fn size(&self) -> usize {
        match self {
            Self::Range { from, to, step } => {
                ((i64::from(*to) - i64::from(*from)) / i64::from(*step) + 1) as usize
            }
            Self::Values(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn contains(&self, value: i32) -> bool {
        self.index_of(value).is_some()
    }

    pub fn index_of(&self, value: i32) -> Option<usize> {
        match self {
            Self::Values(values) => values.iter().position(|candidate| *candidate == value),
            Self::Range { from, to, step } => {
                if value < *from || value > *to {
                    return None;
                }
                let relative = i64::from(value) - i64::from(*from);
                let step = i64::from(*step);
                (relative % step == 0).then(|| (relative / step) as usize)
            }
        }
    }
}
