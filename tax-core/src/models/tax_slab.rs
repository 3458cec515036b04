use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a list of slabs does not partition the non-negative
/// income line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlabScheduleError {
    #[error("slab schedule must contain at least one slab")]
    Empty,

    #[error("slab {index} has upper bound {bound} which does not exceed the previous bound {previous}")]
    NotIncreasing {
        index: usize,
        bound: Decimal,
        previous: Decimal,
    },

    #[error("slab {0} is unbounded but is not the last slab")]
    UnboundedBeforeEnd(usize),

    #[error("last slab must be unbounded, got upper bound {0}")]
    BoundedTail(Decimal),

    #[error("slab {index} has rate {rate} outside [0, 1]")]
    RateOutOfRange { index: usize, rate: Decimal },
}

/// A single income slab. The lower bound is implied by the previous slab's
/// upper bound (or zero for the first slab).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSlab {
    /// Inclusive upper bound; `None` for the open-ended top slab.
    pub upper_bound: Option<Decimal>,
    /// Marginal rate as a fraction, e.g. `0.05` for 5%.
    pub rate: Decimal,
}

impl TaxSlab {
    pub fn bounded(
        upper_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }
}

/// An ordered, validated list of [`TaxSlab`]s.
///
/// Slabs are contiguous by construction: each one starts where the previous
/// one ends, the first starts at zero and the last is unbounded. Once built a
/// schedule is immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlabSchedule {
    slabs: Vec<TaxSlab>,
}

impl SlabSchedule {
    /// Validates `slabs` and wraps them in a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`SlabScheduleError`] if the list is empty, bounds are not
    /// strictly increasing, an unbounded slab appears before the end, the last
    /// slab is bounded, or any rate falls outside `[0, 1]`.
    pub fn new(slabs: Vec<TaxSlab>) -> Result<Self, SlabScheduleError> {
        if slabs.is_empty() {
            return Err(SlabScheduleError::Empty);
        }

        let last = slabs.len() - 1;
        let mut previous = Decimal::ZERO;

        for (index, slab) in slabs.iter().enumerate() {
            if slab.rate < Decimal::ZERO || slab.rate > Decimal::ONE {
                return Err(SlabScheduleError::RateOutOfRange {
                    index,
                    rate: slab.rate,
                });
            }

            match slab.upper_bound {
                Some(bound) if index == last => {
                    return Err(SlabScheduleError::BoundedTail(bound));
                }
                Some(bound) => {
                    if bound <= previous {
                        return Err(SlabScheduleError::NotIncreasing {
                            index,
                            bound,
                            previous,
                        });
                    }
                    previous = bound;
                }
                None if index != last => {
                    return Err(SlabScheduleError::UnboundedBeforeEnd(index));
                }
                None => {}
            }
        }

        Ok(Self { slabs })
    }

    pub fn slabs(&self) -> &[TaxSlab] {
        &self.slabs
    }

    pub fn len(&self) -> usize {
        self.slabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slabs.is_empty()
    }
}

impl Default for SlabSchedule {
    /// The four-slab individual schedule: nil up to 2,50,000, then 5%, 20%
    /// and 30%.
    fn default() -> Self {
        Self {
            slabs: vec![
                TaxSlab::bounded(Decimal::from(250_000), Decimal::ZERO),
                TaxSlab::bounded(Decimal::from(500_000), Decimal::new(5, 2)),
                TaxSlab::bounded(Decimal::from(1_000_000), Decimal::new(20, 2)),
                TaxSlab::unbounded(Decimal::new(30, 2)),
            ],
        }
    }
}
