//! # YmRange — Valid (Year, Month) Enumeration and Sampling
//!
//! Builds the enumerable set of (year, month) pairs between two bounds and
//! draws uniformly from it. Validation fails fast, before any network
//! activity: the begin year must be strictly below the end year and both
//! months must be in 1..=12.

use anyhow::{bail, Result};
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Clone, Debug)]
pub struct YmRange {
    pairs: Vec<(i32, u32)>,
}

impl YmRange {
    /// Enumerate all (year, month) pairs from (begin_year, begin_month) to
    /// (end_year, end_month), inclusive on both ends.
    pub fn new(begin_year: i32, begin_month: u32, end_year: i32, end_month: u32) -> Result<Self> {
        if begin_year >= end_year || !(1..=12).contains(&begin_month) || !(1..=12).contains(&end_month)
        {
            bail!(
                "invalid years and/or months: {}-{:02} .. {}-{:02}",
                begin_year,
                begin_month,
                end_year,
                end_month
            );
        }

        let mut pairs: Vec<(i32, u32)> = (begin_year..=end_year)
            .flat_map(|year| (1..=12u32).map(move |month| (year, month)))
            .collect();
        pairs.truncate(pairs.len() - (12 - end_month) as usize);
        pairs.drain(..(begin_month - 1) as usize);

        Ok(YmRange { pairs })
    }

    pub fn pairs(&self) -> &[(i32, u32)] {
        &self.pairs
    }

    /// One uniform draw. A validated range spans at least two years, so
    /// the enumerated set is never empty.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> (i32, u32) {
        *self.pairs.choose(rng).expect("validated range is non-empty")
    }
}
