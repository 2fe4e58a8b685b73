//! Identifier generation for `m_id`, `m_master_id`, `m_owner_id` and similar slots.
//!
//! Identifiers are drawn from a large random space instead of being checked against
//! existing trees: files are authored elsewhere and only ever partially loaded, so a
//! global uniqueness check is neither possible nor attempted. A single generator
//! additionally never hands out the same value twice.

use std::{cell::RefCell, collections::HashSet};

use rand::{Rng, SeedableRng, rngs::StdRng};

/// A source of fresh identifiers.
pub trait IdGenerator {
    /// Returns an identifier not previously returned by this generator.
    fn next_id(&mut self) -> i64;
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_id(&mut self) -> i64 {
        (**self).next_id()
    }
}

/// Uniformly random positive identifiers.
#[derive(Debug)]
pub struct RandomIds {
    rng: StdRng,
    issued: HashSet<i64>,
}

impl RandomIds {
    /// A generator seeded from the operating system's entropy source.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            issued: HashSet::new(),
        }
    }

    /// A deterministic generator, for tests and reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            issued: HashSet::new(),
        }
    }

    /// How many identifiers this generator has issued.
    pub fn issued(&self) -> usize {
        self.issued.len()
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> i64 {
        loop {
            let id = self.rng.gen_range(1..=i64::MAX);
            if self.issued.insert(id) {
                tracing::trace!(id, "issued identifier");
                return id;
            }
            tracing::warn!(id, "random identifier repeated, drawing again");
        }
    }
}

thread_local! {
    static THREAD_IDS: RefCell<RandomIds> = RefCell::new(RandomIds::new());
}

/// Draws an identifier from a thread-local [`RandomIds`].
pub fn generate_id() -> i64 {
    THREAD_IDS.with(|ids| ids.borrow_mut().next_id())
}
