use std::collections::BTreeSet;

use super::Accumulator;
use crate::potential::{Arity, Group, Potential};

/// Counts the groups handed to potentials without evaluating anything
#[derive(Clone, Debug, Default)]
pub struct GroupCounter {
    one_body: usize,
    two_body: usize,
    many_body: usize,
    pairs: BTreeSet<(usize, usize)>,
}
impl GroupCounter {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn count(&self, arity: Arity) -> usize {
        match arity {
            Arity::OneBody => self.one_body,
            Arity::TwoBody => self.two_body,
            Arity::ManyBody => self.many_body,
        }
    }
    pub fn total(&self) -> usize {
        self.one_body + self.two_body + self.many_body
    }
    /// Distinct unordered pairs visited by two-body potentials
    pub fn distinct_pairs(&self) -> usize {
        self.pairs.len()
    }
    pub fn contains_pair(&self, i: usize, j: usize) -> bool {
        self.pairs.contains(&(i.min(j), i.max(j)))
    }
}
impl Accumulator for GroupCounter {
    fn reset(&mut self) {
        *self = Self::default();
    }
    fn accumulate(&mut self, group: &Group<'_>, potential: &dyn Potential) {
        match potential.arity() {
            Arity::OneBody => self.one_body += 1,
            Arity::TwoBody => {
                self.two_body += 1;
                let (i, j) = (group.index(0), group.index(1));
                self.pairs.insert((i.min(j), i.max(j)));
            }
            Arity::ManyBody => self.many_body += 1,
        }
    }
    fn combine(&mut self, other: &Self) {
        self.one_body += other.one_body;
        self.two_body += other.two_body;
        self.many_body += other.many_body;
        self.pairs.extend(other.pairs.iter().copied());
    }
}
