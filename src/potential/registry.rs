use super::{Arity, Potential};
use crate::{
    error::{Error, Result},
    utils::Types,
};

/// Potential acting on an explicit set of particles, e.g. a bonded triplet
pub struct FixedGroup {
    members: Vec<usize>,
    potential: Box<dyn Potential>,
}
impl FixedGroup {
    pub fn members(&self) -> &[usize] {
        &self.members
    }
    pub fn potential(&self) -> &dyn Potential {
        self.potential.as_ref()
    }
    /// Lowest member index. The group is evaluated when this particle is visited.
    pub fn owner(&self) -> usize {
        self.members.iter().copied().min().unwrap_or(usize::MAX)
    }
}

/// All potentials known to a simulation, keyed by particle kind.
///
/// Pair potentials are symmetric in the kinds they were registered with: a
/// potential registered for `(0, 1)` applies to a `(1, 0)` pair as well, and
/// is invoked once per pair.
#[derive(Default)]
pub struct PotentialRegistry {
    one_body: Vec<(Types, Box<dyn Potential>)>,
    pairs: Vec<(Types, Types, Box<dyn Potential>)>,
    many_body: Vec<(Types, Box<dyn Potential>)>,
    groups: Vec<FixedGroup>,
    memberships: Vec<Vec<usize>>,
}
impl PotentialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_one_body<P>(&mut self, kinds: impl Into<Types>, potential: P) -> Result<()>
    where
        P: Potential + 'static,
    {
        check_arity(&potential, Arity::OneBody)?;
        self.one_body.push((kinds.into(), Box::new(potential)));
        Ok(())
    }
    pub fn add_pair<P>(
        &mut self,
        kinds_i: impl Into<Types>,
        kinds_j: impl Into<Types>,
        potential: P,
    ) -> Result<()>
    where
        P: Potential + 'static,
    {
        check_arity(&potential, Arity::TwoBody)?;
        check_range(&potential)?;
        self.pairs
            .push((kinds_i.into(), kinds_j.into(), Box::new(potential)));
        Ok(())
    }
    /// Register a potential acting on every particle of the given kinds
    /// together with all of its neighbors within the potential's range
    pub fn add_many_body<P>(&mut self, kinds: impl Into<Types>, potential: P) -> Result<()>
    where
        P: Potential + 'static,
    {
        check_arity(&potential, Arity::ManyBody)?;
        check_range(&potential)?;
        self.many_body.push((kinds.into(), Box::new(potential)));
        Ok(())
    }
    /// Register a potential on a fixed set of particles. Returns the group id.
    pub fn add_group<P>(&mut self, members: Vec<usize>, potential: P) -> Result<usize>
    where
        P: Potential + 'static,
    {
        if members.is_empty() {
            return Err(Error::config("A fixed group needs at least one member"));
        }
        let mut sorted = members.clone();
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(Error::config(format!(
                "Fixed group members should be distinct, found {:?}",
                members
            )));
        }
        let expected = match members.len() {
            1 => Arity::OneBody,
            2 => Arity::TwoBody,
            _ => Arity::ManyBody,
        };
        check_arity(&potential, expected)?;

        let id = self.groups.len();
        for &m in &members {
            if self.memberships.len() <= m {
                self.memberships.resize_with(m + 1, Vec::new);
            }
            self.memberships[m].push(id);
        }
        self.groups.push(FixedGroup {
            members,
            potential: Box::new(potential),
        });
        Ok(id)
    }

    // Lookups

    pub fn one_body_for(&self, kind: usize) -> impl Iterator<Item = &dyn Potential> + '_ {
        self.one_body
            .iter()
            .filter(move |(t, _)| t.contains(kind))
            .map(|(_, p)| p.as_ref())
    }
    pub fn pairs_for(&self, kind_i: usize, kind_j: usize) -> impl Iterator<Item = &dyn Potential> + '_ {
        self.pairs
            .iter()
            .filter(move |(ti, tj, _)| {
                (ti.contains(kind_i) && tj.contains(kind_j))
                    || (ti.contains(kind_j) && tj.contains(kind_i))
            })
            .map(|(_, _, p)| p.as_ref())
    }
    pub fn many_body_for(&self, kind: usize) -> impl Iterator<Item = &dyn Potential> + '_ {
        self.many_body
            .iter()
            .filter(move |(t, _)| t.contains(kind))
            .map(|(_, p)| p.as_ref())
    }
    pub fn group(&self, id: usize) -> &FixedGroup {
        &self.groups[id]
    }
    /// Fixed groups that list the particle as a member
    pub fn groups_containing(&self, index: usize) -> impl Iterator<Item = &FixedGroup> + '_ {
        self.memberships
            .get(index)
            .into_iter()
            .flatten()
            .map(move |&id| &self.groups[id])
    }
    /// Fixed groups whose lowest member is the particle
    pub fn groups_owned_by(&self, index: usize) -> impl Iterator<Item = &FixedGroup> + '_ {
        self.groups_containing(index)
            .filter(move |g| g.owner() == index)
    }

    pub fn has_one_body(&self) -> bool {
        !self.one_body.is_empty()
    }
    pub fn has_pairs(&self) -> bool {
        !self.pairs.is_empty()
    }
    pub fn has_many_body(&self) -> bool {
        !self.many_body.is_empty()
    }
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Longest range of any pair or centered many-body potential. Fixed
    /// groups and one-body potentials do not rely on neighbor lists.
    pub fn max_range(&self) -> f64 {
        self.pairs
            .iter()
            .map(|(_, _, p)| p.range())
            .chain(self.many_body.iter().map(|(_, p)| p.range()))
            .fold(0.0, f64::max)
    }
}

fn check_arity(potential: &dyn Potential, expected: Arity) -> Result<()> {
    if potential.arity() == expected {
        Ok(())
    } else {
        Err(Error::config(format!(
            "Expected a {:?} potential, found {:?}",
            expected,
            potential.arity()
        )))
    }
}

fn check_range(potential: &dyn Potential) -> Result<()> {
    let range = potential.range();
    if range.is_nan() || range < 0.0 {
        return Err(Error::config(format!(
            "Potential range should be non-negative, found {}",
            range
        )));
    }
    Ok(())
}
