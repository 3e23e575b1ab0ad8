use super::{Direction, Directive, Target};
use crate::{
    accumulator::Accumulator,
    error::Result,
    neighbor::NeighborListManager,
    particles::Particles,
    potential::{Arity, FixedGroup, Group, Potential, PotentialRegistry},
    Container,
};

/// Read-only view of a simulation state that feeds interaction groups to an
/// accumulator. Neighbor lists are used as they are; bring them up to date
/// before dispatching.
#[derive(Clone, Copy)]
pub struct Dispatcher<'a> {
    container: &'a Container,
    particles: &'a Particles,
    potentials: &'a PotentialRegistry,
    neighbors: &'a NeighborListManager,
}
impl<'a> Dispatcher<'a> {
    pub fn new(
        container: &'a Container,
        particles: &'a Particles,
        potentials: &'a PotentialRegistry,
        neighbors: &'a NeighborListManager,
    ) -> Self {
        Self {
            container,
            particles,
            potentials,
            neighbors,
        }
    }

    pub fn calculate<A: Accumulator>(&self, directive: &Directive, acc: &mut A) -> Result<()> {
        let mut members = Vec::new();
        match directive.target() {
            Target::Single(i) => {
                self.particles.check_live(i)?;
                self.visit_single(i, directive, acc, &mut members);
            }
            Target::All => {
                for i in self.particles.iter() {
                    self.visit(i, directive, acc, &mut members);
                }
            }
        }
        Ok(())
    }

    /// Run the all-particle walk over `owned` only. The directive's target is
    /// ignored. Indices that are not live are skipped.
    pub fn calculate_owned<A: Accumulator>(&self, directive: &Directive, owned: &[usize], acc: &mut A) {
        let mut members = Vec::new();
        for &i in owned {
            if self.particles.is_live(i) {
                self.visit(i, directive, acc, &mut members);
            }
        }
    }

    /// Everything particle `i` is responsible for in an all-particle walk
    fn visit<A: Accumulator>(&self, i: usize, directive: &Directive, acc: &mut A, members: &mut Vec<usize>) {
        if !directive.excludes(Arity::OneBody) {
            self.one_body(i, acc);
        }
        if !directive.excludes(Arity::TwoBody) {
            for &j in self.partners(i, directive.direction()) {
                self.pair(i, j, acc);
            }
        }
        if !directive.excludes(Arity::ManyBody) {
            for p in self.potentials.many_body_for(self.particles.kind(i)) {
                self.centered(i, p, acc, members);
            }
        }
        for group in self.potentials.groups_owned_by(i) {
            self.fixed(group, directive, acc);
        }
    }

    /// Every interaction particle `i` takes part in
    fn visit_single<A: Accumulator>(
        &self,
        i: usize,
        directive: &Directive,
        acc: &mut A,
        members: &mut Vec<usize>,
    ) {
        if !directive.excludes(Arity::OneBody) {
            self.one_body(i, acc);
        }
        if !directive.excludes(Arity::TwoBody) {
            for &j in self.partners(i, directive.direction()) {
                self.pair(i, j, acc);
            }
        }
        if !directive.excludes(Arity::ManyBody) {
            for p in self.potentials.many_body_for(self.particles.kind(i)) {
                self.centered(i, p, acc, members);
            }
            // groups centered on a neighbor that reach back to i
            let pos_i = self.particles.position(i);
            for &j in self.neighbors.neighbors(i) {
                let r2 = self.container.distance_sq(pos_i, self.particles.position(j));
                for p in self.potentials.many_body_for(self.particles.kind(j)) {
                    if r2 <= p.range() * p.range() {
                        self.centered(j, p, acc, members);
                    }
                }
            }
        }
        for group in self.potentials.groups_containing(i) {
            self.fixed(group, directive, acc);
        }
    }

    fn partners(&self, i: usize, direction: Direction) -> &'a [usize] {
        match direction {
            Direction::Up => self.neighbors.up_neighbors(i),
            Direction::Down => self.neighbors.down_neighbors(i),
            Direction::Both => self.neighbors.neighbors(i),
        }
    }

    fn one_body<A: Accumulator>(&self, i: usize, acc: &mut A) {
        let members = [i];
        let group = Group::new(&members, self.particles, self.container);
        for p in self.potentials.one_body_for(self.particles.kind(i)) {
            acc.accumulate(&group, p);
        }
    }

    fn pair<A: Accumulator>(&self, i: usize, j: usize, acc: &mut A) {
        let members = [i, j];
        let group = Group::new(&members, self.particles, self.container);
        let r2 = group.distance_sq(0, 1);
        for p in self
            .potentials
            .pairs_for(self.particles.kind(i), self.particles.kind(j))
        {
            let range = p.range();
            if r2 <= range * range {
                acc.accumulate(&group, p);
            }
        }
    }

    /// `center` followed by its neighbors within the potential's range
    fn centered<A: Accumulator>(
        &self,
        center: usize,
        potential: &dyn Potential,
        acc: &mut A,
        members: &mut Vec<usize>,
    ) {
        let range_sq = potential.range() * potential.range();
        let pos = self.particles.position(center);
        members.clear();
        members.push(center);
        members.extend(
            self.neighbors
                .neighbors(center)
                .iter()
                .copied()
                .filter(|&j| self.container.distance_sq(pos, self.particles.position(j)) <= range_sq),
        );
        acc.accumulate(
            &Group::new(&members[..], self.particles, self.container),
            potential,
        );
    }

    fn fixed<A: Accumulator>(&self, group: &FixedGroup, directive: &Directive, acc: &mut A) {
        let potential = group.potential();
        if directive.excludes(potential.arity()) {
            return;
        }
        // a removed member leaves the group dormant
        if !group.members().iter().all(|&m| self.particles.is_live(m)) {
            return;
        }
        acc.accumulate(
            &Group::new(group.members(), self.particles, self.container),
            potential,
        );
    }
}
