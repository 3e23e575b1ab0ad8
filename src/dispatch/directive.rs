use crate::potential::Arity;

/// Which particles a calculation visits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    All,
    Single(usize),
}

/// Which neighbors of a visited particle take part in pair interactions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Neighbors with a strictly greater index
    Up,
    /// Neighbors with a strictly lower index
    Down,
    /// Every neighbor
    Both,
}

/// Immutable request describing one potential calculation.
///
/// `Directive::all()` walks every particle with the half-shell convention,
/// so each pair is visited once. `Directive::single(i)` gathers everything
/// particle `i` takes part in.
///
/// ```rust
/// use jcell::{dispatch::{Direction, Directive}, potential::Arity};
///
/// let directive = Directive::single(4).exclude(Arity::OneBody);
/// assert_eq!(directive.direction(), Direction::Both);
/// assert!(directive.excludes(Arity::OneBody));
/// assert!(!directive.excludes(Arity::TwoBody));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Directive {
    target: Target,
    direction: Direction,
    excluded: [bool; 3],
}
impl Directive {
    pub fn all() -> Self {
        Self {
            target: Target::All,
            direction: Direction::Up,
            excluded: [false; 3],
        }
    }
    pub fn single(index: usize) -> Self {
        Self {
            target: Target::Single(index),
            direction: Direction::Both,
            excluded: [false; 3],
        }
    }
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
    /// Skip every potential of the given arity
    pub fn exclude(mut self, arity: Arity) -> Self {
        self.excluded[slot(arity)] = true;
        self
    }

    pub fn target(&self) -> Target {
        self.target
    }
    pub fn direction(&self) -> Direction {
        self.direction
    }
    pub fn excludes(&self, arity: Arity) -> bool {
        self.excluded[slot(arity)]
    }
}
impl Default for Directive {
    fn default() -> Self {
        Self::all()
    }
}

fn slot(arity: Arity) -> usize {
    match arity {
        Arity::OneBody => 0,
        Arity::TwoBody => 1,
        Arity::ManyBody => 2,
    }
}
