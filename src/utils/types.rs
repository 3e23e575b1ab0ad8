use std::ops::Range;

/// A selection of particle kinds, either a single kind or a half-open range
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Types {
    One(usize),
    Range(Range<usize>),
}
impl Types {
    pub fn to_vec(&self) -> Vec<usize> {
        match self {
            Types::One(i) => vec![*i],
            Types::Range(r) => r.to_owned().collect(),
        }
    }
    pub fn contains(&self, kind: usize) -> bool {
        match self {
            Types::One(i) => *i == kind,
            Types::Range(r) => r.contains(&kind),
        }
    }
}
impl From<Range<usize>> for Types {
    fn from(value: Range<usize>) -> Self {
        Types::Range(value)
    }
}
impl From<usize> for Types {
    fn from(value: usize) -> Self {
        Self::One(value)
    }
}
