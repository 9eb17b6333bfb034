//! Criterion trees

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Restriction;

/// How sibling criteria combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JunctionType {
    #[default]
    And,
    Or,
}

/// A node in the criterion tree
#[derive(Debug, Clone)]
pub enum Criterion {
    Restriction(Restriction),
    /// All children must hold; vacuously true when empty
    Conjunction(Junction),
    /// Some child must hold; false when empty
    Disjunction(Junction),
}

/// An ordered list of child criteria
#[derive(Debug, Clone, Default)]
pub struct Junction {
    criteria: Vec<Criterion>,
}

impl Junction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, criterion: impl Into<Criterion>) -> Self {
        self.add(criterion);
        self
    }

    pub fn add(&mut self, criterion: impl Into<Criterion>) {
        self.criteria.push(criterion.into());
    }

    /// Append an empty AND child and return it for population
    pub fn add_conjunction(&mut self) -> &mut Junction {
        self.push_junction(JunctionType::And)
    }

    /// Append an empty OR child and return it for population
    pub fn add_disjunction(&mut self) -> &mut Junction {
        self.push_junction(JunctionType::Or)
    }

    fn push_junction(&mut self, kind: JunctionType) -> &mut Junction {
        self.criteria.push(Criterion::junction(kind, Junction::new()));
        match self.criteria.last_mut() {
            Some(Criterion::Conjunction(j)) | Some(Criterion::Disjunction(j)) => j,
            _ => unreachable!("a junction was just pushed"),
        }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }
}

impl Criterion {
    pub fn junction(kind: JunctionType, junction: Junction) -> Self {
        match kind {
            JunctionType::And => Criterion::Conjunction(junction),
            JunctionType::Or => Criterion::Disjunction(junction),
        }
    }

    /// Evaluate the tree, testing each leaf with `leaf`
    pub fn evaluate(&self, leaf: &mut impl FnMut(&Restriction) -> bool) -> bool {
        match self {
            Criterion::Restriction(r) => leaf(r),
            Criterion::Conjunction(j) => j.criteria.iter().all(|c| c.evaluate(leaf)),
            Criterion::Disjunction(j) => j.criteria.iter().any(|c| c.evaluate(leaf)),
        }
    }

    /// Every restriction in the subtree, depth first
    pub fn restrictions(&self) -> Vec<&Restriction> {
        let mut out = Vec::new();
        self.collect_restrictions(&mut out);
        out
    }

    fn collect_restrictions<'a>(&'a self, out: &mut Vec<&'a Restriction>) {
        match self {
            Criterion::Restriction(r) => out.push(r),
            Criterion::Conjunction(j) | Criterion::Disjunction(j) => {
                for child in &j.criteria {
                    child.collect_restrictions(out);
                }
            }
        }
    }

    /// Whether every restriction in the subtree satisfies `predicate`
    pub fn all_restrictions(&self, predicate: &impl Fn(&Restriction) -> bool) -> bool {
        match self {
            Criterion::Restriction(r) => predicate(r),
            Criterion::Conjunction(j) | Criterion::Disjunction(j) => {
                j.criteria.iter().all(|c| c.all_restrictions(predicate))
            }
        }
    }

    /// Rebuild the tree, rewriting each restriction
    pub fn map_restrictions<E>(
        &self,
        f: &mut impl FnMut(&Restriction) -> Result<Restriction, E>,
    ) -> Result<Criterion, E> {
        Ok(match self {
            Criterion::Restriction(r) => Criterion::Restriction(f(r)?),
            Criterion::Conjunction(j) => Criterion::Conjunction(j.map_restrictions(f)?),
            Criterion::Disjunction(j) => Criterion::Disjunction(j.map_restrictions(f)?),
        })
    }
}

impl Junction {
    fn map_restrictions<E>(
        &self,
        f: &mut impl FnMut(&Restriction) -> Result<Restriction, E>,
    ) -> Result<Junction, E> {
        let criteria = self
            .criteria
            .iter()
            .map(|c| c.map_restrictions(f))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Junction { criteria })
    }
}

/// `(a AND (b OR c))`; an empty junction prints as `()`
impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (junction, separator) = match self {
            Criterion::Restriction(r) => return write!(f, "{}", r),
            Criterion::Conjunction(j) => (j, " AND "),
            Criterion::Disjunction(j) => (j, " OR "),
        };
        write!(f, "(")?;
        for (i, child) in junction.criteria.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", separator)?;
            }
            write!(f, "{}", child)?;
        }
        write!(f, ")")
    }
}

impl From<Restriction> for Criterion {
    fn from(r: Restriction) -> Self {
        Criterion::Restriction(r)
    }
}
