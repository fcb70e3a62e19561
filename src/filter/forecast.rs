//! Result of a multi-step extrapolation.

use super::gaussian::Gaussian;

/// Extrapolated distributions for steps `1..=k`.
///
/// `Spot` holds only the distribution `k` steps ahead. `Sequence` holds all
/// of them in order: index 0 is one step ahead, index `k - 1` is `k` steps
/// ahead.
#[derive(Clone, Debug, PartialEq)]
pub enum Forecast {
    Spot(Gaussian),
    Sequence(Vec<Gaussian>),
}

impl Forecast {
    /// Build from the full sequence, keeping only the last step if `spot`.
    ///
    /// `steps` must not be empty.
    pub(crate) fn from_steps(mut steps: Vec<Gaussian>, spot: bool) -> Self {
        debug_assert!(!steps.is_empty());
        if spot {
            match steps.pop() {
                Some(last) => Forecast::Spot(last),
                None => Forecast::Sequence(steps),
            }
        } else {
            Forecast::Sequence(steps)
        }
    }

    #[inline(always)]
    pub fn is_spot(&self) -> bool {
        matches!(self, Forecast::Spot(_))
    }

    /// Number of distributions held (1 for a spot forecast).
    pub fn len(&self) -> usize {
        self.steps().len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps().is_empty()
    }

    /// All held distributions as a slice.
    pub fn steps(&self) -> &[Gaussian] {
        match self {
            Forecast::Spot(g) => std::slice::from_ref(g),
            Forecast::Sequence(v) => v,
        }
    }

    /// The distribution furthest ahead.
    pub fn last(&self) -> Option<&Gaussian> {
        self.steps().last()
    }

    pub fn get(&self, index: usize) -> Option<&Gaussian> {
        self.steps().get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Gaussian> {
        self.steps().iter()
    }

    pub fn into_vec(self) -> Vec<Gaussian> {
        match self {
            Forecast::Spot(g) => vec![g],
            Forecast::Sequence(v) => v,
        }
    }
}

impl IntoIterator for Forecast {
    type Item = Gaussian;
    type IntoIter = std::vec::IntoIter<Gaussian>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a Forecast {
    type Item = &'a Gaussian;
    type IntoIter = std::slice::Iter<'a, Gaussian>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
