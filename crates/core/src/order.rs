use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OrderError {
    #[error("index {index} is out of range for {len} questions")]
    OutOfRange { index: usize, len: usize },

    #[error("index {index} appears more than once")]
    Duplicate { index: usize },
}

/// Order in which the active questions are shown.
///
/// Holds a permutation of canonical indices (display position -> canonical
/// index) and its inverse, so recorded answers can be found from either side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationOrder {
    to_canonical: Vec<usize>,
    to_display: Vec<usize>,
}

impl PresentationOrder {
    /// Canonical order.
    #[must_use]
    pub fn identity(len: usize) -> Self {
        let identity: Vec<usize> = (0..len).collect();
        Self {
            to_display: identity.clone(),
            to_canonical: identity,
        }
    }

    /// Uniformly random order (Fisher–Yates) drawn from `rng`.
    ///
    /// Pass a seeded RNG to get a reproducible order.
    pub fn shuffled<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut permutation: Vec<usize> = (0..len).collect();
        permutation.shuffle(rng);
        Self::from_checked(permutation)
    }

    /// Build from an explicit permutation of `0..permutation.len()`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::OutOfRange` or `OrderError::Duplicate` when the
    /// input is not a permutation.
    pub fn from_permutation(permutation: Vec<usize>) -> Result<Self, OrderError> {
        let len = permutation.len();
        let mut seen = vec![false; len];
        for &index in &permutation {
            let slot = seen
                .get_mut(index)
                .ok_or(OrderError::OutOfRange { index, len })?;
            if *slot {
                return Err(OrderError::Duplicate { index });
            }
            *slot = true;
        }
        Ok(Self::from_checked(permutation))
    }

    fn from_checked(to_canonical: Vec<usize>) -> Self {
        let mut to_display = vec![0; to_canonical.len()];
        for (display, &canonical) in to_canonical.iter().enumerate() {
            to_display[canonical] = display;
        }
        Self {
            to_canonical,
            to_display,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.to_canonical.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_canonical.is_empty()
    }

    #[must_use]
    pub fn canonical_at(&self, display: usize) -> Option<usize> {
        self.to_canonical.get(display).copied()
    }

    #[must_use]
    pub fn display_of(&self, canonical: usize) -> Option<usize> {
        self.to_display.get(canonical).copied()
    }

    /// Canonical indices in display order.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.to_canonical
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.to_canonical.iter().enumerate().all(|(i, &c)| i == c)
    }
}
