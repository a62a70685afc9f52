//! Central-difference spatial derivatives along a fiber.
//!
//! Derivatives are only defined at interior nodes. Instead of padding the
//! result with a "missing" marker, `SpatialDerivative` stores the dense
//! interior values together with the length of the source sequence, and
//! exposes each aligned position as `Option<f64>`. Index `i` of a derivative
//! always refers to the same node as index `i` of the potentials.

/// A derivative sequence index-aligned with the potentials it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialDerivative {
    /// Values at aligned indices `1..=len-2`.
    interior: Vec<f64>,
    len: usize,
}

impl SpatialDerivative {
    fn from_stencil(potentials: &[f64], stencil: impl Fn(f64, f64, f64) -> f64) -> Self {
        let interior = potentials
            .windows(3)
            .map(|w| stencil(w[0], w[1], w[2]))
            .collect();
        Self {
            interior,
            len: potentials.len(),
        }
    }

    /// Aligned length; equals the number of potentials.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Value at aligned index `i`; `None` at either fiber end or past the end.
    pub fn get(&self, i: usize) -> Option<f64> {
        if i == 0 {
            return None;
        }
        self.interior.get(i - 1).copied()
    }

    /// Interior values only (both undefined ends stripped).
    pub fn truncated(&self) -> &[f64] {
        &self.interior
    }

    /// Full aligned sequence with explicit `None` at the undefined ends.
    pub fn aligned(&self) -> Vec<Option<f64>> {
        (0..self.len).map(|i| self.get(i)).collect()
    }

    /// Aligned index of the largest finite interior value (first one on ties).
    pub fn argmax_interior(&self) -> Option<usize> {
        argmax(&self.interior).map(|i| i + 1)
    }
}

/// First spatial derivative: `(p[i+1] - p[i-1]) / 2` at each interior node.
pub fn compute_first_derivative(potentials: &[f64]) -> SpatialDerivative {
    SpatialDerivative::from_stencil(potentials, |prev, _, next| (next - prev) / 2.0)
}

/// Second spatial derivative: `p[i-1] - 2 p[i] + p[i+1]` at each interior node.
pub fn compute_second_derivative(potentials: &[f64]) -> SpatialDerivative {
    SpatialDerivative::from_stencil(potentials, |prev, cur, next| prev - 2.0 * cur + next)
}

/// Index of the largest finite value; the earliest index wins ties.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the smallest finite value; the earliest index wins ties.
pub(crate) fn argmin(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        match best {
            Some((_, b)) if v >= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
