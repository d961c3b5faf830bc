//! The Mehrotra step-length oracle.

use faer::ColRef;

use crate::E;

const UNCONSTRAINED_EPS: E = 1e-12;

/// Largest `alpha` such that `v + alpha * dv` stays componentwise
/// non-negative, treating components with `dv >= UNCONSTRAINED_EPS` as
/// imposing no bound from that component.
///
/// Components that impose no bound are assigned `max(1.0, raw_max)` before
/// the reduction, where `raw_max` is the maximum of `-v/dv` taken over
/// every component (including the ones about to be replaced). This keeps
/// an unconstrained component (whose raw ratio is generally negative,
/// since `v > 0` and `dv >= 0`) from being mistaken for the binding
/// constraint. Callers are expected to clamp the result to `(0, 1]`
/// themselves; this function does not cap its own return value.
pub fn get_step(v: ColRef<E>, dv: ColRef<E>) -> E {
    let n = v.nrows();
    assert_eq!(dv.nrows(), n);

    let mut ratios = vec![0.0; n];
    let mut raw_max = E::NEG_INFINITY;
    for i in 0..n {
        ratios[i] = -v[i] / dv[i];
        if ratios[i] > raw_max {
            raw_max = ratios[i];
        }
    }
    let replacement = raw_max.max(1.0);

    let mut result = E::INFINITY;
    for i in 0..n {
        let candidate = if dv[i] >= UNCONSTRAINED_EPS {
            replacement
        } else {
            ratios[i]
        };
        if candidate < result {
            result = candidate;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use faer::Col;

    use super::*;

    #[test]
    fn fully_unconstrained_direction_gives_unit_step() {
        let v = Col::<E>::from_fn(3, |_| 1.0);
        let dv = Col::<E>::from_fn(3, |_| 1.0);
        assert_eq!(get_step(v.as_ref(), dv.as_ref()), 1.0);
    }

    #[test]
    fn binding_component_limits_step() {
        // v = [1, 1], dv = [-2, 1]: first component hits zero at alpha = 0.5.
        let v = Col::<E>::from_fn(2, |_| 1.0);
        let dv = Col::<E>::from_fn(2, |i| if i == 0 { -2.0 } else { 1.0 });
        let alpha = get_step(v.as_ref(), dv.as_ref());
        assert!((alpha - 0.5).abs() < 1e-12);
    }
}
