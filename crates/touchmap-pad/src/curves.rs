//! Response curves. Each is a pure, monotonic non-decreasing map of [0, 1] onto itself with
//! f(0) = 0 and f(1) = 1 exactly.

use touchmap_core::Curve;

use crate::contacts::unit;

pub fn apply(curve: Curve, v: f32) -> f32 {
    let v = unit(v);
    let shaped = match curve {
        Curve::Linear => v,
        Curve::EaseIn => v * v,
        Curve::EaseOut => {
            let inv = 1.0 - v;
            1.0 - inv * inv
        }
        Curve::EaseInOut => {
            if v < 0.5 {
                2.0 * v * v
            } else {
                let t = 2.0 - 2.0 * v;
                1.0 - t * t * 0.5
            }
        }
        Curve::Expo => v * v * v,
    };
    shaped.clamp(0.0, 1.0)
}
