/// Timing curve mapping linear progress `t` in `[0, 1]` to eased progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    InQuint,
    OutQuint,
    /// CSS-style cubic bezier with control points (x1, y1) and (x2, y2).
    CubicBezier(f64, f64, f64, f64),
}

/// Fast start, long settle. Pieces leaving, hover push.
pub const EXIT: Easing = Easing::CubicBezier(0.2, 1.0, 0.3, 1.0);
/// Pieces coming back in.
pub const ENTRANCE: Easing = Easing::CubicBezier(0.8, 1.0, 0.3, 1.0);
/// Hover reset.
pub const RESET: Easing = Easing::CubicBezier(0.8, 0.0, 0.7, 0.0);

const NEWTON_ITERATIONS: usize = 8;
const EPSILON: f64 = 1e-7;

impl Easing {
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::InQuint => t.powi(5),
            Easing::OutQuint => 1.0 - (1.0 - t).powi(5),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let s = solve_curve_x(t, x1, x2);
                bezier(s, y1, y2)
            }
        }
    }
}

// One coordinate of a bezier through (0,0), (p1), (p2), (1,1).
fn bezier(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

// Find the curve parameter whose x equals `x`.
fn solve_curve_x(x: f64, x1: f64, x2: f64) -> f64 {
    let mut s = x;
    for _ in 0..NEWTON_ITERATIONS {
        let err = bezier(s, x1, x2) - x;
        if err.abs() < EPSILON {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }
    // x(s) is monotonic for x1, x2 in [0, 1]; bisect when Newton stalls.
    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    while hi - lo > EPSILON {
        let v = bezier(s, x1, x2);
        if (v - x).abs() < EPSILON {
            break;
        }
        if v < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}
