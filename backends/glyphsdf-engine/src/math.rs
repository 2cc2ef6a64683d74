//! Small numeric helpers: polynomial roots, medians, safe normals

use kurbo::Vec2;

/// Up to three real roots
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Roots {
    values: [f64; 3],
    len: usize,
}

impl Roots {
    fn push(&mut self, value: f64) {
        if self.len < 3 {
            self.values[self.len] = value;
            self.len += 1;
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Real roots of `a·x² + b·x + c`
///
/// Degenerates to the linear case when `a` is negligible next to `b`.
/// An identically zero polynomial reports no roots.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Roots {
    let mut roots = Roots::default();
    if a == 0.0 || b.abs() > 1e12 * a.abs() {
        if b != 0.0 {
            roots.push(-c / b);
        }
        return roots;
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant > 0.0 {
        let s = discriminant.sqrt();
        roots.push((-b + s) / (2.0 * a));
        roots.push((-b - s) / (2.0 * a));
    } else if discriminant == 0.0 {
        roots.push(-b / (2.0 * a));
    }
    roots
}

/// Real roots of the monic cubic `x³ + a·x² + b·x + c`
fn solve_cubic_normed(a: f64, b: f64, c: f64) -> Roots {
    let mut roots = Roots::default();
    let a2 = a * a;
    let q = (a2 - 3.0 * b) / 9.0;
    let r = (a * (2.0 * a2 - 9.0 * b) + 27.0 * c) / 54.0;
    let r2 = r * r;
    let q3 = q * q * q;
    let a = a / 3.0;
    if r2 < q3 {
        let t = (r / q3.sqrt()).clamp(-1.0, 1.0).acos();
        let q = -2.0 * q.sqrt();
        let tau = std::f64::consts::TAU;
        roots.push(q * (t / 3.0).cos() - a);
        roots.push(q * ((t + tau) / 3.0).cos() - a);
        roots.push(q * ((t - tau) / 3.0).cos() - a);
    } else {
        let sign = if r < 0.0 { 1.0 } else { -1.0 };
        let u = sign * (r.abs() + (r2 - q3).sqrt()).cbrt();
        let v = if u == 0.0 { 0.0 } else { q / u };
        roots.push((u + v) - a);
        if u == v || (u - v).abs() < 1e-12 * (u + v).abs() {
            roots.push(-0.5 * (u + v) - a);
        }
    }
    roots
}

/// Real roots of `a·x³ + b·x² + c·x + d`
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Roots {
    if a != 0.0 {
        let bn = b / a;
        // Above this ratio the cubic term only adds noise
        if bn.abs() < 1e6 {
            return solve_cubic_normed(bn, c / a, d / a);
        }
    }
    solve_quadratic(b, c, d)
}

pub fn median(a: f32, b: f32, c: f32) -> f32 {
    a.min(b).max(a.max(b).min(c))
}

/// +1 or -1, never zero
pub fn non_zero_sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Unit vector, pointing up when `v` has no length
pub fn normalized(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len == 0.0 {
        Vec2::new(0.0, 1.0)
    } else {
        v / len
    }
}
