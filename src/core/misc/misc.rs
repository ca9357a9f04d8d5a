use crate::core::base::*;

/// Linear to sRGB transfer.
#[inline]
pub fn gamma_correct(value: Float) -> Float {
    if value <= 0.0031308 {
        return 12.92 * value;
    } else {
        return 1.055 * Float::powf(value, 1.0 / 2.4) - 0.055;
    }
}

/// Real roots of `a t^2 + b t + c`, ordered so that `t0 <= t1`.
#[inline]
pub fn quadratic(a: Float, b: Float, c: Float) -> Option<(Float, Float)> {
    let a = a as f64;
    let b = b as f64;
    let c = c as f64;
    let discrim: f64 = b * b - 4.0 * a * c;
    if discrim < 0.0 || a == 0.0 {
        return None;
    }
    let root_discrim = f64::sqrt(discrim);
    let q = if b < 0.0 {
        -0.5 * (b - root_discrim)
    } else {
        -0.5 * (b + root_discrim)
    };
    let mut t0 = q / a;
    let mut t1 = if q != 0.0 { c / q } else { t0 };
    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }
    return Some((t0 as Float, t1 as Float));
}
