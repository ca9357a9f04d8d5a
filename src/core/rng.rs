use crate::core::prelude::*;

const PCG32_DEFAULT_STATE: u64 = 0x853c49e6748fea9b;
const PCG32_DEFAULT_STREAM: u64 = 0xda3e39cb94b95bdb;
const PCG32_MULT: u64 = 0x5851f42d4c957f2d;

/// PCG32 generator. Every (pixel, sample) pair owns a private stream, so a
/// sample renders to the same value no matter which device computes it.
#[derive(Debug, PartialEq, Clone)]
pub struct RNG {
    pub state: u64,
    pub inc: u64,
}

impl RNG {
    pub fn new() -> Self {
        RNG {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }

    pub fn new_sequence(initseq: u64) -> Self {
        let mut r = Self::new();
        r.set_sequence(initseq);
        return r;
    }

    pub fn for_pixel_sample(pixel_index: u64, sample: u32) -> Self {
        let seq = pixel_index
            .wrapping_mul(0x9e3779b97f4a7c15)
            .wrapping_add(sample as u64);
        return Self::new_sequence(seq);
    }

    pub fn set_sequence(&mut self, initseq: u64) {
        self.state = 0;
        self.inc = initseq.wrapping_shl(1) | 1;
        self.uniform_uint32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        self.uniform_uint32();
    }

    #[inline]
    pub fn uniform_uint32(&mut self) -> u32 {
        let oldstate: u64 = self.state;
        self.state = oldstate.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);
        let xorshifted: u32 = ((oldstate.wrapping_shr(18) ^ oldstate).wrapping_shr(27)) as u32;
        let rot: u32 = (oldstate.wrapping_shr(59)) as u32;
        return (xorshifted.wrapping_shr(rot))
            | (xorshifted.wrapping_shl(((!rot).wrapping_add(1)) & 31));
    }

    #[inline]
    pub fn uniform_float(&mut self) -> Float {
        let f: f32 = self.uniform_uint32() as f32 * 2.3283064365386963e-10;
        return ONE_MINUS_EPSILON.min(f);
    }

    #[inline]
    pub fn uniform_2d(&mut self) -> Point2f {
        let u = self.uniform_float();
        let v = self.uniform_float();
        return Point2f::new(u, v);
    }
}

impl Default for RNG {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let mut rng = RNG::new();
        let a = rng.uniform_float();
        let astate = rng.state;
        let b = rng.uniform_float();
        let bstate = rng.state;
        assert_ne!(a, b);
        assert_ne!(astate, bstate);
    }

    #[test]
    fn test_002() {
        let mut a = RNG::for_pixel_sample(17, 3);
        let mut b = RNG::for_pixel_sample(17, 3);
        let mut c = RNG::for_pixel_sample(17, 4);
        let va = a.uniform_uint32();
        assert_eq!(va, b.uniform_uint32());
        assert_ne!(va, c.uniform_uint32());
    }

    #[test]
    fn test_003() {
        let mut rng = RNG::new_sequence(42);
        for _ in 0..1000 {
            let f = rng.uniform_float();
            assert!((0.0..1.0).contains(&f));
        }
    }
}
