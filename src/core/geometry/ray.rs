use crate::core::base::*;
use crate::core::geometry::*;

#[derive(Debug, Default, Copy, Clone)]
pub struct Ray {
    pub o: Point3f,
    pub d: Vector3f,
    pub t_max: Float,
}

impl Ray {
    pub fn new(o: &Point3f, d: &Vector3f, t_max: Float) -> Self {
        Ray {
            o: *o,
            d: *d,
            t_max,
        }
    }

    pub fn position(&self, t: Float) -> Point3f {
        return self.o + self.d * t;
    }
}
