use super::vector2::Vector2;

#[derive(Debug, PartialEq, Eq, Default, Copy, Clone)]
pub struct Bounds2<T> {
    pub min: Vector2<T>,
    pub max: Vector2<T>,
}

impl<T: Copy> Bounds2<T> {
    pub fn new(min: &Vector2<T>, max: &Vector2<T>) -> Self {
        Bounds2::<T> {
            min: *min,
            max: *max,
        }
    }
}

impl<
        T: Copy
            + PartialOrd
            + std::ops::Add<Output = T>
            + std::ops::Sub<Output = T>
            + std::ops::Mul<Output = T>,
    > Bounds2<T>
{
    pub fn width(&self) -> T {
        return self.max.x - self.min.x;
    }

    pub fn height(&self) -> T {
        return self.max.y - self.min.y;
    }

    pub fn area(&self) -> T {
        return self.width() * self.height();
    }

    pub fn is_empty(&self) -> bool {
        return self.max.x <= self.min.x || self.max.y <= self.min.y;
    }

    /// `true` when `other` lies completely inside `self`.
    pub fn contains(&self, other: &Self) -> bool {
        return other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y;
    }

    pub fn inside_exclusive(&self, p: &Vector2<T>) -> bool {
        return p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y;
    }
}

impl<T: Copy> From<((T, T), (T, T))> for Bounds2<T> {
    fn from(value: ((T, T), (T, T))) -> Self {
        Bounds2::<T> {
            min: Vector2::<T>::from(value.0),
            max: Vector2::<T>::from(value.1),
        }
    }
}
