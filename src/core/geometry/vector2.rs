use std::ops;

#[derive(Debug, PartialEq, Eq, Default, Copy, Clone)]
pub struct Vector2<T> {
    pub x: T,
    pub y: T,
}

impl<T: Copy> Vector2<T> {
    pub fn new(x: T, y: T) -> Self {
        Vector2::<T> { x, y }
    }
}

impl<T: Default> Vector2<T> {
    #[inline]
    pub fn zero() -> Self {
        Vector2::<T> {
            x: T::default(),
            y: T::default(),
        }
    }
}

impl<T: ops::Add<Output = T>> ops::Add<Vector2<T>> for Vector2<T> {
    type Output = Vector2<T>;
    fn add(self, rhs: Vector2<T>) -> Self::Output {
        Vector2::<T> {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<T: ops::Sub<Output = T>> ops::Sub<Vector2<T>> for Vector2<T> {
    type Output = Vector2<T>;
    fn sub(self, rhs: Vector2<T>) -> Self::Output {
        Vector2::<T> {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl<T: ops::Mul<Output = T> + Copy> ops::Mul<T> for Vector2<T> {
    type Output = Vector2<T>;
    fn mul(self, rhs: T) -> Self::Output {
        Vector2::<T> {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl<T: Copy> From<(T, T)> for Vector2<T> {
    fn from(value: (T, T)) -> Self {
        Vector2::<T> {
            x: value.0,
            y: value.1,
        }
    }
}

impl<T: Copy> From<[T; 2]> for Vector2<T> {
    fn from(value: [T; 2]) -> Self {
        Vector2::<T> {
            x: value[0],
            y: value[1],
        }
    }
}
