//! Bounding primitives.
//!
//! [`TVec3`], [`BVec3`], [`Aabb`]

use std::{
    fmt::{Debug, Display},
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

use num::Float as NumFloat;

/// Floating point scalar of every geometric type in the crate.
///
/// Implemented for `f32` and `f64`.
pub trait Float:
    NumFloat + AddAssign + SubAssign + Copy + Display + Debug + Default + 'static
{
}
impl Float for f32 {}
impl Float for f64 {}

/// Tree Vec3
///
/// Inner type should be any [`Float`]: `f32` or `f64`.
#[derive(Default, Debug, PartialEq, PartialOrd, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TVec3<F: Float> {
    pub x: F,
    pub y: F,
    pub z: F,
}

impl<F: Float> Add for TVec3<F> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        TVec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl<F: Float> Sub for TVec3<F> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        TVec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl<F: Float> Neg for TVec3<F> {
    type Output = Self;

    fn neg(self) -> Self {
        TVec3 {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl<F: Float> Mul<F> for TVec3<F> {
    type Output = Self;

    fn mul(self, scale: F) -> Self {
        TVec3 {
            x: self.x * scale,
            y: self.y * scale,
            z: self.z * scale,
        }
    }
}

impl<F: Float> AddAssign for TVec3<F> {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl<F: Float> SubAssign for TVec3<F> {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl<F: Float> Display for TVec3<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vec3: x: {}, y: {}, z: {}", self.x, self.y, self.z)
    }
}

impl<F: Float> From<[F; 3]> for TVec3<F> {
    fn from([x, y, z]: [F; 3]) -> Self {
        TVec3 { x, y, z }
    }
}

impl<F: Float> From<(F, F, F)> for TVec3<F> {
    fn from((x, y, z): (F, F, F)) -> Self {
        TVec3 { x, y, z }
    }
}

impl<F: Float> TVec3<F> {
    pub fn new(x: F, y: F, z: F) -> Self {
        TVec3 { x, y, z }
    }

    pub fn splat(size: F) -> Self {
        TVec3 {
            x: size,
            y: size,
            z: size,
        }
    }

    pub fn zero() -> Self {
        TVec3::splat(F::zero())
    }

    /// Componentwise minimum.
    pub fn min(&self, other: Self) -> Self {
        TVec3::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    /// Componentwise maximum.
    pub fn max(&self, other: Self) -> Self {
        TVec3::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    pub fn lt(&self, other: Self) -> BVec3 {
        BVec3::new(self.x < other.x, self.y < other.y, self.z < other.z)
    }

    pub fn gt(&self, other: Self) -> BVec3 {
        BVec3::new(self.x > other.x, self.y > other.y, self.z > other.z)
    }

    pub fn le(&self, other: Self) -> BVec3 {
        BVec3::new(self.x <= other.x, self.y <= other.y, self.z <= other.z)
    }

    pub fn ge(&self, other: Self) -> BVec3 {
        BVec3::new(self.x >= other.x, self.y >= other.y, self.z >= other.z)
    }
}

/// Boolean Vec3 mask.
#[derive(Default, Clone, Copy, PartialEq, Debug)]
pub struct BVec3 {
    x: bool,
    y: bool,
    z: bool,
}

impl BVec3 {
    fn new(x: bool, y: bool, z: bool) -> Self {
        BVec3 { x, y, z }
    }

    pub fn all(&self) -> bool {
        self.x && self.y && self.z
    }

    pub fn any(&self) -> bool {
        self.x || self.y || self.z
    }

    pub fn none(&self) -> bool {
        !self.x && !self.y && !self.z
    }
}

/// Axis Aligned Bounding Box
///
/// `min <= max` on every axis. Both faces are part of the box.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb<F: Float> {
    pub min: TVec3<F>,
    pub max: TVec3<F>,
}

impl<F: Float> Display for Aabb<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Aabb(min: {}, max: {})", self.min, self.max)
    }
}

impl<F: Float> Aabb<F> {
    /// Creates a new [`Aabb`] object from a min and max
    pub fn from_min_max(min: TVec3<F>, max: TVec3<F>) -> Self {
        Self { min, max }
    }

    /// Smallest [`Aabb`] enclosing every point.
    ///
    /// Single linear scan. Returns [`None`] for an empty slice.
    pub fn from_points(points: &[TVec3<F>]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = Aabb::from_min_max(*first, *first);
        for point in rest {
            aabb.min = aabb.min.min(*point);
            aabb.max = aabb.max.max(*point);
        }
        Some(aabb)
    }

    pub fn center(&self) -> TVec3<F> {
        let two = F::one() + F::one();
        (self.min + self.max) * two.recip()
    }

    pub fn size(&self) -> TVec3<F> {
        self.max - self.min
    }

    /// Splits the box into 8 equal octants around its center.
    ///
    /// Octant `i` takes the upper half on x if bit 0 of `i` is set,
    /// on y if bit 1 is set and on z if bit 2 is set.
    #[inline]
    pub fn split(&self) -> [Aabb<F>; 8] {
        let center = self.center();
        std::array::from_fn(|i| self._split(i, center))
    }

    fn _split(&self, i: usize, center: TVec3<F>) -> Aabb<F> {
        let x_mask = (i & 0b1) != 0;
        let y_mask = (i & 0b10) != 0;
        let z_mask = (i & 0b100) != 0;

        Aabb {
            min: TVec3::new(
                if x_mask { center.x } else { self.min.x },
                if y_mask { center.y } else { self.min.y },
                if z_mask { center.z } else { self.min.z },
            ),
            max: TVec3::new(
                if x_mask { self.max.x } else { center.x },
                if y_mask { self.max.y } else { center.y },
                if z_mask { self.max.z } else { center.z },
            ),
        }
    }

    /// Checks if the aabb contains a [`point`](TVec3), faces included.
    pub fn contains(&self, point: TVec3<F>) -> bool {
        let lemin = self.min.le(point);
        let gemax = self.max.ge(point);

        lemin.all() && gemax.all()
    }

    /// Checks if this volume overlaps with another [`Aabb`].
    ///
    /// Touching faces count as an overlap.
    pub fn overlaps(&self, other: &Aabb<F>) -> bool {
        is_lines_intersecting(self.min.x, self.max.x, other.min.x, other.max.x)
            && is_lines_intersecting(self.min.y, self.max.y, other.min.y, other.max.y)
            && is_lines_intersecting(self.min.z, self.max.z, other.min.z, other.max.z)
    }

    /// The same box moved by `offset`.
    pub fn translated(&self, offset: TVec3<F>) -> Self {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// The eight corners, in the same order as [`split`](Aabb::split).
    pub fn corners(&self) -> [TVec3<F>; 8] {
        std::array::from_fn(|i| {
            TVec3::new(
                if i & 0b1 != 0 { self.max.x } else { self.min.x },
                if i & 0b10 != 0 { self.max.y } else { self.min.y },
                if i & 0b100 != 0 { self.max.z } else { self.min.z },
            )
        })
    }
}

/// 1-D closed interval overlap.
#[inline]
pub fn is_lines_intersecting<F: Float>(a_start: F, a_end: F, b_start: F, b_end: F) -> bool {
    a_start <= b_end && b_start <= a_end
}

#[cfg(test)]
mod tests {
    use super::{is_lines_intersecting, Aabb, TVec3};
    use approx::assert_relative_eq;

    #[test]
    fn test_aabb_contains() {
        let aabb = Aabb::from_min_max(TVec3::splat(0.0f32), TVec3::splat(16.0));
        assert!(aabb.contains(TVec3::zero()));

        assert!(aabb.contains(TVec3::new(8.0, 8.0, 8.0)));

        assert!(aabb.contains(TVec3::new(16.0, 16.0, 16.0)));

        assert!(!aabb.contains(TVec3::new(0.0, 16.5, 8.0)));
    }

    #[test]
    fn test_lines_intersecting() {
        assert!(is_lines_intersecting(0.0, 1.0, 0.5, 2.0));
        assert!(is_lines_intersecting(0.5, 2.0, 0.0, 1.0));
        assert!(is_lines_intersecting(0.0, 1.0, 1.0, 2.0));
        assert!(is_lines_intersecting(0.0, 3.0, 1.0, 2.0));
        assert!(!is_lines_intersecting(0.0, 1.0, 1.5, 2.0));
        assert!(!is_lines_intersecting(1.5, 2.0, 0.0, 1.0));
    }

    #[test]
    fn test_from_points() {
        assert_eq!(Aabb::<f32>::from_points(&[]), None);

        let points = [
            TVec3::new(1.0, -2.0, 3.0),
            TVec3::new(-4.0, 5.0, 0.5),
            TVec3::new(0.0, 0.0, -6.0),
        ];
        let aabb = Aabb::from_points(&points).unwrap();
        assert_eq!(aabb.min, TVec3::new(-4.0, -2.0, -6.0));
        assert_eq!(aabb.max, TVec3::new(1.0, 5.0, 3.0));
        for p in points {
            assert!(aabb.contains(p));
        }

        let single = Aabb::from_points(&[TVec3::splat(2.0f64)]).unwrap();
        assert_eq!(single.min, single.max);
        assert!(single.contains(TVec3::splat(2.0)));
    }

    #[test]
    fn test_split() {
        let aabb = Aabb::from_min_max(TVec3::new(-1.0f32, 0.0, 2.0), TVec3::new(3.0, 2.0, 6.0));
        let center = aabb.center();
        assert_relative_eq!(center.x, 1.0);
        assert_relative_eq!(center.y, 1.0);
        assert_relative_eq!(center.z, 4.0);

        let octants = aabb.split();
        assert_eq!(octants[0].min, aabb.min);
        assert_eq!(octants[0].max, center);
        assert_eq!(octants[7].min, center);
        assert_eq!(octants[7].max, aabb.max);
        assert_eq!(octants[1].min, TVec3::new(1.0, 0.0, 2.0));
        assert_eq!(octants[1].max, TVec3::new(3.0, 1.0, 4.0));

        let volume: f32 = octants
            .iter()
            .map(|o| {
                let s = o.size();
                s.x * s.y * s.z
            })
            .sum();
        let s = aabb.size();
        assert_relative_eq!(volume, s.x * s.y * s.z);

        for (i, corner) in aabb.corners().iter().enumerate() {
            assert!(octants[i].contains(*corner));
        }
    }

    #[test]
    fn test_overlaps_translated() {
        let a = Aabb::from_min_max(TVec3::splat(-0.5f32), TVec3::splat(0.5));
        let b = a.translated(TVec3::new(0.5, 0.0, 0.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        let c = a.translated(TVec3::new(1.0, 0.0, 0.0));
        assert!(a.overlaps(&c));

        let d = a.translated(TVec3::new(3.0, 0.0, 0.0));
        assert!(!a.overlaps(&d));

        let e = a.translated(TVec3::new(0.0, 0.0, -1.25));
        assert!(!a.overlaps(&e));
    }
}
