use nalgebra::{point, Point3};

/// An axis aligned bounding box over f64 coordinates.
/// An empty box is represented by min = MAX and max = MIN.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// Constructs an empty bounding box.
    pub fn empty() -> Self {
        Aabb {
            min: point![f64::MAX, f64::MAX, f64::MAX],
            max: point![f64::MIN, f64::MIN, f64::MIN],
        }
    }

    /// Construct a new AABB with the given bounds.
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Aabb { min, max }
    }

    /// Checks, if the bounding box is empty.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Check, if the given point is within the bounds.
    pub fn contains(&self, point: Point3<f64>) -> bool {
        self.min.x <= point.x
            && self.min.y <= point.y
            && self.min.z <= point.z
            && self.max.x >= point.x
            && self.max.y >= point.y
            && self.max.z >= point.z
    }

    /// Grow the bounding box, so that it contains the given position.
    pub fn extend(&mut self, position: Point3<f64>) {
        if self.min.x > position.x {
            self.min.x = position.x;
        }
        if self.min.y > position.y {
            self.min.y = position.y;
        }
        if self.min.z > position.z {
            self.min.z = position.z;
        }
        if self.max.x < position.x {
            self.max.x = position.x;
        }
        if self.max.y < position.y {
            self.max.y = position.y;
        }
        if self.max.z < position.z {
            self.max.z = position.z;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb;
    use nalgebra::point;

    #[test]
    fn is_empty() {
        let aabb = Aabb::empty();
        assert!(aabb.is_empty());

        let aabb = Aabb::new(point![2.0, 4.0, 1.0], point![4.0, 5.0, 2.0]);
        assert!(!aabb.is_empty());
    }

    #[test]
    fn contains() {
        let aabb = Aabb::new(point![2.0, 4.0, 1.0], point![4.0, 5.0, 2.0]);
        assert!(aabb.contains(point![2.0, 4.0, 1.0]));
        assert!(aabb.contains(point![3.0, 4.5, 1.5]));
        assert!(aabb.contains(point![4.0, 5.0, 2.0]));
        assert!(!aabb.contains(point![1.5, 4.5, 1.5]));
        assert!(!aabb.contains(point![3.0, 4.5, 2.5]));
    }

    #[test]
    fn extend() {
        let mut aabb = Aabb::empty();
        aabb.extend(point![1.0, 2.0, 3.0]);
        assert!(!aabb.is_empty());
        assert_eq!(aabb.min, point![1.0, 2.0, 3.0]);
        assert_eq!(aabb.max, point![1.0, 2.0, 3.0]);

        aabb.extend(point![-1.0, 5.0, 3.0]);
        assert_eq!(aabb.min, point![-1.0, 2.0, 3.0]);
        assert_eq!(aabb.max, point![1.0, 5.0, 3.0]);
    }
}
