use crate::geometry::Aabb;
use crate::header::PublicHeader;
use crate::point::PointDataRecord;
use crate::vlr::{ExtendedVariableLengthRecord, VariableLengthRecord};
use log::debug;
use nalgebra::point;

/// Each 16 bit color channel maps onto 8 bits by this ratio, truncating
/// toward zero.
const COLOR_DOWNSCALE: f64 = 255.0 / 65535.0;

/// Everything decoded from one LAS file.
///
/// Immutable after construction. The record sequences keep file order. The
/// view methods below recompute their result on every call; callers that
/// need repeated access should keep the returned vector.
#[derive(Debug, Clone, Default)]
pub struct LasData {
    pub header: PublicHeader,
    pub variable_length_records: Vec<VariableLengthRecord>,
    pub point_data_records: Vec<PointDataRecord>,
    pub extended_variable_length_records: Vec<ExtendedVariableLengthRecord>,
}

impl LasData {
    /// Number of decoded point records. Counts what was actually decoded,
    /// not what the header declares.
    pub fn num_points(&self) -> usize {
        self.point_data_records.len()
    }

    /// Point coordinates, arranged like `[x0, y0, z0, x1, y1, z1, ...]`.
    ///
    /// With `rescale`, every axis value is converted to real-world units via
    /// `value * scale + offset` from the header. Without, the raw integer
    /// values are returned as f64.
    pub fn point_coords(&self, rescale: bool) -> Vec<f64> {
        let mut coords = Vec::with_capacity(3 * self.num_points());

        for record in &self.point_data_records {
            let mut x = f64::from(record.x);
            let mut y = f64::from(record.y);
            let mut z = f64::from(record.z);

            if rescale {
                x = x * self.header.scale.x + self.header.offset.x;
                y = y * self.header.scale.y + self.header.offset.y;
                z = z * self.header.scale.z + self.header.offset.z;
            }

            coords.push(x);
            coords.push(y);
            coords.push(z);
        }

        coords
    }

    /// Point colors, arranged like `[r0, g0, b0, r1, g1, b1, ...]`, each
    /// channel downscaled from 16 to 8 bits. For formats without color all
    /// channels are zero.
    pub fn point_colors(&self) -> Vec<u8> {
        let mut colors = Vec::with_capacity(3 * self.num_points());

        for record in &self.point_data_records {
            colors.push((f64::from(record.red) * COLOR_DOWNSCALE) as u8);
            colors.push((f64::from(record.green) * COLOR_DOWNSCALE) as u8);
            colors.push((f64::from(record.blue) * COLOR_DOWNSCALE) as u8);
        }

        colors
    }

    /// Bounding box of the rescaled coordinates. Empty if there are no
    /// points.
    pub fn computed_bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for triple in self.point_coords(true).chunks_exact(3) {
            bounds.extend(point![triple[0], triple[1], triple[2]]);
        }
        bounds
    }

    /// Compares the bounds of the decoded points against the bounds the
    /// header declares and logs both.
    pub fn validate(&self) -> bool {
        let bounds = self.computed_bounds();
        debug!(
            "computed min = ({:.5}, {:.5}, {:.5})",
            bounds.min.x, bounds.min.y, bounds.min.z
        );
        debug!(
            "header min   = ({:.5}, {:.5}, {:.5})",
            self.header.min.x, self.header.min.y, self.header.min.z
        );
        debug!(
            "computed max = ({:.5}, {:.5}, {:.5})",
            bounds.max.x, bounds.max.y, bounds.max.z
        );
        debug!(
            "header max   = ({:.5}, {:.5}, {:.5})",
            self.header.max.x, self.header.max.y, self.header.max.z
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::LasData;
    use crate::header::PublicHeader;
    use crate::point::PointDataRecord;
    use nalgebra::{point, Vector3};

    fn cloud_with_points(points: Vec<PointDataRecord>) -> LasData {
        LasData {
            header: PublicHeader {
                scale: Vector3::new(0.01, 0.1, 1.0),
                offset: Vector3::new(100.0, 0.0, -10.0),
                ..Default::default()
            },
            point_data_records: points,
            ..Default::default()
        }
    }

    #[test]
    fn num_points_counts_the_stored_records() {
        let cloud = cloud_with_points(vec![PointDataRecord::default(); 4]);
        assert_eq!(cloud.num_points(), 4);
    }

    #[test]
    fn coords_rescale_with_per_axis_scale_and_offset() {
        let cloud = cloud_with_points(vec![PointDataRecord {
            x: 1000,
            y: 20,
            z: 3,
            ..Default::default()
        }]);

        let coords = cloud.point_coords(true);
        assert_eq!(coords, vec![1000.0 * 0.01 + 100.0, 2.0, -7.0]);
        assert_eq!(coords[0], 110.0); // 1000 * 0.01 + 100.0, exactly
    }

    #[test]
    fn raw_coords_skip_the_transform() {
        let cloud = cloud_with_points(vec![PointDataRecord {
            x: 1000,
            y: -20,
            z: 3,
            ..Default::default()
        }]);

        assert_eq!(cloud.point_coords(false), vec![1000.0, -20.0, 3.0]);
    }

    #[test]
    fn coords_are_interleaved_in_file_order() {
        let cloud = cloud_with_points(vec![
            PointDataRecord {
                x: 1,
                y: 2,
                z: 3,
                ..Default::default()
            },
            PointDataRecord {
                x: 4,
                y: 5,
                z: 6,
                ..Default::default()
            },
        ]);

        assert_eq!(
            cloud.point_coords(false),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
        );
    }

    #[test]
    fn colors_downscale_by_truncation() {
        let cloud = cloud_with_points(vec![PointDataRecord {
            red: 65535,
            green: 0,
            blue: 32767,
            ..Default::default()
        }]);

        // 32767 * 255 / 65535 = 127.498... truncates to 127
        assert_eq!(cloud.point_colors(), vec![255, 0, 127]);
    }

    #[test]
    fn computed_bounds_cover_all_points() {
        let mut cloud = cloud_with_points(vec![
            PointDataRecord {
                x: 0,
                y: 0,
                z: 0,
                ..Default::default()
            },
            PointDataRecord {
                x: 100,
                y: -50,
                z: 7,
                ..Default::default()
            },
        ]);
        cloud.header.scale = Vector3::new(1.0, 1.0, 1.0);
        cloud.header.offset = Vector3::zeros();

        let bounds = cloud.computed_bounds();
        assert_eq!(bounds.min, point![0.0, -50.0, 0.0]);
        assert_eq!(bounds.max, point![100.0, 0.0, 7.0]);
        assert!(cloud.validate());
    }

    #[test]
    fn views_of_an_empty_cloud_are_empty() {
        let cloud = cloud_with_points(Vec::new());
        assert_eq!(cloud.num_points(), 0);
        assert!(cloud.point_coords(true).is_empty());
        assert!(cloud.point_colors().is_empty());
        assert!(cloud.computed_bounds().is_empty());
    }
}
