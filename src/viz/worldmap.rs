//! Static world geometry shared by the globe and heatmap views
//!
//! Coarse continent outlines as (lat, lon) polylines in radians. Fixed
//! reference data; both renderers interpolate along the segments.

use std::sync::LazyLock;

#[inline]
pub const fn deg_to_rad(lat: f32, lon: f32) -> (f32, f32) {
    const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;
    (lat * DEG_TO_RAD, lon * DEG_TO_RAD)
}

/// Returns the shortest angular delta from `from` to `to`, in range -PI..PI.
#[inline]
pub fn shortest_angular_delta(from: f32, to: f32) -> f32 {
    let mut delta = to - from;
    if delta > std::f32::consts::PI {
        delta -= std::f32::consts::TAU;
    } else if delta < -std::f32::consts::PI {
        delta += std::f32::consts::TAU;
    }
    delta
}

/// Normalize an angle to the range [-PI, PI].
#[inline]
pub fn normalize_longitude(lon: f32) -> f32 {
    let normalized = lon.rem_euclid(std::f32::consts::TAU);
    if normalized > std::f32::consts::PI {
        normalized - std::f32::consts::TAU
    } else {
        normalized
    }
}

pub static CONTINENTS: LazyLock<Vec<Vec<(f32, f32)>>> = LazyLock::new(|| vec![
    // North America (41 points)
    vec![
        deg_to_rad(69.5, -90.5), deg_to_rad(67.1, -81.4), deg_to_rad(58.9, -94.7),
        deg_to_rad(51.2, -79.9), deg_to_rad(62.6, -77.4), deg_to_rad(58.2, -67.6),
        deg_to_rad(60.3, -64.6), deg_to_rad(53.3, -55.8), deg_to_rad(46.8, -71.1),
        deg_to_rad(49.2, -65.1), deg_to_rad(45.9, -59.8), deg_to_rad(39.2, -76.3),
        deg_to_rad(31.4, -81.3), deg_to_rad(25.2, -80.4), deg_to_rad(30.1, -84.1),
        deg_to_rad(27.8, -97.1), deg_to_rad(18.8, -95.9), deg_to_rad(21.5, -87.1),
        deg_to_rad(15.9, -88.9), deg_to_rad(15.3, -83.4), deg_to_rad(9.0, -82.2),
        deg_to_rad(11.1, -74.9), deg_to_rad(7.2, -80.9), deg_to_rad(19.3, -105.0),
        deg_to_rad(31.2, -113.1), deg_to_rad(23.4, -109.4), deg_to_rad(24.7, -112.2),
        deg_to_rad(40.3, -124.4), deg_to_rad(49.0, -122.8), deg_to_rad(58.1, -134.1),
        deg_to_rad(61.3, -150.6), deg_to_rad(54.4, -164.8), deg_to_rad(58.9, -157.0),
        deg_to_rad(61.5, -166.1), deg_to_rad(64.8, -160.8), deg_to_rad(65.7, -168.1),
        deg_to_rad(71.4, -156.6), deg_to_rad(67.4, -108.9), deg_to_rad(67.3, -96.1),
        deg_to_rad(71.9, -95.2), deg_to_rad(69.5, -90.5),
    ],
    // South America (22 points)
    vec![
        deg_to_rad(11.1, -74.9), deg_to_rad(10.7, -61.9), deg_to_rad(4.2, -51.3),
        deg_to_rad(-0.1, -50.4), deg_to_rad(-7.3, -34.7), deg_to_rad(-21.9, -40.9),
        deg_to_rad(-24.9, -47.6), deg_to_rad(-34.4, -53.8), deg_to_rad(-33.9, -58.4),
        deg_to_rad(-36.9, -56.8), deg_to_rad(-41.1, -65.1), deg_to_rad(-48.1, -66.0),
        deg_to_rad(-53.8, -71.0), deg_to_rad(-52.3, -74.9), deg_to_rad(-46.6, -75.6),
        deg_to_rad(-42.4, -72.7), deg_to_rad(-18.3, -70.4), deg_to_rad(-14.6, -76.0),
        deg_to_rad(-4.7, -81.4), deg_to_rad(3.8, -77.1), deg_to_rad(9.0, -79.1),
        deg_to_rad(11.1, -74.9),
    ],
    // Europe (39 points)
    vec![
        deg_to_rad(31.2, 29.7), deg_to_rad(31.2, 34.3), deg_to_rad(36.7, 36.2),
        deg_to_rad(36.7, 27.6), deg_to_rad(39.5, 26.2), deg_to_rad(41.5, 41.6),
        deg_to_rad(45.2, 36.7), deg_to_rad(47.3, 39.1), deg_to_rad(44.4, 33.9),
        deg_to_rad(46.6, 30.7), deg_to_rad(41.1, 28.8), deg_to_rad(40.3, 22.6),
        deg_to_rad(36.4, 23.2), deg_to_rad(45.6, 13.9), deg_to_rad(40.2, 18.5),
        deg_to_rad(37.9, 15.7), deg_to_rad(44.4, 8.9), deg_to_rad(36.0, -5.9),
        deg_to_rad(36.9, -8.9), deg_to_rad(43.0, -9.4), deg_to_rad(43.4, -1.9),
        deg_to_rad(48.7, -4.6), deg_to_rad(53.5, 8.1), deg_to_rad(57.1, 8.5),
        deg_to_rad(54.0, 10.9), deg_to_rad(54.4, 19.7), deg_to_rad(59.2, 23.3),
        deg_to_rad(60.0, 29.1), deg_to_rad(60.7, 21.3), deg_to_rad(65.1, 25.4),
        deg_to_rad(65.7, 22.2), deg_to_rad(55.4, 12.9), deg_to_rad(59.5, 10.4),
        deg_to_rad(58.6, 5.7), deg_to_rad(62.6, 5.9), deg_to_rad(69.8, 19.2),
        deg_to_rad(70.5, 31.3), deg_to_rad(69.3, 33.8), deg_to_rad(31.2, 29.7),
    ],
    // Africa (16 points)
    vec![
        deg_to_rad(29.9, 32.4), deg_to_rad(11.7, 42.7), deg_to_rad(10.6, 51.0),
        deg_to_rad(-4.7, 39.2), deg_to_rad(-14.7, 40.8), deg_to_rad(-19.8, 34.8),
        deg_to_rad(-24.1, 35.5), deg_to_rad(-32.8, 28.2), deg_to_rad(-34.8, 19.6),
        deg_to_rad(-18.1, 11.8), deg_to_rad(-10.7, 13.7), deg_to_rad(3.7, 9.4),
        deg_to_rad(6.3, 4.3), deg_to_rad(4.4, -8.0), deg_to_rad(14.7, -17.6),
        deg_to_rad(29.9, 32.4),
    ],
    // Asia (43 points)
    vec![
        deg_to_rad(77.0, 107.0), deg_to_rad(70.8, 131.3), deg_to_rad(69.4, 178.6),
        deg_to_rad(62.3, 179.2), deg_to_rad(59.9, 163.5), deg_to_rad(51.0, 156.8),
        deg_to_rad(56.8, 155.9), deg_to_rad(62.6, 164.5), deg_to_rad(54.7, 135.1),
        deg_to_rad(52.2, 141.4), deg_to_rad(39.8, 127.5), deg_to_rad(35.1, 129.1),
        deg_to_rad(40.9, 121.6), deg_to_rad(39.2, 118.0), deg_to_rad(37.5, 122.4),
        deg_to_rad(34.9, 119.2), deg_to_rad(28.2, 121.7), deg_to_rad(19.8, 105.9),
        deg_to_rad(13.4, 109.3), deg_to_rad(8.6, 105.2), deg_to_rad(13.4, 100.1),
        deg_to_rad(1.3, 104.2), deg_to_rad(22.8, 91.4), deg_to_rad(15.9, 80.3),
        deg_to_rad(8.0, 77.5), deg_to_rad(21.4, 72.6), deg_to_rad(30.3, 48.9),
        deg_to_rad(24.0, 51.8), deg_to_rad(26.4, 56.4), deg_to_rad(22.3, 59.8),
        deg_to_rad(12.6, 43.5), deg_to_rad(21.3, 39.1), deg_to_rad(69.3, 33.8),
        deg_to_rad(67.5, 41.1), deg_to_rad(66.6, 33.2), deg_to_rad(63.8, 37.0),
        deg_to_rad(68.6, 43.5), deg_to_rad(68.1, 68.5), deg_to_rad(71.0, 66.7),
        deg_to_rad(73.0, 69.9), deg_to_rad(66.2, 72.4), deg_to_rad(72.8, 74.7),
        deg_to_rad(77.0, 107.0),
    ],
    // Australia (20 points)
    vec![
        deg_to_rad(-13.8, 143.6), deg_to_rad(-26.1, 153.1), deg_to_rad(-37.4, 150.0),
        deg_to_rad(-38.0, 140.6), deg_to_rad(-34.4, 138.2), deg_to_rad(-35.3, 136.8),
        deg_to_rad(-32.9, 137.8), deg_to_rad(-34.9, 136.0), deg_to_rad(-31.5, 131.3),
        deg_to_rad(-34.2, 115.0), deg_to_rad(-21.8, 114.1), deg_to_rad(-19.7, 120.9),
        deg_to_rad(-14.2, 125.7), deg_to_rad(-15.0, 129.6), deg_to_rad(-11.1, 132.4),
        deg_to_rad(-11.9, 136.5), deg_to_rad(-15.0, 135.5), deg_to_rad(-17.7, 140.2),
        deg_to_rad(-11.0, 142.1), deg_to_rad(-13.8, 143.6),
    ],
    // Greenland (21 points)
    vec![
        deg_to_rad(83.5, -27.1), deg_to_rad(82.7, -20.8), deg_to_rad(82.0, -31.4),
        deg_to_rad(81.3, -12.2), deg_to_rad(80.2, -20.0), deg_to_rad(80.1, -17.7),
        deg_to_rad(76.6, -21.7), deg_to_rad(74.3, -19.4), deg_to_rad(70.2, -26.4),
        deg_to_rad(70.1, -22.3), deg_to_rad(65.5, -39.8), deg_to_rad(60.1, -43.4),
        deg_to_rad(63.6, -51.6), deg_to_rad(67.2, -54.0), deg_to_rad(69.9, -50.9),
        deg_to_rad(69.6, -54.7), deg_to_rad(70.6, -51.4), deg_to_rad(75.5, -58.6),
        deg_to_rad(78.0, -73.3), deg_to_rad(81.8, -62.7), deg_to_rad(83.5, -27.1),
    ],
    // Japan (8 points)
    vec![
        deg_to_rad(37.1, 141.0), deg_to_rad(33.5, 135.8), deg_to_rad(33.9, 131.0),
        deg_to_rad(31.4, 130.2), deg_to_rad(33.3, 129.4), deg_to_rad(38.2, 139.4),
        deg_to_rad(41.2, 140.3), deg_to_rad(37.1, 141.0),
    ],
    // UK/Ireland (6 points)
    vec![
        deg_to_rad(58.6, -3.0), deg_to_rad(51.3, 1.4), deg_to_rad(50.0, -5.2),
        deg_to_rad(54.0, -2.9), deg_to_rad(56.8, -6.1), deg_to_rad(58.6, -3.0),
    ],
    // Antarctica (22 points)
    vec![
        deg_to_rad(-64.2, -58.6), deg_to_rad(-68.0, -65.7), deg_to_rad(-73.7, -60.8),
        deg_to_rad(-79.2, -78.0), deg_to_rad(-83.2, -58.2), deg_to_rad(-80.3, -28.5),
        deg_to_rad(-78.1, -35.3), deg_to_rad(-70.9, -6.9), deg_to_rad(-65.8, 54.5),
        deg_to_rad(-72.3, 69.9), deg_to_rad(-66.2, 88.0), deg_to_rad(-65.3, 135.1),
        deg_to_rad(-71.7, 171.2), deg_to_rad(-80.9, 159.8), deg_to_rad(-84.7, 180.0),
        deg_to_rad(-90.0, 180.0), deg_to_rad(-90.0, -180.0), deg_to_rad(-84.1, -179.1),
        deg_to_rad(-85.0, -143.1), deg_to_rad(-76.9, -158.4), deg_to_rad(-73.9, -74.9),
        deg_to_rad(-64.2, -58.6),
    ],
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outlines_are_closed_loops() {
        for continent in CONTINENTS.iter() {
            assert!(continent.len() >= 4);
            assert_eq!(continent.first(), continent.last());
        }
    }

    #[test]
    fn angular_delta_wraps_across_the_antimeridian() {
        let from = deg_to_rad(0.0, 170.0).1;
        let to = deg_to_rad(0.0, -170.0).1;
        let delta = shortest_angular_delta(from, to);
        assert!((delta - 20.0_f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn normalize_keeps_range() {
        for deg in [-720.0_f32, -181.0, -180.0, 0.0, 179.9, 360.0, 540.0] {
            let lon = normalize_longitude(deg.to_radians());
            assert!((-std::f32::consts::PI..=std::f32::consts::PI).contains(&lon));
        }
    }
}
