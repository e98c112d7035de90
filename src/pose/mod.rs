//! Face pose decoding
//!
//! Converts the 4x4 rigid transform reported by a face tracker into
//! pitch/yaw/roll angles plus a camera-relative distance. The matrix is
//! row-major with the rotation in rows 0..2 and the translation in
//! elements 12..14.

use crate::types::PoseSample;

const RAD_TO_DEG: f32 = 180.0 / std::f32::consts::PI;

/// Matrix elements the decoder reads; anything non-finite here rejects
/// the whole sample.
const USED_ELEMENTS: [usize; 6] = [2, 4, 5, 6, 10, 14];

/// Decode a tracking matrix into a pose sample.
///
/// Returns `None` when the matrix contains non-finite values in any of
/// the elements the decode reads. Callers keep the previous pose in that
/// case; NaN must never reach a published snapshot.
pub fn decode_pose(matrix: &[f32; 16]) -> Option<PoseSample> {
    if USED_ELEMENTS.iter().any(|&i| !matrix[i].is_finite()) {
        log::debug!("rejecting tracking matrix with non-finite elements");
        return None;
    }

    // The asin argument can drift just past +/-1 near gimbal extremes;
    // clamp before use so the angle saturates instead of going NaN.
    let pitch = (-matrix[6]).clamp(-1.0, 1.0).asin() * RAD_TO_DEG;
    let yaw = matrix[2].atan2(matrix[10]) * RAD_TO_DEG;
    let roll = matrix[4].atan2(matrix[5]) * RAD_TO_DEG;
    let distance = matrix[14].abs();

    Some(PoseSample {
        pitch: pitch.round() as i32,
        yaw: yaw.round() as i32,
        roll: roll.round() as i32,
        distance: distance.round() as i32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::synthetic_data::transform_from_euler;

    const IDENTITY: [f32; 16] = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];

    #[test]
    fn test_identity_decodes_to_zero() {
        let sample = decode_pose(&IDENTITY).unwrap();
        assert_eq!(
            sample,
            PoseSample {
                pitch: 0,
                yaw: 0,
                roll: 0,
                distance: 0
            }
        );
    }

    #[test]
    fn test_asin_domain_edge_does_not_produce_nan() {
        let mut matrix = IDENTITY;
        matrix[6] = -1.0;
        let sample = decode_pose(&matrix).unwrap();
        assert_eq!(sample.pitch, 90);
    }

    #[test]
    fn test_asin_argument_past_domain_is_clamped() {
        let mut matrix = IDENTITY;
        // Numerical drift can push the entry slightly out of [-1, 1]
        matrix[6] = -1.000001;
        let sample = decode_pose(&matrix).unwrap();
        assert_eq!(sample.pitch, 90);
    }

    #[test]
    fn test_nan_matrix_is_rejected() {
        let mut matrix = IDENTITY;
        matrix[10] = f32::NAN;
        assert!(decode_pose(&matrix).is_none());

        matrix[10] = f32::INFINITY;
        assert!(decode_pose(&matrix).is_none());
    }

    #[test]
    fn test_distance_uses_translation_magnitude() {
        let mut matrix = IDENTITY;
        matrix[14] = -42.4;
        assert_eq!(decode_pose(&matrix).unwrap().distance, 42);

        matrix[14] = 42.6;
        assert_eq!(decode_pose(&matrix).unwrap().distance, 43);
    }

    #[test]
    fn test_euler_round_trip() {
        for &(pitch, yaw, roll, dist) in &[
            (10.0_f32, -25.0_f32, 5.0_f32, 30.0_f32),
            (-40.0, 60.0, -75.0, 12.0),
            (0.0, 179.0, 0.0, 55.0),
            (85.0, 0.0, 0.0, 3.0),
        ] {
            let matrix = transform_from_euler(pitch, yaw, roll, dist);
            let sample = decode_pose(&matrix).unwrap();
            assert!(
                (sample.pitch - pitch.round() as i32).abs() <= 1,
                "pitch {} decoded as {}",
                pitch,
                sample.pitch
            );
            assert!((sample.yaw - yaw.round() as i32).abs() <= 1);
            assert!((sample.roll - roll.round() as i32).abs() <= 1);
            assert!((sample.distance - dist.round() as i32).abs() <= 1);
        }
    }
}
