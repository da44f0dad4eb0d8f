//! Bank angles from the turn between consecutive samples.
use glam::Vec3;

use crate::curve::Frame;
use crate::random::signed_angle_between;

/// Signed turn in degrees from `tangent` to `next`, measured about `normal`.
pub fn signed_turn_deg(tangent: Vec3, next: Vec3, normal: Vec3) -> f32 {
    signed_angle_between(tangent, next, normal).to_degrees()
}

/// Unsigned angle in degrees between `tangent` and `next`, including pitch.
pub fn turn_angle_deg(tangent: Vec3, next: Vec3) -> f32 {
    tangent.cross(next).length().atan2(tangent.dot(next)).to_degrees()
}

/// Bank angle in radians for every frame.
///
/// The full turn toward the next sample, scaled by `factor` and clamped to
/// `±max_banking_deg`, tilts the road. The sign comes from the turn about the frame
/// normal so the inner edge drops; a pure pitch change still banks. `frames` is the closed
/// frame list whose last entry repeats the first, and that entry reuses the first bank.
pub fn bank_angles(frames: &[Frame], factor: f32, max_banking_deg: f32) -> Vec<f32> {
    let n = frames.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let mut banks: Vec<f32> = frames
        .windows(2)
        .map(|w| {
            let side = signed_turn_deg(w[0].tangent, w[1].tangent, w[0].normal);
            let turn = turn_angle_deg(w[0].tangent, w[1].tangent).copysign(side);
            (-turn * factor)
                .clamp(-max_banking_deg, max_banking_deg)
                .to_radians()
        })
        .collect();
    banks.push(banks[0]);
    banks
}
