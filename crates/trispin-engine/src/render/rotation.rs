use glam::Mat4;

/// Rotation about the Z axis by `angle` radians.
///
/// `to_cols_array()` of the result is the 16-float sequence uploaded to
/// `rotation_mat`: `[c, s, 0, 0, -s, c, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1]`.
/// The angle is not wrapped.
pub fn rotation_matrix(angle: f32) -> Mat4 {
    Mat4::from_rotation_z(angle)
}
