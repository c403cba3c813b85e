use super::test_support::{assert_mat_approx, turned};
use crate::{Compositor, CoordinateSpace, axis_fix_in, axis_fix_out};
use glam::{Mat4, Vec3};

#[test]
fn space_selection() {
    let plain = Compositor::new(false);
    let fixed = Compositor::new(true);
    assert_eq!(plain.space(false), CoordinateSpace::ModernAbsolute);
    assert_eq!(plain.space(true), CoordinateSpace::LegacyParentRelative);
    assert_eq!(fixed.space(false), CoordinateSpace::ModernAbsolute);
    assert_eq!(fixed.space(true), CoordinateSpace::LegacyRotated);
}

#[test]
fn parent_relative_composition_premultiplies_parent() {
    let compositor = Compositor::new(false);
    let parent = turned(1.0, 2.0, 3.0, 45.0).rest_matrix();
    let local = turned(0.0, 4.0, 0.0, 10.0).rest_matrix();

    let composed = compositor.compose(CoordinateSpace::LegacyParentRelative, Some(parent), local);
    assert_mat_approx(composed, parent * local);

    let absolute = compositor.compose(CoordinateSpace::ModernAbsolute, Some(parent), local);
    assert_mat_approx(absolute, local);
}

#[test]
fn missing_parent_falls_back_to_local() {
    let compositor = Compositor::new(false);
    let local = turned(5.0, 0.0, 0.0, 30.0).rest_matrix();
    assert_mat_approx(
        compositor.compose(CoordinateSpace::LegacyParentRelative, None, local),
        local,
    );
}

#[test]
fn rotated_composition_order() {
    let compositor = Compositor::new(true);
    let parent = turned(1.0, 0.0, 0.0, 20.0).rest_matrix();
    let local = turned(0.0, 2.0, 0.0, 0.0).rest_matrix();

    let composed = compositor.compose(CoordinateSpace::LegacyRotated, Some(parent), local);
    assert_mat_approx(composed, ((parent * axis_fix_in()) * local) * axis_fix_out());

    let root = compositor.compose(CoordinateSpace::ModernAbsolute, None, local);
    assert_mat_approx(root, local * axis_fix_out());
}

#[test]
fn axis_fix_turns_x_into_y() {
    let turned_x = axis_fix_in().transform_vector3(Vec3::X);
    assert!((turned_x - Vec3::Y).length() < 1.0e-5);
    assert_mat_approx(axis_fix_in() * axis_fix_out(), Mat4::IDENTITY);
}

#[test]
fn undoing_axis_fix_recovers_unfixed_chain() {
    let plain = Compositor::new(false);
    let fixed = Compositor::new(true);
    let locals = [
        turned(0.0, 0.0, 1.0, 15.0).rest_matrix(),
        turned(3.0, 0.0, 0.0, -40.0).rest_matrix(),
        turned(0.0, 2.0, 0.5, 90.0).rest_matrix(),
    ];

    let mut plain_parent: Option<Mat4> = None;
    let mut fixed_parent: Option<Mat4> = None;
    for (index, local) in locals.iter().enumerate() {
        let parent_relative = index > 0;
        let expected = plain.compose(plain.space(parent_relative), plain_parent, *local);
        let composed = fixed.compose(fixed.space(parent_relative), fixed_parent, *local);

        assert_mat_approx(fixed.undo_axis_fix(composed), expected);

        plain_parent = Some(expected);
        fixed_parent = Some(composed);
    }
}
