use super::*;

const EPS: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

// ===== IDENTITY =====

#[test]
fn default_camera_is_identity() {
    let cam = Camera::default();
    let p = cam.screen_to_world(Point::new(120.0, 45.0));
    assert!(approx(p.x, 120.0));
    assert!(approx(p.y, 45.0));
}

#[test]
fn screen_to_world_inverts_world_to_screen() {
    let cam = Camera { pan_x: -300.0, pan_y: 85.5, zoom: 2.5 };
    let world = Point::new(12.25, -940.0);
    let screen = cam.world_to_screen(world);
    let back = cam.screen_to_world(screen);
    assert!(approx(back.x, world.x));
    assert!(approx(back.y, world.y));
}

// ===== PAN & ZOOM =====

#[test]
fn pan_shifts_world_coordinates() {
    let cam = Camera { pan_x: 50.0, pan_y: -20.0, zoom: 1.0 };
    let p = cam.screen_to_world(Point::new(0.0, 0.0));
    assert!(approx(p.x, -50.0));
    assert!(approx(p.y, 20.0));
}

#[test]
fn zoom_scales_about_origin() {
    let cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 2.0 };
    let p = cam.screen_to_world(Point::new(100.0, 60.0));
    assert!(approx(p.x, 50.0));
    assert!(approx(p.y, 30.0));
}

#[test]
fn screen_dist_to_world_divides_by_zoom() {
    let cam = Camera { pan_x: 999.0, pan_y: -999.0, zoom: 4.0 };
    assert!(approx(cam.screen_dist_to_world(8.0), 2.0));
}

#[test]
fn screen_dist_ignores_pan() {
    let a = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 1.5 };
    let b = Camera { pan_x: -777.0, pan_y: 333.0, zoom: 1.5 };
    assert!(approx(a.screen_dist_to_world(6.0), b.screen_dist_to_world(6.0)));
}
