use glam::{DMat3, DVec2, DVec3};

use crate::geo::{wrap_angle, GeoPoint};
use crate::map::rotation::RotationState;

/// Default back-face looseness as a fraction of the radius. Markers up to
/// this far behind the limb still count as visible.
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.3;

/// Zoom multiplier per scroll step.
const ZOOM_STEP: f64 = 1.25;
const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 8.0;

/// Share of the smaller canvas dimension the sphere radius fills at zoom 1.
const FIT_FRACTION: f64 = 0.45;

/// Screen position of a point for one frame. Never kept across frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedPoint {
    pub screen_x: f64,
    pub screen_y: f64,
    pub visible: bool,
    /// Rotated z on the unit sphere; positive faces the viewer
    pub depth: f64,
}

impl ProjectedPoint {
    #[inline(always)]
    pub fn screen(&self) -> DVec2 {
        DVec2::new(self.screen_x, self.screen_y)
    }

    /// Rounded pixel position for rasterizing.
    #[inline(always)]
    pub fn pixel(&self) -> (i32, i32) {
        (self.screen_x.round() as i32, self.screen_y.round() as i32)
    }
}

/// Orthographic projector for a sphere drawn at `center` with `radius`.
/// Holds no rotation; the caller passes the current orientation in.
#[derive(Clone, Debug)]
pub struct SphereProjector {
    /// Disk center in canvas pixels
    pub center: DVec2,
    /// On-screen sphere radius in canvas pixels
    pub radius: f64,
    /// Visibility cutoff `k`: visible when rotated z > -k
    pub visibility_threshold: f64,
    zoom: f64,
    base_radius: f64,
}

impl SphereProjector {
    pub fn new(center: DVec2, radius: f64, visibility_threshold: f64) -> Self {
        Self {
            center,
            radius,
            visibility_threshold,
            zoom: 1.0,
            base_radius: radius,
        }
    }

    /// Projector centered in a `width` x `height` pixel canvas.
    pub fn fitted(width: usize, height: usize, zoom: f64, visibility_threshold: f64) -> Self {
        let mut projector = Self::new(DVec2::ZERO, 1.0, visibility_threshold);
        projector.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        projector.fit(width, height);
        projector
    }

    /// Recenter for a new canvas size, keeping the zoom level.
    pub fn fit(&mut self, width: usize, height: usize) {
        self.center = DVec2::new(width as f64 / 2.0, height as f64 / 2.0);
        self.base_radius = (width.min(height) as f64 * FIT_FRACTION).max(1.0);
        self.radius = self.base_radius * self.zoom;
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.radius = self.base_radius * self.zoom;
    }

    /// Project a destination under the given orientation.
    #[inline]
    pub fn project(&self, point: &GeoPoint, rotation: &RotationState) -> ProjectedPoint {
        self.project_lonlat(point.longitude, point.latitude, rotation)
    }

    /// Project a raw (lon, lat) pair in degrees.
    #[inline]
    pub fn project_lonlat(&self, lon: f64, lat: f64, rotation: &RotationState) -> ProjectedPoint {
        project_with_threshold(lon, lat, rotation, self.center, self.radius, self.visibility_threshold)
    }

    /// Project every point, preserving order so indices keep identifying points.
    pub fn project_all(&self, points: &[GeoPoint], rotation: &RotationState) -> Vec<ProjectedPoint> {
        points.iter().map(|p| self.project(p, rotation)).collect()
    }

    /// Geographic (lat, lon) in degrees under a screen pixel, front
    /// hemisphere only. `None` outside the disk.
    pub fn unproject(&self, screen_x: f64, screen_y: f64, rotation: &RotationState) -> Option<(f64, f64)> {
        let sx = (screen_x - self.center.x) / self.radius;
        let sy = -(screen_y - self.center.y) / self.radius;

        let r2 = sx * sx + sy * sy;
        if r2 > 1.0 {
            return None;
        }

        let front = DVec3::new(sx, sy, (1.0 - r2).sqrt());
        let p = DMat3::from_rotation_x(-rotation.angle_x) * front;

        let lat = p.y.clamp(-1.0, 1.0).asin().to_degrees();
        let lon = wrap_angle(p.z.atan2(p.x) - rotation.angle_y).to_degrees();
        Some((lat, lon))
    }
}

/// Project `point` for a sphere at `center` with `radius`, using the
/// default visibility threshold.
pub fn project(point: &GeoPoint, rotation: &RotationState, center: DVec2, radius: f64) -> ProjectedPoint {
    project_with_threshold(
        point.longitude,
        point.latitude,
        rotation,
        center,
        radius,
        DEFAULT_VISIBILITY_THRESHOLD,
    )
}

#[inline(always)]
fn project_with_threshold(
    lon: f64,
    lat: f64,
    rotation: &RotationState,
    center: DVec2,
    radius: f64,
    threshold: f64,
) -> ProjectedPoint {
    let p = rotated_unit(lon, lat, rotation);
    ProjectedPoint {
        screen_x: center.x + p.x * radius,
        // Screen y grows downward
        screen_y: center.y - p.y * radius,
        visible: p.z * radius > -radius * threshold,
        depth: p.z,
    }
}

/// Unit-sphere position of (lon, lat) after spinning by `angle_y` and
/// tilting about the screen X axis by `angle_x`.
#[inline(always)]
fn rotated_unit(lon: f64, lat: f64, rotation: &RotationState) -> DVec3 {
    let lat = lat.to_radians();
    let lon = lon.to_radians() + rotation.angle_y;
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    let spun = DVec3::new(cos_lat * cos_lon, sin_lat, cos_lat * sin_lon);
    DMat3::from_rotation_x(rotation.angle_x) * spun
}

/// Unrotated unit-sphere position of (lon, lat) in degrees.
#[inline(always)]
fn lonlat_to_unit(lon: f64, lat: f64) -> DVec3 {
    rotated_unit(lon, lat, &RotationState::default())
}

/// Visit points along the great circle from (lon0, lat0) to (lon1, lat1)
/// at roughly `step_deg` spacing. The start point is not emitted; the end
/// point always is.
pub fn walk_great_circle(
    lon0: f64, lat0: f64,
    lon1: f64, lat1: f64,
    step_deg: f64,
    mut visitor: impl FnMut(f64, f64),
) {
    let a = lonlat_to_unit(lon0, lat0);
    let b = lonlat_to_unit(lon1, lat1);

    let angle = a.dot(b).clamp(-1.0, 1.0).acos();
    let steps = ((angle.to_degrees() / step_deg).ceil() as usize).max(1);
    let sin_angle = angle.sin();

    // Short hop, or endpoints identical/antipodal where slerp is undefined
    if steps == 1 || sin_angle.abs() < 1e-10 {
        visitor(lon1, lat1);
        return;
    }

    for i in 1..steps {
        let t = i as f64 / steps as f64;
        let p = a * (((1.0 - t) * angle).sin() / sin_angle) + b * ((t * angle).sin() / sin_angle);
        let lat = p.y.clamp(-1.0, 1.0).asin().to_degrees();
        let lon = p.z.atan2(p.x).to_degrees();
        visitor(lon, lat);
    }
    visitor(lon1, lat1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    const EPS: f64 = 1e-9;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon, "test").unwrap()
    }

    #[test]
    fn test_origin_lands_on_right_limb() {
        let center = DVec2::new(100.0, 50.0);
        let p = project(&point(0.0, 0.0), &RotationState::default(), center, 40.0);
        assert!((p.screen_x - 140.0).abs() < EPS);
        assert!((p.screen_y - 50.0).abs() < EPS);
        assert!(p.visible);
    }

    #[test]
    fn test_north_pole_ignores_longitude() {
        let center = DVec2::new(100.0, 50.0);
        for lon in [-180.0, -90.0, 0.0, 45.0, 135.0, 180.0] {
            let rot = RotationState::new(0.0, 0.7);
            let p = project(&point(90.0, lon), &rot, center, 40.0);
            assert!((p.screen_y - 10.0).abs() < EPS, "lon {lon}: {}", p.screen_y);
            assert!((p.screen_x - 100.0).abs() < EPS);
        }
    }

    #[test]
    fn test_full_spin_is_identity() {
        let projector = SphereProjector::new(DVec2::new(80.0, 60.0), 50.0, 0.3);
        let base = RotationState::new(0.4, 1.1);
        let spun = RotationState::new(0.4, 1.1 + TAU);
        for (lat, lon) in [(48.9, 2.3), (-33.9, 151.2), (35.7, 139.7), (-22.9, -43.2)] {
            let a = projector.project(&point(lat, lon), &base);
            let b = projector.project(&point(lat, lon), &spun);
            assert!((a.screen_x - b.screen_x).abs() < EPS);
            assert!((a.screen_y - b.screen_y).abs() < EPS);
            assert_eq!(a.visible, b.visible);
        }
    }

    #[test]
    fn test_antipode_hidden() {
        let rot = RotationState::default();
        let center = DVec2::new(0.0, 0.0);
        let front = project(&point(0.0, 90.0), &rot, center, 10.0);
        let back = project(&point(0.0, -90.0), &rot, center, 10.0);
        assert!(front.visible);
        assert!((front.depth - 1.0).abs() < EPS);
        assert!(!back.visible);
        assert!((back.depth + 1.0).abs() < EPS);
    }

    #[test]
    fn test_threshold_lets_limb_points_through() {
        let rot = RotationState::default();
        // Slightly behind the limb: depth = sin(-10°) ≈ -0.17
        let projector = SphereProjector::new(DVec2::ZERO, 10.0, 0.3);
        assert!(projector.project(&point(0.0, -10.0), &rot).visible);

        let strict = SphereProjector::new(DVec2::ZERO, 10.0, 0.0);
        assert!(!strict.project(&point(0.0, -10.0), &rot).visible);
    }

    #[test]
    fn test_tilt_rotates_pole_toward_viewer() {
        // Tilting by +90° brings the north pole to the disk center
        let rot = RotationState::new(PI / 2.0, 0.0);
        let center = DVec2::new(50.0, 50.0);
        let p = project(&point(90.0, 0.0), &rot, center, 20.0);
        assert!((p.screen_x - 50.0).abs() < EPS);
        assert!((p.screen_y - 50.0).abs() < EPS);
        assert!((p.depth - 1.0).abs() < EPS);
    }

    #[test]
    fn test_facing_centers_point() {
        let projector = SphereProjector::new(DVec2::new(60.0, 40.0), 30.0, 0.3);
        let rot = RotationState::facing(48.9, 2.3);
        let p = projector.project(&point(48.9, 2.3), &rot);
        assert!((p.screen_x - 60.0).abs() < 1e-6);
        assert!((p.screen_y - 40.0).abs() < 1e-6);
        assert!((p.depth - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let projector = SphereProjector::new(DVec2::new(120.0, 80.0), 60.0, 0.3);
        let rot = RotationState::new(0.3, -0.8);
        for (lat, lon) in [(10.0, 60.0), (40.0, 70.0), (-20.0, 70.0)] {
            let p = projector.project(&point(lat, lon), &rot);
            assert!(p.depth > 0.0, "test point should face the viewer");
            let (ulat, ulon) = projector.unproject(p.screen_x, p.screen_y, &rot).unwrap();
            assert!((ulat - lat).abs() < 1e-6);
            assert!((ulon - lon).abs() < 1e-6);
        }
    }

    #[test]
    fn test_unproject_outside_disk() {
        let projector = SphereProjector::new(DVec2::new(50.0, 50.0), 10.0, 0.3);
        assert!(projector.unproject(0.0, 0.0, &RotationState::default()).is_none());
        assert!(projector.unproject(55.0, 52.0, &RotationState::default()).is_some());
    }

    #[test]
    fn test_project_all_preserves_order() {
        let projector = SphereProjector::new(DVec2::ZERO, 1.0, 0.3);
        let points = vec![point(0.0, 0.0), point(90.0, 0.0), point(0.0, 90.0)];
        let projected = projector.project_all(&points, &RotationState::default());
        assert_eq!(projected.len(), 3);
        assert!((projected[0].screen_x - 1.0).abs() < EPS);
        assert!((projected[1].screen_y + 1.0).abs() < EPS);
        assert!((projected[2].depth - 1.0).abs() < EPS);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut projector = SphereProjector::fitted(200, 100, 1.0, 0.3);
        assert!((projector.radius - 45.0).abs() < EPS);
        for _ in 0..50 {
            projector.zoom_in();
        }
        assert!((projector.zoom() - MAX_ZOOM).abs() < EPS);
        for _ in 0..50 {
            projector.zoom_out();
        }
        assert!((projector.radius - 45.0 * MIN_ZOOM).abs() < EPS);
    }

    #[test]
    fn test_great_circle_subdivides() {
        let mut visited = Vec::new();
        // 89° in ~2° steps: 45 segments
        walk_great_circle(0.0, 0.0, 89.0, 0.0, 2.0, |lon, lat| visited.push((lon, lat)));
        assert_eq!(visited.len(), 45);
        assert!((visited[0].0 - 89.0 / 45.0).abs() < 1e-9);
        assert!(visited.iter().all(|&(_, lat)| lat.abs() < 1e-9));
        assert_eq!(*visited.last().unwrap(), (89.0, 0.0));
    }

    #[test]
    fn test_great_circle_short_hop() {
        let mut visited = Vec::new();
        walk_great_circle(10.0, 10.0, 11.0, 10.5, 2.0, |lon, lat| visited.push((lon, lat)));
        assert_eq!(visited, vec![(11.0, 10.5)]);
    }

    #[test]
    fn test_fit_keeps_zoom() {
        let mut projector = SphereProjector::fitted(100, 100, 2.0, 0.3);
        projector.fit(200, 300);
        assert_eq!(projector.center, DVec2::new(100.0, 150.0));
        assert!((projector.radius - 180.0).abs() < EPS);
    }
}
