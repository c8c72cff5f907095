//! Ray picking against body bounding shapes
//!
//! Each body is approximated by a ball of its mesh's bounding radius, except
//! asteroids, which are boxes and get an oriented cuboid. Shapes are built on
//! the fly from the current position and rotation, so picking always reflects
//! the latest simulation step.

use glam::Vec3;
use parry3d::math::{Isometry, Point, Vector};
use parry3d::na::{Translation3, UnitQuaternion};
use parry3d::query::{Ray, RayCast};
use parry3d::shape::{Ball, Cuboid};

use crate::body::{BodyHandle, BodyKind, CelestialBody};

/// Nearest body hit by a pick ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Body that was hit
    pub handle: BodyHandle,
    /// Distance from the ray origin to the hit point
    pub distance: f32,
}

/// Pose of a body for ray casting
///
/// Euler angles are applied about x, then y, then z.
fn body_pose(body: &CelestialBody) -> Isometry<f32> {
    let p = body.position;
    let r = body.rotation;
    Isometry::from_parts(
        Translation3::new(p.x, p.y, p.z),
        UnitQuaternion::from_euler_angles(r.x, r.y, r.z),
    )
}

/// Distance along `ray` to the body's bounding shape, if hit
fn cast_body(body: &CelestialBody, ray: &Ray, max_distance: f32) -> Option<f32> {
    let pose = body_pose(body);
    match body.kind() {
        BodyKind::Asteroid => {
            let h = body.size * 0.5;
            Cuboid::new(Vector::new(h, h, h)).cast_ray(&pose, ray, max_distance, true)
        }
        _ => Ball::new(body.bounding_radius()).cast_ray(&pose, ray, max_distance, true),
    }
}

/// Find the closest body along a ray
///
/// `direction` does not need to be normalized; a zero direction hits nothing.
/// Origins inside a body report that body at distance 0.
pub fn pick_body(
    bodies: &[CelestialBody],
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Option<PickHit> {
    let dir = direction.try_normalize()?;
    let ray = Ray::new(
        Point::new(origin.x, origin.y, origin.z),
        Vector::new(dir.x, dir.y, dir.z),
    );

    bodies
        .iter()
        .enumerate()
        .filter_map(|(i, body)| {
            cast_body(body, &ray, max_distance).map(|distance| PickHit {
                handle: BodyHandle(i),
                distance,
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{mass_from, pull_radius_from, BodyDetails, PointLight};
    use crate::mesh::{build_box, build_polyhedron, PolyhedronParams};
    use crate::noise::NoiseField;
    use crate::random::RandomStream;

    fn body(size: f32, position: Vec3, details: BodyDetails) -> CelestialBody {
        let mesh = match details {
            BodyDetails::Asteroid => build_box(size),
            _ => {
                let noise = NoiseField::new(&mut RandomStream::new(1u64));
                let params = PolyhedronParams {
                    radius: size,
                    detail: 1,
                    roughness: 0.0,
                    ..Default::default()
                };
                build_polyhedron(&params, &noise)
            }
        };
        let mass = mass_from(size, 1.0);
        CelestialBody {
            name: "Test".to_string(),
            size,
            color: 0xffffff,
            density: 1.0,
            mass,
            pull_radius: pull_radius_from(mass),
            mesh,
            rotation: Vec3::ZERO,
            rotation_rate: Vec3::ZERO,
            position,
            details,
        }
    }

    fn star_at(x: f32) -> CelestialBody {
        let light = PointLight {
            color: 0xffffff,
            intensity: 1.0,
            decay: 2.0,
        };
        body(2.0, Vec3::new(x, 0.0, 0.0), BodyDetails::Star { light })
    }

    #[test]
    fn test_picks_nearest() {
        let bodies = vec![star_at(20.0), star_at(10.0), star_at(-10.0)];
        let hit = pick_body(&bodies, Vec3::ZERO, Vec3::X, 100.0).unwrap();
        assert_eq!(hit.handle, BodyHandle(1));
        assert!((hit.distance - 8.0).abs() < 1e-3);
    }

    #[test]
    fn test_unnormalized_direction() {
        let bodies = vec![star_at(10.0)];
        let hit = pick_body(&bodies, Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), 100.0).unwrap();
        assert!((hit.distance - 8.0).abs() < 1e-3);
    }

    #[test]
    fn test_miss_and_range() {
        let bodies = vec![star_at(10.0)];
        assert!(pick_body(&bodies, Vec3::ZERO, Vec3::Y, 100.0).is_none());
        assert!(pick_body(&bodies, Vec3::ZERO, Vec3::X, 5.0).is_none());
        assert!(pick_body(&bodies, Vec3::ZERO, Vec3::ZERO, 100.0).is_none());
        assert!(pick_body(&[], Vec3::ZERO, Vec3::X, 100.0).is_none());
    }

    #[test]
    fn test_asteroid_box() {
        let mut rock = body(2.0, Vec3::new(0.0, 0.0, 10.0), BodyDetails::Asteroid);
        let hit = pick_body(std::slice::from_ref(&rock), Vec3::ZERO, Vec3::Z, 100.0).unwrap();
        assert!((hit.distance - 9.0).abs() < 1e-3);

        // Turned 45 degrees about y, the corner edge faces the ray
        rock.rotation = Vec3::new(0.0, std::f32::consts::FRAC_PI_4, 0.0);
        let hit = pick_body(std::slice::from_ref(&rock), Vec3::ZERO, Vec3::Z, 100.0).unwrap();
        assert!((hit.distance - (10.0 - 2.0_f32.sqrt())).abs() < 1e-3);
    }

    #[test]
    fn test_origin_inside_body() {
        let bodies = vec![star_at(0.0)];
        let hit = pick_body(&bodies, Vec3::ZERO, Vec3::X, 100.0).unwrap();
        assert_eq!(hit.distance, 0.0);
    }
}
