//! Collision detection
//!
//! Everything here is circle-vs-circle or circle-vs-axis-aligned-edge. The
//! board never holds more than a few hundred bubbles, so the bubble scan is a
//! plain linear pass in grid order.

use glam::Vec2;

use super::grid::BubbleGrid;
use super::hex::GridCoord;
use crate::consts::{GUIDE_MAX_BOUNCES, GUIDE_MAX_STEPS, GUIDE_STEP};
use crate::distance;

/// Side wall touched by a moving bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
}

/// What stopped a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileContact {
    /// Touched an anchored bubble
    Bubble(GridCoord),
    /// Reached the top edge
    Ceiling,
}

/// True if two equal circles of `radius` overlap
#[inline]
pub fn circles_touch(a: Vec2, b: Vec2, radius: f32) -> bool {
    distance(a, b) < 2.0 * radius
}

/// First anchored bubble (in grid order) whose center lies within 2r of `pos`
pub fn first_bubble_hit(grid: &BubbleGrid, pos: Vec2, radius: f32) -> Option<GridCoord> {
    grid.iter()
        .find(|b| circles_touch(b.pos, pos, radius))
        .map(|b| b.coord)
}

/// Side wall the circle is touching or past, if any
pub fn wall_contact(pos: Vec2, radius: f32, width: f32) -> Option<Wall> {
    if pos.x - radius <= 0.0 {
        Some(Wall::Left)
    } else if pos.x + radius >= width {
        Some(Wall::Right)
    } else {
        None
    }
}

#[inline]
pub fn hits_ceiling(pos: Vec2, radius: f32) -> bool {
    pos.y <= radius
}

/// Contact test for a projectile at `pos`; bubbles take priority over the ceiling
pub fn projectile_contact(grid: &BubbleGrid, pos: Vec2, radius: f32) -> Option<ProjectileContact> {
    if let Some(coord) = first_bubble_hit(grid, pos, radius) {
        return Some(ProjectileContact::Bubble(coord));
    }
    hits_ceiling(pos, radius).then_some(ProjectileContact::Ceiling)
}

/// Preview the path of a shot.
///
/// Marches from `origin` along `angle` in fixed steps, reflecting off the side
/// walls up to a bounce limit. The path ends at the ceiling or at the first
/// anchored bubble, in which case the last point is pulled back onto that
/// bubble's contact circle. Returned points are the polyline vertices: the
/// origin, every bounce point, and the end point.
pub fn trace_aim_guide(origin: Vec2, angle: f32, radius: f32, width: f32, grid: &BubbleGrid) -> Vec<Vec2> {
    let mut points = vec![origin];
    let mut pos = origin;
    let mut dir = Vec2::new(angle.cos(), -angle.sin());
    let mut bounces = 0;

    for _ in 0..GUIDE_MAX_STEPS {
        pos += dir * GUIDE_STEP;

        if let Some(wall) = wall_contact(pos, radius, width) {
            pos.x = match wall {
                Wall::Left => radius,
                Wall::Right => width - radius,
            };
            dir.x = -dir.x;
            points.push(pos);
            bounces += 1;
            if bounces >= GUIDE_MAX_BOUNCES {
                return points;
            }
        }

        if let Some(bubble) = grid.iter().find(|b| circles_touch(b.pos, pos, radius)) {
            let away = (pos - bubble.pos).normalize_or(-dir);
            points.push(bubble.pos + away * 2.0 * radius);
            return points;
        }

        if hits_ceiling(pos, radius) {
            pos.y = radius;
            points.push(pos);
            return points;
        }
    }

    points.push(pos);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bubble, BubbleColor};
    use std::f32::consts::FRAC_PI_2;

    const R: f32 = 20.0;

    fn grid_with(cells: &[(i32, i32)]) -> BubbleGrid {
        let mut grid = BubbleGrid::new(12, 8);
        for &(row, col) in cells {
            grid.insert(Bubble::anchored(0, BubbleColor::Red, GridCoord::new(row, col), R))
                .unwrap();
        }
        grid
    }

    #[test]
    fn test_first_hit_uses_two_radii() {
        let grid = grid_with(&[(0, 2)]);
        let center = GridCoord::new(0, 2).to_pixel(R);

        assert_eq!(
            first_bubble_hit(&grid, center + Vec2::new(0.0, 39.0), R),
            Some(GridCoord::new(0, 2))
        );
        assert_eq!(first_bubble_hit(&grid, center + Vec2::new(0.0, 40.0), R), None);
    }

    #[test]
    fn test_wall_contact() {
        assert_eq!(wall_contact(Vec2::new(10.0, 300.0), R, 340.0), Some(Wall::Left));
        assert_eq!(wall_contact(Vec2::new(330.0, 300.0), R, 340.0), Some(Wall::Right));
        assert_eq!(wall_contact(Vec2::new(170.0, 300.0), R, 340.0), None);
    }

    #[test]
    fn test_projectile_contact_prefers_bubble() {
        let grid = grid_with(&[(0, 0)]);
        let pos = Vec2::new(25.0, 15.0);
        assert_eq!(
            projectile_contact(&grid, pos, R),
            Some(ProjectileContact::Bubble(GridCoord::new(0, 0)))
        );

        let empty = grid_with(&[]);
        assert_eq!(projectile_contact(&empty, pos, R), Some(ProjectileContact::Ceiling));
        assert_eq!(projectile_contact(&empty, Vec2::new(25.0, 200.0), R), None);
    }

    #[test]
    fn test_guide_straight_up_ends_on_bubble() {
        let grid = grid_with(&[(0, 3)]);
        let origin = Vec2::new(140.0, 660.0);
        let points = trace_aim_guide(origin, FRAC_PI_2, R, 340.0, &grid);

        assert_eq!(points.len(), 2);
        let end = *points.last().unwrap();
        let center = GridCoord::new(0, 3).to_pixel(R);
        assert!((distance(end, center) - 2.0 * R).abs() < 1e-3);
    }

    #[test]
    fn test_guide_bounces_off_walls() {
        let grid = grid_with(&[]);
        let origin = Vec2::new(170.0, 660.0);
        // Shallow angle: several bounces before reaching the ceiling
        let points = trace_aim_guide(origin, 0.5, R, 340.0, &grid);

        assert!(points.len() > 2);
        assert!(points.len() <= GUIDE_MAX_BOUNCES + 1);
        for p in &points[1..points.len() - 1] {
            assert!(p.x == R || p.x == 340.0 - R, "bounce point off the wall: {p}");
        }
    }

    #[test]
    fn test_guide_stops_at_bounce_limit() {
        let grid = grid_with(&[]);
        let origin = Vec2::new(170.0, 660.0);
        // Nearly level: the ceiling is far beyond the bounce limit
        let points = trace_aim_guide(origin, 0.05, R, 340.0, &grid);

        assert_eq!(points.len(), 1 + GUIDE_MAX_BOUNCES);
        assert!(points[1..].iter().all(|p| p.x == R || p.x == 340.0 - R));
    }

    #[test]
    fn test_guide_checks_bubbles_at_bounce_point() {
        // Bubble hugging the left wall, touched on the same step as the bounce
        let grid = grid_with(&[(0, 0)]);
        let target = GridCoord::new(0, 0).to_pixel(R);
        let origin = Vec2::new(30.0, 60.0);
        let points = trace_aim_guide(origin, 3.0 * std::f32::consts::FRAC_PI_4, R, 340.0, &grid);

        assert_eq!(points.len(), 3, "origin, bounce point, contact: {points:?}");
        let end = points[2];
        assert!((distance(end, target) - 2.0 * R).abs() < 1e-3);
        // Contact is resolved from the wall, directly below the bubble
        assert!((end.x - R).abs() < 1e-3, "contact taken after the bounce: {end}");
    }
}
