//! Triangle tessellation for the batch surface

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Segment count that keeps a circle of `radius` looking round
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 0.75) as u32).clamp(12, 64)
}

#[inline]
fn rim(center: Vec2, radius: f32, i: u32, segments: u32) -> Vec2 {
    let theta = i as f32 / segments as f32 * TAU;
    center + Vec2::new(theta.cos(), theta.sin()) * radius
}

/// Filled circle as a triangle fan unrolled into a list
pub fn circle(center: Vec2, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let segments = segments_for(radius);
    let mut vertices = Vec::with_capacity(segments as usize * 3);

    for i in 0..segments {
        let a = rim(center, radius, i, segments);
        let b = rim(center, radius, i + 1, segments);
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }

    vertices
}

/// Hollow circle of `width` centered on `radius`
pub fn ring(center: Vec2, radius: f32, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let inner = (radius - width / 2.0).max(0.0);
    let outer = radius + width / 2.0;
    let segments = segments_for(outer);
    let mut vertices = Vec::with_capacity(segments as usize * 6);

    for i in 0..segments {
        let in1 = rim(center, inner, i, segments);
        let out1 = rim(center, outer, i, segments);
        let in2 = rim(center, inner, i + 1, segments);
        let out2 = rim(center, outer, i + 1, segments);

        vertices.push(Vertex::new(in1.x, in1.y, color));
        vertices.push(Vertex::new(out1.x, out1.y, color));
        vertices.push(Vertex::new(in2.x, in2.y, color));

        vertices.push(Vertex::new(in2.x, in2.y, color));
        vertices.push(Vertex::new(out1.x, out1.y, color));
        vertices.push(Vertex::new(out2.x, out2.y, color));
    }

    vertices
}

/// Thick line segment as a quad; empty for zero-length segments
pub fn segment(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Split a polyline into the visible pieces of a dash pattern.
///
/// The pattern runs continuously across vertices, so a dash may turn a
/// corner and come back as two pieces.
pub fn dash_pieces(points: &[Vec2], dash: f32, gap: f32) -> Vec<(Vec2, Vec2)> {
    let period = dash + gap;
    if dash <= 0.0 || period <= 0.0 {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    // Distance into the current period
    let mut phase = 0.0;

    for pair in points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let length = start.distance(end);
        if length == 0.0 {
            continue;
        }
        let dir = (end - start) / length;
        let mut t = 0.0;

        while t < length {
            let (span, drawing) = if phase < dash {
                (dash - phase, true)
            } else {
                (period - phase, false)
            };
            let step = span.min(length - t);
            if drawing {
                pieces.push((start + dir * t, start + dir * (t + step)));
            }
            t += step;
            phase = (phase + step) % period;
        }
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertices_stay_on_disc() {
        let center = Vec2::new(50.0, 50.0);
        let verts = circle(center, 20.0, [1.0; 4]);
        assert_eq!(verts.len() % 3, 0);
        for v in &verts {
            let d = Vec2::from(v.position).distance(center);
            assert!(d <= 20.0 + 1e-3);
        }
    }

    #[test]
    fn test_segment_degenerate_is_empty() {
        assert!(segment(Vec2::ONE, Vec2::ONE, 2.0, [1.0; 4]).is_empty());
        assert_eq!(segment(Vec2::ZERO, Vec2::X * 10.0, 2.0, [1.0; 4]).len(), 6);
    }

    #[test]
    fn test_dash_pattern_carries_across_corners() {
        let points = [Vec2::ZERO, Vec2::new(15.0, 0.0), Vec2::new(15.0, 15.0)];
        let pieces = dash_pieces(&points, 10.0, 10.0);

        // 0..10 on the first leg, then 20..30 measured along the path lands
        // 5..15 down the second leg
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0], (Vec2::ZERO, Vec2::new(10.0, 0.0)));
        assert_eq!(pieces[1], (Vec2::new(15.0, 5.0), Vec2::new(15.0, 15.0)));
    }
}
