//! Line-list geometry for a frame
//!
//! Every primitive is emitted as vertex pairs (one segment per pair).

use std::f32::consts::PI;

use glam::Vec3;

use super::vertex::{LineVertex, colors};
use crate::sim::{BodyFrame, CarFrame, DebugLine, Frame, PadFrame, Team};

/// Length of drawn car orientation axes (uu)
pub const AXIS_LENGTH: f32 = 120.0;
/// Ball outline radius (uu)
pub const BALL_RADIUS: f32 = 91.25;
/// Segments in the ball outline
pub const BALL_SEGMENTS: u32 = 24;
pub const BIG_PAD_HEIGHT: f32 = 150.0;
pub const SMALL_PAD_HEIGHT: f32 = 60.0;

/// A single segment
pub fn segment(start: Vec3, end: Vec3, color: [f32; 4]) -> [LineVertex; 2] {
    [LineVertex::at(start, color), LineVertex::at(end, color)]
}

/// Forward, right and up axes of a body
pub fn axes(body: &BodyFrame, length: f32) -> Vec<LineVertex> {
    let mut vertices = Vec::with_capacity(6);
    for (dir, color) in [
        (body.forward, colors::AXIS_FORWARD),
        (body.right, colors::AXIS_RIGHT),
        (body.up, colors::AXIS_UP),
    ] {
        vertices.extend(segment(body.pos, body.pos + dir * length, color));
    }
    vertices
}

/// Outline circle in the body's forward/right plane
pub fn ring(body: &BodyFrame, radius: f32, color: [f32; 4], segments: u32) -> Vec<LineVertex> {
    let mut vertices = Vec::with_capacity((segments * 2) as usize);
    let point = |i: u32| {
        let theta = (i as f32 / segments as f32) * 2.0 * PI;
        body.pos + (body.forward * theta.cos() + body.right * theta.sin()) * radius
    };

    for i in 0..segments {
        vertices.extend(segment(point(i), point(i + 1), color));
    }

    vertices
}

fn car_lines(car: &CarFrame) -> Vec<LineVertex> {
    if car.is_demoed {
        let top = car.body.pos + Vec3::Z * AXIS_LENGTH;
        return segment(car.body.pos, top, colors::DEMOED).to_vec();
    }

    let team_color = match car.team {
        Team::Blue => colors::BLUE_TEAM,
        Team::Orange => colors::ORANGE_TEAM,
    };
    let mut vertices = axes(&car.body, AXIS_LENGTH);
    // Velocity tail in team color
    vertices.extend(segment(car.body.pos, car.body.pos - car.body.vel * 0.1, team_color));
    vertices
}

fn pad_marker(pad: &PadFrame) -> [LineVertex; 2] {
    let height = if pad.big { BIG_PAD_HEIGHT } else { SMALL_PAD_HEIGHT };
    let color = if pad.active {
        colors::PAD_ACTIVE
    } else {
        colors::PAD_INACTIVE
    };
    segment(pad.position, pad.position + Vec3::Z * height, color)
}

fn debug_line(line: &DebugLine) -> [LineVertex; 2] {
    segment(line.start, line.end, colors::DEBUG_LINE)
}

/// Build the full line list for a frame: pads, ball, cars, then debug lines
pub fn build_line_vertices(frame: &Frame) -> Vec<LineVertex> {
    let mut vertices = Vec::with_capacity(
        frame.pads.len() * 2
            + (BALL_SEGMENTS * 2) as usize
            + frame.cars.len() * 8
            + frame.debug_lines.len() * 2,
    );

    for pad in &frame.pads {
        vertices.extend(pad_marker(pad));
    }
    vertices.extend(ring(&frame.ball, BALL_RADIUS, colors::BALL, BALL_SEGMENTS));
    for car in &frame.cars {
        vertices.extend(car_lines(car));
    }
    for line in &frame.debug_lines {
        vertices.extend(debug_line(line));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Snapshot, WorldState};
    use serde_json::json;

    fn car(id: i64, team: u8, demoed: bool) -> serde_json::Value {
        json!({
            "car_id": id,
            "team_num": team,
            "phys": {
                "pos": [0, 0, 17], "vel": [1000, 0, 0], "ang_vel": [0, 0, 0],
                "forward": [1, 0, 0], "up": [0, 0, 1]
            },
            "boost_amount": 33.0,
            "on_ground": true,
            "is_demoed": demoed
        })
    }

    fn frame_for(snapshot: serde_json::Value) -> Frame {
        let mut world = WorldState::new();
        world.merge(&Snapshot::from_value(snapshot).unwrap()).unwrap();
        world.frame(1.0)
    }

    #[test]
    fn test_empty_world_draws_pads_and_ball() {
        let verts = build_line_vertices(&WorldState::new().frame(1.0));
        assert_eq!(verts.len(), 34 * 2 + (BALL_SEGMENTS * 2) as usize);
    }

    #[test]
    fn test_vertex_counts() {
        let frame = frame_for(json!({
            "ball_phys": { "pos": [0, 0, 93], "vel": [0, 0, 0], "ang_vel": [0, 0, 0] },
            "cars": [car(1, 0, false), car(2, 1, true)],
            "gamemode": "soccar",
            "render": { "lines": [
                { "start": [0, 0, 0], "end": [0, 0, 500] },
                { "start": [10, 0, 0], "end": [10, 0, 500] }
            ]}
        }));
        let verts = build_line_vertices(&frame);
        let expected = 34 * 2 + (BALL_SEGMENTS * 2) as usize + 8 + 2 + 2 * 2;
        assert_eq!(verts.len(), expected);
        assert_eq!(verts.len() % 2, 0);

        // Debug lines come last
        let last = verts[verts.len() - 1];
        assert_eq!(last.position(), Vec3::new(10.0, 0.0, 500.0));
        assert_eq!(last.color, colors::DEBUG_LINE);
    }

    #[test]
    fn test_car_axes_follow_orientation() {
        let frame = frame_for(json!({
            "ball_phys": { "pos": [0, 0, 93], "vel": [0, 0, 0], "ang_vel": [0, 0, 0] },
            "cars": [car(1, 0, false)],
        }));
        let verts = car_lines(&frame.cars[0]);
        assert_eq!(verts.len(), 8);
        assert!((verts[1].position() - Vec3::new(AXIS_LENGTH, 0.0, 17.0)).length() < 1e-3);
        assert!((verts[3].position() - Vec3::new(0.0, AXIS_LENGTH, 17.0)).length() < 1e-3);
        assert!((verts[5].position() - Vec3::new(0.0, 0.0, 17.0 + AXIS_LENGTH)).length() < 1e-3);
        assert_eq!(verts[7].color, colors::BLUE_TEAM);
    }

    #[test]
    fn test_pad_markers() {
        let pad = |active, big| PadFrame {
            position: Vec3::new(0.0, 0.0, 70.0),
            active,
            big,
            index: None,
        };
        let big_active = pad_marker(&pad(true, true));
        assert_eq!(big_active[1].position().z, 70.0 + BIG_PAD_HEIGHT);
        assert_eq!(big_active[0].color, colors::PAD_ACTIVE);

        let small_inactive = pad_marker(&pad(false, false));
        assert_eq!(small_inactive[1].position().z, 70.0 + SMALL_PAD_HEIGHT);
        assert_eq!(small_inactive[0].color, colors::PAD_INACTIVE);
    }

    #[test]
    fn test_ring_is_closed() {
        let body = WorldState::new().frame(1.0).ball;
        let verts = ring(&body, 10.0, colors::BALL, 8);
        assert_eq!(verts.len(), 16);
        assert!((verts[0].position() - verts[15].position()).length() < 1e-4);
    }
}
