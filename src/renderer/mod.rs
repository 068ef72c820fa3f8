//! Renderer-facing vertex data
//!
//! Turns a read-only [`Frame`](crate::sim::Frame) into line-list vertices.
//! Drawing itself (pipelines, camera, window) lives outside this crate.

pub mod lines;
pub mod vertex;

pub use lines::build_line_vertices;
pub use vertex::{LineVertex, colors};
