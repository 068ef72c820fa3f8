//! Debug line overlay sent alongside snapshots

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::snapshot::RenderSample;
use crate::consts::MAX_DEBUG_LINES;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverlayError {
    #[error("cannot render {count} lines, maximum is {max}")]
    TooManyLines { count: usize, max: usize },
    #[error("render lines must be a list")]
    NotAList,
    #[error("invalid line {index}: {reason}; expected {{start: [x,y,z], end: [x,y,z]}}")]
    MalformedLine { index: usize, reason: String },
}

/// A world-space debug segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebugLine {
    pub start: Vec3,
    pub end: Vec3,
}

/// Validate and decode the overlay lines of a render payload.
///
/// No lines (or no payload) is an empty overlay.
pub fn parse_lines(render: Option<&RenderSample>) -> Result<Vec<DebugLine>, OverlayError> {
    let Some(lines) = render.and_then(|r| r.lines.as_ref()) else {
        return Ok(Vec::new());
    };
    if lines.is_null() {
        return Ok(Vec::new());
    }
    let entries = lines.as_array().ok_or(OverlayError::NotAList)?;
    if entries.len() > MAX_DEBUG_LINES {
        return Err(OverlayError::TooManyLines {
            count: entries.len(),
            max: MAX_DEBUG_LINES,
        });
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            DebugLine::deserialize(entry).map_err(|e| OverlayError::MalformedLine {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}
