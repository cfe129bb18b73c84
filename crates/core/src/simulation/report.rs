//! Per-frame statistics

use serde::Serialize;

/// Summary of one produced frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameReport {
    /// Index of the frame, starting at 0
    pub frame: u64,
    /// Julia parameter `[cx, cy]` the status grid was classified with
    pub julia: [f64; 2],
    /// Stencil steps taken for this frame
    pub substeps: u32,
    /// Mean square of the field over in-domain cells, before any rescaling
    pub variance: f64,
    /// Divisor the renderer applies to colour values
    pub display_scale: f64,
    /// Whether the field was divided by its standard deviation
    pub normalized: bool,
    /// Cells whose status changed when the Julia parameter moved
    pub reclassified_cells: usize,
    /// Number of traced field lines
    pub field_lines: usize,
    /// Wall time spent on the frame
    pub elapsed_ms: f64,
}
