use rtchart_core::{ChartArtifact, LatestValues};

/// Inputs accepted by the runtime thread between ticks.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeMessage {
    /// Resume (`true`) or freeze (`false`) chart updates. Sampling continues
    /// either way.
    SetRunning(bool),
    /// New render period in milliseconds, clamped and snapped on arrival.
    SetRenderPeriod(u32),
    /// New alarm threshold; triggers an immediate render.
    SetThreshold(f64),
    RequestRender,
    Shutdown,
}

/// Outputs published by the runtime thread.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Formatted latest values after a generation tick that appended data.
    Values(LatestValues),
    /// A freshly rendered chart.
    Artifact(ChartArtifact),
}
