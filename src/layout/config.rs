//! Configuration for the layout engine

/// Configuration options for placement and violation checking
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Fallback size for components dropped without dimensions (width, height)
    pub default_component_size: (f64, f64),

    /// Size of a newly created enclosure (width, height)
    pub enclosure_size: (f64, f64),

    /// Canvas position of a newly created enclosure
    pub enclosure_origin: (f64, f64),

    /// Smallest size an enclosure may be resized to
    pub min_enclosure_size: (f64, f64),

    /// Inset from the enclosure's top-left edge when relocating a stray component
    pub relocation_inset: f64,

    /// Offset inside the first enclosure for forced drops
    pub forced_drop_offset: (f64, f64),

    /// Absolute distance within which edges/centers produce a snap guide
    pub snap_tolerance: f64,

    /// Whether violation checking starts enabled
    pub check_violations: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_component_size: (80.0, 80.0),
            enclosure_size: (300.0, 400.0),
            enclosure_origin: (100.0, 100.0),
            min_enclosure_size: (200.0, 200.0),
            relocation_inset: 10.0,
            forced_drop_offset: (20.0, 20.0),
            snap_tolerance: 5.0,
            check_violations: true,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback component size
    pub fn with_component_size(mut self, width: f64, height: f64) -> Self {
        self.default_component_size = (width, height);
        self
    }

    /// Set the size of newly created enclosures
    pub fn with_enclosure_size(mut self, width: f64, height: f64) -> Self {
        self.enclosure_size = (width, height);
        self
    }

    /// Set the snap guide tolerance
    pub fn with_snap_tolerance(mut self, tolerance: f64) -> Self {
        self.snap_tolerance = tolerance;
        self
    }

    /// Enable or disable violation checking at startup
    pub fn with_checking(mut self, enabled: bool) -> Self {
        self.check_violations = enabled;
        self
    }
}
