//! Error types for the layout engine

use thiserror::Error;

/// Errors that can occur during placement operations
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A drop was attempted with no enclosure on the canvas
    #[error("no enclosure exists; create an enclosure before placing components")]
    NoEnclosure,

    /// Reference to an unknown component id
    #[error("unknown component '{id}'")]
    UnknownComponent { id: String },

    /// Reference to an unknown enclosure id
    #[error("unknown enclosure '{id}'")]
    UnknownEnclosure { id: String },

    /// Drag operation issued for a component that is not being dragged
    #[error("component '{id}' has no active drag")]
    NoActiveDrag { id: String },
}

impl LayoutError {
    pub fn unknown_component(id: impl Into<String>) -> Self {
        Self::UnknownComponent { id: id.into() }
    }

    pub fn unknown_enclosure(id: impl Into<String>) -> Self {
        Self::UnknownEnclosure { id: id.into() }
    }

    pub fn no_active_drag(id: impl Into<String>) -> Self {
        Self::NoActiveDrag { id: id.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_enclosure_display() {
        let err = LayoutError::NoEnclosure;
        assert!(err.to_string().contains("no enclosure"));
    }

    #[test]
    fn test_unknown_component_display() {
        let err = LayoutError::unknown_component("comp-7");
        assert!(err.to_string().contains("comp-7"));
    }
}
