//! Network error types.

use thiserror::Error;

use crate::network::VertexIndex;

/// Errors that can occur during network operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// No edge connects the two vertices
    #[error("no edge between vertices {a} and {b}")]
    EdgeNotFound { a: usize, b: usize },

    /// Vertex handle does not refer to a live vertex
    #[error("vertex {index} is not part of the network")]
    VertexNotFound { index: usize },
}

impl NetworkError {
    /// Create an EdgeNotFound error from two vertex handles.
    pub fn edge_not_found(a: VertexIndex, b: VertexIndex) -> Self {
        Self::EdgeNotFound {
            a: a.index(),
            b: b.index(),
        }
    }

    /// Create a VertexNotFound error from a vertex handle.
    pub fn vertex_not_found(v: VertexIndex) -> Self {
        Self::VertexNotFound { index: v.index() }
    }
}

/// Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;

    #[test]
    fn test_error_display() {
        let mut network = Network::new();
        let a = network.add_vertex(0);
        let b = network.add_vertex(1);

        let err = NetworkError::edge_not_found(a, b);
        assert!(err.to_string().contains("no edge"));

        let err = NetworkError::vertex_not_found(b);
        assert!(err.to_string().contains("not part of the network"));
    }
}
