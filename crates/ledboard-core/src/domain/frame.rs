//! The flattened pixel payload sent to the display controller.

use std::slice::ChunksExact;

/// One complete, linear sequence of colour tuples.
///
/// For a board this is panel-traversal order, then row-major inside each
/// panel; for a plain surface it is row-major.  Components are stored flat,
/// `arity` consecutive values per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    arity: usize,
    components: Vec<u16>,
}

impl Frame {
    /// Builds a frame from flat components.
    ///
    /// Returns `None` if `arity` is zero or `components` is not a whole
    /// number of tuples.
    pub fn from_components(arity: usize, components: Vec<u16>) -> Option<Self> {
        if arity == 0 || components.len() % arity != 0 {
            return None;
        }
        Some(Self::from_parts(arity, components))
    }

    /// Builds a frame whose shape is already known to be valid.
    pub(crate) fn from_parts(arity: usize, components: Vec<u16>) -> Self {
        debug_assert!(arity > 0 && components.len() % arity == 0);
        Self { arity, components }
    }

    /// Empty frame with room for `pixels` tuples.
    pub(crate) fn with_capacity(arity: usize, pixels: usize) -> Self {
        Self::from_parts(arity, Vec::with_capacity(pixels * arity))
    }

    /// Appends whole tuples given as flat components.
    pub(crate) fn extend_from_components(&mut self, components: &[u16]) {
        debug_assert!(components.len() % self.arity == 0);
        self.components.extend_from_slice(components);
    }

    /// Components per pixel.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Number of pixel tuples.
    pub fn len(&self) -> usize {
        self.components.len() / self.arity
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// All components, flat.
    pub fn components(&self) -> &[u16] {
        &self.components
    }

    /// Iterates the pixel tuples in order.
    pub fn tuples(&self) -> ChunksExact<'_, u16> {
        self.components.chunks_exact(self.arity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_components_rejects_partial_tuples() {
        assert!(Frame::from_components(3, vec![1, 2, 3, 4]).is_none());
        assert!(Frame::from_components(0, vec![]).is_none());
    }

    #[test]
    fn test_len_counts_tuples_not_components() {
        let frame = Frame::from_components(3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.tuples().nth(1).unwrap(), &[4, 5, 6]);
    }
}
