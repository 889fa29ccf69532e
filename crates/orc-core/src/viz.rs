//! Helpers for the graph-description payload returned by `visualize`.
//!
//! The payload is opaque except for its header: the service emits
//! `digraph circuit {` graphs, and the layout direction can be flipped by
//! adding or removing a `rankdir=LR;` line right after that header.

const HEADER: &str = "digraph circuit {\n";
const HEADER_LEFT_TO_RIGHT: &str = "digraph circuit {\n\trankdir=LR;\n";

/// Toggles between top-to-bottom and left-to-right layout.
///
/// Returns `None` when there is nothing to rotate (empty payload).
pub fn rotate(payload: &str) -> Option<String> {
    if payload.is_empty() {
        return None;
    }

    if payload.starts_with(HEADER_LEFT_TO_RIGHT) {
        Some(payload.replacen(HEADER_LEFT_TO_RIGHT, HEADER, 1))
    } else {
        Some(payload.replacen(HEADER, HEADER_LEFT_TO_RIGHT, 1))
    }
}

/// Whether the payload is currently laid out left-to-right.
pub fn is_left_to_right(payload: &str) -> bool {
    payload.starts_with(HEADER_LEFT_TO_RIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAPH: &str = "digraph circuit {\n\ta -> b;\n}\n";

    #[test]
    fn test_rotate_adds_rankdir() {
        let rotated = rotate(GRAPH).unwrap();
        assert_eq!(rotated, "digraph circuit {\n\trankdir=LR;\n\ta -> b;\n}\n");
        assert!(is_left_to_right(&rotated));
    }

    #[test]
    fn test_rotate_twice_restores_original() {
        let rotated = rotate(GRAPH).unwrap();
        assert_eq!(rotate(&rotated).unwrap(), GRAPH);
    }

    #[test]
    fn test_rotate_empty_is_noop() {
        assert_eq!(rotate(""), None);
    }

    #[test]
    fn test_rotate_unknown_header_is_unchanged() {
        let other = "graph g {\n}\n";
        assert_eq!(rotate(other).unwrap(), other);
    }
}
