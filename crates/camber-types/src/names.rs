//! The closed canonical face-name vocabulary and edge-name composition.

/// Canonical face names with their axis-aligned reference normals, in
/// assignment order. Auto-naming walks this list and takes the first unused
/// slot whose reference normal agrees with the face normal.
pub const CANONICAL_FACES: [(&str, [f64; 3]); 6] = [
    ("right", [1.0, 0.0, 0.0]),
    ("left", [-1.0, 0.0, 0.0]),
    ("front", [0.0, 1.0, 0.0]),
    ("back", [0.0, -1.0, 0.0]),
    ("top", [0.0, 0.0, 1.0]),
    ("bottom", [0.0, 0.0, -1.0]),
];

/// The curved-face name used by cylinder auto-naming.
pub const SIDE_FACE: &str = "side";

/// Dot-product threshold for assigning a canonical slot.
pub const CANONICAL_DOT_THRESHOLD: f64 = 0.95;

/// Compose the canonical edge name for the boundary between two named faces.
/// Components are sorted so `edge_name("top", "front") == "front-top"`.
pub fn edge_name(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}-{}", a, b)
    } else {
        format!("{}-{}", b, a)
    }
}

/// Split a dotted sub-part selector into (part, feature).
pub fn split_dotted(name: &str) -> Option<(&str, &str)> {
    name.split_once('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_names_are_sorted() {
        assert_eq!(edge_name("top", "front"), "front-top");
        assert_eq!(edge_name("front", "top"), "front-top");
        assert_eq!(edge_name("back", "left"), "back-left");
    }

    #[test]
    fn dotted_names_split_once() {
        assert_eq!(split_dotted("lid.top"), Some(("lid", "top")));
        assert_eq!(split_dotted("plain"), None);
    }
}
