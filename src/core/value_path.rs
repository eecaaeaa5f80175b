use std::fmt;

/// One step from a node to a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Structural address of a node within a parsed tree.
///
/// Segments stay structured so a key containing `.` or `[` can never collide
/// with a nested path. The display form writes the root as `root`, object
/// keys as `.key` (bracket-quoted when the key is not a plain identifier)
/// and list indexes as `[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ValuePath {
    segments: Vec<PathSegment>,
}

impl ValuePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[PathSegment] {
        self.segments.as_slice()
    }

    pub fn child_key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    pub fn child_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) if is_identifier(key) => write!(f, ".{key}")?,
                PathSegment::Key(key) => {
                    let escaped = key.replace('\\', "\\\\").replace('"', "\\\"");
                    write!(f, "[\"{escaped}\"]")?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

fn is_identifier(input: &str) -> bool {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::ValuePath;

    #[test]
    fn display_walks_keys_and_indexes() {
        let path = ValuePath::root()
            .child_key("users")
            .child_index(0)
            .child_key("name");
        assert_eq!(path.to_string(), "root.users[0].name");
    }

    #[test]
    fn root_displays_as_bare_token() {
        assert_eq!(ValuePath::root().to_string(), "root");
    }

    #[test]
    fn non_identifier_keys_are_bracket_quoted() {
        let dotted = ValuePath::root().child_key("a.b");
        assert_eq!(dotted.to_string(), "root[\"a.b\"]");

        let spaced = ValuePath::root().child_key("two words");
        assert_eq!(spaced.to_string(), "root[\"two words\"]");
    }

    #[test]
    fn dotted_key_stays_distinct_from_nested_path() {
        let flat = ValuePath::root().child_key("a.b");
        let nested = ValuePath::root().child_key("a").child_key("b");
        assert_ne!(flat, nested);
    }

    #[test]
    fn identical_traversals_produce_identical_paths() {
        let first = ValuePath::root().child_key("rows").child_index(3);
        let second = ValuePath::root().child_key("rows").child_index(3);
        assert_eq!(first, second);

        let mut seen = HashMap::new();
        seen.insert(first, true);
        assert_eq!(seen.get(&ValuePath::root().child_key("rows").child_index(3)), Some(&true));
    }

    #[test]
    fn parent_pops_one_segment() {
        let path = ValuePath::root().child_key("rows").child_index(3);
        let parent = path.parent().expect("has a parent");
        assert_eq!(parent.to_string(), "root.rows");
        assert_eq!(ValuePath::root().parent(), None);
    }
}
