//! Names and qualified names
//!
//! Names are immutable and cheap to clone (`Arc<str>` backed), since the same
//! identifiers are used as cache keys throughout the descriptor graph.

use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// A single identifier
///
/// Special names are wrapped in angle brackets (`<root>`, `<main>`) and can
/// never collide with identifiers written in source code.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "String")]
pub struct Name(Arc<str>);

impl Name {
    /// An ordinary identifier
    pub fn identifier(text: impl AsRef<str>) -> Self {
        let text = text.as_ref();
        debug_assert!(!text.contains('.'), "identifier must not be qualified: {text}");
        Name(Arc::from(text))
    }

    /// A special name; `text` must already carry its angle brackets
    pub fn special(text: impl AsRef<str>) -> Self {
        let text = text.as_ref();
        debug_assert!(
            text.starts_with('<') && text.ends_with('>'),
            "special name must be bracketed: {text}"
        );
        Name(Arc::from(text))
    }

    pub fn is_special(&self) -> bool {
        self.0.starts_with('<')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Name(Arc::from(text))
    }
}

impl From<String> for Name {
    fn from(text: String) -> Self {
        Name(Arc::from(text))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

lazy_static::lazy_static! {
    static ref ROOT_NAME: Name = Name::special("<root>");
}

/// A dotted, fully qualified name such as `a.b.C`
///
/// The root package has no segments.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "String")]
pub struct FqName {
    segments: Arc<[Name]>,
}

impl FqName {
    pub fn root() -> Self {
        FqName {
            segments: Arc::from(Vec::new()),
        }
    }

    /// Parse a dotted name; the empty string is the root
    pub fn new(dotted: &str) -> Self {
        if dotted.is_empty() {
            return FqName::root();
        }
        FqName::from_segments(dotted.split('.').map(Name::from))
    }

    pub fn from_segments(segments: impl IntoIterator<Item = Name>) -> Self {
        FqName {
            segments: segments.into_iter().collect(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The enclosing name, or `None` for the root
    pub fn parent(&self) -> Option<FqName> {
        match self.segments.split_last() {
            Some((_, init)) => Some(FqName {
                segments: Arc::from(init),
            }),
            None => None,
        }
    }

    pub fn child(&self, name: &Name) -> FqName {
        let mut segments = self.segments.to_vec();
        segments.push(name.clone());
        FqName {
            segments: segments.into(),
        }
    }

    /// The last segment, or `None` for the root
    pub fn short_name(&self) -> Option<&Name> {
        self.segments.last()
    }

    /// The last segment, with the root named `<root>`
    pub fn short_name_or_special(&self) -> Name {
        self.short_name().cloned().unwrap_or_else(|| ROOT_NAME.clone())
    }

    pub fn path_segments(&self) -> &[Name] {
        &self.segments
    }

    /// Whether `prefix` is this name or one of its ancestors
    pub fn starts_with(&self, prefix: &FqName) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    pub fn is_direct_child_of(&self, parent: &FqName) -> bool {
        self.segments.len() == parent.segments.len() + 1 && self.starts_with(parent)
    }

    /// The dotted form; empty for the root
    pub fn as_dotted(&self) -> String {
        self.segments
            .iter()
            .map(Name::as_str)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl From<&str> for FqName {
    fn from(dotted: &str) -> Self {
        FqName::new(dotted)
    }
}

impl From<String> for FqName {
    fn from(dotted: String) -> Self {
        FqName::new(&dotted)
    }
}

impl fmt::Display for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.as_dotted())
        }
    }
}

impl fmt::Debug for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FqName({self})")
    }
}

/// An import directive: a single declaration (`a.b.C`) or everything under a
/// package (`a.b.*`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub struct ImportPath {
    fq_name: FqName,
    all_under: bool,
}

impl ImportPath {
    pub fn new(fq_name: FqName, all_under: bool) -> Self {
        Self { fq_name, all_under }
    }

    pub fn fq_name(&self) -> &FqName {
        &self.fq_name
    }

    pub fn is_all_under(&self) -> bool {
        self.all_under
    }

    /// Name under which a single import is visible; `None` for `*` imports
    pub fn imported_name(&self) -> Option<&Name> {
        if self.all_under {
            None
        } else {
            self.fq_name.short_name()
        }
    }
}

impl From<&str> for ImportPath {
    fn from(text: &str) -> Self {
        match text.strip_suffix(".*") {
            Some(package) => ImportPath::new(FqName::new(package), true),
            None if text == "*" => ImportPath::new(FqName::root(), true),
            None => ImportPath::new(FqName::new(text), false),
        }
    }
}

impl From<String> for ImportPath {
    fn from(text: String) -> Self {
        ImportPath::from(text.as_str())
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.all_under, self.fq_name.is_root()) {
            (true, true) => f.write_str("*"),
            (true, false) => write!(f, "{}.*", self.fq_name),
            (false, _) => write!(f, "{}", self.fq_name),
        }
    }
}
