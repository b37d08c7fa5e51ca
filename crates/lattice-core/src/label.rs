//! Label interning.
//!
//! Field and identifier names are converted to small integer [`Feature`]s so
//! that records can be compared and searched without string comparisons. A
//! [`LabelTable`] guarantees that identical names intern to identical
//! features within one compilation context.

use std::fmt;

use rustc_hash::FxHashMap;

const TAG_BITS: u32 = 2;
const TAG_MASK: u32 = (1 << TAG_BITS) - 1;

const TAG_STRING: u32 = 0;
const TAG_INDEX: u32 = 1;
const TAG_TEMPLATE: u32 = 2;
const TAG_COMPUTED: u32 = 3;

/// Largest payload that fits above the tag bits.
const MAX_ID: u32 = u32::MAX >> TAG_BITS;

/// Encode `id` under `tag`, or `None` if it does not fit.
fn encode(id: usize, tag: u32) -> Option<Feature> {
    let id = u32::try_from(id).ok().filter(|&id| id <= MAX_ID)?;
    Some(Feature((id << TAG_BITS) | tag))
}

/// An interned label.
///
/// The low two bits distinguish string labels, list indices and the two
/// synthetic selectors used in paths (`*` for templates, `?` for computed
/// labels).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Feature(u32);

impl Feature {
    /// Selector for a value reached through a record template.
    pub const TEMPLATE: Feature = Feature(TAG_TEMPLATE);

    /// Selector for a value reached through a computed (interpolated) label.
    pub const COMPUTED: Feature = Feature(TAG_COMPUTED);

    /// Highest list index a feature can encode.
    pub const MAX_INDEX: usize = MAX_ID as usize;

    /// Feature for the list element at `index`, or `None` past
    /// [`Feature::MAX_INDEX`].
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        encode(index, TAG_INDEX)
    }

    /// Whether this feature names a string label.
    #[inline]
    pub fn is_string(self) -> bool {
        self.0 & TAG_MASK == TAG_STRING
    }

    /// The list index, if this is a positional feature.
    #[inline]
    pub fn index(self) -> Option<u32> {
        (self.0 & TAG_MASK == TAG_INDEX).then_some(self.0 >> TAG_BITS)
    }

    /// Render this feature as one path element.
    pub fn selector_string(self, labels: &LabelTable) -> String {
        match self.0 & TAG_MASK {
            TAG_INDEX => (self.0 >> TAG_BITS).to_string(),
            TAG_TEMPLATE => "*".to_string(),
            TAG_COMPUTED => "?".to_string(),
            _ => {
                let name = labels.name(self).unwrap_or("_");
                if is_identifier(name) {
                    name.to_string()
                } else {
                    format!("{:?}", name)
                }
            }
        }
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 & TAG_MASK {
            TAG_INDEX => write!(f, "Feature[{}]", self.0 >> TAG_BITS),
            TAG_TEMPLATE => f.write_str("Feature(*)"),
            TAG_COMPUTED => f.write_str("Feature(?)"),
            _ => write!(f, "Feature(#{})", self.0 >> TAG_BITS),
        }
    }
}

/// Interns label names to features.
#[derive(Debug, Default, Clone)]
pub struct LabelTable {
    by_name: FxHashMap<Box<str>, u32>,
    names: Vec<Box<str>>,
}

impl LabelTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `name`, returning the same feature for the same name.
    ///
    /// # Panics
    ///
    /// Panics if more than 2^30 distinct names are interned in one table.
    pub fn label(&mut self, name: &str) -> Feature {
        if let Some(&id) = self.by_name.get(name) {
            return Feature((id << TAG_BITS) | TAG_STRING);
        }
        let Some(feature) = encode(self.names.len(), TAG_STRING) else {
            panic!("label table full: cannot intern more than {} names", MAX_ID as u64 + 1);
        };
        self.names.push(name.into());
        self.by_name.insert(name.into(), feature.0 >> TAG_BITS);
        feature
    }

    /// Look up a feature without interning.
    pub fn lookup(&self, name: &str) -> Option<Feature> {
        self.by_name
            .get(name)
            .map(|&id| Feature((id << TAG_BITS) | TAG_STRING))
    }

    /// The name of a string feature.
    pub fn name(&self, feature: Feature) -> Option<&str> {
        if !feature.is_string() {
            return None;
        }
        self.names
            .get((feature.0 >> TAG_BITS) as usize)
            .map(|n| &**n)
    }

    /// Number of interned names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no names have been interned yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Whether `name` can be written as a bare identifier label.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' || c == '#' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
