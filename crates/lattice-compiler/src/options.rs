//! Build configuration.

/// Options for one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Skip optional fields with concrete labels instead of inserting them.
    pub drop_optional: bool,

    /// Let an unbound identifier inside a selector chain name a builtin
    /// package without importing it (`strings.ToUpper`).
    pub allow_shorthand_packages: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            drop_optional: false,
            allow_shorthand_packages: true,
        }
    }
}
