//! Lattice
//!
//! Front end of a constraint-based configuration language: the value graph,
//! its error algebra and the lowering of syntax trees into it.
//!
//! ## Crates
//!
//! - [`core`]: values, the graph arena, bottoms and error reporting
//! - [`syntax`]: the syntax tree consumed by the compiler
//! - [`compiler`]: the graph builder and its import seam
//!
//! [`Instance`] ties them together for the common case of lowering a set of
//! files into one package.

mod instance;

pub use instance::{BuildError, Instance};

pub use lattice_compiler as compiler;
pub use lattice_core as core;
pub use lattice_syntax as syntax;

pub use lattice_compiler::{BuildOptions, ImportResolver, NoImports, PackageTable};
pub use lattice_core::{Bottom, ErrorCode, ErrorList, ValueError};
