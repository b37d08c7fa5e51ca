//! The value graph.
//!
//! Every syntax construct lowers to exactly one [`Value`]. Records, lambdas
//! and imported packages are not stored inline; they live in a
//! [`Graph`](super::Graph) arena and values refer to them by [`ScopeId`], so
//! a reference can be handed out before the referenced node is filled in.

use ordered_float::OrderedFloat;

use crate::{Bottom, ErrorCode, Feature, Kind, Op, ScopeId, Span};

/// A node of the value graph together with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    /// Position of the syntax node this value was lowered from, if any.
    pub src: Option<Span>,
    /// What the value is.
    pub kind: ValueKind,
}

/// The closed set of value variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    /// Unconstrained (`_`).
    Top,
    /// A failure.
    Bottom(Box<Bottom>),
    /// A basic-type marker such as `string` or `int`.
    BasicType(Kind),

    // Literals
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// A number literal.
    Num(Num),
    /// A string literal.
    String(String),
    /// A bytes literal.
    Bytes(Vec<u8>),

    /// A relational constraint (`>=1`, `=~"x"`).
    Bound(Box<Bound>),
    /// A record, stored in the graph arena.
    Struct(ScopeId),
    /// A list literal.
    List(Box<ListLit>),
    /// An ordered set of alternatives.
    Disjunction(Box<Disjunction>),
    /// A parametrized value, stored in the graph arena.
    Lambda(ScopeId),
    /// A link to a graph node that may not be resolved yet.
    NodeRef(ScopeId),

    /// `x.feature`
    Selector(Box<Value>, Feature),
    /// `x[index]`
    Index(Box<Value>, Box<Value>),
    /// `x[lo:hi]`
    Slice(Box<SliceExpr>),
    /// `func(args...)`
    Call(Box<Value>, Vec<Value>),
    /// Unary operator node.
    Unary(Op, Box<Value>),
    /// Binary operator node.
    Binary(Op, Box<Value>, Box<Value>),
    /// String interpolation. Parts alternate literal text and expressions.
    Interpolation(Kind, Vec<Value>),
    /// A builtin function.
    Builtin(Builtin),

    // Comprehensions
    /// Emits one field or element per satisfying binding.
    Yield(Box<Yield>),
    /// Evaluates the inner node only if `condition` holds.
    Guard(Box<Value>, Box<Value>),
    /// Iterates `source`, calling the lambda with (key, value) per element.
    Feed(Box<Value>, ScopeId),
    /// A list comprehension wrapping a clause chain.
    ListComprehension(Box<Value>),
}

impl Value {
    /// Create a value at `src`.
    pub fn new(src: Option<Span>, kind: ValueKind) -> Self {
        Self { src, kind }
    }

    /// An unconstrained value with no position.
    pub fn top() -> Self {
        Self::new(None, ValueKind::Top)
    }

    /// The bottom this value is, if it is one.
    pub fn as_bottom(&self) -> Option<&Bottom> {
        match &self.kind {
            ValueKind::Bottom(b) => Some(b),
            _ => None,
        }
    }

    /// Mutable access to the bottom this value is, if it is one.
    pub fn as_bottom_mut(&mut self) -> Option<&mut Bottom> {
        match &mut self.kind {
            ValueKind::Bottom(b) => Some(b),
            _ => None,
        }
    }

    /// Whether this value is a failure.
    pub fn is_bottom(&self) -> bool {
        matches!(self.kind, ValueKind::Bottom(_))
    }

    /// Whether this value is an error originating from the user.
    pub fn is_literal_bottom(&self) -> bool {
        self.as_bottom()
            .is_some_and(|b| b.code == ErrorCode::UserError)
    }

    /// Build `x & y`, positioned at `x`.
    pub fn unify(x: Value, y: Value) -> Value {
        Value::new(None, ValueKind::Binary(Op::Unify, Box::new(x), Box::new(y)))
    }
}

impl From<Bottom> for Value {
    fn from(b: Bottom) -> Self {
        Value::new(b.src, ValueKind::Bottom(Box::new(b)))
    }
}

/// Reports whether `v` is an error or absent.
pub fn is_error(v: Option<&Value>) -> bool {
    v.is_none_or(Value::is_bottom)
}

/// A number literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Num {
    /// An integer. Source literals are never negative; a sign is a unary node.
    Int(u128),
    /// A floating point number.
    Float(OrderedFloat<f64>),
}

impl Num {
    /// The kind of this number.
    pub fn kind(&self) -> Kind {
        match self {
            Num::Int(_) => Kind::INT,
            Num::Float(_) => Kind::FLOAT,
        }
    }
}

/// A relational constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    /// The relation.
    pub op: Op,
    /// Kinds the constrained value may have.
    pub kind: Kind,
    /// The operand the value is compared to.
    pub value: Value,
}

/// `x[lo:hi]`
#[derive(Debug, Clone, PartialEq)]
pub struct SliceExpr {
    pub x: Value,
    pub lo: Option<Value>,
    pub hi: Option<Value>,
}

/// Builtin functions available without import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `len`
    Len,
    /// `and`
    And,
    /// `or`
    Or,
}

// ============================================================================
// Records and lists
// ============================================================================

/// A record: ordered arcs, pending comprehensions, at most one template and an
/// optional emit value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructLit {
    pub src: Option<Span>,
    /// Concrete fields in insertion order, unique by label.
    pub arcs: Vec<Arc>,
    /// Field comprehensions, evaluated later.
    pub comprehensions: Vec<FieldComprehension>,
    /// The template applied to every dynamically added field.
    pub template: Option<Value>,
    /// Top-level non-field output.
    pub emit: Option<Value>,
}

impl StructLit {
    /// An empty record at `src`.
    pub fn new(src: Option<Span>) -> Self {
        Self {
            src,
            ..Self::default()
        }
    }

    /// The arc for `feature`, if present.
    pub fn lookup(&self, feature: Feature) -> Option<&Arc> {
        self.arcs.iter().find(|a| a.feature == feature)
    }

    /// Insert a field. A second insertion of the same label unifies the two
    /// values instead of adding another arc.
    ///
    /// Returns an error message if the attributes of the two declarations
    /// conflict; the arc is left unchanged in that case.
    pub fn insert_value(
        &mut self,
        feature: Feature,
        optional: bool,
        value: Value,
        attrs: Attrs,
        doc: Option<DocComment>,
    ) -> Result<(), String> {
        if let Some(arc) = self.arcs.iter_mut().find(|a| a.feature == feature) {
            let attrs = arc.attrs.unify(&attrs)?;
            let prev = std::mem::replace(&mut arc.value, Value::top());
            arc.value = Value::unify(prev, value);
            arc.optional = arc.optional && optional;
            arc.attrs = attrs;
            arc.docs.extend(doc);
            return Ok(());
        }
        self.arcs.push(Arc {
            feature,
            value,
            optional,
            attrs,
            docs: doc.into_iter().collect(),
        });
        Ok(())
    }

    /// Merge `template` into the record's template with `&`.
    pub fn add_template(&mut self, template: Value) {
        self.template = Some(match self.template.take() {
            None => template,
            Some(prev) => Value::unify(prev, template),
        });
    }

    /// Merge `value` into the record's emit value with `&`.
    pub fn add_emit(&mut self, value: Value) {
        self.emit = Some(match self.emit.take() {
            None => value,
            Some(prev) => Value::unify(prev, value),
        });
    }
}

/// One resolved field of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub feature: Feature,
    pub value: Value,
    pub optional: bool,
    pub attrs: Attrs,
    /// Leading documentation, in declaration order.
    pub docs: Vec<DocComment>,
}

/// A documentation comment attached to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    pub src: Option<Span>,
    pub text: String,
}

/// One `@key(body)` annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attr {
    pub key: String,
    pub body: String,
}

/// A set of attributes, sorted by key with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs {
    attrs: Vec<Attr>,
}

impl Attrs {
    /// Build a set from attributes already checked for duplicate keys.
    pub fn from_sorted(attrs: Vec<Attr>) -> Self {
        debug_assert!(attrs.windows(2).all(|w| w[0].key < w[1].key));
        Self { attrs }
    }

    /// The body recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs
            .binary_search_by(|a| a.key.as_str().cmp(key))
            .ok()
            .map(|i| self.attrs[i].body.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attr> {
        self.attrs.iter()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Merge two attribute sets. The same key with different bodies is a
    /// conflict.
    pub fn unify(&self, other: &Attrs) -> Result<Attrs, String> {
        let mut merged = self.attrs.clone();
        for attr in &other.attrs {
            match merged.binary_search_by(|a| a.key.cmp(&attr.key)) {
                Ok(i) if merged[i].body != attr.body => {
                    return Err(format!(
                        "conflicting attributes for key {:?}: ({}) vs ({})",
                        attr.key, merged[i].body, attr.body
                    ));
                }
                Ok(_) => {}
                Err(i) => merged.insert(i, attr.clone()),
            }
        }
        Ok(Attrs { attrs: merged })
    }
}

/// A list literal, modelled as a record with positional arcs.
#[derive(Debug, Clone, PartialEq)]
pub struct ListLit {
    pub elems: StructLit,
    /// The exact length, or a `>=` bound for open lists.
    pub len: Value,
    /// Constraint on elements beyond the listed ones.
    pub typ: Value,
}

/// An ordered list of alternatives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Disjunction {
    pub values: Vec<DValue>,
    /// Whether any branch is default-marked.
    pub has_defaults: bool,
}

/// One branch of a disjunction.
#[derive(Debug, Clone, PartialEq)]
pub struct DValue {
    pub value: Value,
    pub is_default: bool,
}

// ============================================================================
// Lambdas and comprehensions
// ============================================================================

/// A parametrized value. Used for templates and `for` clause bodies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LambdaExpr {
    pub src: Option<Span>,
    pub params: Vec<Param>,
    /// The body; absent until lowering fills it in.
    pub value: Option<Value>,
}

impl LambdaExpr {
    /// Append a parameter.
    pub fn add(&mut self, feature: Feature, value: Value) {
        self.params.push(Param { feature, value });
    }
}

/// One lambda parameter with the constraint on its argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub feature: Feature,
    pub value: Value,
}

/// A pending field comprehension of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldComprehension {
    pub src: Option<Span>,
    /// The clause chain; the innermost node is a [`Yield`].
    pub clauses: Value,
    /// Whether the yielded value is a template lambda.
    pub is_template: bool,
}

/// The innermost node of a comprehension.
#[derive(Debug, Clone, PartialEq)]
pub struct Yield {
    /// The field label; absent for list comprehensions.
    pub key: Option<Value>,
    pub value: Value,
    pub optional: bool,
}
