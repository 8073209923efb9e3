//! ShEx schema model types.
//!
//! This module defines the in-memory tree the serializer consumes:
//! - [`ShapesSchema`] - Prefixes, base, start semantic actions, start expression and labeled shapes
//! - [`ShapeExpression`] - Shape expressions (AND, OR, NOT, references, shapes and node constraints)
//! - [`TripleExpression`] - Triple expressions (EachOf, SomeOf, triple constraints and inclusions)
//! - [`NodeConstraint`] - Constraints on node kind, datatype, value set and facets
//! - [`Cardinality`] - Min/max occurrences for triple expressions

use crate::error::{ErrorHandler, SchemaError};
use crate::shexj;
use oxrdf::{BlankNode, Literal, NamedNode};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a shape or of a triple expression (shape label in ShEx terminology).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeLabel {
    /// Named shape (IRI).
    Iri(NamedNode),
    /// Anonymous shape (blank node).
    BNode(BlankNode),
}

impl From<NamedNode> for ShapeLabel {
    fn from(n: NamedNode) -> Self {
        Self::Iri(n)
    }
}

impl From<BlankNode> for ShapeLabel {
    fn from(b: BlankNode) -> Self {
        Self::BNode(b)
    }
}

impl fmt::Display for ShapeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(n) => write!(f, "<{}>", n.as_str()),
            Self::BNode(b) => write!(f, "_:{}", b.as_str()),
        }
    }
}

/// Main shape expression type.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeExpression {
    /// Conjunction of shape expressions (AND).
    ShapeAnd(Vec<ShapeExpression>),

    /// Disjunction of shape expressions (OR).
    ShapeOr(Vec<ShapeExpression>),

    /// Negation of a shape expression (NOT).
    ShapeNot(Box<ShapeExpression>),

    /// Reference to another shape by label.
    ShapeRef(ShapeLabel),

    /// Shape defined outside of the schema.
    ShapeExternal,

    /// Shape with a triple expression.
    Shape(Shape),

    /// Node constraint on the focus node itself.
    NodeConstraint(NodeConstraint),
}

impl ShapeExpression {
    /// Builds a reference to the shape with the given label.
    pub fn reference(label: impl Into<ShapeLabel>) -> Self {
        Self::ShapeRef(label.into())
    }

    /// Builds a negation of the given expression.
    pub fn negation(expr: impl Into<Self>) -> Self {
        Self::ShapeNot(Box::new(expr.into()))
    }
}

impl From<Shape> for ShapeExpression {
    fn from(shape: Shape) -> Self {
        Self::Shape(shape)
    }
}

impl From<NodeConstraint> for ShapeExpression {
    fn from(constraint: NodeConstraint) -> Self {
        Self::NodeConstraint(constraint)
    }
}

/// Shape with a triple expression.
///
/// Matches the neighbourhood of the focus node against its triple expression.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    /// Whether this is a closed shape (no other properties allowed).
    pub closed: bool,

    /// Properties allowed to have values not matching the triple expression.
    pub extra: Vec<NamedNode>,

    /// The triple expression of the shape.
    pub expression: Option<TripleExpression>,

    /// Semantic actions attached to the shape.
    pub sem_acts: Vec<SemAct>,

    /// The shape also carries `values`, `length`, `minlength`, `maxlength` or `pattern`.
    ///
    /// Such a shape never gets an empty `{ }` block.
    pub has_node_constraint_keys: bool,
}

impl Shape {
    /// Creates a new empty shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new shape with the given triple expression.
    pub fn with_expression(expression: impl Into<TripleExpression>) -> Self {
        Self {
            expression: Some(expression.into()),
            ..Self::default()
        }
    }

    /// Marks this shape as closed.
    #[must_use]
    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    /// Adds an extra property.
    #[must_use]
    pub fn with_extra(mut self, predicate: NamedNode) -> Self {
        self.extra.push(predicate);
        self
    }

    /// Adds a semantic action.
    #[must_use]
    pub fn with_sem_act(mut self, sem_act: SemAct) -> Self {
        self.sem_acts.push(sem_act);
        self
    }
}

/// Triple expression type.
#[derive(Debug, Clone, PartialEq)]
pub enum TripleExpression {
    /// All the nested expressions must match (`;`).
    EachOf(TripleExpressionGroup),

    /// One of the nested expressions must match (`|`).
    SomeOf(TripleExpressionGroup),

    /// Constraint on the triples with a given predicate.
    TripleConstraint(TripleConstraint),

    /// Inclusion of the triple expression with the given label.
    Inclusion(ShapeLabel),
}

impl TripleExpression {
    /// Builds an `EachOf` group without cardinality.
    pub fn each_of(expressions: impl IntoIterator<Item = TripleExpression>) -> Self {
        Self::EachOf(TripleExpressionGroup::new(expressions))
    }

    /// Builds a `SomeOf` group without cardinality.
    pub fn some_of(expressions: impl IntoIterator<Item = TripleExpression>) -> Self {
        Self::SomeOf(TripleExpressionGroup::new(expressions))
    }
}

impl From<TripleConstraint> for TripleExpression {
    fn from(constraint: TripleConstraint) -> Self {
        Self::TripleConstraint(constraint)
    }
}

/// Nested triple expressions of an `EachOf` or a `SomeOf`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TripleExpressionGroup {
    /// The nested expressions, in order.
    pub expressions: Vec<TripleExpression>,

    /// Cardinality of the whole group.
    pub cardinality: Cardinality,

    /// Annotations of the group.
    pub annotations: Vec<Annotation>,

    /// Semantic actions of the group.
    pub sem_acts: Vec<SemAct>,
}

impl TripleExpressionGroup {
    /// Creates a group from its nested expressions.
    pub fn new(expressions: impl IntoIterator<Item = TripleExpression>) -> Self {
        Self {
            expressions: expressions.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Sets the cardinality of this group.
    #[must_use]
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Returns true if the group carries a cardinality, annotations or semantic actions.
    pub fn is_decorated(&self) -> bool {
        !self.cardinality.is_unset() || !self.annotations.is_empty() || !self.sem_acts.is_empty()
    }
}

/// Constraint on a triple pattern.
///
/// Specifies a predicate and optional value expression that values must match,
/// along with cardinality constraints (min/max occurrences).
#[derive(Debug, Clone, PartialEq)]
pub struct TripleConstraint {
    /// Predicate IRI for this constraint.
    pub predicate: NamedNode,

    /// Whether this constraint is inverse (focus node is object).
    pub inverse: bool,

    /// Whether this constraint is negated.
    pub negated: bool,

    /// Optional shape expression that values must satisfy.
    pub value_expr: Option<Box<ShapeExpression>>,

    /// Cardinality constraint (min/max occurrences).
    pub cardinality: Cardinality,

    /// Annotations for this constraint.
    pub annotations: Vec<Annotation>,

    /// Semantic actions for this constraint.
    pub sem_acts: Vec<SemAct>,
}

impl TripleConstraint {
    /// Creates a new triple constraint with the given predicate.
    pub fn new(predicate: NamedNode) -> Self {
        Self {
            predicate,
            inverse: false,
            negated: false,
            value_expr: None,
            cardinality: Cardinality::default(),
            annotations: Vec::new(),
            sem_acts: Vec::new(),
        }
    }

    /// Creates a new triple constraint with predicate and value expression.
    pub fn with_value_expr(predicate: NamedNode, value_expr: impl Into<ShapeExpression>) -> Self {
        Self {
            value_expr: Some(Box::new(value_expr.into())),
            ..Self::new(predicate)
        }
    }

    /// Sets the cardinality for this constraint.
    #[must_use]
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Sets whether this constraint is inverse.
    #[must_use]
    pub fn with_inverse(mut self, inverse: bool) -> Self {
        self.inverse = inverse;
        self
    }

    /// Sets whether this constraint is negated.
    #[must_use]
    pub fn with_negated(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Adds a semantic action.
    #[must_use]
    pub fn with_sem_act(mut self, sem_act: SemAct) -> Self {
        self.sem_acts.push(sem_act);
        self
    }
}

/// Upper bound of a [`Cardinality`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaxCardinality {
    /// At most this number of occurrences.
    Bounded(u32),
    /// No upper bound (`*`).
    Unbounded,
}

/// Cardinality constraint (min/max occurrences).
///
/// Both bounds may be absent, in which case nothing is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cardinality {
    /// Minimum number of occurrences.
    pub min: Option<u32>,

    /// Maximum number of occurrences.
    pub max: Option<MaxCardinality>,
}

impl Cardinality {
    /// Creates a cardinality constraint with both bounds set.
    pub fn new(min: u32, max: MaxCardinality) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Creates a cardinality constraint for exactly n occurrences.
    pub fn exactly(n: u32) -> Self {
        Self::new(n, MaxCardinality::Bounded(n))
    }

    /// Creates a cardinality constraint for 0 or 1 occurrence (`?`).
    pub fn optional() -> Self {
        Self::new(0, MaxCardinality::Bounded(1))
    }

    /// Creates a cardinality constraint for 0 or more occurrences (`*`).
    pub fn zero_or_more() -> Self {
        Self::new(0, MaxCardinality::Unbounded)
    }

    /// Creates a cardinality constraint for 1 or more occurrences (`+`).
    pub fn one_or_more() -> Self {
        Self::new(1, MaxCardinality::Unbounded)
    }

    /// Returns true if neither bound is set.
    pub fn is_unset(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (None, None) => Ok(()),
            (Some(0), Some(MaxCardinality::Bounded(1))) => f.write_str("?"),
            (Some(0), Some(MaxCardinality::Unbounded)) => f.write_str("*"),
            (Some(1), Some(MaxCardinality::Unbounded)) => f.write_str("+"),
            (Some(min), None) => write!(f, "{{{min}}}"),
            (Some(min), Some(MaxCardinality::Bounded(max))) => write!(f, "{{{min},{max}}}"),
            (Some(min), Some(MaxCardinality::Unbounded)) => write!(f, "{{{min},*}}"),
            // An absent min defaults to 1, as in ShExJ, but never above the max
            (None, Some(MaxCardinality::Bounded(max))) => write!(f, "{{{},{max}}}", max.min(1)),
            (None, Some(MaxCardinality::Unbounded)) => f.write_str("+"),
        }
    }
}

/// Node constraint - constrains the focus node itself.
///
/// Can constrain node kind, datatype, string facets (length, pattern),
/// numeric facets and value sets.
/// `datatype` and `values` are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeConstraint {
    /// Required node kind.
    pub node_kind: Option<NodeKind>,

    /// Required datatype for literals.
    pub datatype: Option<NamedNode>,

    /// Value set constraint.
    pub values: Option<Vec<ValueSetValue>>,

    /// Regular expression the lexical form must match.
    pub pattern: Option<String>,

    /// String and numeric facets.
    pub facets: Facets,
}

impl NodeConstraint {
    /// Creates a new empty node constraint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a node constraint with the given node kind.
    pub fn with_node_kind(node_kind: NodeKind) -> Self {
        Self {
            node_kind: Some(node_kind),
            ..Self::default()
        }
    }

    /// Creates a node constraint with the given datatype.
    pub fn with_datatype(datatype: NamedNode) -> Self {
        Self {
            datatype: Some(datatype),
            ..Self::default()
        }
    }

    /// Creates a node constraint with the given value set.
    pub fn with_values(values: impl IntoIterator<Item = ValueSetValue>) -> Self {
        Self {
            values: Some(values.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Sets the pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

/// Node kind constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// IRI node.
    Iri,
    /// Blank node.
    BNode,
    /// Literal value.
    Literal,
    /// Non-literal (IRI or blank node).
    NonLiteral,
}

impl NodeKind {
    /// Parses the ShExJ name of a node kind (`iri`, `bnode`, `literal` or `nonliteral`).
    pub fn from_shexj_name(name: &str) -> Option<Self> {
        match name {
            "iri" => Some(Self::Iri),
            "bnode" => Some(Self::BNode),
            "literal" => Some(Self::Literal),
            "nonliteral" => Some(Self::NonLiteral),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri => f.write_str("IRI"),
            Self::BNode => f.write_str("BNODE"),
            Self::Literal => f.write_str("LITERAL"),
            Self::NonLiteral => f.write_str("NONLITERAL"),
        }
    }
}

/// String and numeric facets of a node constraint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Facets {
    /// Exact string length.
    pub length: Option<u64>,
    /// Minimum string length.
    pub min_length: Option<u64>,
    /// Maximum string length.
    pub max_length: Option<u64>,
    /// Minimum inclusive value.
    pub min_inclusive: Option<NumericLiteral>,
    /// Minimum exclusive value.
    pub min_exclusive: Option<NumericLiteral>,
    /// Maximum inclusive value.
    pub max_inclusive: Option<NumericLiteral>,
    /// Maximum exclusive value.
    pub max_exclusive: Option<NumericLiteral>,
    /// Total number of digits.
    pub total_digits: Option<u64>,
    /// Number of fractional digits.
    pub fraction_digits: Option<u64>,
}

/// Numeric literal value for comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericLiteral {
    /// The literal value.
    pub value: Literal,
}

impl NumericLiteral {
    /// Creates a new numeric literal.
    pub fn new(value: Literal) -> Self {
        Self { value }
    }
}

impl fmt::Display for NumericLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value.value())
    }
}

/// Value usable in a value set, as a stem or as an exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectValue {
    /// An IRI.
    Iri(NamedNode),
    /// A blank node.
    BlankNode(BlankNode),
    /// A literal.
    Literal(Literal),
}

impl From<NamedNode> for ObjectValue {
    fn from(n: NamedNode) -> Self {
        Self::Iri(n)
    }
}

impl From<BlankNode> for ObjectValue {
    fn from(b: BlankNode) -> Self {
        Self::BlankNode(b)
    }
}

impl From<Literal> for ObjectValue {
    fn from(l: Literal) -> Self {
        Self::Literal(l)
    }
}

/// Value in a value set constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueSetValue {
    /// Exact value.
    ObjectValue(ObjectValue),

    /// Stem (prefix match) with optional exclusions.
    StemRange {
        /// Base stem to match.
        stem: Stem,
        /// Values to exclude.
        exclusions: Vec<StemExclusion>,
    },
}

impl ValueSetValue {
    /// Creates a stem value without exclusions.
    pub fn stem(stem: impl Into<ObjectValue>) -> Self {
        Self::StemRange {
            stem: Stem::Value(stem.into()),
            exclusions: Vec::new(),
        }
    }

    /// Creates a wildcard stem with the given exclusions.
    pub fn wildcard(exclusions: impl IntoIterator<Item = StemExclusion>) -> Self {
        Self::StemRange {
            stem: Stem::Wildcard,
            exclusions: exclusions.into_iter().collect(),
        }
    }
}

impl From<ObjectValue> for ValueSetValue {
    fn from(value: ObjectValue) -> Self {
        Self::ObjectValue(value)
    }
}

impl From<NamedNode> for ValueSetValue {
    fn from(n: NamedNode) -> Self {
        Self::ObjectValue(n.into())
    }
}

impl From<Literal> for ValueSetValue {
    fn from(l: Literal) -> Self {
        Self::ObjectValue(l.into())
    }
}

/// Base of a [`ValueSetValue::StemRange`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stem {
    /// Matches everything (`.`).
    Wildcard,
    /// Matches every value starting with the given one.
    Value(ObjectValue),
}

/// Exclusion in a [`ValueSetValue::StemRange`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StemExclusion {
    /// Excludes exactly this value.
    Value(ObjectValue),
    /// Excludes every value starting with this one.
    Stem(ObjectValue),
}

/// Semantic action: an opaque named directive with optional code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemAct {
    /// Name of the extension handling the action.
    pub name: NamedNode,
    /// Code given to the extension.
    pub code: Option<String>,
}

impl SemAct {
    /// Creates a semantic action without code.
    pub fn new(name: NamedNode) -> Self {
        Self { name, code: None }
    }

    /// Creates a semantic action with code.
    pub fn with_code(name: NamedNode, code: impl Into<String>) -> Self {
        Self {
            name,
            code: Some(code.into()),
        }
    }
}

/// Annotation on triple expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Annotation predicate.
    pub predicate: NamedNode,
    /// Annotation value.
    pub object: ObjectValue,
}

impl Annotation {
    /// Creates a new annotation.
    pub fn new(predicate: NamedNode, object: impl Into<ObjectValue>) -> Self {
        Self {
            predicate,
            object: object.into(),
        }
    }
}

/// Shapes schema in ShEx terminology.
///
/// Shapes are kept in declaration order, which is the order they are serialized in.
#[derive(Debug, Clone, Default)]
pub struct ShapesSchema {
    /// Base IRI.
    pub base: Option<String>,

    /// Prefix declarations, from prefix name to namespace IRI.
    pub prefixes: BTreeMap<String, String>,

    /// Semantic actions run before validation.
    pub start_acts: Vec<SemAct>,

    /// Optional start shape expression.
    pub start: Option<ShapeExpression>,

    shapes: Vec<(ShapeLabel, ShapeExpression)>,
}

impl ShapesSchema {
    /// Creates a new empty shapes schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a prefix declaration.
    pub fn add_prefix(&mut self, prefix_name: impl Into<String>, prefix_iri: impl Into<String>) {
        self.prefixes.insert(prefix_name.into(), prefix_iri.into());
    }

    /// Adds a shape expression with the given label.
    ///
    /// If a shape with the same label already exists it is replaced in place.
    pub fn add_shape(&mut self, label: impl Into<ShapeLabel>, expr: impl Into<ShapeExpression>) {
        let label = label.into();
        let expr = expr.into();
        if let Some((_, existing)) = self.shapes.iter_mut().find(|(l, _)| *l == label) {
            *existing = expr;
        } else {
            self.shapes.push((label, expr));
        }
    }

    /// Gets a shape expression by label.
    pub fn get_shape(&self, label: &ShapeLabel) -> Option<&ShapeExpression> {
        self.shapes
            .iter()
            .find_map(|(l, expr)| (l == label).then_some(expr))
    }

    /// Returns an iterator over all shape labels in declaration order.
    pub fn labels(&self) -> impl Iterator<Item = &ShapeLabel> {
        self.shapes.iter().map(|(label, _)| label)
    }

    /// Returns an iterator over all shapes in declaration order.
    pub fn shapes(&self) -> impl Iterator<Item = (&ShapeLabel, &ShapeExpression)> {
        self.shapes.iter().map(|(label, expr)| (label, expr))
    }

    /// Returns true if the schema has no shape.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Returns the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Builds a schema from its [ShExJ](https://shex.io/shex-semantics/#shexj) JSON representation.
    ///
    /// ```
    /// use oxshexc::ShapesSchema;
    ///
    /// let schema = ShapesSchema::from_shexj(&serde_json::json!({
    ///     "type": "Schema",
    ///     "shapes": { "http://example.com/S": { "type": "ShapeExternal" } }
    /// }))?;
    /// assert_eq!(schema.len(), 1);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn from_shexj(value: &serde_json::Value) -> Result<Self, SchemaError> {
        shexj::schema_from_json(value, false, &ErrorHandler::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nn(iri: &str) -> NamedNode {
        NamedNode::new_unchecked(iri)
    }

    #[test]
    fn test_cardinality_shorthands() {
        assert_eq!(Cardinality::optional().to_string(), "?");
        assert_eq!(Cardinality::zero_or_more().to_string(), "*");
        assert_eq!(Cardinality::one_or_more().to_string(), "+");
        assert_eq!(Cardinality::default().to_string(), "");
    }

    #[test]
    fn test_cardinality_explicit() {
        assert_eq!(
            Cardinality::new(2, MaxCardinality::Bounded(5)).to_string(),
            "{2,5}"
        );
        assert_eq!(
            Cardinality::new(2, MaxCardinality::Unbounded).to_string(),
            "{2,*}"
        );
        assert_eq!(Cardinality::exactly(1).to_string(), "{1,1}");
        assert_eq!(
            Cardinality {
                min: Some(3),
                max: None
            }
            .to_string(),
            "{3}"
        );
        assert_eq!(
            Cardinality {
                min: None,
                max: Some(MaxCardinality::Bounded(0))
            }
            .to_string(),
            "{0,0}"
        );
        assert_eq!(
            Cardinality {
                min: None,
                max: Some(MaxCardinality::Bounded(4))
            }
            .to_string(),
            "{1,4}"
        );
    }

    #[test]
    fn test_shape_label_display() {
        let iri = ShapeLabel::Iri(nn("http://example.org/PersonShape"));
        assert_eq!(iri.to_string(), "<http://example.org/PersonShape>");
        let bnode = ShapeLabel::BNode(BlankNode::new_unchecked("b0"));
        assert_eq!(bnode.to_string(), "_:b0");
    }

    #[test]
    fn test_shapes_schema_keeps_declaration_order() {
        let mut schema = ShapesSchema::new();
        schema.add_shape(nn("http://example.org/B"), NodeConstraint::new());
        schema.add_shape(nn("http://example.org/A"), NodeConstraint::new());
        schema.add_shape(
            nn("http://example.org/B"),
            NodeConstraint::with_node_kind(NodeKind::Iri),
        );

        let labels = schema
            .labels()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(
            labels,
            ["<http://example.org/B>", "<http://example.org/A>"]
        );
        assert_eq!(schema.len(), 2);
        assert_eq!(
            schema.get_shape(&nn("http://example.org/B").into()),
            Some(&ShapeExpression::NodeConstraint(
                NodeConstraint::with_node_kind(NodeKind::Iri)
            ))
        );
    }

    #[test]
    fn test_group_decoration() {
        let tc = TripleExpression::from(TripleConstraint::new(nn("http://example.org/p")));
        let group = TripleExpressionGroup::new([tc.clone(), tc]);
        assert!(!group.is_decorated());
        assert!(group.with_cardinality(Cardinality::optional()).is_decorated());
    }

    #[test]
    fn test_node_kind_names() {
        assert_eq!(NodeKind::from_shexj_name("iri"), Some(NodeKind::Iri));
        assert_eq!(
            NodeKind::from_shexj_name("nonliteral"),
            Some(NodeKind::NonLiteral)
        );
        assert_eq!(NodeKind::from_shexj_name("IRI"), None);
        assert_eq!(NodeKind::NonLiteral.to_string(), "NONLITERAL");
    }
}
