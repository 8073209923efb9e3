//! Conversion of [ShExJ](https://shex.io/shex-semantics/#shexj) JSON documents into the schema model.
//!
//! Terms use the N3 string conventions: `_:id` for blank nodes, `"lex"`, `"lex"^^datatype` and
//! `"lex"@lang` for literals, anything else is an IRI.

use crate::error::{ErrorHandler, SchemaError};
use crate::model::{
    Annotation, Cardinality, MaxCardinality, NodeConstraint, NodeKind, NumericLiteral,
    ObjectValue, SemAct, Shape, ShapeExpression, ShapeLabel, ShapesSchema, Stem, StemExclusion,
    TripleConstraint, TripleExpression, TripleExpressionGroup, ValueSetValue,
};
use oxrdf::vocab::xsd;
use oxrdf::{BlankNode, Literal, NamedNode};
use serde_json::{Map, Value};

type Object = Map<String, Value>;

/// Node constraint keys that prevent an empty brace block when found on a shape.
const NODE_CONSTRAINT_KEYS: [&str; 5] = ["values", "length", "minlength", "maxlength", "pattern"];

/// Converts a ShExJ schema.
///
/// Unless `lax` is set the `"type"` discriminants of the schema, semantic actions, annotations
/// and stems are checked.
pub(crate) fn schema_from_json(
    value: &Value,
    lax: bool,
    errors: &ErrorHandler,
) -> Result<ShapesSchema, SchemaError> {
    ShExJReader { lax, errors }.schema(value)
}

struct ShExJReader<'a> {
    lax: bool,
    errors: &'a ErrorHandler,
}

impl ShExJReader<'_> {
    fn schema(&self, value: &Value) -> Result<ShapesSchema, SchemaError> {
        let object = self.object(value, "schema")?;
        self.expect_type(object, "Schema")?;
        let mut schema = ShapesSchema::new();
        if let Some(prefixes) = object.get("prefixes") {
            for (name, iri) in self.object(prefixes, "prefixes")? {
                schema.add_prefix(name.clone(), self.str(iri, "prefix IRI")?);
            }
        }
        if let Some(base) = object.get("base") {
            schema.base = Some(self.str(base, "base")?.to_owned());
        }
        if let Some(start_acts) = object.get("startActs") {
            schema.start_acts = self.sem_acts(start_acts)?;
        }
        if let Some(start) = object.get("start") {
            schema.start = Some(self.shape_expr(start)?);
        }
        match object.get("shapes") {
            None => (),
            Some(Value::Object(shapes)) => {
                for (label, expr) in shapes {
                    schema.add_shape(self.label_str(label)?, self.shape_expr(expr)?);
                }
            }
            Some(Value::Array(shapes)) => {
                for expr in shapes {
                    let label = self
                        .object(expr, "shape declaration")?
                        .get("id")
                        .ok_or_else(|| self.mismatch("shape declaration without \"id\""))?;
                    schema.add_shape(self.label(label)?, self.shape_expr(expr)?);
                }
            }
            Some(_) => return Err(self.mismatch("\"shapes\" must be an object or an array")),
        }
        Ok(schema)
    }

    fn shape_expr(&self, value: &Value) -> Result<ShapeExpression, SchemaError> {
        let object = match value {
            Value::String(label) => return Ok(ShapeExpression::ShapeRef(self.label_str(label)?)),
            Value::Object(object) => object,
            _ => return Err(self.mismatch(format!("{value} is not a shape expression"))),
        };
        Ok(match self.tag(object, "shape expression")? {
            "ShapeAnd" => ShapeExpression::ShapeAnd(self.shape_exprs(object)?),
            "ShapeOr" => ShapeExpression::ShapeOr(self.shape_exprs(object)?),
            "ShapeNot" => ShapeExpression::negation(
                self.shape_expr(self.required(object, "shapeExpr", "ShapeNot")?)?,
            ),
            "ShapeRef" => ShapeExpression::ShapeRef(
                self.label(self.required(object, "reference", "ShapeRef")?)?,
            ),
            "ShapeExternal" => ShapeExpression::ShapeExternal,
            "Shape" => self.shape(object)?.into(),
            "NodeConstraint" => self.node_constraint(object)?.into(),
            tag => return Err(self.errors.fatal(SchemaError::unknown_expr_tag(tag))),
        })
    }

    fn shape_exprs(&self, object: &Object) -> Result<Vec<ShapeExpression>, SchemaError> {
        self.array(self.required(object, "shapeExprs", "shape junction")?, "shapeExprs")?
            .iter()
            .map(|expr| self.shape_expr(expr))
            .collect()
    }

    fn shape(&self, object: &Object) -> Result<Shape, SchemaError> {
        let mut shape = Shape::new();
        shape.has_node_constraint_keys = NODE_CONSTRAINT_KEYS
            .iter()
            .any(|key| object.contains_key(*key));
        if let Some(closed) = object.get("closed") {
            shape.closed = closed
                .as_bool()
                .ok_or_else(|| self.mismatch("\"closed\" must be a boolean"))?;
        }
        if let Some(extra) = object.get("extra") {
            shape.extra = self
                .array(extra, "extra")?
                .iter()
                .map(|predicate| self.predicate(predicate))
                .collect::<Result<_, _>>()?;
        }
        if let Some(expression) = object.get("expression") {
            shape.expression = Some(self.triple_expr(expression)?);
        }
        if let Some(sem_acts) = object.get("semActs") {
            shape.sem_acts = self.sem_acts(sem_acts)?;
        }
        Ok(shape)
    }

    fn node_constraint(&self, object: &Object) -> Result<NodeConstraint, SchemaError> {
        let mut constraint = NodeConstraint::new();
        if let Some(node_kind) = object.get("nodeKind") {
            let name = self.str(node_kind, "nodeKind")?;
            constraint.node_kind = NodeKind::from_shexj_name(name);
            if constraint.node_kind.is_none() {
                self.errors
                    .recoverable(SchemaError::unknown_node_kind(name))?;
            }
        }
        if let Some(datatype) = object.get("datatype") {
            constraint.datatype = Some(self.iri(datatype, "datatype")?);
        }
        if let Some(values) = object.get("values") {
            constraint.values = Some(
                self.array(values, "values")?
                    .iter()
                    .map(|value| self.value_set_value(value))
                    .collect::<Result<_, _>>()?,
            );
        }
        if let Some(pattern) = object.get("pattern") {
            constraint.pattern = Some(self.str(pattern, "pattern")?.to_owned());
        }
        let facets = &mut constraint.facets;
        facets.length = self.integer_facet(object, "length")?;
        facets.min_length = self.integer_facet(object, "minlength")?;
        facets.max_length = self.integer_facet(object, "maxlength")?;
        facets.min_inclusive = self.numeric_facet(object, "mininclusive")?;
        facets.min_exclusive = self.numeric_facet(object, "minexclusive")?;
        facets.max_inclusive = self.numeric_facet(object, "maxinclusive")?;
        facets.max_exclusive = self.numeric_facet(object, "maxexclusive")?;
        facets.total_digits = self.integer_facet(object, "totaldigits")?;
        facets.fraction_digits = self.integer_facet(object, "fractiondigits")?;
        Ok(constraint)
    }

    fn integer_facet(&self, object: &Object, key: &str) -> Result<Option<u64>, SchemaError> {
        object
            .get(key)
            .map(|value| {
                value
                    .as_u64()
                    .ok_or_else(|| {
                        self.mismatch(format!("\"{key}\" must be a non-negative integer"))
                    })
            })
            .transpose()
    }

    fn numeric_facet(
        &self,
        object: &Object,
        key: &str,
    ) -> Result<Option<NumericLiteral>, SchemaError> {
        let Some(value) = object.get(key) else {
            return Ok(None);
        };
        let literal = match value {
            Value::Number(number) if number.is_f64() => {
                Literal::new_typed_literal(number.to_string(), xsd::DECIMAL)
            }
            Value::Number(number) => Literal::new_typed_literal(number.to_string(), xsd::INTEGER),
            _ => match self.object_value(value)? {
                ObjectValue::Literal(literal) => literal,
                _ => return Err(self.mismatch(format!("\"{key}\" must be a number"))),
            },
        };
        Ok(Some(NumericLiteral::new(literal)))
    }

    fn value_set_value(&self, value: &Value) -> Result<ValueSetValue, SchemaError> {
        let Value::Object(object) = value else {
            return Ok(ValueSetValue::ObjectValue(self.object_value(value)?));
        };
        if object.contains_key("value") {
            return Ok(ValueSetValue::ObjectValue(self.object_value(value)?));
        }
        let tag = object
            .get("type")
            .and_then(Value::as_str)
            .or_else(|| self.lax.then_some("StemRange"));
        let (literal_stem, with_exclusions) = match tag {
            Some("StemRange" | "IriStemRange") => (false, true),
            Some("LiteralStemRange") => (true, true),
            Some("IriStem") => (false, false),
            Some("LiteralStem") => (true, false),
            _ => {
                return Err(self.mismatch(format!(
                    "unsupported value set entry type {}",
                    tag.unwrap_or("(none)")
                )));
            }
        };
        let stem = match self.required(object, "stem", "stem range")? {
            Value::Object(wildcard) => {
                self.expect_type(wildcard, "Wildcard")?;
                Stem::Wildcard
            }
            stem => Stem::Value(self.stem_value(stem, literal_stem)?),
        };
        let mut exclusions = Vec::new();
        if with_exclusions {
            if let Some(values) = object.get("exclusions") {
                for exclusion in self.array(values, "exclusions")? {
                    exclusions.push(match exclusion {
                        Value::Object(exclusion) => {
                            if !self.lax
                                && !matches!(
                                    exclusion.get("type").and_then(Value::as_str),
                                    Some("Stem" | "IriStem" | "LiteralStem")
                                )
                            {
                                return Err(self.mismatch("exclusion object is not a Stem"));
                            }
                            StemExclusion::Stem(self.stem_value(
                                self.required(exclusion, "stem", "Stem")?,
                                literal_stem,
                            )?)
                        }
                        value => StemExclusion::Value(self.stem_value(value, literal_stem)?),
                    });
                }
            }
        }
        Ok(ValueSetValue::StemRange { stem, exclusions })
    }

    /// Literal stems carry the bare lexical form instead of an N3 literal.
    fn stem_value(&self, value: &Value, literal: bool) -> Result<ObjectValue, SchemaError> {
        if literal {
            if let Value::String(lexical) = value {
                if !lexical.starts_with('"') {
                    return Ok(Literal::new_simple_literal(lexical).into());
                }
            }
        }
        self.object_value(value)
    }

    fn triple_expr(&self, value: &Value) -> Result<TripleExpression, SchemaError> {
        let object = match value {
            Value::String(label) => return Ok(TripleExpression::Inclusion(self.label_str(label)?)),
            Value::Object(object) => object,
            _ => return Err(self.mismatch(format!("{value} is not a triple expression"))),
        };
        Ok(match self.tag(object, "triple expression")? {
            "EachOf" => TripleExpression::EachOf(self.group(object)?),
            "SomeOf" | "OneOf" => TripleExpression::SomeOf(self.group(object)?),
            "TripleConstraint" => {
                TripleExpression::TripleConstraint(self.triple_constraint(object)?)
            }
            "Inclusion" => TripleExpression::Inclusion(
                self.label(self.required(object, "include", "Inclusion")?)?,
            ),
            tag => return Err(self.errors.fatal(SchemaError::unknown_expr_tag(tag))),
        })
    }

    fn group(&self, object: &Object) -> Result<TripleExpressionGroup, SchemaError> {
        let expressions = self
            .array(self.required(object, "expressions", "triple expression group")?, "expressions")?
            .iter()
            .map(|expr| self.triple_expr(expr))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TripleExpressionGroup {
            expressions,
            cardinality: self.cardinality(object)?,
            annotations: self.annotations(object)?,
            sem_acts: self.optional_sem_acts(object)?,
        })
    }

    fn triple_constraint(&self, object: &Object) -> Result<TripleConstraint, SchemaError> {
        let predicate = self.required(object, "predicate", "TripleConstraint")?;
        let mut constraint = TripleConstraint::new(self.predicate(predicate)?);
        constraint.inverse = self.flag(object, "inverse")?;
        constraint.negated = self.flag(object, "negated")?;
        if let Some(value_expr) = object.get("valueExpr") {
            constraint.value_expr = Some(Box::new(self.shape_expr(value_expr)?));
        }
        constraint.cardinality = self.cardinality(object)?;
        constraint.annotations = self.annotations(object)?;
        constraint.sem_acts = self.optional_sem_acts(object)?;
        Ok(constraint)
    }

    fn cardinality(&self, object: &Object) -> Result<Cardinality, SchemaError> {
        let min = object
            .get("min")
            .map(|min| {
                min.as_u64()
                    .and_then(|min| u32::try_from(min).ok())
                    .ok_or_else(|| self.mismatch(format!("invalid min cardinality {min}")))
            })
            .transpose()?;
        let max = object
            .get("max")
            .map(|max| match max {
                Value::String(s) if s == "*" => Ok(MaxCardinality::Unbounded),
                Value::Number(n) if n.as_i64() == Some(-1) => Ok(MaxCardinality::Unbounded),
                _ => max
                    .as_u64()
                    .and_then(|max| u32::try_from(max).ok())
                    .map(MaxCardinality::Bounded)
                    .ok_or_else(|| self.mismatch(format!("invalid max cardinality {max}"))),
            })
            .transpose()?;
        Ok(Cardinality { min, max })
    }

    fn annotations(&self, object: &Object) -> Result<Vec<Annotation>, SchemaError> {
        let Some(annotations) = object.get("annotations") else {
            return Ok(Vec::new());
        };
        self.array(annotations, "annotations")?
            .iter()
            .map(|annotation| {
                let annotation = self.object(annotation, "annotation")?;
                self.expect_type(annotation, "Annotation")?;
                Ok(Annotation {
                    predicate: self
                        .predicate(self.required(annotation, "predicate", "Annotation")?)?,
                    object: self.object_value(self.required(annotation, "object", "Annotation")?)?,
                })
            })
            .collect()
    }

    fn optional_sem_acts(&self, object: &Object) -> Result<Vec<SemAct>, SchemaError> {
        object
            .get("semActs")
            .map_or_else(|| Ok(Vec::new()), |sem_acts| self.sem_acts(sem_acts))
    }

    fn sem_acts(&self, value: &Value) -> Result<Vec<SemAct>, SchemaError> {
        self.array(value, "semActs")?
            .iter()
            .map(|sem_act| {
                let sem_act = self.object(sem_act, "semantic action")?;
                self.expect_type(sem_act, "SemAct")?;
                Ok(SemAct {
                    name: self.iri(self.required(sem_act, "name", "SemAct")?, "name")?,
                    code: sem_act
                        .get("code")
                        .map(|code| self.str(code, "code").map(ToOwned::to_owned))
                        .transpose()?,
                })
            })
            .collect()
    }

    fn label(&self, value: &Value) -> Result<ShapeLabel, SchemaError> {
        match value {
            Value::String(label) => self.label_str(label),
            Value::Object(_) => Err(self.errors.fatal(SchemaError::invalid_subject_or_predicate(
                value.to_string(),
            ))),
            _ => Err(self.mismatch(format!("{value} is not a shape label"))),
        }
    }

    fn label_str(&self, label: &str) -> Result<ShapeLabel, SchemaError> {
        if label.starts_with('"') {
            return Err(self
                .errors
                .fatal(SchemaError::invalid_subject_or_predicate(label)));
        }
        Ok(match label.strip_prefix("_:") {
            Some(id) => self.blank_node(id)?.into(),
            None => NamedNode::new_unchecked(label).into(),
        })
    }

    fn predicate(&self, value: &Value) -> Result<NamedNode, SchemaError> {
        self.iri(value, "predicate")
    }

    /// Reads an IRI, rejecting literals as [`SchemaError::InvalidSubjectOrPredicate`].
    fn iri(&self, value: &Value, what: &str) -> Result<NamedNode, SchemaError> {
        match value {
            Value::String(iri) if iri.starts_with('"') => Err(self
                .errors
                .fatal(SchemaError::invalid_subject_or_predicate(iri.as_str()))),
            Value::Object(_) => Err(self.errors.fatal(SchemaError::invalid_subject_or_predicate(
                value.to_string(),
            ))),
            Value::String(iri) if iri.starts_with("_:") => {
                Err(self.mismatch(format!("{what} can not be the blank node {iri}")))
            }
            Value::String(iri) => Ok(NamedNode::new_unchecked(iri.as_str())),
            _ => Err(self.mismatch(format!("{what} must be a string"))),
        }
    }

    fn object_value(&self, value: &Value) -> Result<ObjectValue, SchemaError> {
        match value {
            Value::String(term) => {
                if let Some(id) = term.strip_prefix("_:") {
                    Ok(self.blank_node(id)?.into())
                } else if term.starts_with('"') {
                    Ok(self.n3_literal(term)?.into())
                } else {
                    Ok(NamedNode::new_unchecked(term.as_str()).into())
                }
            }
            Value::Object(object) => {
                let lexical = self.str(self.required(object, "value", "literal")?, "value")?;
                Ok(if let Some(language) = object.get("language") {
                    Literal::new_language_tagged_literal_unchecked(
                        lexical,
                        self.str(language, "language")?,
                    )
                } else if let Some(datatype) = object.get("type") {
                    Literal::new_typed_literal(lexical, self.iri(datatype, "datatype")?)
                } else {
                    Literal::new_simple_literal(lexical)
                }
                .into())
            }
            _ => Err(self.mismatch(format!("{value} is not a term"))),
        }
    }

    /// Parses `"lex"`, `"lex"^^datatype` or `"lex"@lang`, the lexical form ending at the last quote.
    fn n3_literal(&self, term: &str) -> Result<Literal, SchemaError> {
        let invalid = || self.mismatch(format!("invalid literal {term}"));
        let body = term.strip_prefix('"').ok_or_else(invalid)?;
        let end = body.rfind('"').ok_or_else(invalid)?;
        let (lexical, suffix) = (&body[..end], &body[end + 1..]);
        if suffix.is_empty() {
            Ok(Literal::new_simple_literal(lexical))
        } else if let Some(datatype) = suffix.strip_prefix("^^") {
            Ok(Literal::new_typed_literal(
                lexical,
                NamedNode::new_unchecked(datatype),
            ))
        } else if let Some(language) = suffix.strip_prefix('@') {
            if language.is_empty() {
                return Err(invalid());
            }
            Ok(Literal::new_language_tagged_literal_unchecked(lexical, language))
        } else {
            Err(invalid())
        }
    }

    fn blank_node(&self, id: &str) -> Result<BlankNode, SchemaError> {
        BlankNode::new(id).map_err(|e| self.mismatch(format!("invalid blank node _:{id}: {e}")))
    }

    fn flag(&self, object: &Object, key: &str) -> Result<bool, SchemaError> {
        object.get(key).map_or(Ok(false), |value| {
            value
                .as_bool()
                .ok_or_else(|| self.mismatch(format!("\"{key}\" must be a boolean")))
        })
    }

    /// Returns the `"type"` used to dispatch, required even in lax mode.
    fn tag<'o>(&self, object: &'o Object, what: &str) -> Result<&'o str, SchemaError> {
        object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| self.mismatch(format!("{what} without \"type\"")))
    }

    fn expect_type(&self, object: &Object, expected: &str) -> Result<(), SchemaError> {
        if self.lax {
            return Ok(());
        }
        match object.get("type").and_then(Value::as_str) {
            Some(tag) if tag == expected => Ok(()),
            Some(tag) => Err(self.mismatch(format!("expected type {expected}, found {tag}"))),
            None => Err(self.mismatch(format!("expected type {expected}, found no type"))),
        }
    }

    fn required<'o>(
        &self,
        object: &'o Object,
        key: &str,
        what: &str,
    ) -> Result<&'o Value, SchemaError> {
        object
            .get(key)
            .ok_or_else(|| self.mismatch(format!("{what} without \"{key}\"")))
    }

    fn object<'v>(&self, value: &'v Value, what: &str) -> Result<&'v Object, SchemaError> {
        value
            .as_object()
            .ok_or_else(|| self.mismatch(format!("{what} must be a JSON object")))
    }

    fn array<'v>(&self, value: &'v Value, what: &str) -> Result<&'v Vec<Value>, SchemaError> {
        value
            .as_array()
            .ok_or_else(|| self.mismatch(format!("{what} must be a JSON array")))
    }

    fn str<'v>(&self, value: &'v Value, what: &str) -> Result<&'v str, SchemaError> {
        value
            .as_str()
            .ok_or_else(|| self.mismatch(format!("{what} must be a string")))
    }

    fn mismatch(&self, message: impl Into<String>) -> SchemaError {
        self.errors
            .fatal(SchemaError::structural_mismatch(message))
    }
}
