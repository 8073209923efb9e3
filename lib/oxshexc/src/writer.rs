//! Printers for shape expressions, shapes, triple expressions and node constraints.
//!
//! Every printer appends to a `String` and returns early on the first fatal error, so a
//! caller rendering one declaration into a fresh buffer never writes a partial declaration.

use crate::error::{ErrorHandler, SchemaError};
use crate::model::{
    Annotation, Facets, NodeConstraint, SemAct, Shape, ShapeExpression, Stem, StemExclusion,
    TripleConstraint, TripleExpression, TripleExpressionGroup, ValueSetValue,
};
use crate::term::{PrefixTable, escape_into, write_code};

// Shape expression precedences, higher binds tighter.
const OR_PRECEDENCE: u8 = 2;
const AND_PRECEDENCE: u8 = 3;
const NOT_PRECEDENCE: u8 = 4;

// Triple expression precedences.
const SOME_OF_PRECEDENCE: u8 = 1;
const EACH_OF_PRECEDENCE: u8 = 2;

const INDENT: &str = "  ";

/// Printing options shared by all the serializers built from the same configuration.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PrintOptions {
    /// Skips the structural checks.
    pub lax: bool,
    /// Only wraps `EachOf` and `SomeOf` in parentheses where the precedence or a decoration
    /// requires it.
    pub simplify_parentheses: bool,
}

/// Renders parts of a schema against a prefix table.
pub(crate) struct ShapeWriter<'a> {
    prefixes: &'a PrefixTable,
    errors: &'a ErrorHandler,
    options: PrintOptions,
}

impl<'a> ShapeWriter<'a> {
    pub fn new(prefixes: &'a PrefixTable, errors: &'a ErrorHandler, options: PrintOptions) -> Self {
        Self {
            prefixes,
            errors,
            options,
        }
    }

    /// Writes a shape expression.
    ///
    /// `force_braces` requests an empty `{ }` block for shapes without triple expression.
    /// The expression is wrapped in parentheses if its precedence is lower than `parent_precedence`.
    pub fn write_shape_expr(
        &self,
        expr: &ShapeExpression,
        force_braces: bool,
        parent_precedence: u8,
        out: &mut String,
    ) -> Result<(), SchemaError> {
        match expr {
            ShapeExpression::ShapeRef(label) => {
                out.push('@');
                self.prefixes.write_label(label, out);
            }
            ShapeExpression::ShapeExternal => out.push_str("EXTERNAL"),
            ShapeExpression::ShapeAnd(members) => {
                let members = self.non_empty(members, "ShapeAnd")?;
                let wrap = parent_precedence > AND_PRECEDENCE;
                if wrap {
                    out.push('(');
                }
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        out.push_str(if is_juxtaposable(&members[i - 1], member) {
                            " "
                        } else {
                            " AND "
                        });
                    }
                    self.write_shape_expr(member, false, AND_PRECEDENCE, out)?;
                }
                if wrap {
                    out.push(')');
                }
            }
            ShapeExpression::ShapeOr(members) => {
                let members = self.non_empty(members, "ShapeOr")?;
                let wrap = parent_precedence > OR_PRECEDENCE;
                if wrap {
                    out.push('(');
                }
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" OR ");
                    }
                    self.write_shape_expr(member, force_braces, OR_PRECEDENCE, out)?;
                }
                if wrap {
                    out.push(')');
                }
            }
            ShapeExpression::ShapeNot(operand) => {
                let wrap = parent_precedence > NOT_PRECEDENCE;
                if wrap {
                    out.push('(');
                }
                out.push_str("NOT ");
                self.write_shape_expr(operand, force_braces, NOT_PRECEDENCE + 1, out)?;
                if wrap {
                    out.push(')');
                }
            }
            ShapeExpression::Shape(shape) => self.write_shape(shape, force_braces, out)?,
            ShapeExpression::NodeConstraint(constraint) => {
                self.write_node_constraint(constraint, out)?;
            }
        }
        Ok(())
    }

    fn non_empty<'b>(
        &self,
        members: &'b [ShapeExpression],
        kind: &str,
    ) -> Result<&'b [ShapeExpression], SchemaError> {
        if members.is_empty() && !self.options.lax {
            return Err(self
                .errors
                .fatal(SchemaError::structural_mismatch(format!(
                    "{kind} without any nested shape expression"
                ))));
        }
        Ok(members)
    }

    /// Writes `CLOSED`, `EXTRA`, the brace block and the semantic actions of a shape.
    pub fn write_shape(
        &self,
        shape: &Shape,
        force_braces: bool,
        out: &mut String,
    ) -> Result<(), SchemaError> {
        if shape.closed {
            out.push_str("CLOSED ");
        }
        if !shape.extra.is_empty() {
            out.push_str("EXTRA");
            for predicate in &shape.extra {
                out.push(' ');
                self.prefixes.write_predicate(predicate, out);
            }
            out.push(' ');
        }
        if shape.expression.is_some() || (force_braces && !shape.has_node_constraint_keys) {
            out.push_str("{\n");
            if let Some(expression) = &shape.expression {
                self.write_triple_expr(expression, 1, 0, out)?;
                out.push('\n');
            }
            out.push('}');
        }
        self.write_sem_acts(&shape.sem_acts, out);
        Ok(())
    }

    /// Writes a triple expression, each constraint on its own line at `indent` levels.
    pub fn write_triple_expr(
        &self,
        expr: &TripleExpression,
        indent: usize,
        parent_precedence: u8,
        out: &mut String,
    ) -> Result<(), SchemaError> {
        match expr {
            TripleExpression::EachOf(group) => {
                self.write_group(group, ";\n", EACH_OF_PRECEDENCE, indent, parent_precedence, out)
            }
            TripleExpression::SomeOf(group) => {
                self.write_group(group, "|\n", SOME_OF_PRECEDENCE, indent, parent_precedence, out)
            }
            TripleExpression::TripleConstraint(constraint) => {
                self.write_triple_constraint(constraint, indent, out)
            }
            TripleExpression::Inclusion(label) => {
                push_indent(indent, out);
                out.push('&');
                self.prefixes.write_label(label, out);
                Ok(())
            }
        }
    }

    fn write_group(
        &self,
        group: &TripleExpressionGroup,
        separator: &str,
        precedence: u8,
        indent: usize,
        parent_precedence: u8,
        out: &mut String,
    ) -> Result<(), SchemaError> {
        if group.expressions.is_empty() && !self.options.lax {
            return Err(self.errors.fatal(SchemaError::structural_mismatch(
                "triple expression group without any nested expression",
            )));
        }
        let wrap = precedence < parent_precedence
            || group.is_decorated()
            || !self.options.simplify_parentheses;
        let inner_indent = if wrap {
            push_indent(indent, out);
            out.push_str("(\n");
            indent + 1
        } else {
            indent
        };
        for (i, expression) in group.expressions.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            self.write_triple_expr(expression, inner_indent, precedence, out)?;
        }
        if wrap {
            out.push('\n');
            push_indent(indent, out);
            out.push(')');
        }
        out.push_str(&group.cardinality.to_string());
        self.write_annotations(&group.annotations, out);
        self.write_sem_acts(&group.sem_acts, out);
        Ok(())
    }

    fn write_triple_constraint(
        &self,
        constraint: &TripleConstraint,
        indent: usize,
        out: &mut String,
    ) -> Result<(), SchemaError> {
        push_indent(indent, out);
        if constraint.inverse {
            out.push('^');
        }
        if constraint.negated {
            out.push('!');
        }
        self.prefixes.write_predicate(&constraint.predicate, out);
        out.push(' ');
        if let Some(value_expr) = &constraint.value_expr {
            self.write_shape_expr(value_expr, true, 0, out)?;
        } else {
            out.push('.');
        }
        out.push_str(&constraint.cardinality.to_string());
        self.write_annotations(&constraint.annotations, out);
        self.write_sem_acts(&constraint.sem_acts, out);
        Ok(())
    }

    fn write_annotations(&self, annotations: &[Annotation], out: &mut String) {
        for annotation in annotations {
            out.push_str(" // ");
            self.prefixes.write_predicate(&annotation.predicate, out);
            out.push(' ');
            self.prefixes.write_object_value(&annotation.object, out);
        }
    }

    fn write_sem_acts(&self, sem_acts: &[SemAct], out: &mut String) {
        for sem_act in sem_acts {
            out.push(' ');
            self.write_sem_act(sem_act, out);
        }
    }

    /// Writes `%name%` or `%name{code%}`.
    pub fn write_sem_act(&self, sem_act: &SemAct, out: &mut String) {
        out.push('%');
        self.prefixes.write_named_node(&sem_act.name, out);
        if let Some(code) = &sem_act.code {
            out.push('{');
            write_code(code, out);
            out.push_str("%}");
        } else {
            out.push('%');
        }
    }

    /// Writes a node constraint as space separated tokens, `.` if it constrains nothing.
    pub fn write_node_constraint(
        &self,
        constraint: &NodeConstraint,
        out: &mut String,
    ) -> Result<(), SchemaError> {
        let mut values = constraint.values.as_deref();
        if let (Some(datatype), Some(_)) = (&constraint.datatype, values) {
            self.errors
                .recoverable(SchemaError::conflicting_constraint(format!(
                    "datatype {datatype} with a value set"
                )))?;
            values = None;
        }

        let start = out.len();
        if let Some(node_kind) = constraint.node_kind {
            out.push_str(&node_kind.to_string());
        }
        if let Some(datatype) = &constraint.datatype {
            separate(start, out);
            self.prefixes.write_named_node(datatype, out);
        }
        if let Some(values) = values {
            separate(start, out);
            self.write_value_set(values, out);
        }
        if let Some(pattern) = &constraint.pattern {
            separate(start, out);
            out.push_str("~\"");
            escape_into(pattern, out);
            out.push('"');
        }
        write_facets(&constraint.facets, start, out);
        if out.len() == start {
            out.push('.');
        }
        Ok(())
    }

    fn write_value_set(&self, values: &[ValueSetValue], out: &mut String) {
        out.push('[');
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            match value {
                ValueSetValue::ObjectValue(value) => self.prefixes.write_object_value(value, out),
                ValueSetValue::StemRange { stem, exclusions } => {
                    match stem {
                        Stem::Wildcard => out.push('.'),
                        Stem::Value(stem) => {
                            self.prefixes.write_object_value(stem, out);
                            out.push('~');
                        }
                    }
                    for exclusion in exclusions {
                        out.push_str(" - ");
                        match exclusion {
                            StemExclusion::Value(value) => {
                                self.prefixes.write_object_value(value, out);
                            }
                            StemExclusion::Stem(stem) => {
                                self.prefixes.write_object_value(stem, out);
                                out.push('~');
                            }
                        }
                    }
                }
            }
        }
        out.push(']');
    }
}

/// The grammar allows a node constraint and a shape (or a reference) to follow each other without `AND`.
fn is_juxtaposable(previous: &ShapeExpression, next: &ShapeExpression) -> bool {
    let is_structural =
        |e: &ShapeExpression| matches!(e, ShapeExpression::Shape(_) | ShapeExpression::ShapeRef(_));
    let is_node_constraint = |e: &ShapeExpression| matches!(e, ShapeExpression::NodeConstraint(_));
    (is_node_constraint(previous) && is_structural(next))
        || (is_node_constraint(next) && is_structural(previous))
}

fn write_facets(facets: &Facets, start: usize, out: &mut String) {
    let numbers = [
        ("length", facets.length),
        ("minlength", facets.min_length),
        ("maxlength", facets.max_length),
    ];
    for (name, value) in numbers {
        if let Some(value) = value {
            write_facet(name, &value.to_string(), start, out);
        }
    }
    let ranges = [
        ("mininclusive", &facets.min_inclusive),
        ("minexclusive", &facets.min_exclusive),
        ("maxinclusive", &facets.max_inclusive),
        ("maxexclusive", &facets.max_exclusive),
    ];
    for (name, value) in ranges {
        if let Some(value) = value {
            write_facet(name, &value.to_string(), start, out);
        }
    }
    let digits = [
        ("totaldigits", facets.total_digits),
        ("fractiondigits", facets.fraction_digits),
    ];
    for (name, value) in digits {
        if let Some(value) = value {
            write_facet(name, &value.to_string(), start, out);
        }
    }
}

fn write_facet(name: &str, value: &str, start: usize, out: &mut String) {
    separate(start, out);
    out.push_str(name);
    out.push(' ');
    out.push_str(value);
}

/// Adds a space if something has already been written since `start`.
fn separate(start: usize, out: &mut String) {
    if out.len() > start {
        out.push(' ');
    }
}

fn push_indent(level: usize, out: &mut String) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Cardinality, MaxCardinality, NodeKind, NumericLiteral, ObjectValue, ShapeLabel,
    };
    use oxrdf::vocab::{rdf, xsd};
    use oxrdf::{BlankNode, Literal, NamedNode};
    use std::sync::{Arc, Mutex};

    fn ex(local: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{local}"))
    }

    fn prefixes() -> PrefixTable {
        let mut table = PrefixTable::default();
        table.register("ex", "http://example.org/");
        table.register("xsd", "http://www.w3.org/2001/XMLSchema#");
        table
    }

    fn shape_expr(expr: &ShapeExpression) -> Result<String, SchemaError> {
        shape_expr_with(expr, PrintOptions::default())
    }

    fn shape_expr_with(
        expr: &ShapeExpression,
        options: PrintOptions,
    ) -> Result<String, SchemaError> {
        let table = prefixes();
        let errors = ErrorHandler::default();
        let mut out = String::new();
        ShapeWriter::new(&table, &errors, options).write_shape_expr(expr, true, 0, &mut out)?;
        Ok(out)
    }

    fn simplified() -> PrintOptions {
        PrintOptions {
            simplify_parentheses: true,
            ..PrintOptions::default()
        }
    }

    fn reference(local: &str) -> ShapeExpression {
        ShapeExpression::reference(ex(local))
    }

    fn datatype(dt: oxrdf::NamedNodeRef<'_>) -> ShapeExpression {
        NodeConstraint::with_datatype(dt.into_owned()).into()
    }

    fn tc(local: &str) -> TripleExpression {
        TripleConstraint::new(ex(local)).into()
    }

    #[test]
    fn test_atoms() -> Result<(), SchemaError> {
        assert_eq!(shape_expr(&reference("S"))?, "@ex:S");
        assert_eq!(
            shape_expr(&ShapeExpression::reference(BlankNode::new_unchecked("b1")))?,
            "@_:b1"
        );
        assert_eq!(shape_expr(&ShapeExpression::ShapeExternal)?, "EXTERNAL");
        assert_eq!(shape_expr(&Shape::new().into())?, "{\n}");
        Ok(())
    }

    #[test]
    fn test_no_braces_with_node_constraint_keys() -> Result<(), SchemaError> {
        let mut shape = Shape::new();
        shape.has_node_constraint_keys = true;
        assert_eq!(shape_expr(&shape.clone().into())?, "");
        assert_eq!(shape_expr(&shape.clone().closed().into())?, "CLOSED ");
        shape.expression = Some(tc("p"));
        assert_eq!(shape_expr(&shape.into())?, "{\n  ex:p .\n}");
        Ok(())
    }

    #[test]
    fn test_and_or_precedence() -> Result<(), SchemaError> {
        let or = ShapeExpression::ShapeOr(vec![reference("A"), reference("B")]);
        let and = ShapeExpression::ShapeAnd(vec![or.clone(), reference("C")]);
        assert_eq!(shape_expr(&and)?, "(@ex:A OR @ex:B) AND @ex:C");

        let and = ShapeExpression::ShapeAnd(vec![reference("A"), reference("B")]);
        let or = ShapeExpression::ShapeOr(vec![and, reference("C")]);
        assert_eq!(shape_expr(&or)?, "@ex:A AND @ex:B OR @ex:C");
        Ok(())
    }

    #[test]
    fn test_not_precedence() -> Result<(), SchemaError> {
        let and = ShapeExpression::ShapeAnd(vec![reference("A"), reference("B")]);
        assert_eq!(
            shape_expr(&ShapeExpression::negation(and.clone()))?,
            "NOT (@ex:A AND @ex:B)"
        );
        let double = ShapeExpression::negation(ShapeExpression::negation(reference("A")));
        assert_eq!(shape_expr(&double)?, "NOT (NOT @ex:A)");
        let inside = ShapeExpression::ShapeAnd(vec![
            ShapeExpression::negation(reference("A")),
            reference("B"),
        ]);
        assert_eq!(shape_expr(&inside)?, "NOT @ex:A AND @ex:B");
        Ok(())
    }

    #[test]
    fn test_juxtaposition() -> Result<(), SchemaError> {
        let and = ShapeExpression::ShapeAnd(vec![
            NodeConstraint::with_node_kind(NodeKind::Iri).into(),
            Shape::with_expression(tc("p")).into(),
        ]);
        assert_eq!(shape_expr(&and)?, "IRI {\n  ex:p .\n}");

        let and = ShapeExpression::ShapeAnd(vec![reference("S"), datatype(xsd::STRING)]);
        assert_eq!(shape_expr(&and)?, "@ex:S xsd:string");

        let and = ShapeExpression::ShapeAnd(vec![datatype(xsd::STRING), datatype(xsd::INTEGER)]);
        assert_eq!(shape_expr(&and)?, "xsd:string AND xsd:integer");
        Ok(())
    }

    #[test]
    fn test_and_members_do_not_force_braces() -> Result<(), SchemaError> {
        let and = ShapeExpression::ShapeAnd(vec![reference("A"), Shape::new().closed().into()]);
        assert_eq!(shape_expr(&and)?, "@ex:A CLOSED ");
        let or = ShapeExpression::ShapeOr(vec![reference("A"), Shape::new().into()]);
        assert_eq!(shape_expr(&or)?, "@ex:A OR {\n}");
        Ok(())
    }

    #[test]
    fn test_empty_junction_is_structural_mismatch() {
        assert!(matches!(
            shape_expr(&ShapeExpression::ShapeOr(Vec::new())),
            Err(SchemaError::StructuralMismatch { .. })
        ));
    }

    #[test]
    fn test_lax_skips_structural_checks() -> Result<(), SchemaError> {
        let table = prefixes();
        let errors = ErrorHandler::default();
        let options = PrintOptions {
            lax: true,
            ..PrintOptions::default()
        };
        let mut out = String::new();
        ShapeWriter::new(&table, &errors, options).write_shape_expr(
            &ShapeExpression::ShapeOr(Vec::new()),
            true,
            0,
            &mut out,
        )?;
        assert_eq!(out, "");
        Ok(())
    }

    #[test]
    fn test_shape_header_and_sem_acts() -> Result<(), SchemaError> {
        let shape = Shape::with_expression(tc("p"))
            .closed()
            .with_extra(rdf::TYPE.into_owned())
            .with_extra(ex("q"))
            .with_sem_act(SemAct::with_code(ex("js"), "return 1%2;"));
        assert_eq!(
            shape_expr(&shape.into())?,
            "CLOSED EXTRA a ex:q {\n  ex:p .\n} %ex:js{return 1\\%2;%}"
        );
        Ok(())
    }

    #[test]
    fn test_triple_constraint() -> Result<(), SchemaError> {
        let constraint = TripleConstraint::with_value_expr(rdf::TYPE.into_owned(), reference("C"))
            .with_inverse(true)
            .with_negated(true)
            .with_cardinality(Cardinality::new(2, MaxCardinality::Bounded(5)))
            .with_annotation(Annotation::new(
                ex("label"),
                Literal::new_simple_literal("type"),
            ))
            .with_sem_act(SemAct::new(ex("log")));
        assert_eq!(
            shape_expr(&Shape::with_expression(constraint).into())?,
            "{\n  ^!a @ex:C{2,5} // ex:label \"type\" %ex:log%\n}"
        );
        Ok(())
    }

    #[test]
    fn test_nested_shape_in_value() -> Result<(), SchemaError> {
        let inner = Shape::with_expression(tc("q"));
        let outer = Shape::with_expression(TripleConstraint::with_value_expr(ex("p"), inner));
        assert_eq!(
            shape_expr(&outer.into())?,
            "{\n  ex:p {\n  ex:q .\n}\n}"
        );
        Ok(())
    }

    #[test]
    fn test_groups_are_parenthesized_by_default() -> Result<(), SchemaError> {
        let choice = TripleExpression::some_of([tc("b"), tc("c")]);
        let sequence = TripleExpression::each_of([tc("a"), choice]);
        assert_eq!(
            shape_expr(&Shape::with_expression(sequence).into())?,
            "{\n  (\n    ex:a .;\n    (\n      ex:b .|\n      ex:c .\n    )\n  )\n}"
        );
        Ok(())
    }

    #[test]
    fn test_simplified_parentheses() -> Result<(), SchemaError> {
        let choice = TripleExpression::some_of([tc("b"), tc("c")]);
        let sequence = TripleExpression::each_of([tc("a"), choice]);
        assert_eq!(
            shape_expr_with(&Shape::with_expression(sequence).into(), simplified())?,
            "{\n  ex:a .;\n  (\n    ex:b .|\n    ex:c .\n  )\n}"
        );

        let sequence = TripleExpression::each_of([tc("a"), tc("b")]);
        let choice = TripleExpression::some_of([sequence, tc("c")]);
        assert_eq!(
            shape_expr_with(&Shape::with_expression(choice).into(), simplified())?,
            "{\n  ex:a .;\n  ex:b .|\n  ex:c .\n}"
        );
        Ok(())
    }

    #[test]
    fn test_decorated_group_is_wrapped() -> Result<(), SchemaError> {
        let group = TripleExpression::EachOf(
            TripleExpressionGroup::new([tc("a"), tc("b")])
                .with_cardinality(Cardinality::zero_or_more()),
        );
        assert_eq!(
            shape_expr_with(&Shape::with_expression(group).into(), simplified())?,
            "{\n  (\n    ex:a .;\n    ex:b .\n  )*\n}"
        );
        Ok(())
    }

    #[test]
    fn test_inclusion() -> Result<(), SchemaError> {
        let expr = TripleExpression::each_of([
            TripleExpression::Inclusion(ShapeLabel::Iri(ex("T"))),
            tc("a"),
        ]);
        assert_eq!(
            shape_expr_with(&Shape::with_expression(expr).into(), simplified())?,
            "{\n  &ex:T;\n  ex:a .\n}"
        );
        Ok(())
    }

    #[test]
    fn test_node_constraints() -> Result<(), SchemaError> {
        assert_eq!(shape_expr(&NodeConstraint::new().into())?, ".");
        let mut constraint =
            NodeConstraint::with_node_kind(NodeKind::Literal).with_pattern("^a\"b");
        constraint.facets.min_length = Some(0);
        constraint.facets.max_inclusive =
            Some(NumericLiteral::new(Literal::new_typed_literal("10", xsd::INTEGER)));
        constraint.facets.fraction_digits = Some(2);
        assert_eq!(
            shape_expr(&constraint.into())?,
            "LITERAL ~\"^a\\\"b\" minlength 0 maxinclusive 10 fractiondigits 2"
        );
        Ok(())
    }

    #[test]
    fn test_value_set() -> Result<(), SchemaError> {
        let constraint = NodeConstraint::with_values([
            ex("a").into(),
            Literal::new_simple_literal("b").into(),
            ValueSetValue::stem(ex("c/")),
            ValueSetValue::wildcard([
                StemExclusion::Value(ObjectValue::Iri(ex("d"))),
                StemExclusion::Stem(ObjectValue::Iri(ex("e"))),
            ]),
        ]);
        assert_eq!(
            shape_expr(&constraint.into())?,
            "[ex:a \"b\" <http://example.org/c/>~ . - ex:d - ex:e~]"
        );
        Ok(())
    }

    #[test]
    fn test_conflicting_constraint() {
        let mut constraint = NodeConstraint::with_datatype(xsd::STRING.into_owned());
        constraint.values = Some(vec![Literal::new_simple_literal("a").into()]);
        let expr = ShapeExpression::from(constraint);
        assert!(matches!(
            shape_expr(&expr),
            Err(SchemaError::ConflictingConstraint { .. })
        ));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let errors = {
            let seen = Arc::clone(&seen);
            ErrorHandler::new(move |e| {
                if let Ok(mut seen) = seen.lock() {
                    seen.push(e);
                }
                Ok(())
            })
        };
        let table = prefixes();
        let mut out = String::new();
        ShapeWriter::new(&table, &errors, PrintOptions::default())
            .write_shape_expr(&expr, true, 0, &mut out)
            .unwrap();
        assert_eq!(out, "xsd:string");
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
