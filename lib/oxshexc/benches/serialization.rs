#![allow(clippy::panic)]

use codspeed_criterion_compat::{Criterion, Throughput, criterion_group, criterion_main};
use oxrdf::NamedNode;
use oxrdf::vocab::{rdf, xsd};
use oxshexc::{
    Cardinality, NodeConstraint, Shape, ShapeExpression, ShapesSchema, ShExCSerializer,
    TripleConstraint, TripleExpression, ValueSetValue,
};

fn ex(local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.org/{local}"))
}

/// Schema of `size` shapes, each referencing the next one
fn create_schema(size: u64) -> ShapesSchema {
    let mut schema = ShapesSchema::new();
    schema.add_prefix("ex", "http://example.org/");
    schema.add_prefix("xsd", "http://www.w3.org/2001/XMLSchema#");
    for i in 0..size {
        schema.add_shape(
            ex(&format!("Shape{i}")),
            Shape::with_expression(TripleExpression::each_of([
                TripleExpression::from(TripleConstraint::with_value_expr(
                    rdf::TYPE.into_owned(),
                    NodeConstraint::with_values([ValueSetValue::from(ex(&format!("Class{i}")))]),
                )),
                TripleExpression::from(TripleConstraint::with_value_expr(
                    ex("label"),
                    NodeConstraint::with_datatype(xsd::STRING.into_owned()).with_pattern("^\\w+$"),
                )),
                TripleExpression::from(
                    TripleConstraint::with_value_expr(
                        ex("next"),
                        ShapeExpression::ShapeOr(vec![
                            ShapeExpression::reference(ex(&format!("Shape{}", i + 1))),
                            ShapeExpression::ShapeExternal,
                        ]),
                    )
                    .with_cardinality(Cardinality::zero_or_more()),
                ),
            ])),
        );
    }
    schema
}

fn serialize_schema(c: &mut Criterion) {
    let mut group = c.benchmark_group("ShExC serialization");
    for size in [10, 100, 1_000, 10_000] {
        let schema = create_schema(size);
        let serializer = ShExCSerializer::new();
        group.throughput(Throughput::Elements(size));
        group.bench_function(format!("serialize schema with {size} shapes"), |b| {
            b.iter(|| serializer.serialize_to_string(&schema).unwrap())
        });
    }
    group.finish();
}

fn parse_shexj(c: &mut Criterion) {
    let serializer = ShExCSerializer::new();
    let document = serde_json::json!({
        "type": "Schema",
        "shapes": (0..1_000)
            .map(|i| serde_json::json!({
                "type": "Shape",
                "id": format!("http://example.org/Shape{i}"),
                "expression": {
                    "type": "TripleConstraint",
                    "predicate": "http://example.org/p",
                    "valueExpr": { "type": "NodeConstraint", "nodeKind": "iri" },
                    "min": 0,
                    "max": -1
                }
            }))
            .collect::<Vec<_>>()
    });
    c.bench_function("convert and serialize ShExJ with 1000 shapes", |b| {
        b.iter(|| {
            let mut writer = serializer.clone().for_writer(Vec::new());
            writer.serialize_shexj(&document).unwrap();
            writer.finish().unwrap()
        })
    });
}

criterion_group!(serialization, serialize_schema, parse_shexj);
criterion_main!(serialization);
