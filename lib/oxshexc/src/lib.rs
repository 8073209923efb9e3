//! Serializer for the [ShEx compact syntax (ShExC)](https://shex.io/shex-semantics/#shexc).
//!
//! A schema is built as a [`ShapesSchema`], or read from its
//! [ShExJ](https://shex.io/shex-semantics/#shexj) JSON representation with
//! [`ShapesSchema::from_shexj`], and written as ShExC with a [`ShExCSerializer`].
//!
//! Shape expressions only get the parentheses the ShExC precedence rules require. Triple
//! expression groups are always wrapped, unless
//! [`ShExCSerializer::with_simplified_parentheses`] is used.
//! IRIs are compacted against the declared prefixes and `rdf:type` is abbreviated to `a`.
//!
//! ```
//! use oxrdf::NamedNode;
//! use oxrdf::vocab::{rdf, xsd};
//! use oxshexc::{
//!     Cardinality, NodeConstraint, Shape, ShapeExpression, ShapesSchema, ShExCSerializer,
//!     TripleConstraint, TripleExpression, ValueSetValue,
//! };
//!
//! let ex = |local: &str| NamedNode::new(format!("http://example.com/{local}"));
//!
//! let mut schema = ShapesSchema::new();
//! schema.add_prefix("ex", "http://example.com/");
//! schema.add_prefix("xsd", "http://www.w3.org/2001/XMLSchema#");
//! schema.add_shape(
//!     ex("Person")?,
//!     Shape::with_expression(TripleExpression::each_of([
//!         TripleExpression::from(TripleConstraint::with_value_expr(
//!             rdf::TYPE.into_owned(),
//!             NodeConstraint::with_values([ValueSetValue::from(ex("Person")?)]),
//!         )),
//!         TripleExpression::from(TripleConstraint::with_value_expr(
//!             ex("name")?,
//!             NodeConstraint::with_datatype(xsd::STRING.into_owned()),
//!         )),
//!         TripleExpression::from(
//!             TripleConstraint::with_value_expr(
//!                 ex("knows")?,
//!                 ShapeExpression::reference(ex("Person")?),
//!             )
//!             .with_cardinality(Cardinality::zero_or_more()),
//!         ),
//!     ])),
//! );
//!
//! assert_eq!(
//!     ShExCSerializer::new().serialize_to_string(&schema)?,
//!     "PREFIX ex: <http://example.com/>\nPREFIX xsd: <http://www.w3.org/2001/XMLSchema#>\n\nex:Person {\n  (\n    a [ex:Person];\n    ex:name xsd:string;\n    ex:knows @ex:Person*\n  )\n}\n"
//! );
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod model;
mod serializer;
mod shexj;
mod term;
mod writer;

pub use error::{SchemaError, ShExCError};
pub use model::{
    Annotation, Cardinality, Facets, MaxCardinality, NodeConstraint, NodeKind, NumericLiteral,
    ObjectValue, SemAct, Shape, ShapeExpression, ShapeLabel, ShapesSchema, Stem, StemExclusion,
    TripleConstraint, TripleExpression, TripleExpressionGroup, ValueSetValue,
};
#[cfg(feature = "async-tokio")]
pub use serializer::TokioAsyncWriterShExCSerializer;
pub use serializer::{LowLevelShExCSerializer, ShExCSerializer, WriterShExCSerializer};
