use crate::error::{ErrorHandler, SchemaError, ShExCError};
use crate::model::{ShapeExpression, ShapeLabel, ShapesSchema};
use crate::shexj;
use crate::term::{PrefixTable, write_full_iri};
use crate::writer::{PrintOptions, ShapeWriter};
use oxiri::{Iri, IriParseError};
use std::collections::BTreeMap;
use std::io::{self, Write};
#[cfg(feature = "async-tokio")]
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// A [ShExC](https://shex.io/shex-semantics/#shexc) serializer.
///
/// ```
/// use oxrdf::NamedNode;
/// use oxrdf::vocab::xsd;
/// use oxshexc::{NodeConstraint, Shape, ShExCSerializer, TripleConstraint};
///
/// let mut serializer = ShExCSerializer::new()
///     .with_prefix("ex", "http://example.com/")?
///     .with_prefix("xsd", "http://www.w3.org/2001/XMLSchema#")?
///     .for_writer(Vec::new());
/// serializer.serialize_shape(
///     NamedNode::new("http://example.com/PersonShape")?,
///     Shape::with_expression(TripleConstraint::with_value_expr(
///         NamedNode::new("http://example.com/name")?,
///         NodeConstraint::with_datatype(xsd::STRING.into_owned()),
///     )),
/// )?;
/// assert_eq!(
///     b"PREFIX ex: <http://example.com/>\nPREFIX xsd: <http://www.w3.org/2001/XMLSchema#>\n\nex:PersonShape {\n  ex:name xsd:string\n}\n",
///     serializer.finish()?.as_slice()
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Default, Clone, Debug)]
#[must_use]
pub struct ShExCSerializer {
    prefixes: BTreeMap<String, String>,
    options: PrintOptions,
    errors: ErrorHandler,
}

impl ShExCSerializer {
    /// Builds a new [`ShExCSerializer`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a prefix, declared before anything else is written.
    #[inline]
    pub fn with_prefix(
        mut self,
        prefix_name: impl Into<String>,
        prefix_iri: impl Into<String>,
    ) -> Result<Self, IriParseError> {
        self.prefixes.insert(
            prefix_name.into(),
            Iri::parse(prefix_iri.into())?.into_inner(),
        );
        Ok(self)
    }

    /// Disables the structural checks of the input.
    ///
    /// ShExJ documents without `"type"` discriminants on the schema, semantic actions,
    /// annotations or stems are then accepted.
    #[inline]
    pub fn lax(mut self) -> Self {
        self.options.lax = true;
        self
    }

    /// Only wraps `EachOf` and `SomeOf` triple expressions in parentheses where the precedence
    /// rules or a cardinality, annotation or semantic action on the group require them.
    ///
    /// By default every group is wrapped.
    ///
    /// ```
    /// use oxrdf::NamedNode;
    /// use oxshexc::{Shape, ShExCSerializer, TripleConstraint, TripleExpression};
    ///
    /// let group = TripleExpression::each_of([
    ///     TripleExpression::from(TripleConstraint::new(NamedNode::new("http://example.com/a")?)),
    ///     TripleExpression::from(TripleConstraint::new(NamedNode::new("http://example.com/b")?)),
    /// ]);
    /// let mut serializer = ShExCSerializer::new()
    ///     .with_prefix("ex", "http://example.com/")?
    ///     .with_simplified_parentheses()
    ///     .for_writer(Vec::new());
    /// serializer.serialize_shape(
    ///     NamedNode::new("http://example.com/S")?,
    ///     Shape::with_expression(group),
    /// )?;
    /// assert_eq!(
    ///     b"PREFIX ex: <http://example.com/>\n\nex:S {\n  ex:a .;\n  ex:b .\n}\n",
    ///     serializer.finish()?.as_slice()
    /// );
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    #[inline]
    pub fn with_simplified_parentheses(mut self) -> Self {
        self.options.simplify_parentheses = true;
        self
    }

    /// Sets the function called on every [`SchemaError`].
    ///
    /// Returning `Ok(())` skips the faulty part when that is possible
    /// (a value set conflicting with a datatype, an unknown node kind).
    /// Other errors abort the current operation whatever the function returns.
    ///
    /// ```
    /// use oxrdf::vocab::xsd;
    /// use oxrdf::{Literal, NamedNode};
    /// use oxshexc::{NodeConstraint, ShExCSerializer};
    ///
    /// let mut constraint = NodeConstraint::with_datatype(xsd::STRING.into_owned());
    /// constraint.values = Some(vec![Literal::new_simple_literal("a").into()]);
    ///
    /// let mut serializer = ShExCSerializer::new()
    ///     .with_error_handler(|_| Ok(()))
    ///     .for_writer(Vec::new());
    /// serializer.serialize_shape(NamedNode::new("http://example.com/S")?, constraint)?;
    /// assert_eq!(
    ///     b"<http://example.com/S> <http://www.w3.org/2001/XMLSchema#string>\n",
    ///     serializer.finish()?.as_slice()
    /// );
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    #[inline]
    pub fn with_error_handler(
        mut self,
        handler: impl Fn(SchemaError) -> Result<(), SchemaError> + Send + Sync + 'static,
    ) -> Self {
        self.errors = ErrorHandler::new(handler);
        self
    }

    /// Serializes a ShExC file to a [`Write`] implementation.
    ///
    /// This writer does unbuffered writes: each declaration is written with one `write_all` call.
    pub fn for_writer<W: Write>(self, writer: W) -> WriterShExCSerializer<W> {
        WriterShExCSerializer {
            writer,
            low_level_writer: self.low_level(),
        }
    }

    /// Serializes a ShExC file to a [`AsyncWrite`] implementation.
    ///
    /// ```
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use oxrdf::NamedNode;
    /// use oxshexc::{ShapeExpression, ShExCSerializer};
    ///
    /// let mut serializer = ShExCSerializer::new()
    ///     .with_prefix("ex", "http://example.com/")?
    ///     .for_tokio_async_writer(Vec::new());
    /// serializer
    ///     .serialize_shape(
    ///         NamedNode::new("http://example.com/S")?,
    ///         ShapeExpression::ShapeExternal,
    ///     )
    ///     .await?;
    /// assert_eq!(
    ///     b"PREFIX ex: <http://example.com/>\n\nex:S EXTERNAL\n",
    ///     serializer.finish().await?.as_slice()
    /// );
    /// # Ok(())
    /// # }
    /// ```
    #[cfg(feature = "async-tokio")]
    pub fn for_tokio_async_writer<W: AsyncWrite + Unpin>(
        self,
        writer: W,
    ) -> TokioAsyncWriterShExCSerializer<W> {
        TokioAsyncWriterShExCSerializer {
            writer,
            low_level_writer: self.low_level(),
            buffer: Vec::new(),
        }
    }

    /// Builds a low-level ShExC writer.
    ///
    /// Unlike the other writers it does not own its output: the [`Write`] implementation is
    /// given to each call, and it keeps track of whether it has been finished.
    ///
    /// ```
    /// use oxrdf::NamedNode;
    /// use oxshexc::{SchemaError, ShExCError, ShapeExpression, ShExCSerializer};
    ///
    /// let mut buf = Vec::new();
    /// let mut serializer = ShExCSerializer::new().low_level();
    /// serializer.serialize_prefix("ex", "http://example.com/", &mut buf)?;
    /// serializer.serialize_shape(
    ///     &NamedNode::new("http://example.com/S")?.into(),
    ///     &ShapeExpression::ShapeExternal,
    ///     &mut buf,
    /// )?;
    /// serializer.finish(&mut buf)?;
    /// assert!(matches!(
    ///     serializer.serialize_prefix("ex", "http://example.org/", &mut buf),
    ///     Err(ShExCError::Schema(SchemaError::WriteAfterClose))
    /// ));
    /// assert_eq!(
    ///     b"PREFIX ex: <http://example.com/>\n\nex:S EXTERNAL\n",
    ///     buf.as_slice()
    /// );
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn low_level(self) -> LowLevelShExCSerializer {
        LowLevelShExCSerializer {
            inner: InnerShExCWriter {
                pending_prefixes: self.prefixes,
                prefixes: PrefixTable::default(),
                options: self.options,
                errors: self.errors,
            },
            closed: false,
            on_finish: None,
        }
    }

    /// Serializes a whole schema to a string.
    ///
    /// ```
    /// use oxrdf::NamedNode;
    /// use oxshexc::{ShapeExpression, ShapesSchema, ShExCSerializer};
    ///
    /// let mut schema = ShapesSchema::new();
    /// schema.add_prefix("ex", "http://example.com/");
    /// schema.start = Some(ShapeExpression::reference(NamedNode::new("http://example.com/S")?));
    /// schema.add_shape(NamedNode::new("http://example.com/S")?, ShapeExpression::ShapeExternal);
    /// assert_eq!(
    ///     ShExCSerializer::new().serialize_to_string(&schema)?,
    ///     "PREFIX ex: <http://example.com/>\n\nstart = @ex:S\nex:S EXTERNAL\n"
    /// );
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn serialize_to_string(&self, schema: &ShapesSchema) -> Result<String, ShExCError> {
        let mut serializer = self.clone().for_writer(Vec::new());
        serializer.serialize_schema(schema)?;
        let buffer = serializer.finish()?;
        String::from_utf8(buffer)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
    }
}

/// Serializes a ShExC file to a [`Write`] implementation.
///
/// Can be built using [`ShExCSerializer::for_writer`].
///
/// ```
/// use oxshexc::ShExCSerializer;
///
/// let mut serializer = ShExCSerializer::new().for_writer(Vec::new());
/// serializer.serialize_shexj(&serde_json::json!({
///     "type": "Schema",
///     "shapes": [{
///         "type": "NodeConstraint",
///         "id": "http://example.com/S",
///         "nodeKind": "iri"
///     }]
/// }))?;
/// assert_eq!(b"<http://example.com/S> IRI\n", serializer.finish()?.as_slice());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[must_use]
pub struct WriterShExCSerializer<W: Write> {
    writer: W,
    low_level_writer: LowLevelShExCSerializer,
}

impl<W: Write> WriterShExCSerializer<W> {
    /// Declares a prefix, if it is not already declared with the same namespace.
    pub fn serialize_prefix(&mut self, name: &str, iri: &str) -> Result<(), ShExCError> {
        self.low_level_writer
            .serialize_prefix(name, iri, &mut self.writer)
    }

    /// Declares the prefixes not already declared with the same namespace.
    pub fn serialize_prefixes<'a>(
        &mut self,
        prefixes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<(), ShExCError> {
        self.low_level_writer
            .serialize_prefixes(prefixes, &mut self.writer)
    }

    /// Writes a shape declaration.
    pub fn serialize_shape(
        &mut self,
        label: impl Into<ShapeLabel>,
        expr: impl Into<ShapeExpression>,
    ) -> Result<(), ShExCError> {
        self.low_level_writer
            .serialize_shape(&label.into(), &expr.into(), &mut self.writer)
    }

    /// Writes a whole schema.
    pub fn serialize_schema(&mut self, schema: &ShapesSchema) -> Result<(), ShExCError> {
        self.low_level_writer
            .serialize_schema(schema, &mut self.writer)
    }

    /// Writes a whole schema given as a ShExJ JSON object.
    pub fn serialize_shexj(&mut self, schema: &serde_json::Value) -> Result<(), ShExCError> {
        self.low_level_writer
            .serialize_shexj(schema, &mut self.writer)
    }

    /// Ends the write process and returns the underlying [`Write`].
    pub fn finish(mut self) -> Result<W, ShExCError> {
        self.low_level_writer.finish(&mut self.writer)?;
        Ok(self.writer)
    }
}

/// Serializes a ShExC file to a [`AsyncWrite`] implementation.
///
/// Can be built using [`ShExCSerializer::for_tokio_async_writer`].
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use oxrdf::NamedNode;
/// use oxshexc::{NodeConstraint, NodeKind, ShExCSerializer};
///
/// let mut serializer = ShExCSerializer::new().for_tokio_async_writer(Vec::new());
/// serializer
///     .serialize_shape(
///         NamedNode::new("http://example.com/S")?,
///         NodeConstraint::with_node_kind(NodeKind::Literal),
///     )
///     .await?;
/// assert_eq!(
///     b"<http://example.com/S> LITERAL\n",
///     serializer.finish().await?.as_slice()
/// );
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "async-tokio")]
#[must_use]
pub struct TokioAsyncWriterShExCSerializer<W: AsyncWrite + Unpin> {
    writer: W,
    low_level_writer: LowLevelShExCSerializer,
    buffer: Vec<u8>,
}

#[cfg(feature = "async-tokio")]
impl<W: AsyncWrite + Unpin> TokioAsyncWriterShExCSerializer<W> {
    /// Declares a prefix, if it is not already declared with the same namespace.
    pub async fn serialize_prefix(&mut self, name: &str, iri: &str) -> Result<(), ShExCError> {
        let result = self
            .low_level_writer
            .serialize_prefix(name, iri, &mut self.buffer);
        self.flush_buffer().await?;
        result
    }

    /// Declares the prefixes not already declared with the same namespace.
    pub async fn serialize_prefixes<'a>(
        &mut self,
        prefixes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<(), ShExCError> {
        let result = self
            .low_level_writer
            .serialize_prefixes(prefixes, &mut self.buffer);
        self.flush_buffer().await?;
        result
    }

    /// Writes a shape declaration.
    pub async fn serialize_shape(
        &mut self,
        label: impl Into<ShapeLabel>,
        expr: impl Into<ShapeExpression>,
    ) -> Result<(), ShExCError> {
        let result =
            self.low_level_writer
                .serialize_shape(&label.into(), &expr.into(), &mut self.buffer);
        self.flush_buffer().await?;
        result
    }

    /// Writes a whole schema.
    pub async fn serialize_schema(&mut self, schema: &ShapesSchema) -> Result<(), ShExCError> {
        let result = self
            .low_level_writer
            .serialize_schema(schema, &mut self.buffer);
        self.flush_buffer().await?;
        result
    }

    /// Writes a whole schema given as a ShExJ JSON object.
    pub async fn serialize_shexj(&mut self, schema: &serde_json::Value) -> Result<(), ShExCError> {
        let result = self
            .low_level_writer
            .serialize_shexj(schema, &mut self.buffer);
        self.flush_buffer().await?;
        result
    }

    /// Ends the write process and returns the underlying [`AsyncWrite`].
    pub async fn finish(mut self) -> Result<W, ShExCError> {
        self.low_level_writer.finish(&mut self.buffer)?;
        self.flush_buffer().await?;
        self.writer.flush().await?;
        Ok(self.writer)
    }

    async fn flush_buffer(&mut self) -> io::Result<()> {
        self.writer.write_all(&self.buffer).await?;
        self.buffer.clear();
        Ok(())
    }
}

type FinishCallback = Box<dyn FnOnce(Result<(), &io::Error>) + Send>;

/// Serializes a ShExC file to a [`Write`] implementation given to each call.
///
/// Can be built using [`ShExCSerializer::low_level`].
///
/// Each declaration is rendered in full before being written with a single `write_all`,
/// so an error in a declaration never leaves part of it in the output.
/// Declarations written before the error are kept.
#[must_use]
pub struct LowLevelShExCSerializer {
    inner: InnerShExCWriter,
    closed: bool,
    on_finish: Option<FinishCallback>,
}

impl LowLevelShExCSerializer {
    /// Declares a prefix, if it is not already declared with the same namespace.
    pub fn serialize_prefix(
        &mut self,
        name: &str,
        iri: &str,
        write: impl Write,
    ) -> Result<(), ShExCError> {
        self.serialize_prefixes([(name, iri)], write)
    }

    /// Declares the prefixes not already declared with the same namespace.
    ///
    /// The declarations are followed by an empty line if at least one of them is new.
    pub fn serialize_prefixes<'a>(
        &mut self,
        prefixes: impl IntoIterator<Item = (&'a str, &'a str)>,
        mut write: impl Write,
    ) -> Result<(), ShExCError> {
        self.check_open()?;
        let mut chunk = self.inner.take_pending_prefixes();
        self.inner.write_prefixes(prefixes, &mut chunk);
        write_chunk(&chunk, &mut write)
    }

    /// Writes a shape declaration.
    pub fn serialize_shape(
        &mut self,
        label: &ShapeLabel,
        expr: &ShapeExpression,
        mut write: impl Write,
    ) -> Result<(), ShExCError> {
        self.check_open()?;
        write_chunk(&self.inner.take_pending_prefixes(), &mut write)?;
        let mut chunk = String::new();
        self.inner.write_declaration(label, expr, &mut chunk)?;
        write_chunk(&chunk, &mut write)
    }

    /// Writes a whole schema: prefixes, base IRI, start semantic actions, start expression and shapes.
    pub fn serialize_schema(
        &mut self,
        schema: &ShapesSchema,
        mut write: impl Write,
    ) -> Result<(), ShExCError> {
        self.check_open()?;
        let mut chunks = Vec::new();
        let result = self.inner.write_schema(schema, &mut chunks);
        for chunk in &chunks {
            write_chunk(chunk, &mut write)?;
        }
        result.map_err(Into::into)
    }

    /// Writes a whole schema given as a ShExJ JSON object.
    pub fn serialize_shexj(
        &mut self,
        schema: &serde_json::Value,
        write: impl Write,
    ) -> Result<(), ShExCError> {
        self.check_open()?;
        let schema = shexj::schema_from_json(schema, self.inner.options.lax, &self.inner.errors)?;
        self.serialize_schema(&schema, write)
    }

    /// Registers a function called once when the serializer is finished,
    /// with the error raised when flushing the output if there is one.
    ///
    /// ```
    /// use oxshexc::ShExCSerializer;
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    ///
    /// let calls = Arc::new(AtomicUsize::new(0));
    /// let mut serializer = ShExCSerializer::new().low_level();
    /// serializer.on_finish({
    ///     let calls = Arc::clone(&calls);
    ///     move |result| {
    ///         assert!(result.is_ok());
    ///         calls.fetch_add(1, Ordering::SeqCst);
    ///     }
    /// });
    /// let mut buf = Vec::new();
    /// serializer.finish(&mut buf)?;
    /// serializer.finish(&mut buf)?;
    /// assert_eq!(calls.load(Ordering::SeqCst), 1);
    /// # std::io::Result::Ok(())
    /// ```
    pub fn on_finish(&mut self, callback: impl FnOnce(Result<(), &io::Error>) + Send + 'static) {
        self.on_finish = Some(Box::new(callback));
    }

    /// Returns true if [`finish`](Self::finish) has already been called.
    pub fn is_finished(&self) -> bool {
        self.closed
    }

    /// Ends the write process.
    ///
    /// The pending prefixes are written and the output is flushed.
    /// Later calls do nothing and later writes fail with [`SchemaError::WriteAfterClose`],
    /// which is also given to the error handler.
    /// The [`on_finish`](Self::on_finish) callback is called exactly once, even if flushing fails.
    pub fn finish(&mut self, mut write: impl Write) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let pending = self.inner.take_pending_prefixes();
        let result = write
            .write_all(pending.as_bytes())
            .and_then(|()| write.flush());
        match &result {
            Ok(()) => tracing::debug!("ShExC serializer finished"),
            Err(e) => tracing::warn!(error = %e, "ShExC serializer failed to flush its output"),
        }
        if let Some(callback) = self.on_finish.take() {
            callback(result.as_ref().map(|_| ()));
        }
        result
    }

    fn check_open(&self) -> Result<(), ShExCError> {
        if self.closed {
            return Err(self.inner.errors.fatal(SchemaError::WriteAfterClose).into());
        }
        Ok(())
    }
}

fn write_chunk(chunk: &str, write: &mut impl Write) -> Result<(), ShExCError> {
    if !chunk.is_empty() {
        write.write_all(chunk.as_bytes())?;
    }
    Ok(())
}

/// Serializer state independent from the output.
struct InnerShExCWriter {
    /// Prefixes given to the builder, not yet declared.
    pending_prefixes: BTreeMap<String, String>,
    prefixes: PrefixTable,
    options: PrintOptions,
    errors: ErrorHandler,
}

impl InnerShExCWriter {
    fn take_pending_prefixes(&mut self) -> String {
        let mut chunk = String::new();
        if !self.pending_prefixes.is_empty() {
            let pending = std::mem::take(&mut self.pending_prefixes);
            self.write_prefixes(
                pending.iter().map(|(name, iri)| (name.as_str(), iri.as_str())),
                &mut chunk,
            );
        }
        chunk
    }

    fn write_prefixes<'a>(
        &mut self,
        prefixes: impl IntoIterator<Item = (&'a str, &'a str)>,
        out: &mut String,
    ) {
        let mut new_prefixes = false;
        for (name, iri) in prefixes {
            if self.prefixes.register(name, iri) {
                tracing::debug!(prefix = name, namespace = iri, "registered ShExC prefix");
                new_prefixes = true;
                out.push_str("PREFIX ");
                out.push_str(name);
                out.push_str(": ");
                write_full_iri(iri, out);
                out.push('\n');
            }
        }
        if new_prefixes {
            out.push('\n');
        }
    }

    fn shape_writer(&self) -> ShapeWriter<'_> {
        ShapeWriter::new(&self.prefixes, &self.errors, self.options)
    }

    fn write_declaration(
        &self,
        label: &ShapeLabel,
        expr: &ShapeExpression,
        out: &mut String,
    ) -> Result<(), SchemaError> {
        tracing::trace!(%label, "writing ShExC shape declaration");
        self.prefixes.write_label(label, out);
        out.push(' ');
        self.shape_writer().write_shape_expr(expr, true, 0, out)?;
        out.push('\n');
        Ok(())
    }

    /// Renders a schema, one chunk per statement.
    ///
    /// On error the chunks rendered before the faulty statement are kept in `chunks`.
    fn write_schema(
        &mut self,
        schema: &ShapesSchema,
        chunks: &mut Vec<String>,
    ) -> Result<(), SchemaError> {
        let mut prefixes = self.take_pending_prefixes();
        self.write_prefixes(
            schema
                .prefixes
                .iter()
                .map(|(name, iri)| (name.as_str(), iri.as_str())),
            &mut prefixes,
        );
        chunks.push(prefixes);

        if let Some(base) = &schema.base {
            let mut chunk = String::from("BASE ");
            write_full_iri(base, &mut chunk);
            chunk.push('\n');
            chunks.push(chunk);
        }
        if !schema.start_acts.is_empty() {
            let mut chunk = String::new();
            let writer = self.shape_writer();
            for sem_act in &schema.start_acts {
                writer.write_sem_act(sem_act, &mut chunk);
                chunk.push('\n');
            }
            chunks.push(chunk);
        }
        if let Some(start) = &schema.start {
            tracing::trace!("writing ShExC start declaration");
            let mut chunk = String::from("start = ");
            self.shape_writer()
                .write_shape_expr(start, true, 0, &mut chunk)?;
            chunk.push('\n');
            chunks.push(chunk);
        }
        for (label, expr) in schema.shapes() {
            let mut chunk = String::new();
            self.write_declaration(label, expr, &mut chunk)?;
            chunks.push(chunk);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        NodeConstraint, NodeKind, SemAct, Shape, TripleConstraint, ValueSetValue,
    };
    use oxrdf::NamedNode;
    use oxrdf::vocab::{rdf, xsd};

    fn ex(local: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{local}"))
    }

    #[test]
    fn test_prefix_block_is_only_written_for_new_mappings() -> Result<(), ShExCError> {
        let mut buf = Vec::new();
        let mut serializer = ShExCSerializer::new().low_level();
        serializer.serialize_prefix("ex", "http://example.org/", &mut buf)?;
        serializer.serialize_prefix("ex", "http://example.org/", &mut buf)?;
        serializer.serialize_prefixes(
            [("ex", "http://example.org/"), ("xsd", "http://www.w3.org/2001/XMLSchema#")],
            &mut buf,
        )?;
        assert_eq!(
            String::from_utf8_lossy(&buf),
            "PREFIX ex: <http://example.org/>\n\nPREFIX xsd: <http://www.w3.org/2001/XMLSchema#>\n\n"
        );
        Ok(())
    }

    #[test]
    fn test_builder_prefixes_are_written_at_finish() -> Result<(), Box<dyn std::error::Error>> {
        let serializer = ShExCSerializer::new()
            .with_prefix("ex", "http://example.org/")?
            .for_writer(Vec::new());
        assert_eq!(
            String::from_utf8(serializer.finish()?)?,
            "PREFIX ex: <http://example.org/>\n\n"
        );
        Ok(())
    }

    #[test]
    fn test_invalid_builder_prefix() {
        assert!(ShExCSerializer::new().with_prefix("ex", "not an iri").is_err());
    }

    #[test]
    fn test_schema_statement_order() -> Result<(), ShExCError> {
        let mut schema = ShapesSchema::new();
        schema.add_prefix("ex", "http://example.org/");
        schema.base = Some("http://example.org/base/".into());
        schema.start_acts.push(SemAct::with_code(ex("js"), "init()"));
        schema.start = Some(ShapeExpression::reference(ex("S")));
        schema.add_shape(
            ex("S"),
            Shape::with_expression(TripleConstraint::with_value_expr(
                rdf::TYPE.into_owned(),
                NodeConstraint::with_values([ValueSetValue::from(ex("Person"))]),
            )),
        );
        assert_eq!(
            ShExCSerializer::new().serialize_to_string(&schema)?,
            "PREFIX ex: <http://example.org/>\n\nBASE <http://example.org/base/>\n%ex:js{init()%}\nstart = @ex:S\nex:S {\n  a [ex:Person]\n}\n"
        );
        Ok(())
    }

    #[test]
    fn test_failed_declaration_writes_nothing() {
        let mut conflicting = NodeConstraint::with_datatype(xsd::STRING.into_owned());
        conflicting.values = Some(vec![ex("a").into()]);
        let mut schema = ShapesSchema::new();
        schema.add_shape(ex("A"), NodeConstraint::with_node_kind(NodeKind::Iri));
        schema.add_shape(ex("B"), conflicting);
        schema.add_shape(ex("C"), NodeConstraint::with_node_kind(NodeKind::Iri));

        let mut buf = Vec::new();
        let mut serializer = ShExCSerializer::new().low_level();
        assert!(matches!(
            serializer.serialize_schema(&schema, &mut buf),
            Err(ShExCError::Schema(SchemaError::ConflictingConstraint { .. }))
        ));
        assert_eq!(
            String::from_utf8_lossy(&buf),
            "<http://example.org/A> IRI\n"
        );
    }

    #[test]
    fn test_write_after_finish() -> io::Result<()> {
        let mut buf = Vec::new();
        let mut serializer = ShExCSerializer::new().low_level();
        assert!(!serializer.is_finished());
        serializer.finish(&mut buf)?;
        assert!(serializer.is_finished());
        assert!(matches!(
            serializer.serialize_shape(
                &ex("S").into(),
                &ShapeExpression::ShapeExternal,
                &mut buf
            ),
            Err(ShExCError::Schema(SchemaError::WriteAfterClose))
        ));
        assert!(buf.is_empty());
        Ok(())
    }

    #[test]
    fn test_write_after_finish_is_reported_to_handler() -> io::Result<()> {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut serializer = ShExCSerializer::new()
            .with_error_handler({
                let seen = Arc::clone(&seen);
                move |error| {
                    if let Ok(mut seen) = seen.lock() {
                        seen.push(error);
                    }
                    Ok(())
                }
            })
            .low_level();
        let mut buf = Vec::new();
        serializer.finish(&mut buf)?;
        assert!(matches!(
            serializer.serialize_prefix("ex", "http://example.org/", &mut buf),
            Err(ShExCError::Schema(SchemaError::WriteAfterClose))
        ));
        assert_eq!(
            seen.lock().map(|seen| seen.clone()).ok(),
            Some(vec![SchemaError::WriteAfterClose])
        );
        assert!(buf.is_empty());
        Ok(())
    }

    struct FailingFlush;

    impl Write for FailingFlush {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("flush failed"))
        }
    }

    #[test]
    fn test_finish_callback_fires_once_on_failure() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let failures = Arc::new(AtomicUsize::new(0));
        let mut serializer = ShExCSerializer::new().low_level();
        serializer.on_finish({
            let failures = Arc::clone(&failures);
            move |result| {
                if result.is_err() {
                    failures.fetch_add(1, Ordering::SeqCst);
                }
            }
        });
        assert!(serializer.finish(FailingFlush).is_err());
        assert!(serializer.finish(FailingFlush).is_ok());
        assert_eq!(failures.load(Ordering::SeqCst), 1);
    }
}
