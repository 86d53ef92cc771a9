//! Data source abstractions for report generation.
//!
//! A data source is opened once with [`DataSource::run`] and then yields its
//! rows lazily, in a stable order, exactly once per pass.
//!
//! ## Available Sources
//!
//! - `VecDataSource`: In-memory vector of rows, re-runnable
//! - `IteratorDataSource`: Wraps any iterator, single pass only
//!
//! ## Example
//!
//! ```ignore
//! use banded_source::{ConnectionParams, DataSource, VecDataSource};
//! use serde_json::json;
//!
//! let mut source = VecDataSource::new(vec![json!({"id": 1}), json!({"id": 2})]);
//! source.run(&ConnectionParams::default())?;
//!
//! while let Some(row) = source.next()? {
//!     println!("Processing: {:?}", row);
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Data source '{0}' was read before run() was called")]
    NotRunning(String),

    #[error("Data source '{0}' can only be consumed once")]
    AlreadyConsumed(String),

    #[error("Data source '{name}' failed to connect: {message}")]
    Connection { name: String, message: String },

    #[error("Data source '{name}' failed while reading: {message}")]
    Read { name: String, message: String },
}

/// Connection arguments handed to every data source when it is opened.
///
/// Only the three recognised keys are carried; sources that need nothing
/// ignore them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// A connection string or handle name.
    #[serde(default)]
    pub conn: Option<String>,
    /// The driver/module the connection should be made with.
    #[serde(default)]
    pub module: Option<String>,
    /// Driver specific keyword arguments.
    #[serde(default)]
    pub conn_pars: Map<String, Value>,
}

impl ConnectionParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conn(mut self, conn: impl Into<String>) -> Self {
        self.conn = Some(conn.into());
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_conn_par(mut self, key: impl Into<String>, value: Value) -> Self {
        self.conn_pars.insert(key.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conn.is_none() && self.module.is_none() && self.conn_pars.is_empty()
    }
}

/// A trait for row sources that feed a report.
///
/// This abstraction allows the report engine to work with various sources:
/// - In-memory collections
/// - Iterators
/// - Database cursors
pub trait DataSource: Send {
    /// Opens the source. Must be called before the first `next()`.
    fn run(&mut self, params: &ConnectionParams) -> Result<(), SourceError>;

    /// Get the next row, if available.
    ///
    /// Returns `Ok(None)` when the source is exhausted.
    fn next(&mut self) -> Result<Option<Value>, SourceError>;

    /// Hint about the total number of rows (for logging).
    ///
    /// Returns `None` if the size is unknown or unbounded.
    fn size_hint(&self) -> Option<usize> {
        None
    }

    /// Check if the source has a known size.
    fn has_known_size(&self) -> bool {
        self.size_hint().is_some()
    }
}

/// Wraps any iterator as a DataSource. The iterator is consumed by the first
/// run; a second `run()` fails.
pub struct IteratorDataSource<I>
where
    I: Iterator<Item = Value> + Send,
{
    name: String,
    inner: I,
    size_hint: Option<usize>,
    running: bool,
    consumed: bool,
}

impl<I> IteratorDataSource<I>
where
    I: Iterator<Item = Value> + Send,
{
    /// Create a new data source from an iterator.
    pub fn new(inner: I) -> Self {
        let (lower, upper) = inner.size_hint();
        let size_hint = if upper == Some(lower) {
            Some(lower)
        } else {
            None
        };
        Self {
            name: "iterator".to_string(),
            inner,
            size_hint,
            running: false,
            consumed: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<I> DataSource for IteratorDataSource<I>
where
    I: Iterator<Item = Value> + Send,
{
    fn run(&mut self, _params: &ConnectionParams) -> Result<(), SourceError> {
        if self.consumed {
            return Err(SourceError::AlreadyConsumed(self.name.clone()));
        }
        self.running = true;
        self.consumed = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Value>, SourceError> {
        if !self.running {
            return Err(SourceError::NotRunning(self.name.clone()));
        }
        Ok(self.inner.next())
    }

    fn size_hint(&self) -> Option<usize> {
        self.size_hint
    }
}

/// A data source backed by an in-memory vector.
///
/// This is the simplest data source, useful for small datasets or testing.
/// Every `run()` rewinds it to the first row.
pub struct VecDataSource {
    data: Vec<Value>,
    index: usize,
    running: bool,
}

impl VecDataSource {
    /// Create a new data source from a vector.
    pub fn new(data: Vec<Value>) -> Self {
        Self {
            data,
            index: 0,
            running: false,
        }
    }

    /// The source used when a report defines none: a single row holding `1`.
    pub fn single_row() -> Self {
        Self::new(vec![Value::from(1)])
    }

    /// Get the total number of rows.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the source is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the number of rows remaining.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.index
    }
}

impl DataSource for VecDataSource {
    fn run(&mut self, _params: &ConnectionParams) -> Result<(), SourceError> {
        self.index = 0;
        self.running = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Value>, SourceError> {
        if !self.running {
            return Err(SourceError::NotRunning("vec".to_string()));
        }
        if self.index < self.data.len() {
            let item = self.data[self.index].clone();
            self.index += 1;
            Ok(Some(item))
        } else {
            Ok(None)
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.data.len())
    }
}

// Blanket implementation for Box<dyn DataSource>
impl DataSource for Box<dyn DataSource> {
    fn run(&mut self, params: &ConnectionParams) -> Result<(), SourceError> {
        (**self).run(params)
    }

    fn next(&mut self) -> Result<Option<Value>, SourceError> {
        (**self).next()
    }

    fn size_hint(&self) -> Option<usize> {
        (**self).size_hint()
    }
}
