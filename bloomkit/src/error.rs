// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error types for bloomkit operations

use std::fmt;

/// ErrorKind is all kinds of Error of bloomkit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The argument provided is invalid.
    InvalidArgument,
    /// A bit index fell outside the addressable range of a bit vector.
    IndexOutOfRange,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::IndexOutOfRange => "IndexOutOfRange",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.into_static())
    }
}

/// Error is the error struct returned by all bloomkit functions.
///
/// # Examples
///
/// ```
/// # use bloomkit::error::Error;
/// # use bloomkit::error::ErrorKind;
/// let err = Error::new(ErrorKind::InvalidArgument, "bad input");
/// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
/// assert_eq!(err.message(), "bad input");
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: vec![],
        }
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Return the value recorded for a context key, if any.
    pub fn context(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

// Convenient constructors used within bloomkit crate.
impl Error {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, msg)
    }

    pub(crate) fn index_out_of_range(index: u64, size: u64) -> Self {
        Self::new(
            ErrorKind::IndexOutOfRange,
            format!("index {index} must be less than bit vector size {size}"),
        )
        .with_context("index", index)
        .with_context("size", size)
    }
}

impl Error {
    fn write_headline(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.into_static())?;
        if self.message.is_empty() {
            return Ok(());
        }
        write!(f, " => {}", self.message)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return f
                .debug_struct("Error")
                .field("kind", &self.kind)
                .field("message", &self.message)
                .field("context", &self.context)
                .finish();
        }

        // one line per context entry, below the headline
        self.write_headline(f)?;
        writeln!(f)?;
        if !self.context.is_empty() {
            writeln!(f, "\nContext:")?;
            for (key, value) in &self.context {
                writeln!(f, "   {key}: {value}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            return self.write_headline(f);
        }

        let entries: Vec<String> = self
            .context
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect();
        write!(f, "{}, context: {{ {} }}", self.kind, entries.join(", "))?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_format_consistency() {
        let err = Error::new(ErrorKind::InvalidArgument, "something went wrong");
        assert_snapshot!(err, @"InvalidArgument => something went wrong");
    }

    #[test]
    fn test_format_index_out_of_range() {
        let err = Error::index_out_of_range(12, 10);
        assert_snapshot!(err, @"IndexOutOfRange, context: { index: 12, size: 10 } => index 12 must be less than bit vector size 10");
        assert_eq!(err.context("index"), Some("12"));
        assert_eq!(err.context("size"), Some("10"));
        assert_eq!(err.context("missing"), None);
    }

    #[test]
    fn test_format_debug_lists_context() {
        let err = Error::index_out_of_range(12, 10);
        assert_eq!(
            format!("{err:?}"),
            "IndexOutOfRange => index 12 must be less than bit vector size 10\n\
             \n\
             Context:\n   \
             index: 12\n   \
             size: 10\n"
        );

        let err = Error::invalid_argument("capacity must be positive");
        assert_eq!(format!("{err:?}"), "InvalidArgument => capacity must be positive\n");
    }

    #[test]
    fn test_format_alternate_debug() {
        let err = Error::invalid_argument("fpr must be between 0 and 1").with_context("fpr", 1.5);
        let rendered = format!("{err:#?}");
        assert!(rendered.contains("InvalidArgument"));
        assert!(rendered.contains("fpr"));
        assert!(rendered.contains("1.5"));
    }
}
