//! Error provenance chains
//!
//! A [`Traced`] error carries the place it was raised plus one
//! [`TraceEntry`] per propagation point that chose to annotate it. Entries
//! are added by consuming the error and returning a new value, so an error
//! that has been handed out is never modified behind a shared reference.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// One `{location, message}` step of an error's propagation path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    location: &'static Location<'static>,
    message: Cow<'static, str>,
}

impl TraceEntry {
    /// Source location that added this entry
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Message attached at that location
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "caught in {}:{}: {}",
            self.location.file(),
            self.location.line(),
            self.message
        )
    }
}

/// An error value together with where it was raised and how it travelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traced<E> {
    kind: E,
    origin: &'static Location<'static>,
    trace: Vec<TraceEntry>,
}

impl<E> Traced<E> {
    /// Wrap `kind`, recording the caller as the origin
    #[track_caller]
    pub fn new(kind: E) -> Self {
        Self {
            kind,
            origin: Location::caller(),
            trace: Vec::new(),
        }
    }

    /// Return the same error with one more entry appended to its trace
    #[track_caller]
    #[must_use]
    pub fn context(self, message: impl Into<Cow<'static, str>>) -> Self {
        let Self {
            kind,
            origin,
            mut trace,
        } = self;
        trace.push(TraceEntry {
            location: Location::caller(),
            message: message.into(),
        });
        Self {
            kind,
            origin,
            trace,
        }
    }

    /// The underlying error
    pub fn kind(&self) -> &E {
        &self.kind
    }

    /// Where the error was first raised
    pub fn origin(&self) -> &'static Location<'static> {
        self.origin
    }

    /// Propagation entries, oldest first
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    /// Drop the provenance and keep the error
    pub fn into_inner(self) -> E {
        self.kind
    }

    /// Convert the error kind while keeping origin and trace
    pub fn map<F>(self, f: impl FnOnce(E) -> F) -> Traced<F> {
        Traced {
            kind: f(self.kind),
            origin: self.origin,
            trace: self.trace,
        }
    }
}

impl<E: fmt::Display> fmt::Display for Traced<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {}:{}",
            self.kind,
            self.origin.file(),
            self.origin.line()
        )?;
        for entry in &self.trace {
            write!(f, "\n -- {}", entry)?;
        }
        Ok(())
    }
}

impl<E> std::error::Error for Traced<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Annotate the error side of a `Result<T, Traced<E>>`
pub trait TraceResultExt<T, E> {
    /// Append a trace entry at the caller's location if this is an error
    fn context(self, message: impl Into<Cow<'static, str>>) -> Result<T, Traced<E>>;
}

impl<T, E> TraceResultExt<T, E> for Result<T, Traced<E>> {
    #[track_caller]
    fn context(self, message: impl Into<Cow<'static, str>>) -> Result<T, Traced<E>> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.context(message)),
        }
    }
}
