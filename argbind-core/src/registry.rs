//! Type parser registry.
//!
//! Maps a [`TypeTag`] to the function that turns the next token(s) of a
//! [`TokenCursor`] into a value of that type. The registry is populated once
//! before parsing starts and is only read while tokens are bound.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ValueError;

/// A parsed value before it is handed to a bind callback.
pub type Value = Box<dyn Any + Send>;

/// A type-erased parser: array delimiter and cursor in, boxed value out.
pub type TypeParser =
    Arc<dyn Fn(&str, &mut TokenCursor<'_>) -> Result<Value, ValueError> + Send + Sync>;

/// Identifies the Rust type an argument binds to.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// The tag for `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Human readable type name used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Forward-only cursor over the raw token list.
///
/// Parsers pull as many tokens as their type needs; the binder uses the same
/// cursor to find the next argument identifier.
#[derive(Debug)]
pub struct TokenCursor<'a> {
    tokens: &'a [String],
    position: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [String]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Whether another token is available.
    pub fn has_next(&self) -> bool {
        self.position < self.tokens.len()
    }

    /// Advance and return the next token, if any.
    pub fn next_token(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token.as_str())
    }

    /// Advance and return the next token, failing with [`ValueError::Exhausted`]
    /// at the end of input.
    pub fn require(&mut self) -> Result<&'a str, ValueError> {
        self.next_token().ok_or(ValueError::Exhausted)
    }

    /// Number of tokens consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// A scalar type with a default token parser.
///
/// Every scalar also gets a `Vec<T>` parser that splits one token on the
/// array delimiter.
pub trait Scalar: Any + Send + Sized {
    fn from_token(token: &str) -> Result<Self, ValueError>;
}

macro_rules! scalar_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                fn from_token(token: &str) -> Result<Self, ValueError> {
                    <$ty>::from_str(token).map_err(|e| ValueError::invalid(token, e))
                }
            }
        )*
    };
}

scalar_from_str!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl Scalar for String {
    fn from_token(token: &str) -> Result<Self, ValueError> {
        Ok(token.to_string())
    }
}

impl Scalar for bool {
    fn from_token(token: &str) -> Result<Self, ValueError> {
        if token.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if token.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ValueError::invalid(token, "expected true or false"))
        }
    }
}

impl Scalar for char {
    // Only the first character counts; the rest of the token is ignored.
    fn from_token(token: &str) -> Result<Self, ValueError> {
        token
            .chars()
            .next()
            .ok_or_else(|| ValueError::invalid(token, "expected a character"))
    }
}

/// Split an array token on `delimiter`, dropping trailing empty segments.
fn split_elements<'t>(token: &'t str, delimiter: &str) -> Vec<&'t str> {
    let mut parts: Vec<&str> = if delimiter.is_empty() {
        vec![token]
    } else {
        token.split(delimiter).collect()
    };
    while parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }
    parts
}

/// Parse a homogeneous array from one token. An exhausted cursor yields an
/// empty array.
pub fn parse_array<T: Scalar>(
    delimiter: &str,
    cursor: &mut TokenCursor<'_>,
) -> Result<Vec<T>, ValueError> {
    match cursor.next_token() {
        Some(token) => split_elements(token, delimiter)
            .into_iter()
            .map(T::from_token)
            .collect(),
        None => Ok(Vec::new()),
    }
}

/// Registry of type parsers keyed by [`TypeTag`].
#[derive(Clone, Default)]
pub struct TypeRegistry {
    parsers: HashMap<TypeTag, TypeParser>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry with parsers for strings, integers, floats, booleans,
    /// characters and arrays of each.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register_scalar::<String>();
        registry.register_scalar::<i8>();
        registry.register_scalar::<i16>();
        registry.register_scalar::<i32>();
        registry.register_scalar::<i64>();
        registry.register_scalar::<u8>();
        registry.register_scalar::<u16>();
        registry.register_scalar::<u32>();
        registry.register_scalar::<u64>();
        registry.register_scalar::<f32>();
        registry.register_scalar::<f64>();
        registry.register_scalar::<bool>();
        registry.register_scalar::<char>();
        registry
    }

    /// Register the parser for `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` already has a parser. Registering twice is a programming
    /// error, not a recoverable condition.
    pub fn register<T, F>(&mut self, parser: F)
    where
        T: Any + Send,
        F: Fn(&str, &mut TokenCursor<'_>) -> Result<T, ValueError> + Send + Sync + 'static,
    {
        let tag = TypeTag::of::<T>();
        assert!(
            !self.parsers.contains_key(&tag),
            "A parser for type '{}' has already been added.",
            tag
        );
        let erased: TypeParser = Arc::new(move |delimiter: &str, cursor: &mut TokenCursor<'_>| {
            parser(delimiter, cursor)
                .map(|value| Box::new(value) as Value)
        });
        self.parsers.insert(tag, erased);
    }

    /// Register `T` and `Vec<T>` using the [`Scalar`] rules.
    pub fn register_scalar<T: Scalar>(&mut self) {
        self.register::<T, _>(|_, cursor| T::from_token(cursor.require()?));
        self.register::<Vec<T>, _>(parse_array::<T>);
    }

    /// Whether `tag` has a parser.
    pub fn contains(&self, tag: TypeTag) -> bool {
        self.parsers.contains_key(&tag)
    }

    /// The parser registered for `tag`.
    pub fn lookup(&self, tag: TypeTag) -> Option<TypeParser> {
        self.parsers.get(&tag).cloned()
    }

    /// Withdraw the parser for `tag`, returning whether one was registered.
    pub fn remove(&mut self, tag: TypeTag) -> bool {
        self.parsers.remove(&tag).is_some()
    }

    /// Run the parser for `tag` against the cursor.
    ///
    /// Returns `None` when no parser is registered for `tag`.
    pub fn parse(
        &self,
        tag: TypeTag,
        delimiter: &str,
        cursor: &mut TokenCursor<'_>,
    ) -> Option<Result<Value, ValueError>> {
        self.parsers
            .get(&tag)
            .map(|parser| parser(delimiter, cursor))
    }

    /// Run the parser for `T` and downcast the result.
    pub fn parse_as<T: Any>(
        &self,
        delimiter: &str,
        cursor: &mut TokenCursor<'_>,
    ) -> Option<Result<T, ValueError>> {
        let parsed = self.parse(TypeTag::of::<T>(), delimiter, cursor)?;
        Some(parsed.map(|value| match value.downcast::<T>() {
            Ok(value) => *value,
            // register::<T> only stores parsers producing T
            Err(_) => unreachable!(
                "parser registered for {} produced another type",
                type_name::<T>()
            ),
        }))
    }

    /// Number of registered parsers.
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.parsers.keys().map(TypeTag::name).collect();
        names.sort_unstable();
        f.debug_struct("TypeRegistry")
            .field("types", &names)
            .finish()
    }
}
