//! Argument descriptors and the per-target argument table.
//!
//! A target type implements [`Args`] and returns an [`ArgumentTable`]: the
//! static metadata of every bindable argument plus the callback that writes a
//! bound value into the target.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;

use crate::error::BindError;
use crate::properties::ArgsProperties;
use crate::registry::{TypeTag, Value};

/// A configuration type that can be populated from command line tokens.
pub trait Args: Sized + 'static {
    /// Description of the program, printed at the top of the help text.
    fn program_info(&self) -> &str;

    /// Prefix, help identifiers and help behaviour for this target.
    ///
    /// `None` means the target did not declare any and the defaults apply.
    fn properties() -> Option<ArgsProperties> {
        None
    }

    /// The arguments this target accepts.
    fn arguments() -> ArgumentTable<Self>;
}

/// How an argument consumes tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Boolean field set by the identifier alone
    Flag,
    /// Field bound from one value of the given type
    Field(TypeTag),
    /// Handler called with one value per declared parameter
    Handler(Vec<TypeTag>),
}

impl ValueKind {
    /// Every type that needs a parser to bind this argument.
    pub fn value_types(&self) -> &[TypeTag] {
        match self {
            ValueKind::Flag => &[],
            ValueKind::Field(tag) => std::slice::from_ref(tag),
            ValueKind::Handler(tags) => tags,
        }
    }
}

/// Immutable metadata for one argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDescriptor {
    pub name: String,
    pub info: String,
    pub required: bool,
    pub requires: Vec<String>,
    pub excludes: Vec<String>,
    pub kind: ValueKind,
}

impl ArgumentDescriptor {
    pub fn is_flag(&self) -> bool {
        matches!(self.kind, ValueKind::Flag)
    }
}

/// Builder for the name and constraints of an argument.
///
/// The value kind is fixed when the argument is added to an
/// [`ArgumentTable`].
#[derive(Debug, Clone)]
pub struct Argument {
    name: String,
    info: String,
    required: bool,
    requires: Vec<String>,
    excludes: Vec<String>,
}

impl Argument {
    pub fn new(name: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            info: info.into(),
            required: false,
            requires: Vec::new(),
            excludes: Vec::new(),
        }
    }

    /// The argument must always be supplied.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Arguments that must be supplied whenever this one is.
    pub fn requires<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        push_unique(&mut self.requires, names);
        self
    }

    /// Arguments that must not be supplied together with this one.
    pub fn excludes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        push_unique(&mut self.excludes, names);
        self
    }

    fn into_descriptor(self, kind: ValueKind) -> ArgumentDescriptor {
        ArgumentDescriptor {
            name: self.name,
            info: self.info,
            required: self.required,
            requires: self.requires,
            excludes: self.excludes,
            kind,
        }
    }
}

fn push_unique<I, S>(target: &mut Vec<String>, names: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for name in names {
        let name = name.into();
        if !target.contains(&name) {
            target.push(name);
        }
    }
}

type FieldSetter<A> = Box<dyn Fn(&mut A, Value) -> Result<(), &'static str>>;
type SwitchSetter<A> = Box<dyn Fn(&mut A)>;
type HandlerFn<A> = Box<dyn Fn(&mut A, &mut ParsedValues) -> Result<(), BindError>>;

/// Writes bound values into the target.
pub(crate) enum Binding<A> {
    Flag(fn(&mut A) -> &mut bool),
    /// A `bool` field declared through [`ArgumentTable::value`]. Binds like a
    /// flag, but its current value cannot be read back.
    Switch(SwitchSetter<A>),
    Field(FieldSetter<A>),
    Handler(HandlerFn<A>),
}

pub(crate) struct Entry<A> {
    pub(crate) descriptor: ArgumentDescriptor,
    pub(crate) binding: Binding<A>,
}

/// The explicit descriptor table of a target type.
pub struct ArgumentTable<A> {
    entries: Vec<Entry<A>>,
}

impl<A: 'static> ArgumentTable<A> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a boolean flag. Supplying the identifier sets the field to `true`.
    pub fn flag(mut self, argument: Argument, field: fn(&mut A) -> &mut bool) -> Self {
        self.entries.push(Entry {
            descriptor: argument.into_descriptor(ValueKind::Flag),
            binding: Binding::Flag(field),
        });
        self
    }

    /// Add an argument taking one value of type `T`.
    ///
    /// A `bool` argument takes no value: the identifier alone passes `true`
    /// to `setter`, the same as [`flag`](Self::flag).
    pub fn value<T, F>(mut self, argument: Argument, setter: F) -> Self
    where
        T: Any,
        F: Fn(&mut A, T) + 'static,
    {
        if TypeTag::of::<T>() == TypeTag::of::<bool>() {
            let switch: SwitchSetter<A> = Box::new(move |target| {
                let on: Box<dyn Any> = Box::new(true);
                if let Ok(on) = on.downcast::<T>() {
                    setter(target, *on);
                }
            });
            self.entries.push(Entry {
                descriptor: argument.into_descriptor(ValueKind::Flag),
                binding: Binding::Switch(switch),
            });
            return self;
        }

        let setter: FieldSetter<A> = Box::new(move |target, value| {
            let value = value
                .downcast::<T>()
                .map_err(|_| std::any::type_name::<T>())?;
            setter(target, *value);
            Ok(())
        });
        self.entries.push(Entry {
            descriptor: argument.into_descriptor(ValueKind::Field(TypeTag::of::<T>())),
            binding: Binding::Field(setter),
        });
        self
    }

    /// Add an argument whose handler takes one value per entry of `params`,
    /// pulled from the following tokens in order.
    pub fn handler<P, F>(mut self, argument: Argument, params: P, handler: F) -> Self
    where
        P: IntoIterator<Item = TypeTag>,
        F: Fn(&mut A, &mut ParsedValues) -> Result<(), BindError> + 'static,
    {
        let params = params.into_iter().collect();
        self.entries.push(Entry {
            descriptor: argument.into_descriptor(ValueKind::Handler(params)),
            binding: Binding::Handler(Box::new(handler)),
        });
        self
    }

    /// Iterate the descriptors in declaration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ArgumentDescriptor> + Clone {
        self.entries.iter().map(|entry| &entry.descriptor)
    }

    /// The first descriptor called `name`.
    pub fn find(&self, name: &str) -> Option<&ArgumentDescriptor> {
        self.descriptors()
            .find(|descriptor| descriptor.name == name)
    }

    pub(crate) fn entry(&self, name: &str) -> Option<&Entry<A>> {
        self.entries
            .iter()
            .find(|entry| entry.descriptor.name == name)
    }

    pub(crate) fn entries(&self) -> &[Entry<A>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A: 'static> Default for ArgumentTable<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for ArgumentTable<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| &entry.descriptor))
            .finish()
    }
}

/// The values parsed for a handler, in declared parameter order.
pub struct ParsedValues {
    argument: String,
    values: VecDeque<Value>,
}

impl ParsedValues {
    pub(crate) fn new(argument: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            argument: argument.into(),
            values: values.into(),
        }
    }

    /// Take the next parameter as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::ParameterMismatch`] if the next parameter was
    /// declared with another type or no parameters are left.
    pub fn take<T: Any>(&mut self) -> Result<T, BindError> {
        match self.values.pop_front().map(|value| value.downcast::<T>()) {
            Some(Ok(value)) => Ok(*value),
            _ => Err(BindError::ParameterMismatch {
                argument: self.argument.clone(),
                expected: std::any::type_name::<T>(),
            }),
        }
    }

    /// Parameters not taken yet.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}
