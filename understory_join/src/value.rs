// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased, clonable value storage.
//!
//! A [`ValueBox`] lets one selection carry payloads of different concrete types. Copying a
//! box copies the concrete value behind it (through [`BoxedValue::clone_box`]), and reading it
//! back names the expected type; asking for the wrong type is a
//! [`JoinError::TypeMismatch`], never undefined behavior.

use alloc::boxed::Box;
use core::any::{self, Any};
use core::fmt;

use crate::error::JoinError;

/// Object-safe interface of a value stored in a [`ValueBox`].
///
/// Implemented for every `T: Clone + Debug + 'static`; there is no need to implement it by hand.
pub trait BoxedValue: Any {
    /// Clone the concrete value into a fresh box.
    fn clone_box(&self) -> Box<dyn BoxedValue>;
    /// View the value as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;
    /// Mutable counterpart of [`BoxedValue::as_any`].
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Convert the box into a `Box<dyn Any>` for by-value downcasting.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    /// Name of the concrete type, as reported by [`core::any::type_name`].
    fn type_name(&self) -> &'static str;
    /// Debug-format the concrete value.
    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: Clone + fmt::Debug + 'static> BoxedValue for T {
    fn clone_box(&self) -> Box<dyn BoxedValue> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn type_name(&self) -> &'static str {
        any::type_name::<T>()
    }

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Owned, type-erased copy of a value.
///
/// ```rust
/// use understory_join::{JoinError, ValueBox};
///
/// let boxed = ValueBox::new((1_i32, 7_i32));
/// let copy = boxed.clone();
/// assert_eq!(copy.get::<(i32, i32)>(), Ok(&(1, 7)));
/// assert!(matches!(
///     boxed.get::<String>(),
///     Err(JoinError::TypeMismatch { .. })
/// ));
/// ```
pub struct ValueBox {
    content: Box<dyn BoxedValue>,
}

impl ValueBox {
    /// Store a copy of `value`.
    pub fn new<T: Clone + fmt::Debug + 'static>(value: T) -> Self {
        Self {
            content: Box::new(value),
        }
    }

    /// Returns `true` if the box holds a `U`.
    pub fn is<U: 'static>(&self) -> bool {
        self.content.as_any().is::<U>()
    }

    /// Name of the stored type.
    pub fn type_name(&self) -> &'static str {
        self.content.type_name()
    }

    /// Borrow the stored value as `U`.
    pub fn get<U: 'static>(&self) -> Result<&U, JoinError> {
        let found = self.content.type_name();
        self.content
            .as_any()
            .downcast_ref::<U>()
            .ok_or_else(|| mismatch::<U>(found))
    }

    /// Mutably borrow the stored value as `U`.
    pub fn get_mut<U: 'static>(&mut self) -> Result<&mut U, JoinError> {
        let found = self.content.type_name();
        self.content
            .as_any_mut()
            .downcast_mut::<U>()
            .ok_or_else(|| mismatch::<U>(found))
    }

    /// Take the stored value out as `U`.
    ///
    /// The box is consumed either way; on a mismatch the value is dropped.
    pub fn into_inner<U: 'static>(self) -> Result<U, JoinError> {
        let found = self.content.type_name();
        self.content
            .into_any()
            .downcast::<U>()
            .map(|b| *b)
            .map_err(|_| mismatch::<U>(found))
    }
}

fn mismatch<U: 'static>(found: &'static str) -> JoinError {
    JoinError::TypeMismatch {
        expected: any::type_name::<U>(),
        found,
    }
}

impl Clone for ValueBox {
    fn clone(&self) -> Self {
        Self {
            content: self.content.clone_box(),
        }
    }
}

impl fmt::Debug for ValueBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueBox(")?;
        self.content.fmt_value(f)?;
        f.write_str(")")
    }
}
