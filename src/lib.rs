//! Ownership handles for heap-allocated values.
//!
//! This crate provides two nullable smart pointer types over a single
//! heap-allocated value:
//!
//! - [`ExclusiveHandle`], which owns its allocation alone and can only
//!   *transfer* ownership, never duplicate it, and
//! - [`SharedHandle`], which owns its allocation cooperatively with any
//!   number of other handles through a shared reference count and frees it
//!   exactly when the last owner is dropped.
//!
//! Both types track their allocation through raw pointers and support an
//! explicit empty (null) state, which makes them suitable for adopting
//! caller-provided allocations. Reference counting is deliberately
//! unsynchronized: [`SharedHandle`] is neither `Send` nor `Sync` and all
//! count bookkeeping is single-threaded by design.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod prelude {
    pub use crate::traits::Handle;
}

#[macro_use]
mod macros;

mod count;
mod traits;

// implementation modules
mod imp;

use core::marker::PhantomData;
use core::ptr;

pub use crate::traits::Handle;

use crate::count::Count;

////////////////////////////////////////////////////////////////////////////////////////////////////
// ExclusiveHandle (impl in imp/exclusive.rs)
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A pointer type with sole ownership of a heap allocated value, similar to
/// [`Box`] but nullable.
///
/// An `ExclusiveHandle` is always in one of two states: *empty* (its pointer
/// is null and dropping it is a no-op) or *owning* (its pointer is the unique
/// owning pointer to a live allocation, which is freed exactly once when the
/// handle is dropped).
///
/// The type has no [`Clone`] implementation, so the single-owner invariant is
/// enforced at compile time rather than checked at runtime. Ownership can
/// only be moved, [taken out][ExclusiveHandle::take] or explicitly
/// [released][ExclusiveHandle::release].
pub struct ExclusiveHandle<T> {
    ptr: *mut T,
    _marker: PhantomData<T>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// SharedHandle (impl in imp/shared.rs)
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A reference-counted pointer type with shared ownership of a heap allocated
/// value, nullable and generic over caller-provided allocations.
///
/// Every [`clone`][Clone::clone] of a non-empty `SharedHandle` aliases the
/// same allocation and the same count cell and increments the count by one.
/// Dropping a handle decrements the count and frees both the value and the
/// count cell once it reaches zero, so the allocation is freed exactly once,
/// by the last owner.
///
/// The count is a plain (non-atomic) cell shared by all owning handles, hence
/// the type is neither `Send` nor `Sync` and all handles aliasing one
/// allocation must live on the same thread.
pub struct SharedHandle<T> {
    ptr: *mut T,
    count: *mut Count,
    _marker: PhantomData<T>,
}

/********** impl inherent (const) *****************************************************************/

impl<T> ExclusiveHandle<T> {
    /// Creates an empty handle owning nothing.
    #[inline]
    pub const fn null() -> Self {
        Self { ptr: ptr::null_mut(), _marker: PhantomData }
    }
}

impl<T> SharedHandle<T> {
    /// Creates an empty handle owning nothing.
    ///
    /// No count cell is allocated; [`use_count`][SharedHandle::use_count]
    /// reports 0 until the handle is assigned a non-empty one.
    #[inline]
    pub const fn null() -> Self {
        Self { ptr: ptr::null_mut(), count: ptr::null_mut(), _marker: PhantomData }
    }
}
