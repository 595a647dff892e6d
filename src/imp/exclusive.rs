use core::fmt;
use core::marker::PhantomData;
use core::mem::{self, ManuallyDrop};
use core::ptr;

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        use std::boxed::Box;
    } else {
        use alloc::boxed::Box;
    }
}

use static_assertions::const_assert;

use crate::traits::Handle;
use crate::ExclusiveHandle;

// The empty state is encoded in the pointer itself, so a handle is no larger
// than the raw pointer it wraps.
const_assert!(mem::size_of::<ExclusiveHandle<u8>>() == mem::size_of::<usize>());

/********** impl Send + Sync **********************************************************************/

unsafe impl<T> Send for ExclusiveHandle<T> where T: Send {}
unsafe impl<T> Sync for ExclusiveHandle<T> where T: Sync {}

/********** impl inherent *************************************************************************/

impl<T> ExclusiveHandle<T> {
    /// Allocates `owned` on the heap and returns the handle with sole
    /// ownership of the allocation.
    #[inline]
    pub fn new(owned: T) -> Self {
        Self { ptr: Box::into_raw(Box::new(owned)), _marker: PhantomData }
    }

    /// Creates a handle adopting ownership of the allocation `ptr` points at.
    ///
    /// A null `ptr` is permitted and yields an empty handle. No allocation is
    /// performed by this operation itself.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must point at a live allocation created by
    /// [`Box::into_raw`] (or handed out by [`release`][ExclusiveHandle::release]
    /// or [`into_raw`][ExclusiveHandle::into_raw]) and no other owner of that
    /// allocation may remain: the caller transfers sole ownership to the
    /// handle, which will eventually free the allocation.
    #[inline]
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        Self { ptr, _marker: PhantomData }
    }

    impl_raw_access!();

    /// Returns a shared reference to the owned value, or [`None`] if the
    /// handle is empty.
    #[inline]
    pub fn as_ref(&self) -> Option<&T> {
        // sound because a non-null `ptr` is always the unique owning pointer
        // to a live allocation
        unsafe { self.ptr.as_ref() }
    }

    /// Returns a mutable reference to the owned value, or [`None`] if the
    /// handle is empty.
    #[inline]
    pub fn as_mut(&mut self) -> Option<&mut T> {
        unsafe { self.ptr.as_mut() }
    }

    /// De-references the handle without checking for emptiness.
    ///
    /// # Safety
    ///
    /// The handle must not be empty.
    #[inline]
    pub unsafe fn deref(&self) -> &T {
        &*self.ptr
    }

    /// Mutably de-references the handle without checking for emptiness.
    ///
    /// # Safety
    ///
    /// The handle must not be empty.
    #[inline]
    pub unsafe fn deref_mut(&mut self) -> &mut T {
        &mut *self.ptr
    }

    /// Relinquishes ownership of the allocation and returns the raw pointer
    /// to it, leaving the handle empty.
    ///
    /// No deallocation occurs; the caller becomes responsible for freeing the
    /// allocation, e.g. by re-adopting it with
    /// [`from_raw`][ExclusiveHandle::from_raw].
    #[inline]
    pub fn release(&mut self) -> *mut T {
        mem::replace(&mut self.ptr, ptr::null_mut())
    }

    /// Consumes the handle and returns the raw pointer to the allocation
    /// without freeing it.
    #[inline]
    pub fn into_raw(handle: Self) -> *mut T {
        let handle = ManuallyDrop::new(handle);
        handle.ptr
    }

    /// Consumes the handle, de-allocates its memory and extracts the
    /// contained value, or [`None`] if the handle is empty.
    ///
    /// This has the same semantics as destructuring a [`Box`].
    #[inline]
    pub fn into_inner(handle: Self) -> Option<T> {
        let ptr = Self::into_raw(handle);
        if ptr.is_null() {
            None
        } else {
            Some(unsafe { *Box::from_raw(ptr) })
        }
    }

    /// Frees the currently owned allocation (if any) and adopts ownership of
    /// the allocation `ptr` points at instead.
    ///
    /// A null `ptr` is permitted and leaves the handle empty. Resetting a
    /// handle to the pointer it already holds is a no-op.
    ///
    /// # Safety
    ///
    /// The same contract as [`from_raw`][ExclusiveHandle::from_raw] applies
    /// to a non-null `ptr`.
    #[inline]
    pub unsafe fn reset(&mut self, ptr: *mut T) {
        if self.ptr == ptr {
            return;
        }

        let prev = mem::replace(&mut self.ptr, ptr);
        if !prev.is_null() {
            drop(Box::from_raw(prev));
        }
    }

    /// Moves ownership of the allocation out into the returned handle,
    /// leaving `self` empty.
    ///
    /// No allocation or deallocation occurs.
    #[inline]
    pub fn take(&mut self) -> Self {
        Self { ptr: self.release(), _marker: PhantomData }
    }
}

/********** impl Debug ****************************************************************************/

impl<T> fmt::Debug for ExclusiveHandle<T> {
    impl_fmt_debug!(ExclusiveHandle);
}

/********** impl Default **************************************************************************/

impl<T> Default for ExclusiveHandle<T> {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

/********** impl Drop *****************************************************************************/

impl<T> Drop for ExclusiveHandle<T> {
    #[inline]
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe { drop(Box::from_raw(self.ptr)) };
        }
    }
}

/********** impl From (T) *************************************************************************/

impl<T> From<T> for ExclusiveHandle<T> {
    #[inline]
    fn from(owned: T) -> Self {
        Self::new(owned)
    }
}

/********** impl Handle ***************************************************************************/

impl<T> Handle for ExclusiveHandle<T> {
    impl_handle!();
}

/********** impl Pointer **************************************************************************/

impl<T> fmt::Pointer for ExclusiveHandle<T> {
    impl_fmt_pointer!();
}
