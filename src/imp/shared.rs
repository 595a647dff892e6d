use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ptr;

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        use std::boxed::Box;
    } else {
        use alloc::boxed::Box;
    }
}

use static_assertions::const_assert;

use crate::count::Count;
use crate::traits::Handle;
use crate::SharedHandle;

// value pointer + count pointer, nothing else
const_assert!(mem::size_of::<SharedHandle<u8>>() == 2 * mem::size_of::<usize>());

/********** impl inherent *************************************************************************/

impl<T> SharedHandle<T> {
    /// Allocates `owned` on the heap and returns the first handle owning the
    /// allocation, with a freshly allocated count cell initialized to 1.
    #[inline]
    pub fn new(owned: T) -> Self {
        let ptr = Box::into_raw(Box::new(owned));
        Self { ptr, count: Count::alloc_one(), _marker: PhantomData }
    }

    /// Creates a handle adopting shared ownership of the allocation `ptr`
    /// points at, allocating a fresh count cell initialized to 1.
    ///
    /// A null `ptr` is permitted and yields an empty handle, in which case no
    /// count cell is allocated.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must point at a live allocation created by
    /// [`Box::into_raw`] and no other owner of that allocation may remain:
    /// the caller transfers ownership to the handle and to every handle later
    /// cloned from it, the last of which frees the allocation.
    #[inline]
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        if ptr.is_null() {
            Self::null()
        } else {
            Self { ptr, count: Count::alloc_one(), _marker: PhantomData }
        }
    }

    impl_raw_access!();

    /// Returns a shared reference to the owned value, or [`None`] if the
    /// handle is empty.
    #[inline]
    pub fn as_ref(&self) -> Option<&T> {
        unsafe { self.ptr.as_ref() }
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
    /// The handle must not be empty and the caller must ensure no other
    /// reference to the owned value exists for the lifetime of the returned
    /// one. Unlike for [`ExclusiveHandle`][crate::ExclusiveHandle], unique
    /// access can not be inferred from having `&mut self`, since any number
    /// of other handles may alias the same allocation.
    #[inline]
    pub unsafe fn deref_mut(&mut self) -> &mut T {
        &mut *self.ptr
    }

    /// Returns the number of handles currently sharing ownership of the
    /// allocation, or 0 if the handle is empty.
    #[inline]
    pub fn use_count(&self) -> usize {
        match unsafe { self.count.as_ref() } {
            Some(count) => count.get(),
            None => 0,
        }
    }

    /// Moves ownership of the allocation out into the returned handle,
    /// leaving `self` empty.
    ///
    /// The shared count is unaffected, since the total number of owning
    /// handles does not change.
    #[inline]
    pub fn take(&mut self) -> Self {
        Self {
            ptr: mem::replace(&mut self.ptr, ptr::null_mut()),
            count: mem::replace(&mut self.count, ptr::null_mut()),
            _marker: PhantomData,
        }
    }

    /// Relinquishes this handle's share of the ownership and leaves the
    /// handle empty.
    ///
    /// Decrements the shared count and, if this handle was the last owner,
    /// frees both the owned value and the count cell.
    fn release(&mut self) {
        if !self.ptr.is_null() {
            unsafe {
                if (*self.count).decrement() == 0 {
                    drop(Box::from_raw(self.ptr));
                    Count::dealloc(self.count);
                }
            }

            self.ptr = ptr::null_mut();
            self.count = ptr::null_mut();
        }
    }
}

/********** impl Clone ****************************************************************************/

impl<T> Clone for SharedHandle<T> {
    /// Creates another handle owning the same allocation, incrementing the
    /// shared count by 1.
    ///
    /// Cloning an empty handle yields another empty handle.
    #[inline]
    fn clone(&self) -> Self {
        if let Some(count) = unsafe { self.count.as_ref() } {
            count.increment();
        }

        Self { ptr: self.ptr, count: self.count, _marker: PhantomData }
    }

    /// Re-targets `self` at `source`'s allocation, releasing its previous
    /// share of ownership first.
    ///
    /// If both handles already alias the same allocation (or are both empty)
    /// this is a no-op, so a handle is never transiently released from an
    /// allocation it is about to re-own.
    #[inline]
    fn clone_from(&mut self, source: &Self) {
        if self.ptr == source.ptr {
            return;
        }

        self.release();
        *self = source.clone();
    }
}

/********** impl Debug ****************************************************************************/

impl<T> fmt::Debug for SharedHandle<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SharedHandle")
            .field("ptr", &self.ptr)
            .field("use_count", &self.use_count())
            .finish()
    }
}

/********** impl Default **************************************************************************/

impl<T> Default for SharedHandle<T> {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

/********** impl Drop *****************************************************************************/

impl<T> Drop for SharedHandle<T> {
    #[inline]
    fn drop(&mut self) {
        self.release();
    }
}

/********** impl From (T) *************************************************************************/

impl<T> From<T> for SharedHandle<T> {
    #[inline]
    fn from(owned: T) -> Self {
        Self::new(owned)
    }
}

/********** impl Handle ***************************************************************************/

impl<T> Handle for SharedHandle<T> {
    impl_handle!();
}

/********** impl PartialEq ************************************************************************/

impl<T> PartialEq for SharedHandle<T> {
    /// Compares by allocation identity, not by pointee value.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl<T> Eq for SharedHandle<T> {}

/********** impl Pointer **************************************************************************/

impl<T> fmt::Pointer for SharedHandle<T> {
    impl_fmt_pointer!();
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::SharedHandle;

    /// Increments the referenced counter exactly once, when dropped.
    struct DropProbe<'c>(&'c Cell<usize>);

    impl Drop for DropProbe<'_> {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn new_has_count_one() {
        let handle = SharedHandle::new(1);
        assert_eq!(handle.use_count(), 1);
        assert_eq!(handle.as_ref(), Some(&1));
    }

    #[test]
    fn null_is_empty_with_count_zero() {
        let handle: SharedHandle<i32> = SharedHandle::null();
        assert!(handle.is_null());
        assert_eq!(handle.use_count(), 0);
        assert!(handle.as_ref().is_none());
    }

    #[test]
    fn from_raw_adopts_allocation() {
        let raw = Box::into_raw(Box::new(7));
        let handle = unsafe { SharedHandle::from_raw(raw) };
        assert_eq!(handle.get(), raw);
        assert_eq!(handle.use_count(), 1);

        let empty = unsafe { SharedHandle::<i32>::from_raw(core::ptr::null_mut()) };
        assert!(empty.is_null());
        assert_eq!(empty.use_count(), 0);
    }

    #[test]
    fn clone_aliases_one_count() {
        let a = SharedHandle::new(1);
        let b = a.clone();

        // one shared cell, observed identically through both handles
        assert_eq!(a.use_count(), 2);
        assert_eq!(b.use_count(), 2);
        assert_eq!(a, b);

        drop(b);
        assert_eq!(a.use_count(), 1);
    }

    #[test]
    fn count_returns_to_one_after_inner_scope() {
        let a = SharedHandle::new(1);
        assert_eq!(a.use_count(), 1);
        {
            let b = a.clone();
            assert_eq!(a.use_count(), 2);
            assert_eq!(b.use_count(), 2);
        }
        assert_eq!(a.use_count(), 1);
    }

    #[test]
    fn take_does_not_change_count() {
        let a = SharedHandle::new(1);
        let b = a.clone();
        let mut c = b.clone();
        assert_eq!(a.use_count(), 3);

        let d = c.take();
        assert_eq!(a.use_count(), 3);
        assert_eq!(d.use_count(), 3);

        // the moved-from handle reflects the empty state
        assert!(c.is_null());
        assert!(c.get().is_null());
        assert_eq!(c.use_count(), 0);
    }

    #[test]
    fn dropping_moved_from_handle_does_not_decrement() {
        let a = SharedHandle::new(1);
        let mut b = a.clone();
        let _c = b.take();
        drop(b);
        assert_eq!(a.use_count(), 2);
    }

    #[test]
    fn clone_from_releases_previous_share() {
        let drops = Cell::new(0);
        let a = SharedHandle::new(DropProbe(&drops));
        let mut b = SharedHandle::new(DropProbe(&drops));

        b.clone_from(&a);
        // b's previous allocation had no other owner and is freed
        assert_eq!(drops.get(), 1);
        assert_eq!(a.use_count(), 2);
        assert!(a == b);

        drop(a);
        drop(b);
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn clone_from_aliased_handle_is_noop() {
        let drops = Cell::new(0);
        let a = SharedHandle::new(DropProbe(&drops));
        let mut b = a.clone();

        b.clone_from(&a);
        assert_eq!(a.use_count(), 2);
        assert_eq!(b.use_count(), 2);
        assert_eq!(drops.get(), 0);
    }

    #[test]
    fn clone_from_empty_to_empty_is_noop() {
        let a: SharedHandle<i32> = SharedHandle::null();
        let mut b: SharedHandle<i32> = SharedHandle::null();
        b.clone_from(&a);
        assert!(b.is_null());
        assert_eq!(b.use_count(), 0);
    }

    #[test]
    fn last_owner_frees_exactly_once() {
        let drops = Cell::new(0);
        {
            let a = SharedHandle::new(DropProbe(&drops));
            let mut b = a.clone();
            let c = b.take();
            let d = c.clone();
            drop(a);
            drop(b);
            drop(c);
            assert_eq!(drops.get(), 0);
            assert_eq!(d.use_count(), 1);
        }
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn empty_handles_compare_equal() {
        let a: SharedHandle<i32> = SharedHandle::null();
        let b: SharedHandle<i32> = SharedHandle::default();
        assert_eq!(a, b);
        assert!(a != SharedHandle::new(0));
    }
}
