use core::cell::Cell;

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        use std::boxed::Box;
    } else {
        use alloc::boxed::Box;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// Count
////////////////////////////////////////////////////////////////////////////////////////////////////

/// The reference count cell shared by all [`SharedHandle`][crate::SharedHandle]
/// instances that currently own the same allocation.
///
/// A fresh cell is heap-allocated whenever a handle adopts a new allocation
/// and is freed together with the owned value by whichever handle decrements
/// the count to zero. The cell is never exposed to users of the crate and is
/// only ever accessed through the owning handles.
///
/// The count is a plain [`Cell`], i.e. entirely unsynchronized.
#[derive(Debug)]
pub(crate) struct Count(Cell<usize>);

/********** impl inherent *************************************************************************/

impl Count {
    /// Allocates a fresh count cell initialized to 1 and returns the raw
    /// pointer to it.
    #[inline]
    pub fn alloc_one() -> *mut Self {
        Box::into_raw(Box::new(Self(Cell::new(1))))
    }

    /// De-allocates the count cell `ptr` points at.
    ///
    /// # Safety
    ///
    /// The pointer must have been returned by [`alloc_one`][Count::alloc_one]
    /// and must not be used in any way afterwards.
    #[inline]
    pub unsafe fn dealloc(ptr: *mut Self) {
        drop(Box::from_raw(ptr));
    }

    /// Returns the current count.
    #[inline]
    pub fn get(&self) -> usize {
        self.0.get()
    }

    /// Increments the count by 1.
    #[inline]
    pub fn increment(&self) {
        self.0.set(self.0.get() + 1);
    }

    /// Decrements the count by 1 and returns the decremented value.
    #[inline]
    pub fn decrement(&self) -> usize {
        let count = self.0.get() - 1;
        self.0.set(count);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::Count;

    #[test]
    fn alloc_dealloc_round_trip() {
        let count = Count::alloc_one();
        unsafe {
            assert_eq!((*count).get(), 1);
            (*count).increment();
            assert_eq!((*count).get(), 2);
            assert_eq!((*count).decrement(), 1);
            assert_eq!((*count).decrement(), 0);
            Count::dealloc(count);
        }
    }
}
