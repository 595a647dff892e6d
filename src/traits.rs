//! The common trait for raw observation of ownership handles.

////////////////////////////////////////////////////////////////////////////////////////////////////
// Handle (trait)
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A trait for nullable pointer types owning a single heap-allocated value.
///
/// It exposes only non-destructive observation of the underlying raw pointer,
/// which neither transfers ownership nor affects the pointee's lifetime in
/// any way.
pub trait Handle {
    /// The type of the owned value.
    type Item: Sized;

    /// Returns the handle's current raw pointer without affecting ownership.
    ///
    /// The returned pointer is null if the handle is empty. Callers must not
    /// free the pointed-to allocation through it while the handle (or, for
    /// shared handles, any aliasing handle) still owns it.
    fn get(&self) -> *mut Self::Item;

    /// Returns `true` if the handle is empty and owns no allocation.
    #[inline]
    fn is_null(&self) -> bool {
        self.get().is_null()
    }
}
