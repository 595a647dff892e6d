macro_rules! impl_raw_access {
    () => {
        #[inline]
        pub fn get(&self) -> *mut T {
            self.ptr
        }

        #[inline]
        pub fn is_null(&self) -> bool {
            self.ptr.is_null()
        }
    };
}

macro_rules! impl_fmt_debug {
    ($ty_name:ident) => {
        #[inline]
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.debug_struct(stringify!($ty_name)).field("ptr", &self.ptr).finish()
        }
    };
}

macro_rules! impl_fmt_pointer {
    () => {
        #[inline]
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            fmt::Pointer::fmt(&self.ptr, f)
        }
    };
}

macro_rules! impl_handle {
    () => {
        type Item = T;

        #[inline]
        fn get(&self) -> *mut Self::Item {
            self.ptr
        }
    };
}
