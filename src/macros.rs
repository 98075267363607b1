// Tracing shim over the optional `log` dependency.
#[cfg(feature = "log")]
macro_rules! trace {
    ($($arg:tt)+) => {
        ::log::trace!(target: "compact_uri", $($arg)+)
    };
}

#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($($arg:tt)+) => {
        if false {
            ::core::mem::drop(::core::format_args!($($arg)+));
        }
    };
}
