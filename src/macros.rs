/// Compile a literal pattern once and hand out a `&'static Regex`.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// `eprintln!` that only fires when `MARKOV_DEBUG` is set.
///
/// Messages are prefixed with a bracketed stage tag by convention, e.g.
/// `trace!("[expand] token={:?}", token)`.
macro_rules! trace {
    ($($arg:tt)*) => {
        if $crate::debug_enabled() {
            eprintln!($($arg)*);
        }
    };
}
