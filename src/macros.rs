/// Compile a case-insensitive regex once and hand out a `&'static Regex`.
///
/// Script keywords are matched without regard to case, so the `(?i)` flag is
/// prepended here rather than repeated in every pattern.
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new(concat!("(?i)", $pat)).unwrap());
        &*RE
    }};
}
