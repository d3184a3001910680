/// macro used to declare the resumption points of a coroutine body
///
/// every name becomes a `const` of type [`Point`], numbered from 1 in
/// declaration order, so they are distinct from each other and from
/// [`Point::ENTRY`]. the constants can be used directly as `match` patterns.
///
/// ```
/// use coro_ctx::{resume_points, Point};
///
/// resume_points!(FIRST, SECOND);
///
/// assert_ne!(FIRST, Point::ENTRY);
/// assert_ne!(FIRST, SECOND);
/// ```
///
/// [`Point`]: crate::Point
/// [`Point::ENTRY`]: crate::Point::ENTRY
#[macro_export]
macro_rules! resume_points {
    (@step $vis:vis at $n:expr; $name:ident $(, $rest:ident)*) => {
        $vis const $name: $crate::Point = $crate::Point::new($n);
        $crate::resume_points!(@step $vis at $n + 1; $($rest),*);
    };

    (@step $vis:vis at $n:expr;) => {};

    ($vis:vis $($name:ident),+ $(,)?) => {
        $crate::resume_points!(@step $vis at 1u32; $($name),+);
    };
}
