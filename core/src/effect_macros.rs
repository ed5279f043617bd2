//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when reducers return asynchronous work
//! or schedule a follow-up action.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust
/// use vitrine_core::async_effect;
/// use vitrine_core::effect::Effect;
///
/// #[derive(Debug)]
/// enum CartAction { Saved }
///
/// let effect: Effect<CartAction> = async_effect! {
///     // write the snapshot somewhere
///     Some(CartAction::Saved)
/// };
/// assert!(matches!(effect, Effect::Future(_)));
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust
/// use vitrine_core::delay;
/// use vitrine_core::effect::Effect;
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// enum CarouselAction { SettleElapsed }
///
/// let effect = delay! {
///     duration: Duration::from_millis(180),
///     action: CarouselAction::SettleElapsed
/// };
/// assert!(matches!(effect, Effect::Delay { .. }));
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}
