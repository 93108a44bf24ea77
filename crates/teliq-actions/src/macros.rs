/// Implement [`teliq_core::Action`] for params types and collect their wire
/// names into a module-level `NAMES` list.
///
/// ```ignore
/// actions! {
///     SendPrivateMsg => "send_private_msg" => MessageId,
///     DeleteMsg => "delete_msg" => Empty,
/// }
/// ```
macro_rules! actions {
    ( $( $params:ty => $wire:literal => $output:ty ),* $(,)? ) => {
        $(
            impl ::teliq_core::Action for $params {
                const NAME: &'static str = $wire;
                type Output = $output;
            }
        )*

        /// Wire names of the actions defined in this module.
        pub(crate) const NAMES: &[&str] = &[$($wire),*];
    };
}
