use std::any::Any;

/// Access to a trait object as [`Any`], for runtime type inspection of
/// tokens, AST elements, compilers and features.
///
/// Implemented for every `'static` type, so implementors never write it by
/// hand. Call it on the trait object (`&dyn Token`), not on a `Box` holding
/// one, or the box itself is what gets inspected.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
