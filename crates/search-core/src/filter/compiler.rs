use crate::predicate::Predicate;

/// A trait for lowering predicates into a specific filter format.
pub trait FilterCompiler {
    /// The type of filter that this compiler produces.
    type Filter: Default;

    /// Lower the predicate tree into a filter.
    fn compile(predicate: &Predicate) -> Self::Filter;

    /// A filter that keeps everything.
    fn unfiltered() -> Self::Filter {
        Self::Filter::default()
    }
}
