use crate::error::ConnectorError;

/// A store that can apply a filter of its own kind and hand back the result.
pub trait Adapter {
    /// The filter representation this store understands.
    type Filter;

    /// What the store returns for a filtered read.
    type Output;

    fn fetch(&self, filter: &Self::Filter) -> Result<Self::Output, ConnectorError>;
}
