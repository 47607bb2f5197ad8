//! Extractor that feeds every raw record through a transformer

use super::{Extractor, Transformer};
use eyre::Result;

/// Wraps a raw-record extractor with a transformer
///
/// Each call pulls one item from the inner extractor and returns its
/// transformed form. Once the inner extractor is exhausted this returns
/// `None` as well.
pub struct ModelExtractor<E, T> {
    inner: E,
    transformer: T,
    scope: String,
}

impl<E, T> ModelExtractor<E, T>
where
    E: Extractor,
    T: Transformer<Input = E::Item>,
{
    /// Create a model extractor registered under `scope`
    pub fn new(scope: impl Into<String>, inner: E, transformer: T) -> Self {
        Self {
            inner,
            transformer,
            scope: scope.into(),
        }
    }

    /// The wrapped raw-record extractor
    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E, T> Extractor for ModelExtractor<E, T>
where
    E: Extractor,
    T: Transformer<Input = E::Item>,
{
    type Item = T::Output;

    async fn extract(&mut self) -> Result<Option<Self::Item>> {
        match self.inner.extract().await? {
            Some(record) => self.transformer.transform(record).map(Some),
            None => Ok(None),
        }
    }

    fn scope(&self) -> &str {
        &self.scope
    }

    async fn close(&mut self) -> Result<()> {
        self.inner.close().await
    }
}
