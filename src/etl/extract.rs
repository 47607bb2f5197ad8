//! Extractor trait for pulling records from a source one at a time

use eyre::Result;

/// Extractor trait for pulling items from a source
///
/// Extraction is pull based: each call to [`Extractor::extract`] returns the
/// next item, and `Ok(None)` once the source is exhausted. Sources such as
/// the Tableau Metadata API or a Snowflake `INFORMATION_SCHEMA` query are
/// executed lazily on the first call and the results cached per instance.
///
/// # Example
/// ```no_run
/// use catalog_extract::etl::Extractor;
/// use eyre::Result;
///
/// struct Countdown(u32);
///
/// impl Extractor for Countdown {
///     type Item = u32;
///
///     async fn extract(&mut self) -> Result<Option<Self::Item>> {
///         if self.0 == 0 {
///             return Ok(None);
///         }
///         self.0 -= 1;
///         Ok(Some(self.0))
///     }
///
///     fn scope(&self) -> &str {
///         "extractor.countdown"
///     }
/// }
/// ```
pub trait Extractor: Send {
    /// The type of items extracted
    type Item: Send;

    /// Extract the next item, or `None` when the source is exhausted
    ///
    /// # Errors
    /// Returns an error if extraction fails (network, parsing, etc.)
    fn extract(&mut self) -> impl std::future::Future<Output = Result<Option<Self::Item>>> + Send;

    /// Config scope of this extractor, e.g. `extractor.tableau_dashboard_owner`
    fn scope(&self) -> &str;

    /// Release any resources held by the extractor
    fn close(&mut self) -> impl std::future::Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }

    /// Drain the extractor into a vector
    fn extract_all(&mut self) -> impl std::future::Future<Output = Result<Vec<Self::Item>>> + Send
    where
        Self: Sized,
    {
        async move {
            let mut items = Vec::new();
            while let Some(item) = self.extract().await? {
                items.push(item);
            }
            Ok(items)
        }
    }
}

/// Extractor that yields items from an in-memory list
///
/// Useful for feeding fixed records through a pipeline.
pub struct VecExtractor<T> {
    items: std::vec::IntoIter<T>,
    scope: String,
}

impl<T> VecExtractor<T> {
    pub fn new(scope: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            items: items.into_iter(),
            scope: scope.into(),
        }
    }
}

impl<T: Send> Extractor for VecExtractor<T> {
    type Item = T;

    async fn extract(&mut self) -> Result<Option<Self::Item>> {
        Ok(self.items.next())
    }

    fn scope(&self) -> &str {
        &self.scope
    }
}
