//! Pipeline orchestration for ETL operations

use super::{Extractor, Loader, Transformer};
use eyre::Result;

/// ETL Pipeline that orchestrates Extract, Transform, and Load operations
///
/// Records are pulled from the extractor one at a time until it reports
/// exhaustion, transformed as they arrive, and handed to the loader as a
/// single batch.
///
/// # Type Parameters
/// - `E`: Extractor type
/// - `T`: Transformer type (must transform from E::Item)
/// - `L`: Loader type (must load T::Output)
///
/// # Example
/// ```no_run
/// use catalog_extract::etl::{IdentityTransformer, Pipeline, VecExtractor};
/// use catalog_extract::storage::NdjsonWriter;
///
/// # async fn example() -> eyre::Result<()> {
/// let mut pipeline = Pipeline::new(
///     VecExtractor::new("extractor.fixed", vec![serde_json::json!({"a": 1})]),
///     IdentityTransformer::new(),
///     NdjsonWriter::new("out.ndjson"),
/// );
///
/// let count = pipeline.run().await?;
/// println!("Processed {} items", count);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    T: Transformer<Input = E::Item>,
    L: Loader<Item = T::Output>,
{
    /// Create a new pipeline
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            extractor,
            transformer,
            loader,
        }
    }

    /// Run the complete ETL pipeline
    ///
    /// Steps:
    /// 1. Pull items from the extractor until it returns `None`
    /// 2. Transform each item
    /// 3. Close the extractor, also when steps 1 or 2 failed
    /// 4. Load items to destination, even when there are none
    ///
    /// Returns the number of items successfully loaded
    ///
    /// # Errors
    /// Returns an error if any stage fails
    pub async fn run(&mut self) -> Result<usize> {
        log::info!("Starting ETL pipeline for {}", self.extractor.scope());

        let drained = self.drain().await;
        let closed = self.extractor.close().await;
        let transformed = drained?;
        closed?;

        log::info!("Extracted and transformed {} items", transformed.len());
        if transformed.is_empty() {
            log::warn!("No items extracted for {}", self.extractor.scope());
        }

        log::debug!("Loading to destination...");
        let count = self.loader.load(transformed).await?;
        log::info!("Loaded {} items", count);

        Ok(count)
    }

    async fn drain(&mut self) -> Result<Vec<T::Output>> {
        let mut transformed = Vec::new();
        while let Some(item) = self.extractor.extract().await? {
            transformed.push(self.transformer.transform(item)?);
        }
        Ok(transformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etl::VecExtractor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    struct DoubleTransformer;

    impl Transformer for DoubleTransformer {
        type Input = i32;
        type Output = i32;
        fn transform(&self, input: Self::Input) -> Result<Self::Output> {
            Ok(input * 2)
        }
    }

    struct SumLoader(Arc<Mutex<i32>>);

    impl Loader for SumLoader {
        type Item = i32;
        async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
            let sum: i32 = items.iter().sum();
            *self.0.lock().unwrap() = sum;
            Ok(items.len())
        }
    }

    #[tokio::test]
    async fn test_pipeline() {
        let result = Arc::new(Mutex::new(0));

        let mut pipeline = Pipeline::new(
            VecExtractor::new("extractor.numbers", vec![1, 2, 3]),
            DoubleTransformer,
            SumLoader(result.clone()),
        );

        let count = pipeline.run().await.unwrap();
        assert_eq!(count, 3);
        assert_eq!(*result.lock().unwrap(), 12); // (1+2+3)*2 = 12
    }

    #[tokio::test]
    async fn test_empty_pipeline_still_loads() {
        let result = Arc::new(Mutex::new(-1));

        let mut pipeline = Pipeline::new(
            VecExtractor::new("extractor.numbers", vec![]),
            DoubleTransformer,
            SumLoader(result.clone()),
        );

        let count = pipeline.run().await.unwrap();
        assert_eq!(count, 0);
        // The loader sees the empty batch so stale output is replaced
        assert_eq!(*result.lock().unwrap(), 0);
    }

    /// Yields one item, then fails; records whether it was closed
    struct FailingExtractor {
        pulled: usize,
        closed: Arc<AtomicBool>,
    }

    impl Extractor for FailingExtractor {
        type Item = i32;

        async fn extract(&mut self) -> Result<Option<Self::Item>> {
            self.pulled += 1;
            match self.pulled {
                1 => Ok(Some(1)),
                _ => eyre::bail!("source went away"),
            }
        }

        fn scope(&self) -> &str {
            "extractor.failing"
        }

        async fn close(&mut self) -> Result<()> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_extractor_closed_on_error() {
        let closed = Arc::new(AtomicBool::new(false));
        let result = Arc::new(Mutex::new(-1));

        let mut pipeline = Pipeline::new(
            FailingExtractor {
                pulled: 0,
                closed: closed.clone(),
            },
            DoubleTransformer,
            SumLoader(result.clone()),
        );

        let err = pipeline.run().await.unwrap_err();
        assert!(err.to_string().contains("source went away"));
        assert!(closed.load(Ordering::SeqCst));
        // Nothing is loaded after a failed extraction
        assert_eq!(*result.lock().unwrap(), -1);
    }
}
