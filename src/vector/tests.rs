//! Tests for the embedding index

use super::*;
use proptest::prelude::*;
use std::sync::Arc;

use crate::catalog::extract_resource_text;
use crate::core::types::{Catalog, Resource};
use crate::embeddings::{
    EmbeddingGateway, EmbeddingProvider, EmbeddingResult, HashingEmbeddingProvider, StaticEmbeddingProvider,
};

/// Generate a random vector of the given dimension
fn random_vector(dim: usize) -> Vec<f32> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn index_with(provider: StaticEmbeddingProvider) -> EmbeddingIndex {
    EmbeddingIndex::new(EmbeddingGateway::new(Arc::new(provider)), SearchConfig::default())
}

fn gear_catalog() -> Catalog {
    Catalog::new()
        .with_category(
            "camera",
            vec![Resource::new(13, "Ricoh Theta", "").with_chips(["360°", "Photography"])],
        )
        .with_category(
            "charger",
            vec![
                Resource::new(1, "USB-C charger", "").with_chips(["Charging"]),
                Resource::new(2, "Lightning charger", ""),
            ],
        )
        .with_category("umbrella", vec![Resource::new(4, "Umbrella", "")])
}

fn gear_provider() -> StaticEmbeddingProvider {
    StaticEmbeddingProvider::new()
        .with_fragment("theta", vec![1.0, 0.0, 0.0])
        .with_fragment("charger", vec![0.0, 1.0, 0.0])
        .with_fragment("umbrella", vec![0.0, 0.0, 1.0])
}

#[cfg(test)]
mod snapshot_tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_not_ready() {
        let snapshot = IndexSnapshot::empty();
        assert!(!snapshot.is_ready());
        assert_eq!(snapshot.len(), 0);
        assert_eq!(snapshot.search(&[1.0], 0.0, 5), Err(IndexError::NotReady));
    }

    #[tokio::test]
    async fn test_search_before_build_is_not_ready() {
        let index = index_with(gear_provider());
        assert!(!index.is_ready());
        assert_eq!(index.search(&[1.0, 0.0, 0.0]), Err(IndexError::NotReady));
        assert!(index.last_report().is_none());
    }

    #[tokio::test]
    async fn test_build_then_search() {
        let index = index_with(gear_provider());
        let report = index.rebuild(&gear_catalog()).await;

        assert!(report.ready);
        assert_eq!(report.indexed, 4);
        assert_eq!(report.dimension, Some(3));
        assert_eq!(report.total(), 4);
        assert!(index.is_ready());

        let results = index.search(&[0.0, 1.0, 0.0]).unwrap();
        let ids: Vec<u64> = results.iter().map(|m| m.resource.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(results.iter().all(|m| m.category == "charger"));
        assert!(results.iter().all(|m| (m.score - 1.0).abs() < 1e-6));
        assert_eq!(results[0].similarity, Some(results[0].score));
    }

    #[tokio::test]
    async fn test_snapshot_keeps_text_and_lookup() {
        let index = index_with(gear_provider());
        let catalog = gear_catalog();
        index.rebuild(&catalog).await;

        let snapshot = index.snapshot();
        let entry = snapshot.get(13).expect("camera indexed");
        assert_eq!(entry.category, "camera");
        assert_eq!(
            entry.text_representation,
            extract_resource_text(catalog.find(13).unwrap(), "camera")
        );
        assert!(snapshot.get(999).is_none());
        assert!(snapshot.built_at().is_some());
    }

    #[tokio::test]
    async fn test_threshold_and_limit() {
        let provider = StaticEmbeddingProvider::new()
            .with_fragment("theta", vec![1.0, 0.0])
            .with_fragment("usb-c", vec![0.8, 0.6])
            .with_fragment("lightning", vec![0.6, 0.8])
            .with_fragment("umbrella", vec![0.0, 1.0]);
        let index = EmbeddingIndex::new(
            EmbeddingGateway::new(Arc::new(provider)),
            SearchConfig::default().with_threshold(0.5).with_max_results(2),
        );
        index.rebuild(&gear_catalog()).await;

        let results = index.search(&[1.0, 0.0]).unwrap();
        let ids: Vec<u64> = results.iter().map(|m| m.resource.id).collect();
        assert_eq!(ids, vec![13, 1]);

        let all = index.snapshot().search(&[1.0, 0.0], 0.5, 10).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|m| m.score >= 0.5));
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch() {
        let index = index_with(gear_provider());
        index.rebuild(&gear_catalog()).await;
        assert_eq!(
            index.search(&[1.0, 0.0]),
            Err(IndexError::DimensionMismatch { expected: 3, actual: 2 })
        );
    }
}

#[cfg(test)]
mod build_tests {
    use super::*;

    #[tokio::test]
    async fn test_failures_do_not_abort_build() {
        let index = index_with(gear_provider().failing_on("lightning"));
        let report = index.rebuild(&gear_catalog()).await;

        assert!(report.ready);
        assert_eq!(report.indexed, 3);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].id, 2);
        assert_eq!(report.failed[0].category, "charger");
        assert!(index.snapshot().get(2).is_none());
    }

    #[tokio::test]
    async fn test_all_failures_leave_index_not_ready() {
        let provider = Arc::new(gear_provider());
        provider.set_unavailable(true);
        let index = EmbeddingIndex::new(EmbeddingGateway::new(provider), SearchConfig::default());
        let report = index.rebuild(&gear_catalog()).await;

        assert!(!report.ready);
        assert_eq!(report.indexed, 0);
        assert_eq!(report.failed.len(), 4);
        assert_eq!(report.dimension, None);
        assert_eq!(index.search(&[1.0, 0.0, 0.0]), Err(IndexError::NotReady));
    }

    #[tokio::test]
    async fn test_empty_text_skipped() {
        let catalog = Catalog::new().with_category("", vec![Resource::new(7, "", "")]);
        let index = index_with(gear_provider().with_default(vec![1.0]));
        let report = index.rebuild(&catalog).await;

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].id, 7);
        assert!(!report.ready);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_recorded_as_failure() {
        let provider = StaticEmbeddingProvider::new()
            .with_fragment("theta", vec![1.0, 0.0, 0.0])
            .with_fragment("charger", vec![0.0, 1.0])
            .with_fragment("umbrella", vec![0.0, 0.0, 1.0]);
        let index = index_with(provider);
        let report = index.rebuild(&gear_catalog()).await;

        assert_eq!(report.dimension, Some(3));
        assert_eq!(report.indexed, 2);
        assert_eq!(report.failed.len(), 2);
        assert!(report.failed.iter().all(|f| f.error.contains("expected 3, got 2")));
        assert!(index.snapshot().entries().iter().all(|e| e.embedding.len() == 3));
    }

    #[tokio::test]
    async fn test_ensure_ready_builds_once() {
        let provider = Arc::new(gear_provider());
        let index = EmbeddingIndex::new(EmbeddingGateway::new(provider.clone()), SearchConfig::default());
        let catalog = gear_catalog();

        assert!(index.ensure_ready(&catalog).await.is_some());
        let calls = provider.call_count();
        assert!(index.ensure_ready(&catalog).await.is_none());
        assert_eq!(provider.call_count(), calls);
    }

    /// Provider that yields to the scheduler before every answer
    struct YieldingProvider {
        inner: Arc<StaticEmbeddingProvider>,
    }

    #[async_trait::async_trait]
    impl EmbeddingProvider for YieldingProvider {
        async fn embed_content(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
            tokio::task::yield_now().await;
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
            self.inner.embed_content(text).await
        }

        fn model_id(&self) -> &str {
            self.inner.model_id()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_ensure_ready_builds_once() {
        let provider = Arc::new(gear_provider());
        let index = Arc::new(EmbeddingIndex::new(
            EmbeddingGateway::new(Arc::new(YieldingProvider {
                inner: provider.clone(),
            })),
            SearchConfig::default(),
        ));
        let catalog = Arc::new(gear_catalog());
        let barrier = Arc::new(tokio::sync::Barrier::new(8));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let index = Arc::clone(&index);
                let catalog = Arc::clone(&catalog);
                let barrier = Arc::clone(&barrier);
                tokio::spawn(async move {
                    barrier.wait().await;
                    index.ensure_ready(&catalog).await.is_some()
                })
            })
            .collect();

        let mut builds = 0;
        for task in tasks {
            if task.await.unwrap() {
                builds += 1;
            }
        }
        assert_eq!(builds, 1);
        assert_eq!(provider.call_count(), 4);
        assert!(index.is_ready());
    }

    #[tokio::test]
    async fn test_reader_keeps_old_snapshot_across_rebuild() {
        let index = index_with(gear_provider());
        index.rebuild(&gear_catalog()).await;
        let before = index.snapshot();

        let smaller = Catalog::new().with_category("umbrella", vec![Resource::new(4, "Umbrella", "")]);
        index.rebuild(&smaller).await;

        assert_eq!(before.len(), 4);
        assert_eq!(index.snapshot().len(), 1);
    }
}

#[cfg(test)]
mod ordering_tests {
    use super::*;

    #[tokio::test]
    async fn test_ties_broken_by_catalog_order() {
        let provider = StaticEmbeddingProvider::new().with_default(vec![0.5, 0.5]);
        let index = index_with(provider);
        index.rebuild(&gear_catalog()).await;

        let ids: Vec<u64> = index
            .snapshot()
            .search(&[1.0, 1.0], 0.0, 10)
            .unwrap()
            .iter()
            .map(|m| m.resource.id)
            .collect();
        assert_eq!(ids, vec![13, 1, 2, 4]);
    }

    #[tokio::test]
    async fn test_rebuild_twice_same_ordering() {
        let index = EmbeddingIndex::new(
            EmbeddingGateway::new(Arc::new(HashingEmbeddingProvider::new(32))),
            SearchConfig::default().with_threshold(0.0).with_max_results(10),
        );
        let catalog = gear_catalog();
        let query = HashingEmbeddingProvider::new(32).embed_text("charger for my phone");

        index.rebuild(&catalog).await;
        let first = index.search(&query).unwrap();
        index.rebuild(&catalog).await;
        let second = index.search(&query).unwrap();

        assert_eq!(first, second);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// Results are sorted by score and respect threshold and limit
        #[test]
        fn prop_search_sorted_and_bounded(threshold in 0.0f32..1.0, max_results in 1usize..6, seed in 0u8..4) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let provider = StaticEmbeddingProvider::new()
                .with_fragment("theta", random_vector(4))
                .with_fragment("usb-c", random_vector(4))
                .with_fragment("lightning", random_vector(4))
                .with_fragment("umbrella", random_vector(4));
            let index = EmbeddingIndex::new(
                EmbeddingGateway::new(Arc::new(provider)),
                SearchConfig::default().with_build_concurrency(usize::from(seed) + 1),
            );
            rt.block_on(index.rebuild(&gear_catalog()));

            let query = random_vector(4);
            let results = index.snapshot().search(&query, threshold, max_results).unwrap();
            prop_assert!(results.len() <= max_results);
            prop_assert!(results.iter().all(|m| m.score >= threshold));
            prop_assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }
}
