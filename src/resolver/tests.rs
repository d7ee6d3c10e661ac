//! Tests for query resolution

use super::*;
use proptest::prelude::*;
use std::sync::Arc;

use crate::core::error::ErrorKind;
use crate::core::types::{Catalog, MatchType, ResolutionState, Resource};
use crate::embeddings::{EmbeddingGateway, StaticEmbeddingProvider};
use crate::vector::{EmbeddingIndex, SearchConfig};

fn campus_catalog() -> Catalog {
    Catalog::new()
        .with_category(
            "charger",
            vec![Resource::new(1, "USB-C charger", "").with_chips(["Charging"])],
        )
        .with_category("power bank", vec![Resource::new(2, "Anker power bank", "")])
        .with_category("lockers", vec![Resource::new(3, "Smart locker", "")])
        .with_category("umbrella", vec![Resource::new(4, "Umbrella", "")])
        .with_category(
            "camera",
            vec![Resource::new(13, "Ricoh Theta", "").with_chips(["360°", "Photography"])],
        )
}

fn campus_provider() -> StaticEmbeddingProvider {
    StaticEmbeddingProvider::new()
        .with_fragment("usb-c", vec![1.0, 0.0, 0.0])
        .with_fragment("anker", vec![0.0, 1.0, 0.0])
        .with_fragment("locker", vec![0.0, 0.0, 1.0])
        .with_fragment("umbrella", vec![0.0, 0.7, 0.7])
        .with_fragment("theta", vec![0.6, 0.0, 0.8])
}

fn orchestrator(provider: Arc<StaticEmbeddingProvider>) -> ResolutionOrchestrator {
    let index = EmbeddingIndex::new(EmbeddingGateway::new(provider), SearchConfig::default());
    ResolutionOrchestrator::new(Arc::new(index), ResolutionConfig::default())
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = ResolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.match_confidence(), crate::intent::MatchConfidence::default());
    }

    #[test]
    fn test_with_weights_normalizes() {
        let config = ResolutionConfig::with_weights(7.0, 3.0);
        assert!((config.intent_weight - 0.7).abs() < 1e-6);
        assert!((config.similarity_weight - 0.3).abs() < 1e-6);
        assert!(config.validate().is_ok());

        assert_eq!(ResolutionConfig::with_weights(0.0, 0.0), ResolutionConfig::default());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let config = ResolutionConfig {
            intent_weight: 0.9,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ResolutionConfig {
            intent_baseline: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        assert!(ResolutionConfig::default().with_max_intent_results(0).validate().is_err());
    }

    #[test]
    fn test_blend_clamped() {
        let config = ResolutionConfig::default();
        assert!((config.blend(0.9, 1.0) - 0.93).abs() < 1e-6);
        assert_eq!(config.blend(0.0, -1.0), 0.0);
        assert_eq!(config.blend(1.0, 1.0), 1.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Normalized weights always validate
        #[test]
        fn prop_with_weights_valid(a in 0.01f32..10.0, b in 0.01f32..10.0) {
            prop_assert!(ResolutionConfig::with_weights(a, b).validate().is_ok());
        }

        /// Blended scores stay in [0, 1]
        #[test]
        fn prop_blend_bounded(intent in 0.0f32..=1.0, similarity in -1.0f32..=1.0) {
            let score = ResolutionConfig::default().blend(intent, similarity);
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }
}

#[cfg(test)]
mod intent_path_tests {
    use super::*;

    #[tokio::test]
    async fn test_died_resolves_to_power_categories() {
        let provider = Arc::new(campus_provider().with_vector("died", vec![1.0, 0.0, 0.0]));
        let orchestrator = orchestrator(provider);
        let outcome = orchestrator.resolve_query("died", &campus_catalog()).await;

        assert!(outcome.success);
        assert_eq!(outcome.match_type, MatchType::Intent);
        let ids: Vec<u64> = outcome.matches.iter().map(|m| m.resource.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        for m in &outcome.matches {
            assert!(["charger", "power bank", "lockers"].contains(&m.category.as_str()));
            assert!(m.intent_score.unwrap() >= 0.9);
            assert!((0.0..=1.0).contains(&m.score));
        }
        assert!((outcome.matches[0].score - 0.93).abs() < 1e-5);
        assert!((outcome.matches[1].score - 0.63).abs() < 1e-5);
        assert_eq!(
            outcome.path,
            vec![
                ResolutionState::Start,
                ResolutionState::IntentMatched,
                ResolutionState::RefinedBySimilarity,
                ResolutionState::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_refinement_reorders_by_similarity() {
        let provider = Arc::new(campus_provider().with_vector("died", vec![0.0, 0.0, 1.0]));
        let outcome = orchestrator(provider).resolve_query("died", &campus_catalog()).await;

        let ids: Vec<u64> = outcome.matches.iter().map(|m| m.resource.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_refinement_failure_keeps_intent_ranking() {
        let provider = Arc::new(campus_provider().failing_on("died"));
        let outcome = orchestrator(provider).resolve_query("died", &campus_catalog()).await;

        assert!(outcome.success);
        assert_eq!(outcome.match_type, MatchType::Intent);
        let ids: Vec<u64> = outcome.matches.iter().map(|m| m.resource.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(outcome.matches.iter().all(|m| m.score == 0.9 && m.similarity.is_none()));
    }

    #[tokio::test]
    async fn test_resources_missing_from_index_keep_baseline() {
        let provider = Arc::new(
            campus_provider()
                .failing_on("anker")
                .with_vector("died", vec![0.0, 0.0, 1.0]),
        );
        let outcome = orchestrator(provider).resolve_query("died", &campus_catalog()).await;

        let power_bank = outcome.matches.iter().find(|m| m.resource.id == 2).unwrap();
        assert_eq!(power_bank.score, 0.9);
        assert!(power_bank.similarity.is_none());
        assert_eq!(outcome.matches[0].resource.id, 3);
    }

    #[tokio::test]
    async fn test_intent_results_truncated() {
        let chargers: Vec<Resource> = (1..=7)
            .map(|i| Resource::new(i, format!("Charger model{}", i), ""))
            .collect();
        let catalog = Catalog::new().with_category("charger", chargers);
        let provider = Arc::new(StaticEmbeddingProvider::new().with_default(vec![1.0, 0.0]));
        let outcome = orchestrator(provider).resolve_query("charger", &catalog).await;

        assert_eq!(outcome.match_type, MatchType::Intent);
        assert_eq!(outcome.matches.len(), 5);
        let ids: Vec<u64> = outcome.matches.iter().map(|m| m.resource.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_intent_with_empty_categories_falls_through() {
        // "rain" maps to umbrella, which this catalog does not have
        let catalog = Catalog::new().with_category(
            "camera",
            vec![Resource::new(13, "Ricoh Theta", "")],
        );
        let provider = Arc::new(
            StaticEmbeddingProvider::new()
                .with_fragment("theta", vec![1.0, 0.0])
                .with_fragment("rain", vec![0.0, 1.0]),
        );
        let outcome = orchestrator(provider).resolve_query("rain", &catalog).await;

        assert!(outcome.success);
        assert_eq!(outcome.match_type, MatchType::Fallback);
        assert_eq!(
            outcome.path,
            vec![
                ResolutionState::Start,
                ResolutionState::IntentMatched,
                ResolutionState::NoIntent,
                ResolutionState::SemanticSearch,
                ResolutionState::NoMatch,
                ResolutionState::Done,
            ]
        );
    }
}

#[cfg(test)]
mod semantic_path_tests {
    use super::*;

    #[tokio::test]
    async fn test_camera_query_falls_through_to_semantic() {
        let catalog = Catalog::new().with_category(
            "camera",
            vec![Resource::new(13, "Ricoh Theta", "").with_chips(["360°", "Photography"])],
        );
        let provider = Arc::new(
            StaticEmbeddingProvider::new()
                .with_fragment("theta", vec![0.9, 0.1])
                .with_fragment("360 photos", vec![1.0, 0.0]),
        );
        let outcome = orchestrator(provider)
            .resolve_query("I want to take 360 photos", &catalog)
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.match_type, MatchType::Semantic);
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].resource.id, 13);
        assert_eq!(outcome.matches[0].category, "camera");
        assert!(outcome.matches[0].score > 0.9);
        assert_eq!(
            outcome.path,
            vec![
                ResolutionState::Start,
                ResolutionState::NoIntent,
                ResolutionState::SemanticSearch,
                ResolutionState::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_no_match_is_fallback() {
        let provider = Arc::new(campus_provider().with_vector("quantum physics lecture", vec![-1.0, 0.0, 0.0]));
        let outcome = orchestrator(provider)
            .resolve_query("quantum physics lecture", &campus_catalog())
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.match_type, MatchType::Fallback);
        assert!(outcome.matches.is_empty());
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn test_rebuild_twice_same_results() {
        let provider = Arc::new(campus_provider().with_default(vec![0.5, 0.5, 0.5]));
        let orchestrator = orchestrator(provider);
        let catalog = campus_catalog();

        orchestrator.rebuild_embeddings(&catalog).await;
        let first = orchestrator.resolve_query("something to keep dry", &catalog).await;
        orchestrator.rebuild_embeddings(&catalog).await;
        let second = orchestrator.resolve_query("something to keep dry", &catalog).await;

        assert_eq!(first.match_type, MatchType::Semantic);
        assert_eq!(first.matches, second.matches);
    }
}

#[cfg(test)]
mod error_path_tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_query_is_invalid_input() {
        let provider = Arc::new(campus_provider());
        let orchestrator = orchestrator(provider.clone());
        let outcome = orchestrator.resolve_query("   ", &campus_catalog()).await;

        assert!(!outcome.success);
        assert_eq!(outcome.match_type, MatchType::Error);
        assert_eq!(outcome.error_kind, Some(ErrorKind::InvalidInput));
        assert_eq!(outcome.path, vec![ResolutionState::Start, ResolutionState::Done]);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_provider_without_intent_is_error() {
        let provider = Arc::new(campus_provider());
        provider.set_unavailable(true);
        let outcome = orchestrator(provider)
            .resolve_query("I want to take 360 photos", &campus_catalog())
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.match_type, MatchType::Error);
        assert_eq!(outcome.error_kind, Some(ErrorKind::EmbeddingProvider));
        assert!(outcome.error.is_some());
        assert!(outcome.matches.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_provider_with_intent_still_answers() {
        let provider = Arc::new(campus_provider());
        provider.set_unavailable(true);
        let outcome = orchestrator(provider).resolve_query("it is raining", &campus_catalog()).await;

        assert!(outcome.success);
        assert_eq!(outcome.match_type, MatchType::Intent);
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].resource.id, 4);
    }

    #[tokio::test]
    async fn test_unbuildable_index_is_not_ready() {
        let catalog = Catalog::new().with_category("umbrella", vec![Resource::new(4, "Umbrella", "")]);
        let provider = Arc::new(
            StaticEmbeddingProvider::new()
                .with_default(vec![1.0])
                .failing_on("umbrella"),
        );
        let outcome = orchestrator(provider).resolve_query("quantum physics", &catalog).await;

        assert_eq!(outcome.match_type, MatchType::Error);
        assert_eq!(outcome.error_kind, Some(ErrorKind::NotReady));
    }
}

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_embeddings_idempotent() {
        let provider = Arc::new(campus_provider());
        let orchestrator = orchestrator(provider.clone());
        let catalog = campus_catalog();

        let first = orchestrator.initialize_embeddings(&catalog).await;
        assert!(first.ready);
        assert_eq!(first.indexed, 5);
        let calls = provider.call_count();

        let second = orchestrator.initialize_embeddings(&catalog).await;
        assert_eq!(second.built_at, first.built_at);
        assert_eq!(provider.call_count(), calls);
    }

    #[tokio::test]
    async fn test_first_query_builds_index_lazily() {
        let provider = Arc::new(campus_provider().with_vector("died", vec![1.0, 0.0, 0.0]));
        let orchestrator = orchestrator(provider);
        assert!(!orchestrator.index().is_ready());

        orchestrator.resolve_query("died", &campus_catalog()).await;
        assert!(orchestrator.index().is_ready());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(25))]

        /// Intent scores stay in [0, 1] for any resource and query vectors
        #[test]
        fn prop_intent_scores_bounded(
            vectors in prop::collection::vec(prop::collection::vec(-1.0f32..1.0, 3), 3),
            query in prop::collection::vec(-1.0f32..1.0, 3),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let provider = Arc::new(
                StaticEmbeddingProvider::new()
                    .with_vector("died", query)
                    .with_fragment("usb-c", vectors[0].clone())
                    .with_fragment("anker", vectors[1].clone())
                    .with_fragment("locker", vectors[2].clone())
                    .with_default(vec![1.0, 0.0, 0.0]),
            );
            let outcome = rt.block_on(orchestrator(provider).resolve_query("died", &campus_catalog()));

            prop_assert_eq!(outcome.match_type, MatchType::Intent);
            prop_assert!(outcome.matches.iter().all(|m| (0.0..=1.0).contains(&m.score)));
            prop_assert!(outcome.matches.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }
}
