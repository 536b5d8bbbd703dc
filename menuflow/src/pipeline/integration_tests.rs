//! End-to-end pipeline runs over scripted capabilities and sample corpora.

#[cfg(test)]
mod tests {
    use crate::capability::{JitterStrategy, RetryConfig, CANDIDATE_DISHES_SCHEMA, FILTER_SET_SCHEMA};
    use crate::core::{ResolvedRecipe, StageStatus};
    use crate::corpus::{CorpusSource, DirectoryCorpus};
    use crate::errors::{CapabilityError, MenuflowError};
    use crate::events::CollectingEventSink;
    use crate::pipeline::{MenuPipeline, PipelineBuilder};
    use crate::testing::{
        sample_corpus, sample_documents, sample_mapping, write_json_corpus, write_mapping,
        ScriptedCapability,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn mapping_file() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dish_mapping.json");
        write_mapping(&path, &sample_mapping()).unwrap();
        (dir, path)
    }

    fn pipeline(
        capability: Arc<ScriptedCapability>,
        corpus: Arc<dyn CorpusSource>,
        mapping: &Path,
    ) -> MenuPipeline {
        PipelineBuilder::new()
            .capability(capability)
            .corpus(corpus)
            .mapping_path(mapping)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_inclusion_only_question_resolves_pizza() {
        let (_dir, mapping) = mapping_file();
        let capability = Arc::new(
            ScriptedCapability::new()
                .then_ok(json!({"ingredients_or_techniques": ["pizza"]}))
                .then_ok(json!({"dishes": ["Pizza", "Pizza", "Unknown Dish"]})),
        );
        let pipeline = pipeline(capability.clone(), Arc::new(sample_corpus()), &mapping);

        let state = pipeline
            .run_with_state("quali piatti sono a base di pizza ma senza il pomodoro?")
            .await
            .unwrap();

        assert_eq!(state.filter_set().unwrap().terms(), ["pizza".to_string()]);
        assert_eq!(
            state.matched_restaurants(),
            ["Anima Cosmica".to_string(), "Datapizza".to_string()]
        );
        assert!(state.contexts().iter().any(|c| c.contains("Pizza Nebulare")));
        assert_eq!(
            state.resolved_recipes().unwrap(),
            [ResolvedRecipe::new(3, "Pizza")]
        );

        let prompts = capability.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("<ristorante><name>\nDatapizza\n</name>"));
    }

    #[tokio::test]
    async fn test_multi_word_term_reduced_to_significant_word() {
        let (_dir, mapping) = mapping_file();
        let capability = Arc::new(
            ScriptedCapability::new()
                .then_ok(json!({"ingredients_or_techniques": ["Sashimi"]}))
                .then_ok(json!({"dishes": ["Sashimi di Magikarp"]})),
        );
        let pipeline = pipeline(capability, Arc::new(sample_corpus()), &mapping);

        let resolved = pipeline
            .run("Quali piatti contengono Sashimi di Magikarp?")
            .await
            .unwrap();

        assert_eq!(resolved, vec![ResolvedRecipe::new(15, "Sashimi di Magikarp")]);
        assert_eq!(
            serde_json::to_value(&resolved).unwrap(),
            json!([{"15": "Sashimi di Magikarp"}])
        );
    }

    #[tokio::test]
    async fn test_empty_filter_falls_back_to_no_recipe() {
        let (_dir, mapping) = mapping_file();
        let capability = Arc::new(
            ScriptedCapability::new()
                .then_ok(json!({"chefs": ["Gusteau"]}))
                .then_ok(json!({"dishes": []})),
        );
        let pipeline = pipeline(capability, Arc::new(sample_corpus()), &mapping);

        let state = pipeline.run_with_state("Cosa cucina Gusteau?").await.unwrap();

        assert!(state.matched_restaurants().is_empty());
        assert!(state.contexts().is_empty());
        assert_eq!(
            state.resolved_recipes().unwrap(),
            [ResolvedRecipe::no_recipe()]
        );
    }

    #[tokio::test]
    async fn test_pipeline_is_idempotent() {
        let (_dir, mapping) = mapping_file();
        let capability = Arc::new(
            ScriptedCapability::new()
                .always(FILTER_SET_SCHEMA, json!({"ingredients_or_techniques": ["riso"]}))
                .always(
                    CANDIDATE_DISHES_SCHEMA,
                    json!({"dishes": ["Risotto Galattico", "Curry del Vuoto"]}),
                ),
        );
        let pipeline = pipeline(capability, Arc::new(sample_corpus()), &mapping);

        let first = pipeline.run_with_state("Piatti con il riso?").await.unwrap();
        let second = pipeline.run_with_state("Piatti con il riso?").await.unwrap();

        assert_eq!(first.contexts(), second.contexts());
        assert_eq!(first.resolved_recipes(), second.resolved_recipes());
        assert_eq!(
            first.resolved_recipes().unwrap(),
            [
                ResolvedRecipe::new(14, "Risotto Galattico"),
                ResolvedRecipe::new(11, "Curry del Vuoto"),
            ]
        );
        assert_ne!(first.identity().run_id, second.identity().run_id);
    }

    #[tokio::test]
    async fn test_missing_mapping_surfaces_from_run() {
        let capability = Arc::new(
            ScriptedCapability::new()
                .then_ok(json!({"ingredients_or_techniques": ["pizza"]}))
                .then_ok(json!({"dishes": ["Pizza"]})),
        );
        let pipeline = pipeline(
            capability,
            Arc::new(sample_corpus()),
            Path::new("/no/such/dish_mapping.json"),
        );

        let err = pipeline.run("pizza?").await.unwrap_err();
        assert!(matches!(err, MenuflowError::MappingLoad(_)));
    }

    #[tokio::test]
    async fn test_corrupt_document_is_skipped_and_reported() {
        let (_mapping_dir, mapping) = mapping_file();
        let corpus_dir = tempfile::tempdir().unwrap();
        write_json_corpus(corpus_dir.path(), &sample_documents()).unwrap();
        std::fs::write(corpus_dir.path().join("Cratere.json"), "{\"chef\": ").unwrap();

        let sink = Arc::new(CollectingEventSink::new());
        let capability = Arc::new(
            ScriptedCapability::new()
                .then_ok(json!({"ingredients_or_techniques": ["Bollitura"]}))
                .then_ok(json!({"dishes": ["Ramen Stellare"]})),
        );
        let pipeline = PipelineBuilder::new()
            .capability(capability)
            .corpus(Arc::new(DirectoryCorpus::new(corpus_dir.path())))
            .mapping_path(&mapping)
            .event_sink(sink.clone())
            .build()
            .unwrap();

        let state = pipeline.run_with_state("Piatti bolliti?").await.unwrap();

        assert_eq!(
            state.matched_restaurants(),
            ["Anima Cosmica".to_string(), "Sapori di Magikarp".to_string()]
        );
        assert_eq!(state.skipped_documents().len(), 1);
        assert_eq!(state.skipped_documents()[0].identifier, "Cratere");
        assert_eq!(
            state.resolved_recipes().unwrap(),
            [ResolvedRecipe::new(16, "Ramen Stellare")]
        );

        let started = sink.events_of_type("pipeline.started");
        assert_eq!(
            started[0].data["run"]["run_id"],
            json!(state.identity().run_id.to_string())
        );

        let skipped = sink.events_of_type("corpus.document_skipped");
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].data["identifier"], "Cratere");
        assert_eq!(
            sink.event_types(),
            vec![
                "pipeline.started",
                "stage.started",
                "stage.completed",
                "stage.started",
                "corpus.document_skipped",
                "stage.completed",
                "stage.started",
                "stage.completed",
                "pipeline.completed",
            ]
        );
    }

    #[tokio::test]
    async fn test_extraction_failure_stops_pipeline() {
        let (_dir, mapping) = mapping_file();
        let sink = Arc::new(CollectingEventSink::new());
        let capability = Arc::new(
            ScriptedCapability::new().then_ok(json!({"ingredients_or_techniques": "pizza"})),
        );
        let pipeline = PipelineBuilder::new()
            .capability(capability.clone())
            .corpus(Arc::new(sample_corpus()))
            .mapping_path(&mapping)
            .event_sink(sink.clone())
            .build()
            .unwrap();

        let err = pipeline.run("pizza?").await.unwrap_err();

        assert!(matches!(err, MenuflowError::ExtractionFailed { .. }));
        assert_eq!(capability.call_count(), 1);
        assert_eq!(
            sink.event_types(),
            vec!["pipeline.started", "stage.started", "stage.failed", "pipeline.failed"]
        );
        let failed = sink.events_of_type("stage.failed");
        assert_eq!(failed[0].data["stage"], "filter_extractor");
        assert_eq!(failed[0].data["error"]["type"], "ExtractionFailed");
    }

    #[tokio::test]
    async fn test_retry_policy_recovers_transient_failure() {
        let (_dir, mapping) = mapping_file();
        let capability = Arc::new(
            ScriptedCapability::new()
                .then_err(CapabilityError::unavailable_status("scripted", 503, "busy"))
                .then_ok(json!({"ingredients_or_techniques": ["pizza"]}))
                .then_ok(json!({"dishes": ["Pizza Nebulare"]})),
        );
        let pipeline = PipelineBuilder::new()
            .capability(capability.clone())
            .retry(
                RetryConfig::new()
                    .with_base_delay_ms(1)
                    .with_jitter(JitterStrategy::None),
            )
            .corpus(Arc::new(sample_corpus()))
            .mapping_path(&mapping)
            .build()
            .unwrap();

        let state = pipeline.run_with_state("pizza?").await.unwrap();

        assert_eq!(
            state.resolved_recipes().unwrap(),
            [ResolvedRecipe::new(12, "Pizza Nebulare")]
        );
        assert_eq!(capability.call_count(), 3);
        assert!(state
            .records()
            .iter()
            .all(|r| r.status == StageStatus::Ok));
    }
}
