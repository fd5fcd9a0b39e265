//! End-to-end verification scenarios against a seeded in-memory store

use claimcheck_domain::traits::EvidenceStore;
use claimcheck_domain::{
    ClaimType, EvidenceDocument, EvidenceId, NewEvidence, ScoredEvidence, Verdict,
    VerificationResult,
};
use claimcheck_llm::MockProvider;
use claimcheck_rerank::Reranker;
use claimcheck_search::{SearchConfig, SearchError, SearchHit, StaticBackend, WebEvidenceProvider};
use claimcheck_store::seed::{seed_facts, seed_if_empty};
use claimcheck_store::{SqliteEvidenceStore, StoreError};
use claimcheck_verifier::prompt::{CLASSIFY_TASK, SUFFICIENCY_TASK, SYNTHESIS_TASK};
use claimcheck_verifier::{ClaimVerifier, VerifierConfig, VerifyError};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Seeded store that records every query
struct CountingStore {
    inner: SqliteEvidenceStore,
    queries: Mutex<Vec<String>>,
}

impl CountingStore {
    fn seeded() -> Arc<Self> {
        let inner = SqliteEvidenceStore::in_memory().unwrap();
        seed_if_empty(&inner).unwrap();
        Arc::new(Self {
            inner,
            queries: Mutex::new(Vec::new()),
        })
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    fn access_counts(&self) -> HashMap<EvidenceId, u64> {
        self.inner
            .all()
            .unwrap()
            .into_iter()
            .map(|d| (d.id, d.access_count))
            .collect()
    }
}

impl EvidenceStore for CountingStore {
    type Error = StoreError;

    fn insert(&self, evidence: NewEvidence) -> Result<EvidenceId, StoreError> {
        self.inner.insert(evidence)
    }

    fn insert_batch(&self, evidence: Vec<NewEvidence>) -> Result<Vec<EvidenceId>, StoreError> {
        self.inner.insert_batch(evidence)
    }

    fn query(&self, text: &str, top_k: usize) -> Result<Vec<ScoredEvidence>, StoreError> {
        self.queries.lock().unwrap().push(text.to_string());
        self.inner.query(text, top_k)
    }

    fn increment_access(&self, id: EvidenceId) -> Result<(), StoreError> {
        self.inner.increment_access(id)
    }

    fn get(&self, id: EvidenceId) -> Result<Option<EvidenceDocument>, StoreError> {
        self.inner.get(id)
    }

    fn count(&self) -> Result<usize, StoreError> {
        self.inner.count()
    }
}

/// Store whose backing database has gone away
struct UnavailableStore;

impl EvidenceStore for UnavailableStore {
    type Error = StoreError;

    fn insert(&self, _evidence: NewEvidence) -> Result<EvidenceId, StoreError> {
        Err(down())
    }

    fn insert_batch(&self, _evidence: Vec<NewEvidence>) -> Result<Vec<EvidenceId>, StoreError> {
        Err(down())
    }

    fn query(&self, _text: &str, _top_k: usize) -> Result<Vec<ScoredEvidence>, StoreError> {
        Err(down())
    }

    fn increment_access(&self, _id: EvidenceId) -> Result<(), StoreError> {
        Err(down())
    }

    fn get(&self, _id: EvidenceId) -> Result<Option<EvidenceDocument>, StoreError> {
        Err(down())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Err(down())
    }
}

fn down() -> StoreError {
    StoreError::InvalidData("database file is gone".to_string())
}

fn fast_search() -> SearchConfig {
    SearchConfig {
        base_backoff_ms: 1,
        cooldown_ms: 0,
        request_timeout_secs: 5,
        ..SearchConfig::default()
    }
}

fn verifier<S>(
    llm: &MockProvider,
    store: Arc<S>,
    backend: &StaticBackend,
    config: VerifierConfig,
) -> ClaimVerifier<MockProvider, S, StaticBackend>
where
    S: EvidenceStore,
    S::Error: std::fmt::Display,
{
    let web = WebEvidenceProvider::new(backend.clone(), Arc::clone(&store), fast_search());
    ClaimVerifier::new(llm.clone(), store, web, Reranker::default(), config).unwrap()
}

fn classification(kind: &str, normalized: &str) -> String {
    json!({
        "type": kind,
        "normalized_claim": normalized,
        "rationale": format!("classified as {}", kind.to_lowercase()),
    })
    .to_string()
}

fn synthesis(verdict: &str, confidence: f64, reasoning: &str) -> String {
    json!({ "verdict": verdict, "confidence": confidence, "reasoning": reasoning }).to_string()
}

/// Mock scripted for the Earth claim: factual, sufficient, refuted by [1]
fn earth_llm() -> MockProvider {
    let mut llm = MockProvider::new("");
    llm.add_response(CLASSIFY_TASK, classification("FACTUAL", "The Earth is flat"));
    llm.add_response(
        SUFFICIENCY_TASK,
        r#"{"sufficient": true, "reason": "NASA directly describes the Earth's shape"}"#,
    );
    llm.add_response(
        SYNTHESIS_TASK,
        synthesis(
            "FALSE",
            0.95,
            "NASA states that the Earth is an oblate spheroid, not flat [1].",
        ),
    );
    llm
}

fn seed_urls() -> HashSet<String> {
    seed_facts().into_iter().map(|f| f.source_url).collect()
}

/// Citations point into the evidence and every source came from this call
fn assert_grounded(result: &VerificationResult, allowed_urls: &HashSet<String>) {
    if result.verdict.is_substantive() {
        assert!(
            result.dangling_citations().is_empty(),
            "dangling citations in {:?}",
            result.reasoning
        );
    }
    for candidate in &result.evidence {
        assert!(
            allowed_urls.contains(&candidate.source_url),
            "unexpected source {}",
            candidate.source_url
        );
    }
}

#[tokio::test]
async fn test_flat_earth_is_false_with_nasa_citation() {
    let llm = earth_llm();
    let store = CountingStore::seeded();
    let backend = StaticBackend::new();
    let verifier = verifier(&llm, Arc::clone(&store), &backend, VerifierConfig::default());

    let result = verifier.verify("The Earth is flat").await.unwrap();

    assert_eq!(result.classification, ClaimType::Factual);
    assert_eq!(result.claim, "The Earth is flat");
    assert_eq!(result.verdict, Verdict::False);
    assert!(!result.evidence.is_empty());
    assert!(result.evidence.iter().any(|c| c.domain == "nasa.gov"));
    assert!(result.reasoning.contains("[1]"));
    assert_grounded(&result, &seed_urls());

    // Stored evidence was enough, so the web was never consulted
    assert_eq!(backend.request_count(), 0);
    assert!(result.trace.iter().any(|e| e.contains("sufficient")));
    assert!(result.trace.last().unwrap().contains("Done"));
}

#[tokio::test]
async fn test_opinion_short_circuits() {
    let mut llm = MockProvider::new("");
    llm.add_response(CLASSIFY_TASK, classification("OPINION", ""));
    let store = CountingStore::seeded();
    let backend = StaticBackend::new();
    let verifier = verifier(&llm, Arc::clone(&store), &backend, VerifierConfig::default());

    let result = verifier
        .verify("Pizza tastes better than burgers")
        .await
        .unwrap();

    assert_eq!(result.classification, ClaimType::Opinion);
    assert_eq!(result.verdict, Verdict::NotVerifiable);
    assert!(result.evidence.is_empty());
    assert!(store.queries().is_empty());
    assert_eq!(backend.request_count(), 0);
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_share_only_the_store() {
    const EARTH: &str = "The Earth is flat";
    const PIZZA: &str = "Pizza tastes better than burgers";

    // One script answers both claims; the opinion rule is the more specific one
    let script = || {
        let mut llm = earth_llm();
        llm.add_response_when(
            &[CLASSIFY_TASK, "CLAIM: Pizza tastes better"],
            classification("OPINION", ""),
        );
        llm
    };
    let backend = StaticBackend::new();
    let config = VerifierConfig::default;

    let alone_earth = verifier(&script(), CountingStore::seeded(), &backend, config())
        .verify(EARTH)
        .await
        .unwrap();
    let alone_pizza = verifier(&script(), CountingStore::seeded(), &backend, config())
        .verify(PIZZA)
        .await
        .unwrap();

    let store = CountingStore::seeded();
    let shared = verifier(&script(), Arc::clone(&store), &backend, config());
    let (earth, pizza) = tokio::join!(shared.verify(EARTH), shared.verify(PIZZA));
    let (earth, pizza) = (earth.unwrap(), pizza.unwrap());

    let sources = |r: &VerificationResult| {
        r.evidence
            .iter()
            .map(|c| c.source_url.clone())
            .collect::<Vec<_>>()
    };
    for (together, alone) in [(&earth, &alone_earth), (&pizza, &alone_pizza)] {
        assert_eq!(together.classification, alone.classification);
        assert_eq!(together.verdict, alone.verdict);
        assert_eq!(together.claim, alone.claim);
        assert_eq!(together.reasoning, alone.reasoning);
        assert_eq!(together.trace, alone.trace);
        assert_eq!(sources(together), sources(alone));
    }

    assert_eq!(earth.verdict, Verdict::False);
    assert_eq!(pizza.verdict, Verdict::NotVerifiable);
    assert_ne!(earth.session_id, pizza.session_id);
    assert!(earth.trace.iter().all(|e| !e.contains("Pizza") && !e.contains("OPINION")));
    assert!(pizza.trace.iter().all(|e| !e.contains("Earth") && !e.contains("FACTUAL")));
    assert_eq!(store.queries(), vec![EARTH.to_string()]);
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn test_ambiguous_claim_asks_for_clarification() {
    let mut llm = MockProvider::new("");
    llm.add_response(CLASSIFY_TASK, classification("AMBIGUOUS", ""));
    let store = CountingStore::seeded();
    let backend = StaticBackend::new();
    let verifier = verifier(&llm, Arc::clone(&store), &backend, VerifierConfig::default());

    let result = verifier.verify("It's true").await.unwrap();

    assert_eq!(result.classification, ClaimType::Ambiguous);
    assert_eq!(result.verdict, Verdict::NotEnoughEvidence);
    assert!(result.evidence.is_empty());
    assert!(result.trace.iter().any(|e| e.contains("Clarification needed")));
    assert!(store.queries().is_empty());
}

#[tokio::test]
async fn test_mixed_claim_retrieves_on_normalized_text() {
    let mut llm = MockProvider::new("");
    llm.add_response(
        CLASSIFY_TASK,
        classification("MIXED", "Minecraft is a 2D game"),
    );
    llm.add_response(
        SYNTHESIS_TASK,
        synthesis("FALSE", 0.9, "Minecraft is a three-dimensional game [1]."),
    );
    let store = CountingStore::seeded();
    let backend = StaticBackend::new();
    let verifier = verifier(&llm, Arc::clone(&store), &backend, VerifierConfig::default());

    let result = verifier
        .verify("Minecraft is the best 2D game")
        .await
        .unwrap();

    assert_eq!(result.classification, ClaimType::Mixed);
    assert_eq!(result.claim, "Minecraft is a 2D game");
    assert_eq!(result.original_claim, "Minecraft is the best 2D game");
    assert_eq!(store.queries(), vec!["Minecraft is a 2D game".to_string()]);
    assert!(backend
        .requests()
        .iter()
        .all(|r| r.query == "Minecraft is a 2D game"));
    assert!(llm.calls_matching("CLAIM: Minecraft is a 2D game") >= 1);
    assert_eq!(llm.calls_matching("best 2D game"), 1);

    assert_eq!(result.verdict, Verdict::False);
    assert!(result.evidence.iter().any(|c| c.domain == "minecraft.net"));
    assert_grounded(&result, &seed_urls());
}

#[tokio::test]
async fn test_citation_out_of_range_is_rejected() {
    let mut llm = earth_llm();
    llm.add_response_when(
        &[SYNTHESIS_TASK, "CLAIM: The Earth is flat"],
        synthesis("FALSE", 0.9, "See [1] and the leaked memo [7]."),
    );
    let store = CountingStore::seeded();
    let verifier = verifier(&llm, store, &StaticBackend::new(), VerifierConfig::default());

    let result = verifier.verify("The Earth is flat").await.unwrap();

    assert_eq!(result.verdict, Verdict::NotEnoughEvidence);
    assert_eq!(result.confidence, 0.0);
    assert!(result.dangling_citations().is_empty());
    assert!(result.trace.iter().any(|e| e.contains("Verdict output rejected")));
}

#[tokio::test]
async fn test_no_evidence_skips_synthesis() {
    let mut llm = MockProvider::new("");
    llm.add_response(CLASSIFY_TASK, classification("FACTUAL", ""));
    let store = CountingStore::seeded();
    let backend = StaticBackend::new();
    let verifier = verifier(&llm, Arc::clone(&store), &backend, VerifierConfig::default());

    let result = verifier
        .verify("Tardigrades compose operatic arias")
        .await
        .unwrap();

    assert_eq!(result.verdict, Verdict::NotEnoughEvidence);
    assert!(result.evidence.is_empty());
    assert_eq!(llm.calls_matching(SYNTHESIS_TASK), 0);
    // Trusted, fact-checkers, then broad
    assert_eq!(backend.request_count(), 3);
    assert!(result
        .trace
        .iter()
        .any(|e| e.contains("verdict step skipped")));
}

#[tokio::test]
async fn test_fact_checker_evidence_ends_escalation() {
    let snopes = "https://www.snopes.com/fact-check/bleach-covid/";
    let mut llm = MockProvider::new("");
    llm.add_response(CLASSIFY_TASK, classification("FACTUAL", ""));
    llm.add_response(
        SYNTHESIS_TASK,
        synthesis(
            "FALSE",
            0.9,
            "Fact-checkers report that drinking bleach does not cure COVID-19 [1].",
        ),
    );
    let store = CountingStore::seeded();
    let before = store.count().unwrap();
    let backend = StaticBackend::new().on_domain(
        "snopes.com",
        vec![SearchHit::new(
            "Does drinking bleach cure COVID-19?",
            "Drinking bleach does not cure COVID-19 and is dangerous.",
            snopes,
        )],
    );
    let verifier = verifier(&llm, Arc::clone(&store), &backend, VerifierConfig::default());

    let result = verifier
        .verify("Drinking bleach cures COVID-19")
        .await
        .unwrap();

    assert_eq!(result.verdict, Verdict::False);
    assert_eq!(result.evidence[0].source_url, snopes);

    let mut allowed = seed_urls();
    allowed.insert(snopes.to_string());
    assert_grounded(&result, &allowed);

    // Enough relevant evidence after the fact-checkers: no broad search
    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| !r.domains.is_empty()));

    // The snippet was written back into the store
    assert_eq!(store.count().unwrap(), before + 1);
}

#[tokio::test]
async fn test_search_failure_is_traced_and_pipeline_continues() {
    let mut llm = MockProvider::new("");
    llm.add_response(CLASSIFY_TASK, classification("FACTUAL", ""));
    let backend = StaticBackend::new()
        .fail_on_domain("reuters.com", SearchError::Network("connection reset".to_string()));
    let store = CountingStore::seeded();
    let verifier = verifier(&llm, store, &backend, VerifierConfig::default());

    let result = verifier
        .verify("Tardigrades compose operatic arias")
        .await
        .unwrap();

    assert_eq!(result.verdict, Verdict::NotEnoughEvidence);
    assert!(result
        .trace
        .iter()
        .any(|e| e.contains("trusted news unavailable")));
    assert_eq!(backend.request_count(), 3);
}

#[tokio::test]
async fn test_access_counts_only_grow_for_relevant_documents() {
    let llm = earth_llm();
    let store = CountingStore::seeded();
    let verifier = verifier(
        &llm,
        Arc::clone(&store),
        &StaticBackend::new(),
        VerifierConfig::default(),
    );

    let initial = store.access_counts();
    assert!(initial.values().all(|c| *c == 0));

    let mut previous = initial;
    for _ in 0..2 {
        verifier.verify("The Earth is flat").await.unwrap();
        let current = store.access_counts();
        for (id, count) in &current {
            assert!(*count >= previous.get(id).copied().unwrap_or(0));
        }
        previous = current;
    }

    let docs = store.inner.all().unwrap();
    let shape = docs.iter().find(|d| d.text.contains("oblate")).unwrap();
    let un = docs.iter().find(|d| d.text.contains("United Nations")).unwrap();
    assert_eq!(shape.access_count, 2);
    assert_eq!(un.access_count, 0);
}

#[tokio::test]
async fn test_classification_fallback_is_idempotent() {
    let mut llm = earth_llm();
    llm.add_error_when(&[CLASSIFY_TASK, "CLAIM: The Earth is flat"]);
    let store = CountingStore::seeded();
    let verifier = verifier(
        &llm,
        Arc::clone(&store),
        &StaticBackend::new(),
        VerifierConfig::default(),
    );

    let first = verifier.verify("The Earth is flat").await.unwrap();
    let second = verifier.verify("The Earth is flat").await.unwrap();

    for result in [&first, &second] {
        assert_eq!(result.classification, ClaimType::Factual);
        assert_eq!(result.claim, "The Earth is flat");
        assert!(result.trace[0].contains("Classification unavailable"));
    }
    assert_eq!(first.verdict, second.verdict);
    let urls = |r: &VerificationResult| {
        r.evidence
            .iter()
            .map(|c| c.source_url.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(urls(&first), urls(&second));
    assert_ne!(first.session_id, second.session_id);
    assert_eq!(
        store.queries(),
        vec!["The Earth is flat".to_string(), "The Earth is flat".to_string()]
    );
}

#[tokio::test]
async fn test_store_unavailable_is_the_only_error() {
    let mut llm = MockProvider::new("");
    llm.add_response(CLASSIFY_TASK, classification("FACTUAL", ""));
    let verifier = verifier(
        &llm,
        Arc::new(UnavailableStore),
        &StaticBackend::new(),
        VerifierConfig::default(),
    );

    match verifier.verify("The Earth is flat").await {
        Err(VerifyError::StoreUnavailable {
            session_id,
            trace,
            message,
        }) => {
            assert!(session_id.is_some());
            assert!(message.contains("database file is gone"));
            assert!(trace.iter().any(|e| e.contains("Evidence store unavailable")));
        }
        other => panic!("expected StoreUnavailable, got {:?}", other),
    }

    assert!(matches!(
        verifier.health(),
        Err(VerifyError::StoreUnavailable {
            session_id: None,
            ..
        })
    ));
}

#[tokio::test]
async fn test_opinion_never_touches_a_broken_store() {
    let mut llm = MockProvider::new("");
    llm.add_response(CLASSIFY_TASK, classification("OPINION", ""));
    let verifier = verifier(
        &llm,
        Arc::new(UnavailableStore),
        &StaticBackend::new(),
        VerifierConfig::default(),
    );

    let result = verifier.verify("Jazz is better than rock").await.unwrap();
    assert_eq!(result.verdict, Verdict::NotVerifiable);
}

#[tokio::test]
async fn test_overall_timeout_returns_not_enough_evidence() {
    let llm = earth_llm().with_latency(Duration::from_millis(1500));
    let config = VerifierConfig {
        judgment_timeout_secs: 5,
        verification_timeout_secs: 1,
        ..VerifierConfig::default()
    };
    let verifier = verifier(&llm, CountingStore::seeded(), &StaticBackend::new(), config);

    let result = verifier.verify("The Earth is flat").await.unwrap();

    assert_eq!(result.verdict, Verdict::NotEnoughEvidence);
    assert_eq!(result.confidence, 0.0);
    assert!(result.evidence.is_empty());
    assert!(result.trace.last().unwrap().contains("Timed out"));
}

#[tokio::test]
async fn test_health_reports_document_count() {
    let store = CountingStore::seeded();
    let verifier = verifier(
        &MockProvider::default(),
        Arc::clone(&store),
        &StaticBackend::new(),
        VerifierConfig::default(),
    );
    assert_eq!(
        verifier.health().unwrap().document_count,
        seed_facts().len()
    );
}

#[test]
fn test_invalid_config_is_rejected() {
    let store = CountingStore::seeded();
    let web = WebEvidenceProvider::new(StaticBackend::new(), Arc::clone(&store), fast_search());
    let config = VerifierConfig {
        rerank_top_k: 50,
        retrieval_top_k: 10,
        ..VerifierConfig::default()
    };
    let result = ClaimVerifier::new(
        MockProvider::default(),
        store,
        web,
        Reranker::default(),
        config,
    );
    assert!(matches!(result, Err(VerifyError::Config(_))));
}
