//! Behaviour tests for the backfill pass over legacy word rows.
//!
//! The word table lives in the in-memory store; the completion service is a
//! canned stub so the enrichment written back is predictable.

use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;
use vocab_backend::domain::ports::{
    BackfillReport, CompletionRequest, CompletionSource, CompletionSourceError, SheetTable,
    WordRecordsCommand, WordRecordsQuery,
};
use vocab_backend::domain::{
    EnrichmentService, Error, ErrorCode, UserId, WordRecord, WordRecordService,
};
use vocab_backend::outbound::sheets::InMemorySheetStore;

const RESILIENT_REPLY: &str = r#"{
    "pronunciation": "/rɪˈzɪlyənt/",
    "definition": "able to recover quickly",
    "synonyms": ["tough", "hardy", "durable"],
    "examples": ["She is resilient.", "Resilient teams adapt.", "A resilient economy."]
}"#;

struct StubCompletion {
    reply: Option<&'static str>,
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionSource for StubCompletion {
    async fn complete(
        &self,
        _request: &CompletionRequest,
    ) -> Result<String, CompletionSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Some(reply) => Ok(reply.to_owned()),
            None => Err(CompletionSourceError::transport("connection refused")),
        }
    }
}

struct BackfillWorld {
    runtime: Runtime,
    store: Arc<InMemorySheetStore>,
    table: SheetTable,
    seeded: RefCell<Vec<Vec<String>>>,
    completion: RefCell<Option<Arc<StubCompletion>>>,
    outcome: RefCell<Option<Result<BackfillReport, Error>>>,
}

impl BackfillWorld {
    fn new() -> Self {
        Self {
            runtime: Runtime::new().expect("tokio runtime should initialize"),
            store: Arc::new(InMemorySheetStore::new()),
            table: SheetTable::new("words-doc", "Words", 0),
            seeded: RefCell::new(Vec::new()),
            completion: RefCell::new(None),
            outcome: RefCell::new(None),
        }
    }

    fn completion(&self) -> Arc<StubCompletion> {
        self.completion
            .borrow()
            .clone()
            .expect("completion service configured")
    }

    fn service(&self) -> WordRecordService {
        let completion: Arc<dyn CompletionSource> = self.completion();
        WordRecordService::new(
            self.store.clone(),
            self.table.clone(),
            EnrichmentService::new(completion),
        )
    }

    fn records_for(&self, user: &str) -> Vec<WordRecord> {
        let user = UserId::new(user).expect("valid user id");
        self.runtime
            .block_on(self.service().get_words(&user))
            .expect("records readable")
    }

    fn only_record(&self, user: &str, word: &str) -> WordRecord {
        let mut matches: Vec<_> = self
            .records_for(user)
            .into_iter()
            .filter(|record| record.word == word)
            .collect();
        assert_eq!(matches.len(), 1, "expected exactly one {word} record");
        matches.remove(0)
    }
}

#[fixture]
fn world() -> BackfillWorld {
    BackfillWorld::new()
}

#[given("a word table with the legacy row {word} for user {user}")]
fn a_word_table_with_legacy_row(world: &BackfillWorld, word: String, user: String) {
    world
        .seeded
        .borrow_mut()
        .push(vec![String::new(), user, word]);
    world.store.seed(&world.table, world.seeded.borrow().clone());
}

#[given("a completion service that knows resilient")]
fn a_completion_service_that_knows_resilient(world: &BackfillWorld) {
    *world.completion.borrow_mut() = Some(Arc::new(StubCompletion {
        reply: Some(RESILIENT_REPLY),
        calls: AtomicUsize::new(0),
    }));
}

#[given("a completion service that is unavailable")]
fn a_completion_service_that_is_unavailable(world: &BackfillWorld) {
    *world.completion.borrow_mut() = Some(Arc::new(StubCompletion {
        reply: None,
        calls: AtomicUsize::new(0),
    }));
}

#[when("missing content is filled for user {user}")]
fn missing_content_is_filled(world: &BackfillWorld, user: String) {
    let user = UserId::new(user).expect("valid user id");
    let outcome = world
        .runtime
        .block_on(world.service().fill_missing_content(&user));
    *world.outcome.borrow_mut() = Some(outcome);
}

#[then("the pass reports {count} updated record")]
fn the_pass_reports_updated(world: &BackfillWorld, count: usize) {
    let outcome = world.outcome.borrow();
    let report = outcome
        .as_ref()
        .expect("pass ran")
        .as_ref()
        .expect("pass succeeded");
    assert_eq!(report.updated, count);
    assert_eq!(report.conflicts, 0);
}

#[then("user {user} has one fully populated record for {word}")]
fn user_has_one_fully_populated_record(world: &BackfillWorld, user: String, word: String) {
    let record = world.only_record(&user, &word);
    assert!(record.is_complete());
    assert_eq!(record.enrichment.pronunciation, "/rɪˈzɪlyənt/");
    assert_eq!(record.enrichment.definition, "able to recover quickly");
    assert_eq!(record.enrichment.examples.len(), 3);
}

#[then("its synonyms render as numbered lines")]
fn its_synonyms_render_as_numbered_lines(world: &BackfillWorld) {
    let record = world.only_record("U1", "resilient");
    assert_eq!(
        vocab_backend::domain::numbered_text(&record.enrichment.synonyms),
        "1. tough\n2. hardy\n3. durable"
    );
}

#[then("the record carries a key at version {version}")]
fn the_record_carries_a_key(world: &BackfillWorld, version: u64) {
    let record = world.only_record("U1", "resilient");
    assert!(record.key.is_some());
    assert_eq!(record.version, version);
}

#[then("the completion service was asked {count} time")]
fn the_completion_service_was_asked(world: &BackfillWorld, count: usize) {
    assert_eq!(world.completion().calls.load(Ordering::SeqCst), count);
}

#[then("user {user} still has an incomplete record for {word}")]
fn user_still_has_incomplete_record(world: &BackfillWorld, user: String, word: String) {
    let record = world.only_record(&user, &word);
    assert!(!record.is_complete());
    assert!(record.key.is_none());
    assert_eq!(record.version, 0);
}

#[then("the pass fails because an upstream is unavailable")]
fn the_pass_fails_upstream(world: &BackfillWorld) {
    let outcome = world.outcome.borrow();
    let error = match outcome.as_ref().expect("pass ran") {
        Ok(report) => panic!("expected failure, got {report:?}"),
        Err(error) => error,
    };
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[then("the word table is unchanged")]
fn the_word_table_is_unchanged(world: &BackfillWorld) {
    assert_eq!(world.store.snapshot(&world.table), *world.seeded.borrow());
}

#[scenario(
    path = "tests/features/word_backfill.feature",
    name = "A legacy row is enriched keyed and versioned"
)]
fn a_legacy_row_is_enriched(world: BackfillWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/word_backfill.feature",
    name = "A second pass finds nothing to do"
)]
fn a_second_pass_finds_nothing(world: BackfillWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/word_backfill.feature",
    name = "Records owned by other users are left alone"
)]
fn other_users_are_left_alone(world: BackfillWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/word_backfill.feature",
    name = "A completion outage leaves the table untouched"
)]
fn completion_outage_leaves_table_untouched(world: BackfillWorld) {
    drop(world);
}
