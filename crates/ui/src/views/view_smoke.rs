use std::sync::Arc;

use async_trait::async_trait;
use services::{AdminBackend, AdminService, ApiError, GameService, MockProvider, QuestionRecord};
use trivia_core::model::{NewQuestion, QuestionId};

use super::test_harness::{ViewHarness, ViewKind, setup_view_harness};

/// Serves a fixed list and rejects every mutation.
struct StaticBackend {
    list: Result<Vec<QuestionRecord>, String>,
}

#[async_trait]
impl AdminBackend for StaticBackend {
    async fn list(&self) -> Result<Vec<QuestionRecord>, ApiError> {
        self.list.clone().map_err(ApiError::Decode)
    }

    async fn create(&self, _question: &NewQuestion) -> Result<(), ApiError> {
        Err(ApiError::Decode("read only".into()))
    }

    async fn update(&self, _id: &QuestionId, _question: &NewQuestion) -> Result<(), ApiError> {
        Err(ApiError::Decode("read only".into()))
    }

    async fn delete(&self, _id: &QuestionId) -> Result<(), ApiError> {
        Err(ApiError::Decode("read only".into()))
    }
}

fn admin_with(list: Result<Vec<QuestionRecord>, String>) -> Arc<AdminService> {
    Arc::new(AdminService::new(Arc::new(StaticBackend { list })))
}

fn record(id: Option<&str>, prompt: &str, choices: &[&str], correct: usize) -> QuestionRecord {
    QuestionRecord {
        id: id.map(QuestionId::new),
        prompt: prompt.to_string(),
        choices: choices.iter().map(|choice| (*choice).to_string()).collect(),
        correct_index: Some(correct),
        explanation: None,
    }
}

async fn settle(harness: &mut ViewHarness) {
    for _ in 0..3 {
        harness.drive_async().await;
    }
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_renders_start_form() {
    let game = Arc::new(GameService::new(Arc::new(MockProvider::new())));
    let mut harness = setup_view_harness(ViewKind::Play, game, admin_with(Ok(Vec::new())));

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Player name"), "missing name label in {html}");
    assert!(html.contains("Start game"), "missing start button in {html}");
    assert!(!html.contains("Mock mode"), "unexpected mock badge in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_shows_mock_badge_offline() {
    let game = Arc::new(GameService::offline(Arc::new(MockProvider::new())));
    let mut harness = setup_view_harness(ViewKind::Play, game, admin_with(Ok(Vec::new())));

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Mock mode"), "missing mock badge in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn admin_view_smoke_lists_questions() {
    let records = vec![
        record(Some("q1"), "Largest planet?", &["Earth", "Jupiter", "Mars"], 1),
        record(None, "Smallest prime?", &["1", "2"], 1),
    ];
    let game = Arc::new(GameService::offline(Arc::new(MockProvider::new())));
    let mut harness = setup_view_harness(ViewKind::Admin, game, admin_with(Ok(records)));

    harness.rebuild();
    settle(&mut harness).await;
    let html = harness.render();
    assert!(html.contains("Largest planet?"), "missing first prompt in {html}");
    assert!(html.contains("Smallest prime?"), "missing second prompt in {html}");
    assert!(html.contains("Answer: Jupiter"), "missing answer in {html}");
    assert!(html.contains("Add question"), "missing form in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn admin_view_smoke_renders_load_error() {
    let game = Arc::new(GameService::offline(Arc::new(MockProvider::new())));
    let mut harness = setup_view_harness(
        ViewKind::Admin,
        game,
        admin_with(Err("database offline".to_string())),
    );

    harness.rebuild();
    settle(&mut harness).await;
    let html = harness.render();
    assert!(html.contains("database offline"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}
