mod support;

use serde_json::json;
use services::{ApiConfig, GameService, GameSession};
use trivia_core::model::{GamePhase, Progress};

use support::{Reply, serve};

fn choice_text(session: &GameSession, index: usize) -> String {
    session
        .question()
        .and_then(|question| question.choice(index))
        .unwrap_or_default()
        .to_owned()
}

#[tokio::test]
async fn question_404_switches_the_session_to_mock_data() {
    let server = serve(|method, path| match (method, path) {
        ("POST", "/api/game/start") => Reply::Json(200, json!({ "ok": true }).to_string()),
        _ => Reply::Json(404, json!({ "detail": "Not Found" }).to_string()),
    })
    .await;
    let service = GameService::from_config(ApiConfig::default().with_base_url(server.base_url()));
    let mut session = GameSession::new();

    session.start(&service, "Ada").await.unwrap();

    assert!(service.is_mock_mode());
    assert_eq!(session.error(), None);
    assert_eq!(session.phase(), GamePhase::Playing);
    assert_eq!(
        server.requests(),
        vec!["POST /api/game/start", "GET /api/game/question"]
    );

    session.select(&service, 0).await.unwrap();
    session.advance(&service).await.unwrap();
    assert_eq!(server.requests().len(), 2, "no further backend traffic");
}

#[tokio::test]
async fn full_mock_game_against_unreachable_backend() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let service =
        GameService::from_config(ApiConfig::default().with_base_url(format!("http://{addr}/api")));
    let mut session = GameSession::new();

    session.start(&service, "Ada").await.unwrap();
    assert_eq!(session.progress(), Progress::new(1, 3));
    assert_eq!(session.score(), 0);

    // Question 1: wrong answer; feedback names the right choice.
    session.select(&service, 0).await.unwrap();
    let result = session.result().cloned().unwrap();
    assert!(!result.correct);
    let correct_index = result.correct_index.unwrap();
    assert_eq!(choice_text(&session, correct_index), "Paris");

    session.advance(&service).await.unwrap();
    assert_eq!(session.progress(), Progress::new(2, 3));

    // Question 2: right answer.
    session.select(&service, 1).await.unwrap();
    assert!(session.result().unwrap().correct);
    assert_eq!(session.score(), 1);

    session.advance(&service).await.unwrap();
    assert_eq!(session.progress(), Progress::new(3, 3));
    session.select(&service, 0).await.unwrap();
    assert!(session.is_game_over());

    session.advance(&service).await.unwrap();
    assert_eq!(session.phase(), GamePhase::Complete);
    assert_eq!(session.score(), 1);
    assert_eq!(session.progress().total, 3);
}
