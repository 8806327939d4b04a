//! Integration tests for the editing session

use folio_compiler_html::PlatformProfile;
use folio_editor::{
    AiAction, AiOutcome, AiServiceError, ArticleStore, DiscardReason, Document, EditSession,
    EditorError, FontSizeStep, FragmentError, InsertPosition, MemoryStore, Mutation,
    StyleUpdates, TextService,
};
use std::future::Future;

/// Text service answering every prompt with a fixed result
struct FixedService {
    result: Result<String, AiServiceError>,
}

impl FixedService {
    fn ok(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
        }
    }

    fn failing() -> Self {
        Self {
            result: Err(AiServiceError::Unavailable("connection refused".to_string())),
        }
    }
}

impl TextService for FixedService {
    fn generate(
        &self,
        _prompt: &str,
        _structured_output: bool,
    ) -> impl Future<Output = Result<String, AiServiceError>> + Send {
        let result = self.result.clone();
        async move { result }
    }
}

fn session(html: &str) -> EditSession {
    EditSession::new("s1", Document::from_html("draft.html", html))
}

#[test]
fn test_document_lifecycle() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("folio-lifecycle-{}.html", std::process::id()));
    std::fs::write(&path, "<p>Hello</p>")?;

    let mut doc = Document::load(&path)?;
    assert_eq!(doc.version, 0);
    assert!(!doc.is_dirty());

    let text = doc.ast().blocks()[0].children[0].id.clone();
    doc.apply(Mutation::UpdateText {
        node_id: text,
        content: "World".to_string(),
    })?;
    assert!(doc.is_dirty());

    doc.save()?;
    assert!(!doc.is_dirty());
    assert_eq!(std::fs::read_to_string(&path)?, "<p>World</p>");

    std::fs::remove_file(&path).ok();
    Ok(())
}

#[test]
fn test_undo_restores_prior_tree() {
    let mut session = session("<p>x</p>");
    let text = session.document.ast().blocks()[0].children[0].id.clone();
    let before = session.document.ast().clone();

    session.set_selection(vec![text]);
    session.adjust_font_size(FontSizeStep::Up).unwrap();
    assert_eq!(
        session.to_html(),
        r#"<p><span style="font-size: 18px">x</span></p>"#
    );

    assert!(session.undo());
    assert_eq!(session.document.ast(), &before);

    assert!(session.redo());
    assert_eq!(
        session.to_html(),
        r#"<p><span style="font-size: 18px">x</span></p>"#
    );
}

#[test]
fn test_style_selection_is_one_undo_step() {
    let mut session = session("<p>a</p><p>b</p>");
    let blocks = session.document.ast().blocks();
    let selection = vec![
        blocks[0].children[0].id.clone(),
        blocks[1].children[0].id.clone(),
    ];
    session.set_selection(selection);

    session
        .style_selection(StyleUpdates::new().set("color", "red"))
        .unwrap();
    assert_eq!(
        session.to_html(),
        r#"<p><span style="color: red">a</span></p><p><span style="color: red">b</span></p>"#
    );
    assert_eq!(session.undo_stack().undo_levels(), 1);
    assert_eq!(session.undo_stack().undo_description(), Some("Style selection"));

    session.undo();
    assert_eq!(session.to_html(), "<p>a</p><p>b</p>");
}

#[test]
fn test_insert_fragment_at_end() {
    let mut session = session("<p>body</p>");

    let result = session
        .insert_fragment("footer-signature", InsertPosition::DocumentEnd)
        .unwrap();

    assert_eq!(result.created.len(), 1);
    assert!(session.to_html().starts_with("<p>body</p><p><span"));
    assert!(session.to_html().contains("Written with Folio"));
}

#[test]
fn test_unknown_fragment_errors() {
    let mut session = session("<p>body</p>");

    let err = session
        .insert_fragment("does-not-exist", InsertPosition::DocumentStart)
        .unwrap_err();

    assert!(matches!(
        err,
        EditorError::Fragment(FragmentError::UnknownFragment(id)) if id == "does-not-exist"
    ));
    assert_eq!(session.to_html(), "<p>body</p>");
    assert!(!session.undo_stack().can_undo());
}

#[test]
fn test_publish_strips_classes() {
    let session = session(r#"<div class="card" style="padding: 24px"><p>x</p></div>"#);

    let html = session.publish(&PlatformProfile::wechat());
    assert!(!html.contains("class="));
    assert!(html.contains("<section"));
}

#[test]
fn test_record_round_trips_through_store() {
    let session = session("<p>body</p>");
    let mut store = MemoryStore::new();

    let record = session.to_record("article-1", "Title", "Summary", None);
    store.save(record.clone()).unwrap();

    let loaded = store.load("article-1").unwrap().unwrap();
    assert_eq!(loaded, record);
    assert_eq!(loaded.html, "<p>body</p>");
}

#[tokio::test]
async fn test_ai_result_is_applied() {
    let mut session = session("<p>Start</p>");

    let request = session
        .request_ai(AiAction::Continue, "continue the article", None)
        .unwrap();
    assert!(session.is_busy(AiAction::Continue));

    request
        .run(&FixedService::ok("More text.\n\nEven more."), session.ai_sender())
        .await;

    let outcomes = session.poll_ai();
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(&outcomes[0], AiOutcome::Applied { created, .. } if created.len() == 2));
    assert_eq!(
        session.to_html(),
        "<p>Start</p><p>More text.</p><p>Even more.</p>"
    );
    assert!(!session.is_busy(AiAction::Continue));
}

#[tokio::test]
async fn test_ai_runs_on_spawned_task_while_editing() {
    let mut session = session("<p>a</p>");
    let request = session.request_ai(AiAction::Polish, "polish", None).unwrap();
    let sender = session.ai_sender();

    let handle = tokio::spawn(async move {
        let service = FixedService::ok("Polished.");
        request.run(&service, sender).await;
    });

    let text = session.document.ast().blocks()[0].children[0].id.clone();
    session
        .apply(Mutation::UpdateText {
            node_id: text,
            content: "edited".to_string(),
        })
        .unwrap();

    handle.await.unwrap();
    let outcomes = session.poll_ai();

    assert!(matches!(outcomes[0], AiOutcome::Applied { .. }));
    assert_eq!(session.to_html(), "<p>edited</p><p>Polished.</p>");
}

#[tokio::test]
async fn test_ai_result_after_leaving_context_is_discarded() {
    let mut session = session("<p>Start</p>");
    let request = session.request_ai(AiAction::Summarize, "summarize", None).unwrap();

    session.leave_context();
    request
        .run(&FixedService::ok("Summary."), session.ai_sender())
        .await;

    let outcomes = session.poll_ai();
    assert_eq!(
        outcomes[0],
        AiOutcome::Discarded {
            id: "s1-ai-1".to_string(),
            reason: DiscardReason::ContextChanged,
        }
    );
    assert_eq!(session.to_html(), "<p>Start</p>");
    assert!(!session.is_busy(AiAction::Summarize));
}

#[tokio::test]
async fn test_ai_result_for_removed_target_is_discarded() {
    let mut session = session("<p>a</p><p>b</p>");
    let target = session.document.ast().blocks()[0].id.clone();
    let request = session
        .request_ai(AiAction::Continue, "continue", Some(target.clone()))
        .unwrap();

    session.apply(Mutation::RemoveNode { node_id: target }).unwrap();
    request.run(&FixedService::ok("late"), session.ai_sender()).await;

    let outcomes = session.poll_ai();
    assert!(matches!(
        outcomes[0],
        AiOutcome::Discarded {
            reason: DiscardReason::TargetMissing,
            ..
        }
    ));
    assert_eq!(session.to_html(), "<p>b</p>");
}

#[tokio::test]
async fn test_busy_ai_action_rejects_reentry() {
    let mut session = session("<p>a</p>");
    let first = session.request_ai(AiAction::Continue, "one", None).unwrap();

    assert!(matches!(
        session.request_ai(AiAction::Continue, "two", None),
        Err(EditorError::AiBusy(AiAction::Continue))
    ));

    first.run(&FixedService::ok("done"), session.ai_sender()).await;
    session.poll_ai();
    assert!(session.request_ai(AiAction::Continue, "three", None).is_ok());
}

#[tokio::test]
async fn test_ai_failure_leaves_document_unchanged() {
    let mut session = session("<p>a</p>");
    let request = session.request_ai(AiAction::Polish, "polish", None).unwrap();

    request.run(&FixedService::failing(), session.ai_sender()).await;
    let outcomes = session.poll_ai();

    assert!(matches!(
        &outcomes[0],
        AiOutcome::Failed { message, .. } if message.contains("connection refused")
    ));
    assert_eq!(session.to_html(), "<p>a</p>");
    assert!(!session.undo_stack().can_undo());
}
