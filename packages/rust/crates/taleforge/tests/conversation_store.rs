//! Conversation store contract (in-memory backend, no network).

use anyhow::Result;
use taleforge::{ConversationStore, InMemoryConversationStore, Role, Turn};

#[tokio::test]
async fn unknown_user_has_empty_history() -> Result<()> {
    let store = InMemoryConversationStore::new();
    assert!(store.get("never-seen").await?.is_empty());
    assert_eq!(store.len("never-seen").await?, 0);
    assert_eq!(store.session_count().await?, 0);
    Ok(())
}

#[tokio::test]
async fn append_concatenates_in_order() -> Result<()> {
    let store = InMemoryConversationStore::new();
    store
        .append(
            "u1",
            vec![Turn::system("round 1"), Turn::assistant("scenario 1")],
        )
        .await?;
    store
        .append(
            "u1",
            vec![Turn::system("round 2"), Turn::assistant("scenario 2")],
        )
        .await?;

    let turns = store.get("u1").await?;
    let contents: Vec<&str> = turns.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(
        contents,
        vec!["round 1", "scenario 1", "round 2", "scenario 2"]
    );
    assert_eq!(turns[0].role, Role::System);
    assert_eq!(turns[3].role, Role::Assistant);
    assert_eq!(store.len("u1").await?, 4);
    Ok(())
}

#[tokio::test]
async fn append_does_not_deduplicate() -> Result<()> {
    let store = InMemoryConversationStore::new();
    let turn = Turn::system("same");
    store.append("u1", vec![turn.clone()]).await?;
    store.append("u1", vec![turn.clone()]).await?;
    assert_eq!(store.get("u1").await?, vec![turn.clone(), turn]);
    Ok(())
}

#[tokio::test]
async fn empty_append_creates_nothing() -> Result<()> {
    let store = InMemoryConversationStore::new();
    store.append("u1", Vec::new()).await?;
    assert_eq!(store.session_count().await?, 0);
    Ok(())
}

#[tokio::test]
async fn clear_resets_only_that_user() -> Result<()> {
    let store = InMemoryConversationStore::new();
    store.append("u1", vec![Turn::system("a")]).await?;
    store.append("u2", vec![Turn::system("b")]).await?;

    store.clear("u1").await?;

    assert!(store.get("u1").await?.is_empty());
    assert_eq!(store.get("u2").await?.len(), 1);
    assert_eq!(store.session_count().await?, 1);
    Ok(())
}

#[tokio::test]
async fn repeated_reads_are_identical() -> Result<()> {
    let store = InMemoryConversationStore::new();
    store
        .append("u1", vec![Turn::system("x"), Turn::assistant("y")])
        .await?;
    let first = store.get("u1").await?;
    let second = store.get("u1").await?;
    let third = store.get("u1").await?;
    assert_eq!(first, second);
    assert_eq!(second, third);
    Ok(())
}

#[tokio::test]
async fn replace_swaps_whole_transcript() -> Result<()> {
    let store = InMemoryConversationStore::new();
    store
        .append("u1", vec![Turn::system("old 1"), Turn::assistant("old 2")])
        .await?;

    store
        .replace("u1", vec![Turn::system("new 1"), Turn::assistant("new 2")])
        .await?;
    let contents: Vec<String> = store
        .get("u1")
        .await?
        .into_iter()
        .map(|t| t.content)
        .collect();
    assert_eq!(contents, vec!["new 1", "new 2"]);

    store.replace("u1", Vec::new()).await?;
    assert!(store.get("u1").await?.is_empty());
    assert_eq!(store.session_count().await?, 0);
    Ok(())
}

#[test]
fn turns_serialize_with_lowercase_roles() {
    let json = serde_json::to_value(Turn::assistant("hi")).expect("serialize");
    assert_eq!(json, serde_json::json!({"role": "assistant", "content": "hi"}));
}
