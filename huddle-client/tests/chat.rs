// SPDX-License-Identifier: MIT OR Apache-2.0

use futures_util::StreamExt;
use huddle_client::test_utils::{setup_logging, test_client};
use huddle_client::view::{GroupView, MyGroupsView, TranscriptLine};
use huddle_client::{ChatError, Client, Config};
use huddle_core::chat_collection;
use huddle_store::{DocumentStore, MemoryIdentity, MemoryStore, Patch};

#[tokio::test]
async fn members_chat_in_real_time() -> anyhow::Result<()> {
    setup_logging();

    let store = MemoryStore::new();
    let client = Client::new(store.clone(), MemoryIdentity::new());

    let alice = client
        .accounts()
        .signup("Alice", "alice@example.org", "hunter22")
        .await?;
    let group_id = client.groups().create_group("Book Club", "secret").await?;

    let mut alice_view = client.chat().subscribe(&group_id).await?;
    assert!(alice_view.next().await.unwrap()?.is_empty());

    client.chat().send(&group_id, "  Welcome!  ").await?;
    let transcript = alice_view.next().await.unwrap()?;
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript.messages()[0].text, "Welcome!");
    assert_eq!(transcript.messages()[0].user.as_deref(), Some("Alice"));
    assert!(transcript.messages()[0].timestamp.is_some());

    // Bob joins and answers, his profile name shows up in the member list.
    client.accounts().logout().await?;
    let bob = client
        .accounts()
        .signup("Bob", "bob@example.org", "hunter22")
        .await?;
    client.groups().join_group("book club", "secret").await?;
    client.chat().send(&group_id, "Hi Alice").await?;

    let transcript = alice_view.next().await.unwrap()?;
    let lines = TranscriptLine::from_messages(transcript.iter(), Some(&alice.uid));
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].author, None);
    assert_eq!(lines[1].author.as_deref(), Some("Bob"));
    assert_eq!(lines[1].text, "Hi Alice");

    let group = client.groups().group(&group_id).await?;
    let view = GroupView::new(&group, Some(&bob.uid));
    assert!(!view.is_admin);
    let names: Vec<&str> = view
        .members
        .iter()
        .map(|member| member.name.as_str())
        .collect();
    assert_eq!(names, vec!["Alice", "Bob"]);

    let my_groups = MyGroupsView::new(&client.groups().my_groups().await?);
    assert_eq!(my_groups.items.len(), 1);
    assert_eq!(my_groups.items[0].name, "Book Club");

    // Unsubscribing ends the live query at the store.
    alice_view.unsubscribe();
    assert_eq!(store.subscriptions_len(), 0);

    Ok(())
}

#[tokio::test]
async fn chat_requires_session_and_valid_text() -> anyhow::Result<()> {
    let client = Client::builder()
        .config(Config {
            max_message_len: 10,
            ..Config::default()
        })
        .build(MemoryStore::new(), MemoryIdentity::new());
    let group_id = huddle_core::GroupId::from_stored("book-club");

    let result = client.chat().send(&group_id, "Hello").await;
    assert!(matches!(result, Err(ChatError::AuthRequired)));
    assert!(matches!(
        client.chat().subscribe(&group_id).await,
        Err(ChatError::AuthRequired)
    ));

    client
        .accounts()
        .signup("", "carol@example.org", "hunter22")
        .await?;

    let result = client.chat().send(&group_id, "   ").await;
    assert!(matches!(result, Err(ChatError::Validation(_))));

    let result = client.chat().send(&group_id, "01234567890").await;
    assert!(matches!(result, Err(ChatError::Validation(_))));

    // Exactly at the limit, counted in characters.
    client.chat().send(&group_id, "ääääääääää").await?;

    let mut transcript = client.chat().subscribe(&group_id).await?;
    let messages = transcript.next().await.unwrap()?;
    // No display name set.
    assert_eq!(messages.messages()[0].user.as_deref(), Some("User"));

    Ok(())
}

#[tokio::test]
async fn malformed_messages_are_skipped() -> anyhow::Result<()> {
    let client = test_client();
    let store = client.groups().store().clone();
    client
        .accounts()
        .signup("Dave", "dave@example.org", "hunter22")
        .await?;
    let group_id = client.groups().create_group("Chess", "pw").await?;

    store
        .add(
            &chat_collection(&group_id),
            Patch::new().set("text", 42).server_timestamp("timestamp"),
        )
        .await?;
    client.chat().send(&group_id, "Valid").await?;

    let mut transcript = client.chat().subscribe(&group_id).await?;
    let messages = transcript.next().await.unwrap()?;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages.messages()[0].text, "Valid");

    // Chats of other groups are separate.
    let other = huddle_core::GroupId::from_stored("other");
    client.chat().send(&other, "Elsewhere").await?;
    let mut other_transcript = client.chat().subscribe(&other).await?;
    assert_eq!(other_transcript.next().await.unwrap()?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn sessions_follow_accounts() -> anyhow::Result<()> {
    let client = test_client();
    let mut sessions = client.sessions();
    assert_eq!(sessions.next().await, Some(None));

    let user = client
        .accounts()
        .signup("Erin", "erin@example.org", "hunter22")
        .await?;

    // Sign up publishes the new account, setting the display name publishes again.
    let latest = loop {
        let next = sessions.next().await.flatten();
        if next.as_ref().is_some_and(|user| user.display_name.is_some()) {
            break next;
        }
    };
    assert_eq!(latest, Some(user.clone()));
    assert_eq!(client.current_user(), Some(user));

    client.accounts().logout().await?;
    assert_eq!(sessions.next().await, Some(None));

    Ok(())
}
