use thoughts_api::store::{
    MemoryStore, NewThought, NewUser, StoreError, ThoughtPatch, ThoughtStore, UserStore,
};
use uuid::Uuid;

fn store() -> MemoryStore {
    MemoryStore::new()
}

async fn author(store: &MemoryStore) -> Uuid {
    store
        .create_user(NewUser {
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: "hash".into(),
            access_token: Uuid::new_v4().to_string(),
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn duplicate_email_is_rejected_case_insensitively() {
    let s = store();
    s.create_user(NewUser {
        email: "a@x.com".into(),
        password_hash: "h".into(),
        access_token: "t1".into(),
    })
    .await
    .unwrap();

    let err = s
        .create_user(NewUser {
            email: "A@X.COM".into(),
            password_hash: "h".into(),
            access_token: "t2".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Duplicate));

    // The first record is still the only one.
    let found = s.find_by_email("A@x.Com").await.unwrap().unwrap();
    assert_eq!(found.access_token, "t1");
}

#[tokio::test]
async fn token_lookup_is_exact() {
    let s = store();
    let user = s
        .create_user(NewUser {
            email: "a@x.com".into(),
            password_hash: "h".into(),
            access_token: "SecretToken".into(),
        })
        .await
        .unwrap();

    assert_eq!(
        s.find_by_token("SecretToken").await.unwrap().unwrap().id,
        user.id
    );
    assert!(s.find_by_token("secrettoken").await.unwrap().is_none());
}

#[tokio::test]
async fn new_thoughts_start_with_zero_hearts_and_stamp_author() {
    let s = store();
    let author_id = author(&s).await;
    let thought = s
        .create(NewThought {
            message: "hello".into(),
            author_id,
        })
        .await
        .unwrap();
    assert_eq!(thought.hearts, 0);
    assert_eq!(thought.author_id, author_id);
    assert_eq!(thought.message, "hello");
}

#[tokio::test]
async fn list_is_newest_first() {
    let s = store();
    let author_id = author(&s).await;
    for msg in ["first", "second", "third"] {
        s.create(NewThought {
            message: msg.into(),
            author_id,
        })
        .await
        .unwrap();
    }

    let listed = s.list().await.unwrap();
    let messages: Vec<_> = listed.iter().map(|t| t.message.as_str()).collect();
    assert_eq!(messages, vec!["third", "second", "first"]);
    assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn hearts_filter_matches_exactly_and_falls_back_unfiltered() {
    let s = store();
    let author_id = author(&s).await;
    let liked = s
        .create(NewThought {
            message: "liked".into(),
            author_id,
        })
        .await
        .unwrap();
    s.create(NewThought {
        message: "unliked".into(),
        author_id,
    })
    .await
    .unwrap();
    s.like(liked.id).await.unwrap();

    let filtered = s.list_by_hearts(Some(1)).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].message, "liked");

    assert!(s.list_by_hearts(Some(99)).await.unwrap().is_empty());
    assert_eq!(s.list_by_hearts(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn partial_update_keeps_absent_fields() {
    let s = store();
    let author_id = author(&s).await;
    let thought = s
        .create(NewThought {
            message: "original".into(),
            author_id,
        })
        .await
        .unwrap();

    let updated = s
        .update(
            thought.id,
            ThoughtPatch {
                message: Some("edited".into()),
                hearts: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.message, "edited");
    assert_eq!(updated.hearts, 0);
    assert_eq!(updated.created_at, thought.created_at);

    let updated = s
        .update(
            thought.id,
            ThoughtPatch {
                message: None,
                hearts: Some(5),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.message, "edited");
    assert_eq!(updated.hearts, 5);
}

#[tokio::test]
async fn delete_removes_the_record() {
    let s = store();
    let author_id = author(&s).await;
    let thought = s
        .create(NewThought {
            message: "bye".into(),
            author_id,
        })
        .await
        .unwrap();

    s.delete(thought.id).await.unwrap();
    assert!(matches!(s.get(thought.id).await, Err(StoreError::NotFound)));
    assert!(matches!(s.delete(thought.id).await, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let s = store();
    let id = Uuid::new_v4();
    assert!(matches!(s.get(id).await, Err(StoreError::NotFound)));
    assert!(matches!(s.like(id).await, Err(StoreError::NotFound)));
    assert!(matches!(
        s.update(id, ThoughtPatch::default()).await,
        Err(StoreError::NotFound)
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_likes_lose_no_updates() {
    let s = store();
    let author_id = author(&s).await;
    let thought = s
        .create(NewThought {
            message: "race me".into(),
            author_id,
        })
        .await
        .unwrap();

    let likes = 64;
    let mut handles = Vec::with_capacity(likes);
    for _ in 0..likes {
        let s = s.clone();
        let id = thought.id;
        handles.push(tokio::spawn(async move { s.like(id).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(s.get(thought.id).await.unwrap().hearts, likes as i32);
}
