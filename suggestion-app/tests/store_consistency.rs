use suggestion_app::domain::{NewSuggestion, SuggestionStatus, SuggestionUpdate};
use suggestion_app::infrastructure::db::{
    JsonDatabase, StoreError, SuggestionRepository, VoteRepository,
};
use uuid::Uuid;

struct Board {
    suggestions: SuggestionRepository,
    votes: VoteRepository,
    dir: std::path::PathBuf,
}

impl Board {
    async fn open() -> Result<Self, StoreError> {
        let dir = std::env::temp_dir().join(format!("store_consistency_{}", Uuid::new_v4()));
        let db = JsonDatabase::open(dir.join("database.json")).await?;
        Ok(Self {
            suggestions: SuggestionRepository::new(db.clone()),
            votes: VoteRepository::new(db),
            dir,
        })
    }

    async fn count(&self, id: Uuid) -> Result<i64, StoreError> {
        Ok(self
            .suggestions
            .find_by_id_with_votes(id)
            .await?
            .map(|s| s.votes)
            .unwrap_or_default())
    }

    async fn cleanup(self) {
        let _ = tokio::fs::remove_dir_all(self.dir).await;
    }
}

fn dark_mode() -> NewSuggestion {
    NewSuggestion {
        title: "Add dark mode".to_string(),
        description: "...".to_string(),
        author_id: "u0".to_string(),
        author_name: "Author".to_string(),
    }
}

#[tokio::test]
async fn fresh_suggestion_is_open_with_no_votes() -> Result<(), StoreError> {
    let board = Board::open().await?;
    let created = board.suggestions.create(dark_mode()).await?;

    let fetched = board.suggestions.find_by_id_with_votes(created.id).await?.unwrap();
    assert_eq!(fetched.suggestion.id, created.id);
    assert_eq!(fetched.suggestion.created_at, created.created_at);
    assert_eq!(fetched.suggestion.updated_at, created.updated_at);
    assert_eq!(fetched.suggestion.status, SuggestionStatus::Open);
    assert_eq!(fetched.votes, 0);
    assert!(fetched.voters.is_empty());

    board.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn add_then_remove_restores_count() -> Result<(), StoreError> {
    let board = Board::open().await?;
    let id = board.suggestions.create(dark_mode()).await?.id;
    board.votes.create(id, "u2", -1).await?;
    let before = board.count(id).await?;

    board.votes.create(id, "u1", 1).await?;
    board.votes.delete(id, "u1").await?;
    assert_eq!(board.count(id).await?, before);

    board.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn add_remove_add_equals_single_add() -> Result<(), StoreError> {
    let board = Board::open().await?;
    let once = board.suggestions.create(dark_mode()).await?.id;
    let thrice = board.suggestions.create(dark_mode()).await?.id;

    board.votes.create(once, "u1", 1).await?;

    board.votes.create(thrice, "u1", 1).await?;
    board.votes.delete(thrice, "u1").await?;
    board.votes.create(thrice, "u1", 1).await?;

    assert_eq!(board.count(once).await?, board.count(thrice).await?);
    assert_eq!(board.count(thrice).await?, 1);

    board.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn delete_leaves_orphaned_votes() -> Result<(), StoreError> {
    let board = Board::open().await?;
    let id = board.suggestions.create(dark_mode()).await?.id;
    board.votes.create(id, "u1", 1).await?;
    board.votes.create(id, "u2", -1).await?;

    assert!(board.suggestions.delete(id).await?);
    assert!(board.suggestions.find_by_id_with_votes(id).await?.is_none());
    assert!(!board.suggestions.delete(id).await?);

    let orphans = board.votes.find_by_suggestion(id).await?;
    assert_eq!(orphans.len(), 2);
    assert!(board.votes.exists(id, "u1").await?);

    board.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn aggregate_sums_signed_values() -> Result<(), StoreError> {
    let board = Board::open().await?;
    let id = board.suggestions.create(dark_mode()).await?.id;
    board.votes.create(id, "u1", 1).await?;
    board.votes.create(id, "u2", 1).await?;
    board.votes.create(id, "u3", -1).await?;

    let fetched = board.suggestions.find_by_id_with_votes(id).await?.unwrap();
    assert_eq!(fetched.votes, 1);
    assert_eq!(fetched.voters.len(), 3);

    let listed = board.suggestions.list_with_votes().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].votes, 1);

    board.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn dark_mode_scenario() -> Result<(), StoreError> {
    let board = Board::open().await?;
    let created = board.suggestions.create(dark_mode()).await?;
    assert_eq!(created.status, SuggestionStatus::Open);
    assert_eq!(board.count(created.id).await?, 0);

    board.votes.create(created.id, "u1", 1).await?;
    assert_eq!(board.count(created.id).await?, 1);

    board.votes.create(created.id, "u2", -1).await?;
    assert_eq!(board.count(created.id).await?, 0);

    board.votes.delete(created.id, "u1").await?;
    assert_eq!(board.count(created.id).await?, -1);

    board.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn status_update_touches_only_status_and_timestamp() -> Result<(), StoreError> {
    let board = Board::open().await?;
    let created = board.suggestions.create(dark_mode()).await?;

    board
        .suggestions
        .update(created.id, SuggestionUpdate::status(SuggestionStatus::Planned))
        .await?;

    let stored = board.suggestions.find_by_id(created.id).await?.unwrap();
    assert_eq!(stored.status, SuggestionStatus::Planned);
    assert_eq!(stored.title, created.title);
    assert_eq!(stored.description, created.description);
    assert_eq!(stored.author_id, created.author_id);
    assert_eq!(stored.author_name, created.author_name);
    assert_eq!(stored.created_at, created.created_at);
    assert!(stored.updated_at >= created.updated_at);

    board.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn raw_add_vote_allows_duplicates() -> Result<(), StoreError> {
    let board = Board::open().await?;
    let id = board.suggestions.create(dark_mode()).await?.id;

    board.votes.create(id, "u1", 1).await?;
    board.votes.create(id, "u1", 1).await?;

    let fetched = board.suggestions.find_by_id_with_votes(id).await?.unwrap();
    assert_eq!(fetched.voters.len(), 2);
    assert_eq!(fetched.votes, 2);

    board.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn concurrent_writers_lose_no_update() -> Result<(), StoreError> {
    let board = Board::open().await?;
    let id = board.suggestions.create(dark_mode()).await?.id;
    let doomed = board.suggestions.create(dark_mode()).await?.id;

    let mut voters = Vec::new();
    for i in 0..32 {
        let votes = board.votes.clone();
        voters.push(tokio::spawn(async move {
            votes.create(id, &format!("user-{i}"), 1).await
        }));
    }
    // a delete racing the votes must not swallow any of them
    let suggestions = board.suggestions.clone();
    let deleter = tokio::spawn(async move { suggestions.delete(doomed).await });

    for handle in voters {
        handle.await.expect("task panicked")?;
    }
    assert!(deleter.await.expect("task panicked")?);

    let fetched = board.suggestions.find_by_id_with_votes(id).await?.unwrap();
    assert_eq!(fetched.voters.len(), 32);
    assert_eq!(fetched.votes, 32);
    assert_eq!(board.suggestions.list_with_votes().await?.len(), 1);

    board.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn document_survives_reopen() -> Result<(), StoreError> {
    let board = Board::open().await?;
    let id = board.suggestions.create(dark_mode()).await?.id;
    board.votes.create(id, "u1", -1).await?;

    let reopened = JsonDatabase::open(board.dir.join("database.json")).await?;
    let fetched = SuggestionRepository::new(reopened)
        .find_by_id_with_votes(id)
        .await?
        .unwrap();
    assert_eq!(fetched.votes, -1);

    let raw = tokio::fs::read_to_string(board.dir.join("database.json"))
        .await
        .unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["suggestions"][0]["status"], "Open");
    assert_eq!(doc["votes"][0]["voteValue"], -1);
    assert_eq!(doc["votes"][0]["suggestionId"], id.to_string());

    board.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn documents_from_older_writers_keep_their_fields() -> Result<(), StoreError> {
    let dir = std::env::temp_dir().join(format!("store_consistency_{}", Uuid::new_v4()));
    let path = dir.join("database.json");
    let id = Uuid::new_v4();
    let legacy = serde_json::json!({
        "suggestions": [{
            "id": id.to_string(),
            "title": "Add dark mode",
            "description": "...",
            "status": "Open",
            "authorId": "anonymous",
            "authorName": "Anonymous",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z",
            "votes": 0,
            "category": "ui"
        }],
        "votes": [{
            "id": "v-legacy",
            "suggestionId": "abc",
            "userId": 7,
            "voteValue": 1,
            "createdAt": "2024-01-02T00:00:00.000Z"
        }],
        "users": [{
            "id": "dev_user_123",
            "discordId": "dev_user_123",
            "username": "DevUser",
            "roles": []
        }],
        "schemaNote": "kept"
    });
    tokio::fs::create_dir_all(&dir).await.unwrap();
    tokio::fs::write(&path, serde_json::to_vec(&legacy).unwrap())
        .await
        .unwrap();

    let db = JsonDatabase::open(&path).await?;
    let suggestions = SuggestionRepository::new(db.clone());
    let votes = VoteRepository::new(db);

    votes.create(id, "u1", 1).await?;
    let fetched = suggestions.find_by_id_with_votes(id).await?.unwrap();
    assert_eq!(fetched.votes, 1);
    assert_eq!(fetched.suggestion.extra["category"], "ui");

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["suggestions"][0]["category"], "ui");
    assert_eq!(doc["suggestions"][0]["votes"], 0);
    assert_eq!(doc["votes"][0]["suggestionId"], "abc");
    assert_eq!(doc["votes"][0]["userId"], "7");
    assert_eq!(doc["votes"].as_array().unwrap().len(), 2);
    assert_eq!(doc["users"][0]["id"], "dev_user_123");
    assert_eq!(doc["schemaNote"], "kept");

    let _ = tokio::fs::remove_dir_all(dir).await;
    Ok(())
}
