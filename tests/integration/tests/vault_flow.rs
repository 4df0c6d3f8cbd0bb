//! End-to-end vault flows across the storage and generation crates.

use secretagent_core::config::StorageBackend;
use secretagent_core::{ApiKeyCriteria, PasswordCriteria, SecretKind};
use secretagent_generation::{
    from_config, FixedGenerator, GenerationError, LocalGenerator, SecretDraft,
};
use secretagent_integration_tests::TestVault;
use secretagent_storage::open_repository;

#[tokio::test]
async fn test_generate_save_and_reopen() {
    let vault = TestVault::new();
    let config = vault.config();
    let generator = FixedGenerator::new("Xk92nQmZ8pLr", "unused");

    let repo = open_repository(&config).unwrap();
    let draft = SecretDraft::new(
        "Email",
        PasswordCriteria {
            length: 12,
            include_numbers: true,
            include_symbols: false,
        },
    );
    draft.generate(&generator).await.unwrap();
    let saved = draft.save(&repo).unwrap();

    // A fresh repository reads the same record back from disk
    let reopened = open_repository(&config).unwrap();
    let records = reopened.list("");
    assert_eq!(records, vec![saved.clone()]);
    assert_eq!(records[0].value.expose_secret(), "Xk92nQmZ8pLr");
    assert_eq!(records[0].context.include_symbols, Some(false));
}

#[tokio::test]
async fn test_persisted_layout() {
    let vault = TestVault::new();
    let config = vault.config();
    let repo = open_repository(&config).unwrap();

    let generator = FixedGenerator::new("unused", "sk_live_abc").with_comments("rotate monthly");
    let draft = SecretDraft::new(
        "CI token",
        ApiKeyCriteria {
            service_description: "GitHub automation".into(),
            access_level: "read-only".into(),
        },
    );
    let generated = draft.generate(&generator).await.unwrap();
    assert_eq!(generated.comments.as_deref(), Some("rotate monthly"));
    draft.save(&repo).unwrap();

    let raw = std::fs::read_to_string(vault.storage_dir().join("secrets.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);

    let item = &items[0];
    assert_eq!(item["name"], "CI token");
    assert_eq!(item["type"], "apiKey");
    assert_eq!(item["value"], "sk_live_abc");
    assert_eq!(item["serviceDescription"], "GitHub automation");
    assert_eq!(item["accessLevel"], "read-only");
    assert!(item["id"].is_string());
    assert!(item["createdAt"].is_string());
    assert!(item.get("comments").is_none());
}

#[tokio::test]
async fn test_newest_first_across_kinds() {
    let vault = TestVault::new();
    let repo = open_repository(&vault.config()).unwrap();
    let generator = LocalGenerator::seeded(5);

    for name in ["first", "second", "third"] {
        let draft = SecretDraft::password(name);
        draft.generate(&generator).await.unwrap();
        draft.save(&repo).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let names: Vec<String> = repo.list("").into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["third", "second", "first"]);

    let third = repo.list("third").remove(0);
    assert!(repo.delete(&third.id));
    let names: Vec<String> = repo.list("").into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["second", "first"]);
}

#[tokio::test]
async fn test_failed_generation_leaves_store_untouched() {
    let vault = TestVault::new();
    let repo = open_repository(&vault.config()).unwrap();
    let generator = FixedGenerator::new("Xk92nQmZ8pLr", "unused").failing(1);

    let draft = SecretDraft::password("Email");
    let err = draft.generate(&generator).await.unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(draft.save(&repo), Err(GenerationError::NothingGenerated)));
    assert!(!vault.storage_dir().join("secrets.json").exists());

    // Same draft, second attempt succeeds
    draft.generate(&generator).await.unwrap();
    draft.save(&repo).unwrap();
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_corrupt_store_reads_empty_and_recovers() {
    let vault = TestVault::new();
    std::fs::create_dir_all(vault.storage_dir()).unwrap();
    std::fs::write(vault.storage_dir().join("secrets.json"), "{ not json").unwrap();

    let repo = open_repository(&vault.config()).unwrap();
    assert!(repo.is_empty());

    let generator = from_config(&vault.config().generation).unwrap();
    let draft = SecretDraft::api_key("Deploy key");
    draft.set_criteria(ApiKeyCriteria {
        service_description: "deploy bot".into(),
        access_level: "write".into(),
    });
    draft.generate(generator.as_ref()).await.unwrap();
    let saved = draft.save(&repo).unwrap();
    assert_eq!(saved.kind, SecretKind::ApiKey);

    let reopened = open_repository(&vault.config()).unwrap();
    assert_eq!(reopened.len(), 1);
}

#[tokio::test]
async fn test_memory_backend_is_not_shared() {
    let vault = TestVault::with_config(|builder| builder.storage_backend(StorageBackend::Memory));
    let config = vault.config();

    let repo = open_repository(&config).unwrap();
    let draft = SecretDraft::password("Scratch");
    draft.generate(&LocalGenerator::new()).await.unwrap();
    draft.save(&repo).unwrap();
    assert_eq!(repo.len(), 1);

    assert!(open_repository(&config).unwrap().is_empty());
    assert!(!vault.storage_dir().exists());
}
