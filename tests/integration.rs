use pretty_assertions::assert_eq;
use std::sync::Arc;
use trading_card_generator::{
    ai::{MockTextToImageClient, TextToImageInput, DEFAULT_MODEL},
    backend::{MemoryBlob, MemoryKv},
    generator::CardGenerator,
    identity::CardId,
    manager::CardManager,
    models::RecordKind,
    prompts,
    store::{CardStore, SplitCardStore, UnifiedCardStore},
    stream::drain,
    Error,
};

fn manager_with(ai: &MockTextToImageClient, store: Arc<dyn CardStore>) -> CardManager {
    CardManager::new(CardGenerator::new(Arc::new(ai.clone()), DEFAULT_MODEL), store)
}

fn unified(kv: &MemoryKv) -> Arc<dyn CardStore> {
    Arc::new(UnifiedCardStore::new(Arc::new(kv.clone())))
}

fn split(kv: &MemoryKv, blob: &MemoryBlob) -> Arc<dyn CardStore> {
    Arc::new(SplitCardStore::new(
        Arc::new(kv.clone()),
        Arc::new(blob.clone()),
    ))
}

fn all_topologies() -> Vec<(&'static str, Arc<dyn CardStore>)> {
    vec![
        ("unified", unified(&MemoryKv::new())),
        ("split", split(&MemoryKv::new(), &MemoryBlob::new())),
    ]
}

#[tokio::test]
async fn test_generate_save_and_read_back_on_every_topology() {
    for (name, store) in all_topologies() {
        let ai = MockTextToImageClient::new().with_image_response(vec![1, 2, 3, 4]);
        let manager = manager_with(&ai, store);

        let id = manager.generate_and_save_card("T1", "D1").await.unwrap();

        let card = manager.get_card(&id).await.unwrap().unwrap();
        assert_eq!(card.title, "T1", "{}", name);
        assert_eq!(card.description, "D1", "{}", name);
        assert_eq!(card.id, id.to_string(), "{}", name);

        let image = manager.get_card_image(&id).await.unwrap().unwrap();
        assert_eq!(drain(image).await.unwrap(), vec![1, 2, 3, 4], "{}", name);
    }
}

#[tokio::test]
async fn test_generated_prompt_is_exact_template() {
    let ai = MockTextToImageClient::new().with_image_response(vec![0]);
    let manager = manager_with(&ai, unified(&MemoryKv::new()));

    manager
        .generate_and_save_card("test title", "test description")
        .await
        .unwrap();

    let expected = TextToImageInput {
        prompt: [
            "Based on the following title and description, generate card artwork for a trading card",
            "title: test title",
            "description: test description",
        ]
        .join("\n"),
    };
    assert_eq!(ai.get_calls(), vec![(DEFAULT_MODEL.to_string(), expected)]);
    assert_eq!(
        prompts::card_artwork("test title", "test description"),
        ai.get_calls()[0].1.prompt
    );
}

#[tokio::test]
async fn test_identical_inputs_yield_distinct_cards() {
    let ai = MockTextToImageClient::new();
    let kv = MemoryKv::new();
    let manager = manager_with(&ai, unified(&kv));

    let first = manager.generate_and_save_card("Same", "Input").await.unwrap();
    let second = manager.generate_and_save_card("Same", "Input").await.unwrap();

    assert_ne!(first, second);
    assert_eq!(kv.get_entries().len(), 4);
}

#[tokio::test]
async fn test_multi_chunk_image_is_stored_whole() {
    let chunks: Vec<Vec<u8>> = (0..10u8).map(|n| vec![n; 100]).collect();
    let expected = chunks.concat();

    let ai = MockTextToImageClient::new().with_image_chunks(chunks);
    let blob = MemoryBlob::new();
    let manager = manager_with(&ai, split(&MemoryKv::new(), &blob));

    let id = manager.generate_and_save_card("Big", "Image").await.unwrap();

    let objects = blob.get_objects();
    let stored = &objects[id.as_str()];
    assert_eq!(stored.data.len(), 1000);
    assert_eq!(stored.data, expected);
}

#[tokio::test]
async fn test_unknown_id_is_not_found_on_every_topology() {
    for (name, store) in all_topologies() {
        let manager = manager_with(&MockTextToImageClient::new(), store);
        let id = CardId::from("never-written");

        assert!(manager.get_card(&id).await.unwrap().is_none(), "{}", name);
        assert!(
            manager.get_card_image(&id).await.unwrap().is_none(),
            "{}",
            name
        );
    }
}

#[tokio::test]
async fn test_generation_failure_writes_nothing() {
    let ai = MockTextToImageClient::new().with_failure("backend exploded");
    let kv = MemoryKv::new();
    let blob = MemoryBlob::new();
    let manager = manager_with(&ai, split(&kv, &blob));

    let err = manager.generate_and_save_card("T", "D").await.unwrap_err();

    assert!(matches!(err, Error::Generation(_)));
    assert!(kv.get_entries().is_empty());
    assert!(blob.get_objects().is_empty());
    assert_eq!(kv.get_put_count() + blob.get_put_count(), 0);
}

#[tokio::test]
async fn test_failed_image_write_surfaces_partial_card() {
    let kv = MemoryKv::new();
    let blob = MemoryBlob::new().with_write_failure(true);
    let manager = manager_with(&MockTextToImageClient::new(), split(&kv, &blob));

    let err = manager.generate_and_save_card("T", "D").await.unwrap_err();

    let Error::PartialWrite {
        id,
        written,
        source,
    } = err
    else {
        panic!("expected a partial write error");
    };
    assert_eq!(written, RecordKind::Metadata);
    assert!(matches!(
        *source,
        Error::StoreWrite {
            kind: RecordKind::Image,
            ..
        }
    ));

    // The metadata record stays behind; nothing cleans it up.
    let card_id = CardId::from(id);
    assert!(manager.get_card(&card_id).await.unwrap().is_some());
    assert!(manager.get_card_image(&card_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_metadata_write_surfaces_partial_card() {
    let kv = MemoryKv::new().with_write_failure(true);
    let blob = MemoryBlob::new();
    let manager = manager_with(&MockTextToImageClient::new(), split(&kv, &blob));

    let err = manager.generate_and_save_card("T", "D").await.unwrap_err();

    assert!(matches!(
        err,
        Error::PartialWrite {
            written: RecordKind::Image,
            ..
        }
    ));
    assert_eq!(blob.get_objects().len(), 1);
}

#[tokio::test]
async fn test_generate_card_image_has_no_storage_side_effect() {
    let ai = MockTextToImageClient::new().with_image_chunks(vec![vec![7], vec![8, 9]]);
    let kv = MemoryKv::new();
    let manager = manager_with(&ai, unified(&kv));

    let stream = manager.generate_card_image("T", "D").await.unwrap();

    assert_eq!(drain(stream).await.unwrap(), vec![7, 8, 9]);
    assert_eq!(kv.get_put_count(), 0);
    assert_eq!(ai.get_call_count(), 1);
}

#[tokio::test]
async fn test_card_image_can_be_read_repeatedly() {
    let ai = MockTextToImageClient::new().with_image_response(vec![4, 3, 2, 1]);
    let manager = manager_with(&ai, unified(&MemoryKv::new()));
    let id = manager.generate_and_save_card("T", "D").await.unwrap();

    for _ in 0..2 {
        let image = manager.get_card_image(&id).await.unwrap().unwrap();
        assert_eq!(drain(image).await.unwrap(), vec![4, 3, 2, 1]);
    }
}
