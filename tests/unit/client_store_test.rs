use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeSet;

use hashem_trainer::models::{ExerciseEntry, NewClient};
use hashem_trainer::services::ClientStore;

use crate::common::MemorySnapshot;

fn new_client(name: &str, goal: &str) -> NewClient {
    NewClient {
        name: name.to_string(),
        goal: goal.to_string(),
        owner_instructor: None,
        linked_student: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_ids_strictly_increase_and_are_never_reused(
        names in proptest::collection::vec("[A-Za-z][a-z]{0,11}", 1..10),
        deletions in proptest::collection::vec(any::<bool>(), 10),
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let snapshot = MemorySnapshot::default();
            let store = ClientStore::open(Box::new(snapshot.clone())).unwrap();

            let mut seen = BTreeSet::new();
            let mut last = 0;
            for (name, delete) in names.iter().zip(deletions.iter()) {
                let client = store.create(new_client(name, "Strength")).await.unwrap();
                assert!(client.id > last);
                assert!(seen.insert(client.id));
                last = client.id;

                if *delete {
                    store.delete(client.id).await.unwrap();
                    assert!(store.get(client.id).await.is_none());
                    assert!(store.list().await.iter().all(|c| c.id != client.id));
                }
            }

            // A reload continues after the highest id ever handed out
            let reloaded = ClientStore::open(Box::new(snapshot.clone())).unwrap();
            let next = reloaded.create(new_client("Zed", "Cut")).await.unwrap();
            assert!(next.id > last);
        });
    }
}

#[tokio::test]
async fn test_first_workout_scenario() {
    let store = ClientStore::open(Box::new(MemorySnapshot::default())).unwrap();
    let client = store
        .create(NewClient {
            name: "Jane".to_string(),
            goal: "Hypertrophy".to_string(),
            owner_instructor: Some("55511112222".to_string()),
            linked_student: None,
        })
        .await
        .unwrap();

    store
        .add_exercise(
            client.id,
            "A",
            ExerciseEntry {
                name: "Supino Reto".to_string(),
                sets: 3,
                reps: 10,
                load: Some(40.0),
            },
        )
        .await
        .unwrap();

    let client = store.get(client.id).await.unwrap();
    assert_eq!(
        client.plan("A"),
        Some(
            &[ExerciseEntry {
                name: "Supino Reto".to_string(),
                sets: 3,
                reps: 10,
                load: Some(40.0),
            }][..]
        )
    );
    assert_eq!(client.plan_names(), vec!["A".to_string()]);
}

#[tokio::test]
async fn test_document_shape_on_disk() {
    let snapshot = MemorySnapshot::default();
    let store = ClientStore::open(Box::new(snapshot.clone())).unwrap();
    store.create(new_client("Jane", "Hypertrophy")).await.unwrap();

    let document = snapshot.json();
    assert_eq!(document["next_client_id"], 2);
    assert_eq!(document["clients"]["1"]["name"], "Jane");
    assert_eq!(document["clients"]["1"]["goal"], "Hypertrophy");
}
