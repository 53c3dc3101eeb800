//! Team-store behavior: capacity, uniqueness, ordering, persistence.

use dex_core::testing::sample_pokemon;
use dex_core::{TeamError, TeamStore, TEAM_LIMIT};
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> TeamStore {
    TeamStore::new(dir.path().join("team.json"))
}

#[tokio::test]
async fn add_grows_team_and_appends_last() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    for i in 0..TEAM_LIMIT as u32 {
        let name = format!("member-{i}");
        store.add(sample_pokemon(i + 1, &name)).await.unwrap();

        let team = store.list().await.unwrap();
        assert_eq!(team.len(), (i + 1) as usize);
        assert_eq!(team.last().unwrap().name, name);
    }
}

#[tokio::test]
async fn add_at_capacity_reports_full_and_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    for i in 0..TEAM_LIMIT as u32 {
        store
            .add(sample_pokemon(i + 1, &format!("member-{i}")))
            .await
            .unwrap();
    }

    let err = store.add(sample_pokemon(100, "overflow")).await.unwrap_err();
    assert!(matches!(err, TeamError::Full));

    let team = store.list().await.unwrap();
    assert_eq!(team.len(), TEAM_LIMIT);
    assert!(team.iter().all(|member| member.name != "overflow"));
}

#[tokio::test]
async fn duplicate_id_reports_duplicate_regardless_of_position() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.add(sample_pokemon(1, "bulbasaur")).await.unwrap();
    store.add(sample_pokemon(4, "charmander")).await.unwrap();
    store.add(sample_pokemon(7, "squirtle")).await.unwrap();

    // Same id as the first entry, different name: still a duplicate.
    let err = store
        .add(sample_pokemon(1, "bulbasaur-clone"))
        .await
        .unwrap_err();
    assert!(matches!(err, TeamError::Duplicate { .. }));

    // Same id as the last entry.
    let err = store.add(sample_pokemon(7, "squirtle")).await.unwrap_err();
    assert!(matches!(err, TeamError::Duplicate { .. }));

    let team = store.list().await.unwrap();
    assert_eq!(team.len(), 3);
    assert_eq!(team[0].name, "bulbasaur");
}

#[tokio::test]
async fn remove_takes_exactly_one_member_and_keeps_order() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let names = ["bulbasaur", "charmander", "squirtle", "pikachu"];
    for (i, name) in names.iter().enumerate() {
        store.add(sample_pokemon(i as u32 + 1, name)).await.unwrap();
    }

    // Remove the member currently at position 1.
    let team = store.list().await.unwrap();
    store.remove(team[1].id).await.unwrap();

    let team = store.list().await.unwrap();
    assert_eq!(team.len(), 3);
    let remaining: Vec<&str> = team.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(remaining, vec!["bulbasaur", "squirtle", "pikachu"]);
}

#[tokio::test]
async fn removal_never_reorders_survivors() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    for i in 0..TEAM_LIMIT as u32 {
        store
            .add(sample_pokemon(i + 1, &format!("member-{i}")))
            .await
            .unwrap();
    }

    store.remove(1).await.unwrap();
    store.remove(4).await.unwrap();

    let remaining: Vec<u32> = store
        .list()
        .await
        .unwrap()
        .iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(remaining, vec![2, 3, 5, 6]);
}

#[tokio::test]
async fn serialization_round_trips_the_whole_team() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.add(sample_pokemon(1, "bulbasaur")).await.unwrap();
    store.add(sample_pokemon(25, "pikachu")).await.unwrap();
    let team = store.list().await.unwrap();

    let serialized = serde_json::to_string(&team).unwrap();
    let restored: Vec<pokeapi::Pokemon> = serde_json::from_str(&serialized).unwrap();

    assert_eq!(restored, team);
    // The stored file is the literal serialized array, so a second store
    // over the same path sees an identical team.
    assert_eq!(store_in(&dir).list().await.unwrap(), team);
}
