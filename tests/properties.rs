//! Property tests for the pile controller and storage format

use std::collections::HashSet;

use backlog_goblin::persistence::{decode, encode};
use backlog_goblin::{Backlog, BacklogEntry, EntryId, MemoryStore, PaintStatus, Settings};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Intent {
    Add(String, String),
    Cycle(usize),
    Delete(usize),
}

fn intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        ("[a-zA-Z ]{0,12}", "-?[0-9a-z]{0,4}").prop_map(|(n, q)| Intent::Add(n, q)),
        (0..16usize).prop_map(Intent::Cycle),
        (0..16usize).prop_map(Intent::Delete),
    ]
}

fn status() -> impl Strategy<Value = PaintStatus> {
    prop_oneof![
        Just(PaintStatus::Unpainted),
        Just(PaintStatus::InProgress),
        Just(PaintStatus::Painted),
    ]
}

fn entries() -> impl Strategy<Value = Vec<BacklogEntry>> {
    prop::collection::vec(("[A-Za-z]\\PC{0,19}", 1..500u32, status()), 0..20).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (name, quantity, status))| BacklogEntry {
                id: EntryId::new(format!("{}", 1_700_000_000_000u64 + i as u64)),
                name,
                quantity,
                status,
            })
            .collect()
    })
}

fn backlog() -> Backlog<MemoryStore> {
    let settings = Settings {
        save_debounce_ms: 0,
        ..Default::default()
    };
    Backlog::new(MemoryStore::new(), &settings)
}

/// Apply an intent; index-based intents pick an existing entry or a missing id
fn apply(backlog: &mut Backlog<MemoryStore>, intent: &Intent, now: u64) {
    match intent {
        Intent::Add(name, quantity) => {
            let _ = backlog.add_entry_at(name, quantity, now);
        }
        Intent::Cycle(i) => {
            let id = pick(backlog, *i);
            backlog.cycle_status(&id);
        }
        Intent::Delete(i) => {
            let id = pick(backlog, *i);
            backlog.delete_entry(&id);
        }
    }
}

fn pick(backlog: &Backlog<MemoryStore>, i: usize) -> EntryId {
    backlog
        .snapshot()
        .get(i)
        .map(|e| e.id.clone())
        .unwrap_or_else(|| EntryId::from("nonexistent"))
}

proptest! {
    #[test]
    fn ids_are_pairwise_distinct(times in prop::collection::vec(0..5u64, 1..40)) {
        let mut backlog = backlog();
        let mut seen = HashSet::new();
        for t in times {
            let id = backlog.add_entry_at("Orks", "1", t).unwrap();
            prop_assert!(seen.insert(id));
        }
    }

    #[test]
    fn three_cycles_restore_status(start in status()) {
        let mut backlog = backlog();
        let id = backlog.add_entry("Orks", "1").unwrap();
        while backlog.get(&id).unwrap().status != start {
            backlog.cycle_status(&id);
        }

        prop_assert_eq!(backlog.cycle_status(&id), Some(start.next()));
        backlog.cycle_status(&id);
        backlog.cycle_status(&id);
        prop_assert_eq!(backlog.get(&id).unwrap().status, start);
    }

    #[test]
    fn round_trip_is_lossless(list in entries()) {
        let bytes = encode(&list).unwrap();
        prop_assert_eq!(decode(&bytes).unwrap(), list);
    }

    #[test]
    fn delete_twice_equals_delete_once(n in 1..10usize, victim in 0..10usize) {
        let mut backlog = backlog();
        for i in 0..n {
            backlog.add_entry(&format!("Squad {i}"), "1").unwrap();
        }
        let id = pick(&backlog, victim % n);

        backlog.delete_entry(&id);
        let once = backlog.snapshot().to_vec();
        backlog.delete_entry(&id);
        prop_assert_eq!(backlog.snapshot(), once.as_slice());
    }

    #[test]
    fn delete_preserves_survivor_order(n in 2..12usize, victim in 0..12usize) {
        let mut backlog = backlog();
        for i in 0..n {
            backlog.add_entry(&format!("Squad {i}"), "1").unwrap();
        }
        let victim = victim % n;
        let mut expected: Vec<EntryId> = backlog.snapshot().iter().map(|e| e.id.clone()).collect();
        let id = expected.remove(victim);

        backlog.delete_entry(&id);
        let actual: Vec<EntryId> = backlog.snapshot().iter().map(|e| e.id.clone()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn store_converges_to_last_state(intents in prop::collection::vec(intent(), 0..40)) {
        let mut backlog = backlog();
        backlog.initialize();
        for (i, intent) in intents.iter().enumerate() {
            apply(&mut backlog, intent, i as u64);
            if i % 3 == 0 {
                backlog.pump(i as u64);
            }
        }
        backlog.flush();

        match backlog.store().get("backlog-entries") {
            Some(bytes) => prop_assert_eq!(decode(bytes).unwrap(), backlog.snapshot().to_vec()),
            None => prop_assert!(backlog.is_empty()),
        }
    }

    #[test]
    fn ids_stay_unique_under_any_intents(intents in prop::collection::vec(intent(), 0..60)) {
        let mut backlog = backlog();
        for (i, intent) in intents.iter().enumerate() {
            apply(&mut backlog, intent, (i / 4) as u64);
        }
        let ids: HashSet<&EntryId> = backlog.snapshot().iter().map(|e| &e.id).collect();
        prop_assert_eq!(ids.len(), backlog.len());
        prop_assert!(backlog.snapshot().iter().all(|e| e.quantity >= 1 && !e.name.trim().is_empty()));
    }
}
