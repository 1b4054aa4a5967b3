#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::components::Rules;
    use crate::highscores::{
        HighScoreEntry, HighScoreStore, HighScoreTable, NameEntry, NameEntryEvent, Ruleset,
        format_table, parse_table,
    };
    use crate::input::{Key, KeyState, TypedKey};
    use std::fs;
    use tempfile::tempdir;

    fn table_with_scores(scores: &[u32]) -> HighScoreTable {
        HighScoreTable::from_entries(
            scores
                .iter()
                .enumerate()
                .map(|(i, &score)| HighScoreEntry::new(format!("P{i}"), score, i as u32, 1))
                .collect(),
        )
    }

    fn scores(table: &HighScoreTable) -> Vec<u32> {
        table.entries().iter().map(|entry| entry.score).collect()
    }

    #[test]
    fn test_ruleset_from_rules() {
        let rules = |ghost_enabled, hold_enabled| Rules {
            ghost_enabled,
            hold_enabled,
        };
        assert_eq!(Ruleset::from(rules(false, false)), Ruleset::Classic);
        assert_eq!(Ruleset::from(rules(true, false)), Ruleset::Ghost);
        assert_eq!(Ruleset::from(rules(false, true)), Ruleset::Hold);
        assert_eq!(Ruleset::from(rules(true, true)), Ruleset::GhostHold);
        assert_eq!(Ruleset::GhostHold.file_name(), "ghost_hold.txt");
    }

    #[test]
    fn test_parse_valid_lines() {
        let entries = parse_table("5000,30,3,alice\n1200,10,1,bob, jr\n", "test");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], HighScoreEntry::new("alice", 5000, 30, 3));
        // Commas after the third delimiter belong to the name
        assert_eq!(entries[1].name, "bob, jr");
    }

    #[test]
    fn test_parse_stops_at_first_malformed_line() {
        let entries = parse_table("900,9,0,ann\nnot a score\n800,8,0,ben\n", "test");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "ann");

        let entries = parse_table("900,9,0\n", "test");
        assert!(entries.is_empty());
    }

    #[test]
    fn test_parse_ignores_excess_lines() {
        let contents: String = (0..15)
            .map(|i| format!("{},1,1,p{i}\n", 1000 - i))
            .collect();
        assert_eq!(parse_table(&contents, "test").len(), 10);
    }

    #[test]
    fn test_format_table() {
        let entries = vec![
            HighScoreEntry::new("alice", 5000, 30, 3),
            HighScoreEntry::new("bob", 1200, 10, 1),
        ];
        assert_eq!(format_table(&entries), "5000,30,3,alice\n1200,10,1,bob\n");
    }

    #[test]
    fn test_qualifies() {
        assert!(HighScoreTable::new().qualifies(0));
        assert!(table_with_scores(&[500, 400, 300]).qualifies(1));

        let full = table_with_scores(&[1000, 900, 800, 700, 600, 500, 400, 300, 200, 100]);
        assert!(full.qualifies(101));
        assert!(!full.qualifies(100));
        assert!(!full.qualifies(50));
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut table = table_with_scores(&[500, 300, 100]);
        assert_eq!(table.insert(HighScoreEntry::new("new", 400, 4, 0)), Some(1));
        assert_eq!(scores(&table), vec![500, 400, 300, 100]);
        assert!(table.get(1).is_some_and(|entry| entry.unsaved));

        // Ties go after the existing score
        assert_eq!(table.insert(HighScoreEntry::new("tie", 300, 3, 0)), Some(3));
        assert_eq!(scores(&table), vec![500, 400, 300, 300, 100]);

        // Lowest so far lands in the first free slot
        assert_eq!(table.insert(HighScoreEntry::new("low", 10, 0, 0)), Some(5));
    }

    #[test]
    fn test_insert_evicts_lowest_when_full() {
        let mut table = table_with_scores(&[1000, 900, 800, 700, 600, 500, 400, 300, 200, 100]);
        assert_eq!(table.insert(HighScoreEntry::new("new", 650, 6, 0)), Some(4));
        assert_eq!(table.len(), 10);
        assert_eq!(
            scores(&table),
            vec![1000, 900, 800, 700, 650, 600, 500, 400, 300, 200]
        );

        // A non-qualifying score is not inserted
        assert_eq!(table.insert(HighScoreEntry::new("late", 150, 1, 0)), None);
        assert_eq!(table.len(), 10);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("scores").join("classic.txt");
        let table = table_with_scores(&[9000, 4500, 120]);

        table.save(&path).expect("Failed to save table");
        let loaded = HighScoreTable::load(&path).expect("Failed to load table");
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().expect("Failed to create temp directory");
        let table = HighScoreTable::load(&dir.path().join("missing.txt")).expect("Missing file");
        assert!(table.is_empty());
    }

    #[test]
    fn test_store_loads_each_ruleset_file() {
        let dir = tempdir().expect("Failed to create temp directory");
        fs::write(dir.path().join("ghost.txt"), "700,7,0,gina\n").expect("Failed to write");

        let store = HighScoreStore::load(dir.path());
        assert_eq!(store.table(Ruleset::Ghost).len(), 1);
        assert!(store.table(Ruleset::Classic).is_empty());
        assert!(store.table(Ruleset::Hold).is_empty());
        assert!(store.table(Ruleset::GhostHold).is_empty());
    }

    #[test]
    fn test_commit_name_persists_table() {
        let dir = tempdir().expect("Failed to create temp directory");
        let mut store = HighScoreStore::load(dir.path());
        let position = store
            .insert(Ruleset::Hold, HighScoreEntry::new("", 2500, 20, 2))
            .expect("score should qualify");

        assert!(store.commit_name(Ruleset::Hold, position, "zed"));
        let entry = store.table(Ruleset::Hold).get(position).expect("entry");
        assert_eq!(entry.name, "zed");
        assert!(!entry.unsaved);

        let contents = fs::read_to_string(dir.path().join("hold.txt")).expect("Failed to read");
        assert_eq!(contents, "2500,20,2,zed\n");
    }

    #[test]
    fn test_write_failure_keeps_table_in_memory() {
        let dir = tempdir().expect("Failed to create temp directory");
        // A regular file where the score directory should be
        let blocker = dir.path().join("scores");
        fs::write(&blocker, "").expect("Failed to write");

        let mut store = HighScoreStore::load(&blocker);
        let position = store
            .insert(Ruleset::Classic, HighScoreEntry::new("", 10, 1, 0))
            .expect("score should qualify");
        assert!(store.commit_name(Ruleset::Classic, position, "amy"));
        assert_eq!(store.table(Ruleset::Classic).len(), 1);
    }

    #[test]
    fn test_in_memory_store_save_is_noop() {
        let store = HighScoreStore::in_memory();
        assert!(store.path(Ruleset::Classic).is_none());
        assert!(store.save(Ruleset::Classic).is_ok());
    }

    #[test]
    fn test_name_entry_builds_name() {
        let mut entry = NameEntry::default();
        assert_eq!(entry.push_key(TypedKey::Char('a')), NameEntryEvent::Ignored);

        entry.begin(Ruleset::Classic, 0);
        assert!(entry.is_capturing());
        for c in "Ann-3".chars() {
            assert_eq!(entry.push_key(TypedKey::Char(c)), NameEntryEvent::Edited);
        }
        // Punctuation outside the allowed set is dropped
        assert_eq!(entry.push_key(TypedKey::Char('!')), NameEntryEvent::Ignored);
        assert_eq!(entry.name(), "Ann-3");

        assert_eq!(entry.push_key(TypedKey::Erase), NameEntryEvent::Edited);
        assert_eq!(entry.name(), "Ann-");
    }

    #[test]
    fn test_name_entry_caps_length() {
        let mut entry = NameEntry::default();
        entry.begin(Ruleset::Classic, 0);
        for _ in 0..15 {
            entry.push_key(TypedKey::Char('x'));
        }
        assert_eq!(entry.name().len(), 10);
    }

    #[test]
    fn test_name_entry_commit_requires_a_name() {
        let mut entry = NameEntry::default();
        entry.begin(Ruleset::Ghost, 2);
        assert_eq!(entry.push_key(TypedKey::Commit), NameEntryEvent::Ignored);
        assert!(entry.is_capturing());

        entry.push_key(TypedKey::Char('q'));
        assert_eq!(
            entry.push_key(TypedKey::Commit),
            NameEntryEvent::Committed("q".to_string())
        );
        assert!(entry.is_committed());
        assert!(!entry.is_capturing());
        assert_eq!(entry.target(), Some((Ruleset::Ghost, 2)));

        // Capture is over
        assert_eq!(entry.push_key(TypedKey::Char('z')), NameEntryEvent::Ignored);
    }

    #[test]
    fn test_capture_from_key_state() {
        let mut entry = NameEntry::default();
        entry.begin(Ruleset::Classic, 0);

        let keys = KeyState::new()
            .press(Key::Char('b'))
            .press(Key::Space)
            .press(Key::Char('o'))
            .with_shift(true);
        assert_eq!(entry.capture(&keys), None);
        assert_eq!(entry.name(), "B O");

        let keys = KeyState::new().press(Key::Backspace).press(Key::Enter);
        assert_eq!(entry.capture(&keys), Some("B ".to_string()));
    }
}
