use voroblock::{HiddenSet, History, Mulberry32Sampler, Params, Session, VisibilityChange, HISTORY_LIMIT};

fn session(point_count: usize) -> Session {
    let mut s = Session::new(Mulberry32Sampler);
    s.apply(Params { point_count, density: 8.0, smoothing: 0, ..Params::default() })
        .unwrap();
    s
}

fn set(seeds: &[usize]) -> HiddenSet {
    seeds.iter().copied().collect()
}

#[test]
fn test_hide_undo_redo_round_trip() {
    let mut s = session(6);
    s.hide(1);
    s.hide(4);
    assert_eq!(s.registry().hidden(), &set(&[1, 4]));

    s.undo();
    s.undo();
    assert!(s.registry().hidden().is_empty());
    assert!(!s.registry().can_undo());

    s.redo();
    s.redo();
    assert_eq!(s.registry().hidden(), &set(&[1, 4]));
    assert!(!s.registry().can_redo());
}

#[test]
fn test_duplicate_hide_records_one_entry() {
    let mut s = session(3);
    let first = s.hide(2);
    let second = s.hide(2);
    assert_eq!(first, vec![VisibilityChange { seed: 2, hidden: true }]);
    assert!(second.is_empty());

    // Initial empty state plus one hide.
    assert_eq!(s.registry().history().undo_len(), 2);
    s.undo();
    assert!(!s.registry().can_undo());
}

#[test]
fn test_new_action_clears_redo() {
    let mut s = session(5);
    s.hide(0);
    s.hide(1);
    s.undo();
    assert!(s.registry().can_redo());

    s.hide(3);
    assert!(!s.registry().can_redo());
    assert!(s.redo().is_empty());
    assert_eq!(s.registry().hidden(), &set(&[0, 3]));
}

#[test]
fn test_unhide_all_is_undoable() {
    let mut s = session(5);
    s.hide(0);
    s.hide(2);
    let shown = s.unhide_all();
    assert_eq!(shown.len(), 2);
    assert!(shown.iter().all(|c| !c.hidden));

    let restored = s.undo();
    assert_eq!(
        restored,
        vec![
            VisibilityChange { seed: 0, hidden: true },
            VisibilityChange { seed: 2, hidden: true },
        ]
    );
}

#[test]
fn test_history_is_capped() {
    let mut s = session(60);
    for seed in 0..60 {
        s.hide(seed);
    }
    assert_eq!(s.registry().history().undo_len(), HISTORY_LIMIT);

    let mut undone = 0;
    while s.registry().can_undo() {
        s.undo();
        undone += 1;
    }
    assert_eq!(undone, HISTORY_LIMIT - 1);
    // The oldest states were dropped, so the earliest hides cannot be undone.
    assert_eq!(s.registry().hidden().len(), 60 - (HISTORY_LIMIT - 1));
}

#[test]
fn test_history_with_custom_limit() {
    let mut history = History::new(3);
    for i in 0..5 {
        history.push(set(&[i]));
    }
    assert_eq!(history.undo_len(), 3);
    assert_eq!(history.current(), &set(&[4]));
    assert_eq!(history.undo(), Some(&set(&[3])));
    assert_eq!(history.undo(), Some(&set(&[2])));
    assert_eq!(history.undo(), None);
}

#[test]
fn test_rebuild_with_new_seed_forgets_visibility() {
    let mut s = session(4);
    s.hide(1);
    let params = Params { seed: 1234, ..s.params().clone() };
    s.apply(params).unwrap();
    assert!(s.registry().hidden().is_empty());
    assert!(s.undo().is_empty());
}
