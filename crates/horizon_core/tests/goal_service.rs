use horizon_core::{
    GoalProgress, GoalService, GoalType, MemoryKvStore, SqliteKvStore, StorageError,
    StorageStats,
};

fn memory_service() -> GoalService<MemoryKvStore> {
    GoalService::with_store(MemoryKvStore::new())
}

#[test]
fn create_goal_trims_input_and_persists() {
    let service = memory_service();

    let goal = service
        .create_goal(GoalType::Today, "  Finish report  ", Some("   "))
        .unwrap();

    assert_eq!(goal.title, "Finish report");
    assert_eq!(goal.description, None);
    assert_eq!(goal.kind, GoalType::Today);
    assert_eq!(service.list_goals(GoalType::Today), vec![goal]);
}

#[test]
fn create_goal_rejects_blank_title() {
    let service = memory_service();

    let err = service.create_goal(GoalType::Week, "   ", None).unwrap_err();

    assert!(matches!(err, StorageError::Validation(_)));
    assert!(service.list_goals(GoalType::Week).is_empty());
}

#[test]
fn toggle_goal_flips_completion_and_advances_updated_at() {
    let service = memory_service();
    let goal = service.create_goal(GoalType::Month, "Run 50km", None).unwrap();

    let toggled = service.toggle_goal(GoalType::Month, &goal.id).unwrap();
    assert!(toggled.completed);
    assert!(toggled.updated_at >= goal.updated_at);
    assert_eq!(toggled.created_at, goal.created_at);

    let toggled_back = service.toggle_goal(GoalType::Month, &goal.id).unwrap();
    assert!(!toggled_back.completed);
    assert_eq!(service.list_goals(GoalType::Month), vec![toggled_back]);
}

#[test]
fn toggle_unknown_goal_returns_not_found() {
    let service = memory_service();
    let err = service.toggle_goal(GoalType::Today, "nope").unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[test]
fn edit_goal_replaces_title_and_description() {
    let service = memory_service();
    let goal = service
        .create_goal(GoalType::Year, "Learn piano", Some("scales"))
        .unwrap();

    let edited = service
        .edit_goal(GoalType::Year, &goal.id, " Learn guitar ", None)
        .unwrap();

    assert_eq!(edited.id, goal.id);
    assert_eq!(edited.title, "Learn guitar");
    assert_eq!(edited.description, None);
    assert!(matches!(
        service
            .edit_goal(GoalType::Year, &goal.id, "", None)
            .unwrap_err(),
        StorageError::Validation(_)
    ));
    assert_eq!(service.list_goals(GoalType::Year)[0].title, "Learn guitar");
}

#[test]
fn progress_counts_completed_and_pending() {
    let service = memory_service();
    let first = service.create_goal(GoalType::Today, "A", None).unwrap();
    service.create_goal(GoalType::Today, "B", None).unwrap();
    service.create_goal(GoalType::Today, "C", None).unwrap();
    service.toggle_goal(GoalType::Today, &first.id).unwrap();

    assert_eq!(
        service.progress(GoalType::Today),
        GoalProgress {
            completed: 1,
            pending: 2,
            total: 3,
        }
    );
    assert_eq!(service.progress(GoalType::Week), GoalProgress::default());
}

#[test]
fn delete_and_clear_flow_through_storage() {
    let service = GoalService::with_store(SqliteKvStore::open_in_memory().unwrap());
    let today = service.create_goal(GoalType::Today, "A", None).unwrap();
    service.create_goal(GoalType::Week, "B", None).unwrap();
    service.create_goal(GoalType::Week, "C", None).unwrap();

    assert!(service.delete_goal(GoalType::Today, &today.id).unwrap());
    assert!(!service.delete_goal(GoalType::Today, &today.id).unwrap());
    assert_eq!(service.storage_stats().total, 2);

    service.clear_goals(GoalType::Week).unwrap();
    assert_eq!(service.storage_stats().total, 0);

    service.create_goal(GoalType::Year, "D", None).unwrap();
    service.clear_all_goals().unwrap();
    assert_eq!(service.storage_stats(), StorageStats::default());
}
