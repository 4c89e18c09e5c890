#[cfg(test)]
mod tests {
    use crate::error::{AddTaskError, InvalidDueTime, TaskNotFound};
    use crate::model::task::{Partition, Task, TaskId};
    use crate::model::user_data::UserData;
    use crate::service::expiry::ExpiryPolicy;
    use crate::service::task_service::TaskLifecycleService;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    fn now() -> NaiveDateTime {
        at(2024, 1, 1, 10, 0)
    }

    fn add(service: &mut TaskLifecycleService, description: &str, due: &str) -> Task {
        service.add_task(description, due, now()).unwrap().unwrap()
    }

    #[test]
    fn buy_milk_defaults_to_tonight() {
        let mut service = TaskLifecycleService::default();
        let task = add(&mut service, "Buy milk", "");

        assert_eq!(task.due_label(), "2024-01-01 23:59");
        assert_eq!(task.id, TaskId(1));
        assert_eq!(service.list_upcoming(), vec![task]);
    }

    #[test]
    fn call_mom_tomorrow_morning() {
        let mut service = TaskLifecycleService::default();
        let task = add(&mut service, "Call mom", "tmr 9am");

        assert_eq!(task.due_at, at(2024, 1, 2, 9, 0));
    }

    #[test]
    fn past_due_time_is_refused() {
        let mut service = TaskLifecycleService::default();
        let result = service.add_task("Past thing", "2020-01-01", now());

        assert_eq!(result, Err(AddTaskError::InvalidDueTime(InvalidDueTime::InPast)));
        assert!(service.list_upcoming().is_empty());
    }

    #[test]
    fn due_time_without_description_is_refused() {
        let mut service = TaskLifecycleService::default();
        let result = service.add_task("", "5pm", now());

        assert_eq!(result, Err(AddTaskError::MissingDescription));
        assert_eq!(result.unwrap_err().to_string(), "missing description");
    }

    #[test]
    fn empty_submission_is_a_no_op() {
        let mut service = TaskLifecycleService::default();

        assert_eq!(service.add_task("", "", now()), Ok(None));
        assert_eq!(service.add_task("  ", " ", now()), Ok(None));
        assert_eq!(service.store().largest_id(), 0);
    }

    #[test]
    fn failed_add_does_not_burn_an_id() {
        let mut service = TaskLifecycleService::default();
        assert!(service.add_task("x", "gibberish", now()).is_err());

        let task = add(&mut service, "y", "");
        assert_eq!(task.id, TaskId(1));
    }

    #[test]
    fn purge_respects_the_24_hour_window() {
        let mut service = TaskLifecycleService::default();
        let task = add(&mut service, "Buy milk", "");
        let done_at = now();
        service.complete_task(task.id, done_at).unwrap();

        let purged = service.purge_expired(done_at + Duration::hours(23) + Duration::minutes(59));
        assert!(purged.is_empty());
        assert_eq!(service.list_completed().len(), 1);

        let purged = service.purge_expired(done_at + Duration::hours(24) + Duration::minutes(1));
        assert_eq!(purged.len(), 1);
        assert!(service.list_completed().is_empty());
    }

    #[test]
    fn purge_is_idempotent() {
        let mut service = TaskLifecycleService::default();
        let old = add(&mut service, "old", "");
        let fresh = add(&mut service, "fresh", "");
        service.complete_task(old.id, now()).unwrap();
        service.complete_task(fresh.id, now() + Duration::hours(20)).unwrap();

        let later = now() + Duration::hours(30);
        service.purge_expired(later);
        let first = service.list_completed();
        let second_purge = service.purge_expired(later);

        assert!(second_purge.is_empty());
        assert_eq!(service.list_completed(), first);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, fresh.id);
    }

    #[test]
    fn complete_then_reopen_restores_the_task() {
        let mut service = TaskLifecycleService::default();
        let task = add(&mut service, "Call mom", "tmr 9am");

        service.complete_task(task.id, now()).unwrap();
        assert!(service.list_upcoming().is_empty());

        let reopened = service.reopen_task(task.id).unwrap();
        assert_eq!(reopened, task);
        assert_eq!(service.list_upcoming(), vec![task]);
        assert!(service.list_completed().is_empty());
    }

    #[test]
    fn completing_twice_reports_not_found() {
        let mut service = TaskLifecycleService::default();
        let task = add(&mut service, "Buy milk", "");
        service.complete_task(task.id, now()).unwrap();

        assert_eq!(
            service.complete_task(task.id, now()),
            Err(TaskNotFound { id: task.id, partition: Partition::Upcoming })
        );
    }

    #[test]
    fn removing_a_completed_task_reopens_it() {
        let mut service = TaskLifecycleService::default();
        let task = add(&mut service, "Buy milk", "");
        let done = service.complete_task(task.id, now()).unwrap();

        let back = service.reassign_on_removal(&done).unwrap();

        assert_eq!(back.completed_at, None);
        assert_eq!(service.list_upcoming(), vec![task.clone()]);
        assert!(service.remove_task(task.id).is_err());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut service = TaskLifecycleService::default();
        let a = add(&mut service, "a", "");
        let b = add(&mut service, "b", "");
        service.complete_task(a.id, now()).unwrap();
        service.complete_task(b.id, now()).unwrap();
        service.reopen_task(b.id).unwrap();
        service.purge_expired(now() + Duration::days(2));

        let c = add(&mut service, "c", "");
        assert!(c.id > b.id);
        assert!(b.id > a.id);
    }

    #[test]
    fn visible_completed_never_shows_expired_tasks() {
        let mut service = TaskLifecycleService::default();
        let a = add(&mut service, "a", "");
        service.complete_task(a.id, now()).unwrap();

        assert_eq!(service.visible_completed(now() + Duration::hours(1)).len(), 1);
        assert!(service.visible_completed(now() + Duration::hours(25)).is_empty());
        assert!(service.completed_views(now() + Duration::hours(25)).is_empty());
    }

    #[test]
    fn purge_skips_tasks_missing_a_completion_time() {
        let broken = Task::new(TaskId(1), "broken".to_string(), now());
        let mut expired = Task::new(TaskId(2), "expired".to_string(), now());
        expired.completed_at = Some(now() - Duration::days(2));
        let data = UserData {
            largest_id: 2,
            completed: vec![broken.clone(), expired],
            ..UserData::default()
        };
        let mut service = TaskLifecycleService::from_user_data(&data, ExpiryPolicy::default()).unwrap();

        let purged = service.purge_expired(now());

        assert_eq!(purged.len(), 1);
        assert_eq!(purged[0].id, TaskId(2));
        assert_eq!(service.list_completed(), vec![broken]);
    }

    #[test]
    fn state_survives_a_save_and_reload() {
        let mut service = TaskLifecycleService::default();
        let a = add(&mut service, "a", "");
        add(&mut service, "b", "tmr");
        service.complete_task(a.id, now()).unwrap();

        let mut data = UserData::default();
        data.extra.insert("theme_palette".to_string(), "ocean".into());
        service.write_into(&mut data);

        let json = serde_json::to_string(&data).unwrap();
        let loaded: UserData = serde_json::from_str(&json).unwrap();
        let mut reloaded = TaskLifecycleService::from_user_data(&loaded, ExpiryPolicy::default()).unwrap();

        assert_eq!(reloaded.list_upcoming(), service.list_upcoming());
        assert_eq!(reloaded.list_completed(), service.list_completed());
        assert_eq!(loaded.extra["theme_palette"], "ocean");
        assert_eq!(add(&mut reloaded, "c", "").id, TaskId(3));
    }

    #[test]
    fn exhausted_id_space_fails_the_add_without_reusing_ids() {
        let data = UserData {
            largest_id: u64::MAX,
            ..UserData::default()
        };
        let mut service = TaskLifecycleService::from_user_data(&data, ExpiryPolicy::default()).unwrap();

        let first = service.add_task("x", "", now());
        let second = service.add_task("y", "", now());

        assert!(matches!(first, Err(AddTaskError::Internal(_))));
        assert!(matches!(second, Err(AddTaskError::Internal(_))));
        assert!(service.list_upcoming().is_empty());
        assert_eq!(service.store().largest_id(), u64::MAX);
    }

    #[test]
    fn strict_purge_fails_on_a_task_missing_a_completion_time() {
        let broken = Task::new(TaskId(1), "broken".to_string(), now());
        let mut expired = Task::new(TaskId(2), "expired".to_string(), now());
        expired.completed_at = Some(now() - Duration::days(2));
        let data = UserData {
            largest_id: 2,
            completed: vec![broken, expired],
            ..UserData::default()
        };
        let mut service = TaskLifecycleService::from_user_data(&data, ExpiryPolicy::default()).unwrap();

        assert!(service.try_purge_expired(now()).is_err());
        assert_eq!(service.list_completed().len(), 2);
    }

    #[test]
    fn strict_purge_matches_lenient_purge_on_healthy_state() {
        let mut service = TaskLifecycleService::default();
        let a = add(&mut service, "a", "");
        service.complete_task(a.id, now()).unwrap();

        let purged = service.try_purge_expired(now() + Duration::hours(25)).unwrap();
        assert_eq!(purged.len(), 1);
        assert!(service.list_completed().is_empty());
    }

    #[test]
    fn description_is_stored_as_typed() {
        let mut service = TaskLifecycleService::default();
        let task = add(&mut service, "  Buy milk ", "");

        assert_eq!(task.description, "  Buy milk ");
        assert_eq!(service.add_task("   ", "5pm", now()), Err(AddTaskError::MissingDescription));
    }
}
