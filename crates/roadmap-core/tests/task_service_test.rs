//! Integration tests for nested task operations.

mod common;

use std::sync::Arc;

use serde_json::json;

use roadmap_core::plan::PlanDocument;
use roadmap_core::{Roadmap, ServiceError};
use roadmap_db::models::OperationType;
use roadmap_test_utils::{create_test_db, drop_test_db};

use common::{CannedModel, intro_plan, roadmap};

fn day_tasks(plan: &PlanDocument, week: usize, day: usize) -> &[roadmap_db::models::Task] {
    &plan.weeks[week].days[day].tasks
}

#[tokio::test]
async fn add_task_appends_pending_task() {
    let (pool, dir) = create_test_db().await;
    let svc = roadmap(&pool);
    svc.add_plan(&intro_plan("p1")).await.unwrap();

    svc.add_task("p1", "week1_day1_t1", "Read ch.1")
        .await
        .expect("add_task should succeed");

    let plan = svc.get_plan("p1").await.unwrap();
    let tasks = day_tasks(&plan, 0, 0);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].task_id, "week1_day1_t1");
    assert_eq!(tasks[0].content, "Read ch.1");
    assert_eq!(tasks[0].status, "Pending");
    assert!(tasks[0].comments.is_empty());
    assert!(tasks[0].feedbacks.is_empty());

    let history = svc.operation_history("p1").await.unwrap();
    let last = history.last().unwrap();
    assert_eq!(last.operation_type, OperationType::AddTask);
    assert_eq!(last.details.0["task_id"], "week1_day1_t1");
    assert_eq!(last.details.0["content"], "Read ch.1");

    drop_test_db(pool, dir).await;
}

#[tokio::test]
async fn add_task_to_missing_week_or_day_is_not_found() {
    let (pool, dir) = create_test_db().await;
    let svc = roadmap(&pool);
    svc.add_plan(&intro_plan("p1")).await.unwrap();

    for task_id in ["week2_day1_t1", "week1_day5_t1"] {
        let err = svc.add_task("p1", task_id, "x").await.unwrap_err();
        match err {
            ServiceError::NotFound(msg) => assert_eq!(msg, "Week or Day not found in plan"),
            other => panic!("expected NotFound for {task_id}, got {other:?}"),
        }
    }

    let plan = svc.get_plan("p1").await.unwrap();
    assert!(day_tasks(&plan, 0, 0).is_empty());

    drop_test_db(pool, dir).await;
}

#[tokio::test]
async fn malformed_task_id_is_validation_error() {
    let (pool, dir) = create_test_db().await;
    let svc = roadmap(&pool);
    svc.add_plan(&intro_plan("p1")).await.unwrap();

    let cases = [
        svc.add_task("p1", "weekone_day1_t1", "x").await,
        svc.delete_task("p1", "week1_dayX").await,
        svc.edit_task("p1", "task-7", "x", "").await,
        svc.update_task_status("p1", "week1", "Done").await,
        svc.submit_comment("p1", "1_1_x", "hi").await,
    ];
    for result in cases {
        assert!(
            matches!(result, Err(ServiceError::Validation(_))),
            "expected validation error, got {result:?}"
        );
    }

    drop_test_db(pool, dir).await;
}

#[tokio::test]
async fn task_operations_on_missing_plan_are_not_found() {
    let (pool, dir) = create_test_db().await;
    let svc = roadmap(&pool);

    let cases = [
        svc.add_task("ghost", "week1_day1_a", "x").await,
        svc.delete_task("ghost", "week1_day1_a").await,
        svc.edit_task("ghost", "week1_day1_a", "x", "").await,
        svc.update_task_status("ghost", "week1_day1_a", "Done").await,
        svc.submit_comment("ghost", "week1_day1_a", "hi").await,
    ];
    for result in cases {
        assert!(
            matches!(result, Err(ServiceError::NotFound(_))),
            "expected not found, got {result:?}"
        );
    }

    drop_test_db(pool, dir).await;
}

#[tokio::test]
async fn update_status_then_delete_task() {
    let (pool, dir) = create_test_db().await;
    let svc = roadmap(&pool);
    svc.add_plan(&intro_plan("p1")).await.unwrap();
    svc.add_task("p1", "week1_day1_t1", "Read ch.1").await.unwrap();

    svc.update_task_status("p1", "week1_day1_t1", "Done")
        .await
        .unwrap();
    let plan = svc.get_plan("p1").await.unwrap();
    assert_eq!(day_tasks(&plan, 0, 0)[0].status, "Done");

    svc.delete_task("p1", "week1_day1_t1").await.unwrap();
    let plan = svc.get_plan("p1").await.unwrap();
    assert!(day_tasks(&plan, 0, 0).is_empty());

    let err = svc.delete_task("p1", "week1_day1_t1").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let kinds: Vec<OperationType> = svc
        .operation_history("p1")
        .await
        .unwrap()
        .iter()
        .map(|r| r.operation_type)
        .collect();
    assert_eq!(
        kinds,
        [
            OperationType::Add,
            OperationType::AddTask,
            OperationType::UpdateTaskStatus,
            OperationType::DeleteTask,
        ]
    );

    drop_test_db(pool, dir).await;
}

#[tokio::test]
async fn delete_task_only_touches_matching_ids() {
    let (pool, dir) = create_test_db().await;
    let svc = roadmap(&pool);
    svc.add_plan(&intro_plan("p1")).await.unwrap();
    svc.add_task("p1", "week1_day1_a", "A").await.unwrap();
    svc.add_task("p1", "week1_day1_b", "B").await.unwrap();

    svc.delete_task("p1", "week1_day1_a").await.unwrap();

    let plan = svc.get_plan("p1").await.unwrap();
    let ids: Vec<&str> = day_tasks(&plan, 0, 0)
        .iter()
        .map(|t| t.task_id.as_str())
        .collect();
    assert_eq!(ids, ["week1_day1_b"]);

    drop_test_db(pool, dir).await;
}

#[tokio::test]
async fn edit_task_keeps_status_when_blank() {
    let (pool, dir) = create_test_db().await;
    let svc = roadmap(&pool);
    svc.add_plan(&intro_plan("p1")).await.unwrap();
    svc.add_task("p1", "week1_day1_t1", "Read ch.1").await.unwrap();

    svc.edit_task("p1", "week1_day1_t1", "Read ch.1 and ch.2", "")
        .await
        .unwrap();
    let plan = svc.get_plan("p1").await.unwrap();
    let task = &day_tasks(&plan, 0, 0)[0];
    assert_eq!(task.content, "Read ch.1 and ch.2");
    assert_eq!(task.status, "Pending");

    svc.edit_task("p1", "week1_day1_t1", "Read ch.2", "In Progress")
        .await
        .unwrap();
    let plan = svc.get_plan("p1").await.unwrap();
    let task = &day_tasks(&plan, 0, 0)[0];
    assert_eq!(task.content, "Read ch.2");
    assert_eq!(task.status, "In Progress");

    let history = svc.operation_history("p1").await.unwrap();
    let last = &history.last().unwrap().details.0;
    assert_eq!(
        last["updated_task_data"],
        json!({"content": "Read ch.2", "status": "In Progress"})
    );

    let err = svc
        .edit_task("p1", "week1_day1_missing", "x", "")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    drop_test_db(pool, dir).await;
}

#[tokio::test]
async fn full_scan_finds_task_stored_outside_its_encoded_day() {
    let (pool, dir) = create_test_db().await;
    let svc = roadmap(&pool);

    // The id claims week 1 day 1 but the task lives under week 3 day 2.
    let plan: PlanDocument = serde_json::from_value(json!({
        "plan_id": "p1",
        "title": "t",
        "goal": "g",
        "weeks": [
            {"week": 1, "days": [{"day": 1, "tasks": []}]},
            {"week": 3, "days": [{"day": 2, "tasks": [
                {"task_id": "week1_day1_moved", "content": "moved"}
            ]}]}
        ],
        "resources": {}
    }))
    .unwrap();
    svc.add_plan(&plan).await.unwrap();

    svc.update_task_status("p1", "week1_day1_moved", "Done")
        .await
        .expect("status update scans the whole document");
    let stored = svc.get_plan("p1").await.unwrap();
    assert_eq!(day_tasks(&stored, 1, 0)[0].status, "Done");

    drop_test_db(pool, dir).await;
}

#[tokio::test]
async fn submit_comment_appends_timestamped_comment() {
    let (pool, dir) = create_test_db().await;
    let svc = roadmap(&pool);
    svc.add_plan(&intro_plan("p1")).await.unwrap();
    svc.add_task("p1", "week1_day1_t1", "Read ch.1").await.unwrap();

    svc.submit_comment("p1", "week1_day1_t1", "too long")
        .await
        .unwrap();
    svc.submit_comment("p1", "week1_day1_t1", "done now")
        .await
        .unwrap();

    let plan = svc.get_plan("p1").await.unwrap();
    let comments = &day_tasks(&plan, 0, 0)[0].comments;
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].comment, "too long");
    assert_eq!(comments[1].comment, "done now");
    assert!(chrono::DateTime::parse_from_rfc3339(&comments[0].timestamp).is_ok());

    let err = svc
        .submit_comment("p1", "week1_day1_nope", "hi")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    drop_test_db(pool, dir).await;
}

#[tokio::test]
async fn concurrent_comments_are_not_lost() {
    let (pool, dir) = create_test_db().await;
    let svc = Roadmap::new(pool.clone(), CannedModel::new("ok"));
    svc.add_plan(&intro_plan("p1")).await.unwrap();
    svc.add_task("p1", "week1_day1_t1", "Read ch.1").await.unwrap();

    let svc = Arc::new(svc);
    let mut handles = Vec::new();
    for i in 0..10 {
        let svc = Arc::clone(&svc);
        handles.push(tokio::spawn(async move {
            svc.submit_comment("p1", "week1_day1_t1", &format!("comment {i}"))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let plan = svc.get_plan("p1").await.unwrap();
    assert_eq!(day_tasks(&plan, 0, 0)[0].comments.len(), 10);

    drop_test_db(pool, dir).await;
}
