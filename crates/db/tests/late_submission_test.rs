//! Late-submission repository integration tests.

mod common;

use chrono::TimeDelta;
use common::{at, march, setup_db};
use stipend_core::events::{AllowanceEvent, EventBus};
use stipend_core::late_submission::{
    CreateLateSubmissionInput, LateSubmissionDecision, LateSubmissionError,
};
use stipend_db::LateSubmissionRepository;
use stipend_shared::types::{LateSubmissionId, PageRequest, StudentId, UserId};

fn input(student_id: StudentId) -> CreateLateSubmissionInput {
    CreateLateSubmissionInput {
        student_id,
        period: march(),
        reason: "Registrar released the certificate late".to_string(),
    }
}

#[tokio::test]
async fn test_create_is_pending() {
    let db = setup_db().await;
    let repo = LateSubmissionRepository::new(db);
    let student = StudentId::new();

    let request = repo.create(input(student)).await.unwrap();
    assert_eq!(request.decision, LateSubmissionDecision::Pending);
    assert_eq!(request.decided_by, None);
    assert_eq!(request.open_until, None);

    let found = repo.find(request.id).await.unwrap();
    assert_eq!(found, request);
}

#[tokio::test]
async fn test_blank_reason_rejected() {
    let db = setup_db().await;
    let repo = LateSubmissionRepository::new(db);
    let mut blank = input(StudentId::new());
    blank.reason = "  \n".to_string();
    assert!(matches!(
        repo.create(blank).await,
        Err(LateSubmissionError::ReasonRequired)
    ));
}

#[tokio::test]
async fn test_one_pending_request_per_student_and_period() {
    let db = setup_db().await;
    let repo = LateSubmissionRepository::new(db);
    let student = StudentId::new();

    let first = repo.create(input(student)).await.unwrap();
    let duplicate = repo.create(input(student)).await;
    assert!(matches!(
        duplicate,
        Err(LateSubmissionError::PendingRequestExists { .. })
    ));

    // Other students are unaffected.
    repo.create(input(StudentId::new())).await.unwrap();

    // Once decided, a new request object may be filed.
    repo.deny(first.id, UserId::new()).await.unwrap();
    let second = repo.create(input(student)).await.unwrap();
    assert_ne!(second.id, first.id);
}

#[tokio::test]
async fn test_approve_sets_decision_fields_and_publishes() {
    let db = setup_db().await;
    let bus = EventBus::default();
    let mut events = bus.subscribe();
    let repo = LateSubmissionRepository::new(db).with_events(bus);
    let admin = UserId::new();
    let request = repo.create(input(StudentId::new())).await.unwrap();

    let open_until = at(2026, 5, 15, 0);
    let decided_at = at(2026, 5, 2, 3);
    let approved = repo
        .approve_at(request.id, open_until, admin, decided_at)
        .await
        .unwrap();

    assert_eq!(approved.decision, LateSubmissionDecision::Approved);
    assert_eq!(approved.decided_by, Some(admin));
    assert_eq!(approved.open_until, Some(open_until));
    assert_eq!(approved.decided_at, Some(decided_at));
    assert_eq!(repo.find(request.id).await.unwrap(), approved);

    assert_eq!(
        repo.latest_open_until(request.student_id, march())
            .await
            .unwrap(),
        Some(open_until)
    );

    match events.recv().await.unwrap() {
        AllowanceEvent::LateSubmissionApproved {
            request_id,
            open_until: published,
            decided_by,
            ..
        } => {
            assert_eq!(request_id, request.id);
            assert_eq!(published, open_until);
            assert_eq!(decided_by, admin);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_decision_returns_stored_timestamps() {
    let db = setup_db().await;
    let repo = LateSubmissionRepository::new(db);
    let request = repo.create(input(StudentId::new())).await.unwrap();

    let open_until = at(2026, 5, 15, 0) + TimeDelta::nanoseconds(999_999_999);
    let decided_at = at(2026, 5, 2, 3) + TimeDelta::nanoseconds(1_500);
    let approved = repo
        .approve_at(request.id, open_until, UserId::new(), decided_at)
        .await
        .unwrap();

    assert_eq!(
        approved.open_until,
        Some(at(2026, 5, 15, 0) + TimeDelta::microseconds(999_999))
    );
    assert_eq!(
        approved.decided_at,
        Some(at(2026, 5, 2, 3) + TimeDelta::microseconds(1))
    );
    assert_eq!(repo.find(request.id).await.unwrap(), approved);
}

#[tokio::test]
async fn test_deciding_twice_fails_already_decided() {
    let db = setup_db().await;
    let repo = LateSubmissionRepository::new(db);
    let request = repo.create(input(StudentId::new())).await.unwrap();

    let denied = repo.deny(request.id, UserId::new()).await.unwrap();
    assert_eq!(denied.decision, LateSubmissionDecision::Denied);
    assert_eq!(denied.open_until, None);

    let approve = repo
        .approve(request.id, at(2026, 5, 15, 0), UserId::new())
        .await;
    assert!(matches!(
        approve,
        Err(LateSubmissionError::AlreadyDecided {
            decision: LateSubmissionDecision::Denied,
            ..
        })
    ));

    let deny = repo.deny(request.id, UserId::new()).await;
    assert!(matches!(deny, Err(LateSubmissionError::AlreadyDecided { .. })));

    assert_eq!(
        repo.find(request.id).await.unwrap().decision,
        LateSubmissionDecision::Denied
    );
}

#[tokio::test]
async fn test_unknown_request_not_found() {
    let db = setup_db().await;
    let repo = LateSubmissionRepository::new(db);
    let id = LateSubmissionId::new();
    assert!(matches!(
        repo.deny(id, UserId::new()).await,
        Err(LateSubmissionError::NotFound(missing)) if missing == id.into_inner()
    ));
}

#[tokio::test]
async fn test_open_until_before_period_start_rejected() {
    let db = setup_db().await;
    let repo = LateSubmissionRepository::new(db);
    let request = repo.create(input(StudentId::new())).await.unwrap();

    let result = repo
        .approve(request.id, at(2026, 2, 1, 0), UserId::new())
        .await;
    assert!(matches!(
        result,
        Err(LateSubmissionError::InvalidOpenUntil { .. })
    ));
    assert_eq!(
        repo.find(request.id).await.unwrap().decision,
        LateSubmissionDecision::Pending
    );
}

#[tokio::test]
async fn test_latest_open_until_takes_maximum_of_approved() {
    let db = setup_db().await;
    let repo = LateSubmissionRepository::new(db);
    let student = StudentId::new();

    let first = repo.create(input(student)).await.unwrap();
    repo.approve(first.id, at(2026, 5, 20, 0), UserId::new())
        .await
        .unwrap();
    let second = repo.create(input(student)).await.unwrap();
    repo.approve(second.id, at(2026, 5, 10, 0), UserId::new())
        .await
        .unwrap();
    let third = repo.create(input(student)).await.unwrap();
    repo.deny(third.id, UserId::new()).await.unwrap();

    assert_eq!(
        repo.latest_open_until(student, march()).await.unwrap(),
        Some(at(2026, 5, 20, 0))
    );
    assert_eq!(
        repo.latest_open_until(student, march().next()).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_list_filters_by_decision() {
    let db = setup_db().await;
    let repo = LateSubmissionRepository::new(db);

    let a = repo.create(input(StudentId::new())).await.unwrap();
    repo.create(input(StudentId::new())).await.unwrap();
    repo.create(input(StudentId::new())).await.unwrap();
    repo.deny(a.id, UserId::new()).await.unwrap();

    let pending = repo
        .list(Some(LateSubmissionDecision::Pending), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(pending.meta.total, 2);
    assert!(
        pending
            .data
            .iter()
            .all(|r| r.decision == LateSubmissionDecision::Pending)
    );

    let all = repo.list(None, PageRequest::default()).await.unwrap();
    assert_eq!(all.meta.total, 3);
}
