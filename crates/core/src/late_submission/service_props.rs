//! Property tests for the late-submission state machine.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use stipend_shared::types::{LateSubmissionId, StudentId, UserId};
use uuid::Uuid;

use crate::late_submission::error::LateSubmissionError;
use crate::late_submission::service::LateSubmissionService;
use crate::late_submission::types::{LateSubmissionDecision, LateSubmissionRequest};
use crate::period::{MonthPeriod, PeriodCalendar};

fn arb_decision() -> impl Strategy<Value = LateSubmissionDecision> {
    prop_oneof![
        Just(LateSubmissionDecision::Pending),
        Just(LateSubmissionDecision::Approved),
        Just(LateSubmissionDecision::Denied),
    ]
}

fn arb_period() -> impl Strategy<Value = MonthPeriod> {
    (1u32..=12, 2020i32..=2030).prop_map(|(m, y)| MonthPeriod::new(m, y).unwrap())
}

fn arb_user() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|n| UserId::from_uuid(Uuid::from_u128(n)))
}

fn request(period: MonthPeriod, decision: LateSubmissionDecision) -> LateSubmissionRequest {
    LateSubmissionRequest {
        id: LateSubmissionId::new(),
        student_id: StudentId::new(),
        period,
        reason: "late".to_string(),
        decision,
        decided_by: None,
        open_until: None,
        decided_at: None,
        created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Only pending requests can be decided; decided ones always report AlreadyDecided.
    #[test]
    fn prop_only_pending_is_decidable(
        decision in arb_decision(),
        period in arb_period(),
        admin in arb_user(),
        days in 1i64..120,
    ) {
        let calendar = PeriodCalendar::default();
        let req = request(period, decision);
        let open_until = calendar.period_start(period) + Duration::days(days);

        let approve = LateSubmissionService::approve(&req, &calendar, open_until, admin, Utc::now());
        let deny = LateSubmissionService::deny(&req, admin, Utc::now());

        if decision == LateSubmissionDecision::Pending {
            prop_assert!(approve.is_ok());
            prop_assert!(deny.is_ok());
        } else {
            let approve_is_decided = matches!(
                approve,
                Err(LateSubmissionError::AlreadyDecided { decision: d, .. }) if d == decision
            );
            prop_assert!(approve_is_decided);
            let deny_is_decided = matches!(deny, Err(LateSubmissionError::AlreadyDecided { .. }));
            prop_assert!(deny_is_decided);
        }
    }

    /// An applied decision is always terminal and stamps the decider.
    #[test]
    fn prop_decision_is_terminal(period in arb_period(), admin in arb_user(), approve in any::<bool>()) {
        let calendar = PeriodCalendar::default();
        let req = request(period, LateSubmissionDecision::Pending);
        let open_until = calendar.cutoff(period);
        let action = if approve {
            LateSubmissionService::approve(&req, &calendar, open_until, admin, Utc::now()).unwrap()
        } else {
            LateSubmissionService::deny(&req, admin, Utc::now()).unwrap()
        };
        let decided = action.apply(req);

        prop_assert!(decided.decision.is_terminal());
        prop_assert_eq!(decided.decided_by, Some(admin));
        prop_assert_eq!(decided.open_until.is_some(), approve);
        prop_assert!(LateSubmissionService::deny(&decided, admin, Utc::now()).is_err());
    }
}
