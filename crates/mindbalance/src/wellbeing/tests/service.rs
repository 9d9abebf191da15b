use super::common::*;
use std::sync::Arc;

use chrono::NaiveTime;

use crate::wellbeing::dashboard::AlertSeverity;
use crate::wellbeing::domain::{DepartmentFilter, Period, ResourceId, UserId, Workload};
use crate::wellbeing::stats::Trend;
use crate::wellbeing::suggestions::DEFAULT_MESSAGE;
use crate::wellbeing::{ResourceFilter, StoreError, WellbeingError, WellbeingService};

#[test]
fn submitted_check_in_round_trips_through_the_store() {
    let (service, _) = build_service();

    let mut payload = submission("u1", 3, 3, Workload::Adequate);
    payload.comment = Some("Busy but fine".to_string());
    let record = service
        .submit_check_in(payload, now())
        .expect("submission succeeds");

    assert_eq!(record.check_in.date, now().date());
    assert_eq!(
        record.check_in.time,
        NaiveTime::from_hms_opt(9, 30, 15).expect("valid time")
    );
    assert!(record.check_in.id.0.starts_with("ck20240916093015250000"));
    assert_eq!(record.check_in.comment, "Busy but fine");
    assert_eq!(record.ai_suggestion, DEFAULT_MESSAGE);

    let stored = service.repository().check_ins().expect("check-ins load");
    assert_eq!(stored, vec![record]);
}

#[test]
fn heavy_streak_triggers_overload_warning() {
    let (service, _) = build_service();

    for days in [3, 2, 1] {
        let record = service
            .submit_check_in(submission("u1", 3, 3, Workload::Heavy), days_ago(days))
            .expect("submission succeeds");
        assert_eq!(record.ai_suggestion, DEFAULT_MESSAGE);
    }

    let record = service
        .submit_check_in(submission("u1", 3, 3, Workload::Heavy), now())
        .expect("submission succeeds");

    assert_eq!(record.ai_suggestion, OVERLOAD_MESSAGE);
    assert_eq!(record.recommended_resources, vec![ResourceId(2)]);
    assert_eq!(record.suggested_actions.len(), 2);
}

#[test]
fn streaks_only_consider_the_submitting_user() {
    let (service, _) = build_service();

    for days in [3, 2, 1] {
        service
            .submit_check_in(submission("u2", 3, 3, Workload::Heavy), days_ago(days))
            .expect("submission succeeds");
    }

    let record = service
        .submit_check_in(submission("u1", 3, 3, Workload::Heavy), now())
        .expect("submission succeeds");
    assert_eq!(record.ai_suggestion, DEFAULT_MESSAGE);
}

#[test]
fn high_priority_rule_wins_over_later_matches() {
    let (service, _) = build_service();

    let low = service
        .submit_check_in(submission("u1", 1, 5, Workload::Light), now())
        .expect("submission succeeds");
    assert_eq!(low.ai_suggestion, LOW_MOOD_MESSAGE);
    assert_eq!(low.recommended_resources, vec![ResourceId(1)]);

    let upbeat = service
        .submit_check_in(submission("u2", 5, 4, Workload::Adequate), now())
        .expect("submission succeeds");
    assert_eq!(upbeat.ai_suggestion, HIGH_SPIRITS_MESSAGE);
    assert!(upbeat.recommended_resources.is_empty());
}

#[test]
fn unknown_user_is_not_found() {
    let (service, store) = build_service();

    match service.submit_check_in(submission("ghost", 3, 3, Workload::Light), now()) {
        Err(WellbeingError::NotFound(message)) => assert!(message.contains("ghost")),
        other => panic!("expected not found, got {other:?}"),
    }

    let reloaded = WellbeingService::new(store);
    assert!(reloaded
        .repository()
        .check_ins()
        .expect("check-ins load")
        .is_empty());

    assert!(matches!(
        service.personal_dashboard(&UserId::from("ghost"), now()),
        Err(WellbeingError::NotFound(_))
    ));
    assert!(matches!(
        service.check_in_history(&UserId::from("ghost"), Period::Week, now()),
        Err(WellbeingError::NotFound(_))
    ));
}

#[test]
fn out_of_range_scores_and_long_comments_are_rejected() {
    let (service, _) = build_service();

    for (mood, energy) in [(0, 3), (3, 6)] {
        assert!(matches!(
            service.submit_check_in(submission("u1", mood, energy, Workload::Light), now()),
            Err(WellbeingError::InvalidInput(_))
        ));
    }

    let mut long = submission("u1", 3, 3, Workload::Light);
    long.comment = Some("a".repeat(501));
    assert!(matches!(
        service.submit_check_in(long, now()),
        Err(WellbeingError::InvalidInput(_))
    ));

    let mut limit = submission("u1", 3, 3, Workload::Light);
    limit.comment = Some("é".repeat(500));
    assert!(service.submit_check_in(limit, now()).is_ok());

    let blank = submission("  ", 3, 3, Workload::Light);
    assert!(matches!(
        service.submit_check_in(blank, now()),
        Err(WellbeingError::InvalidInput(_))
    ));
}

#[test]
fn history_is_windowed_and_newest_first() {
    let (service, _) = build_service();

    for days in [10, 2] {
        service
            .submit_check_in(submission("u1", 4, 4, Workload::Adequate), days_ago(days))
            .expect("submission succeeds");
    }
    service
        .submit_check_in(submission("u1", 2, 3, Workload::Heavy), now())
        .expect("submission succeeds");
    service
        .submit_check_in(submission("u2", 5, 5, Workload::Light), now())
        .expect("submission succeeds");

    let week = service
        .check_in_history(&UserId::from("u1"), Period::Week, now())
        .expect("history loads");
    assert_eq!(week.total, 2);
    assert_eq!(week.history[0].check_in.date, now().date());
    assert_eq!(week.history[1].check_in.date, days_ago(2).date());

    let month = service
        .check_in_history(&UserId::from("u1"), Period::Month, now())
        .expect("history loads");
    assert_eq!(month.total, 3);
    assert!(month
        .history
        .iter()
        .all(|record| record.check_in.user_id == UserId::from("u1")));
}

#[test]
fn personal_dashboard_reports_improving_week() {
    let (service, _) = build_service();

    for (days, mood) in [(4, 2), (3, 2), (2, 4), (1, 5)] {
        service
            .submit_check_in(submission("u1", mood, 4, Workload::Adequate), days_ago(days))
            .expect("submission succeeds");
    }

    let dashboard = service
        .personal_dashboard(&UserId::from("u1"), now())
        .expect("dashboard builds");

    assert_eq!(dashboard.week_summary.checkins_completed, 4);
    assert_eq!(dashboard.week_summary.trend, Trend::Improving);
    assert_eq!(dashboard.week_summary.avg_mood, 3.2);
    assert_eq!(dashboard.chart_series.len(), 4);
    assert!(dashboard.insights[0].contains("on the rise"));
}

#[test]
fn admin_dashboard_flags_struggling_department() {
    let (service, _) = build_service();

    service
        .submit_check_in(submission("u3", 1, 2, Workload::Heavy), now())
        .expect("submission succeeds");
    service
        .submit_check_in(submission("u1", 4, 4, Workload::Light), now())
        .expect("submission succeeds");

    let all = service
        .admin_dashboard(&DepartmentFilter::All, Period::Week, now())
        .expect("dashboard builds");
    assert_eq!(all.participation_rate, 66.7);
    assert_eq!(all.overall_wellbeing, 2.5);
    assert_eq!(all.alerts.len(), 1);
    assert_eq!(all.alerts[0].team, "People");
    assert_eq!(all.alerts[0].severity, AlertSeverity::High);

    let engineering = service
        .admin_dashboard(
            &DepartmentFilter::Named("Engineering".to_string()),
            Period::Week,
            now(),
        )
        .expect("dashboard builds");
    assert_eq!(engineering.overall_wellbeing, 4.0);
    assert_eq!(engineering.participation_rate, 33.3);
    assert_eq!(engineering.workload_distribution.light, 100.0);
    assert_eq!(engineering.alerts, all.alerts);
}

#[test]
fn resources_filter_by_category_and_difficulty() {
    let (service, _) = build_service();

    let mindfulness = service
        .resources(&ResourceFilter {
            category: Some("mindfulness".to_string()),
            difficulty: None,
        })
        .expect("catalog loads");
    assert_eq!(mindfulness.resources.len(), 2);
    assert_eq!(mindfulness.categories.len(), 3);

    let narrowed = service
        .resources(&ResourceFilter {
            category: Some("mindfulness".to_string()),
            difficulty: Some("intermediate".to_string()),
        })
        .expect("catalog loads");
    assert_eq!(narrowed.resources.len(), 1);
    assert_eq!(narrowed.resources[0].id, ResourceId(3));

    let detail = service.resource(ResourceId(2)).expect("resource exists");
    assert_eq!(detail.title, "Time blocking");
    assert!(matches!(
        service.resource(ResourceId(99)),
        Err(WellbeingError::NotFound(_))
    ));
}

#[test]
fn store_failures_surface_as_store_errors() {
    let service = WellbeingService::new(Arc::new(UnavailableStore));

    match service.submit_check_in(submission("u1", 3, 3, Workload::Light), now()) {
        Err(WellbeingError::Store(StoreError::Unavailable(_))) => {}
        other => panic!("expected store error, got {other:?}"),
    }
    assert!(matches!(
        service.admin_dashboard(&DepartmentFilter::All, Period::Week, now()),
        Err(WellbeingError::Store(_))
    ));
}
