//! End-to-end report behavior over in-memory snapshots.

use crate::integration::support::{
    chat_user, config, directory_member, sources, workspace_user, DOMAIN,
};
use chrono::{Duration, TimeZone, Utc};
use rollcall::builder::ModelBuilder;
use rollcall::config::ExpectationSetting;
use rollcall::model::{ConcernLevel, ExpectationStatus, ExpectationType};
use rollcall::source::directory::{AwardQualification, DirectoryAward, QualificationRecord};
use rollcall::source::{ChatSnapshot, WorkspaceSnapshot, CHAT, WORKSPACE};

#[test]
fn workspace_primary_email_outside_team_domain_is_fix() {
    let config = config();
    let mut sources = sources(vec![directory_member(1, "Smith, Jane", "jane@x.org", &[1])]);
    sources.workspace = Some(WorkspaceSnapshot {
        users: vec![workspace_user("jane@x.org", "Jane Smith")],
        memberships: Vec::new(),
    });

    let builder = ModelBuilder::from_sources(&config, &sources).unwrap();
    let model = builder.build_model();
    assert_eq!(model.len(), 1);
    assert!(model.all_members()[0].workspace_record().is_some());

    let report = builder.user_report(&model);
    let workspace: Vec<_> = report[0]
        .concerns
        .iter()
        .filter(|c| c.platform.as_deref() == Some(WORKSPACE))
        .collect();
    assert_eq!(workspace.len(), 1);
    assert_eq!(workspace[0].level, ConcernLevel::Fix);
    assert_eq!(
        workspace[0].concern,
        "Primary email jane@x.org does not match primary team email (none)"
    );
}

#[test]
fn unmatched_chat_user_becomes_template_member() {
    let config = config();
    let mut sources = sources(vec![directory_member(1, "Smith, Jane", "jane@kcesar.org", &[1])]);
    sources.chat = Some(ChatSnapshot {
        users: vec![chat_user("U9", None, "Somebody Else")],
        ..ChatSnapshot::default()
    });

    let model = ModelBuilder::from_sources(&config, &sources)
        .unwrap()
        .build_model();
    assert_eq!(model.len(), 2);
    let seeded = &model.all_members()[1];
    assert!(seeded.name.is_template());
    assert_eq!(seeded.platforms.keys().collect::<Vec<_>>(), vec![CHAT]);
    assert!(seeded.emails.is_empty());
}

#[test]
fn shared_team_email_is_reported_on_both_members() {
    let mut config = config();
    config.team.email_domain = "org.com".to_string();
    let sources = sources(vec![
        directory_member(1, "Brown, Ann", "a.b@org.com", &[1]),
        directory_member(2, "Baker, Al", "a.b@org.com", &[1]),
    ]);

    let report = ModelBuilder::from_sources(&config, &sources)
        .unwrap()
        .model_user_report();
    assert_eq!(report.len(), 2);
    for entry in &report {
        let shared: Vec<_> = entry
            .concerns
            .iter()
            .filter(|c| c.concern.starts_with("a.b@org.com belongs to multiple members"))
            .collect();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].level, ConcernLevel::Fix);
        assert!(shared[0].concern.contains("Brown, Ann"));
        assert!(shared[0].concern.contains("Baker, Al"));
    }
}

#[test]
fn expectation_for_unknown_course_is_omitted() {
    let mut config = config();
    config.directory.expectations.insert(
        "ESAR".to_string(),
        vec![
            ExpectationSetting {
                course: "CPR".to_string(),
                check: ExpectationType::Simple,
            },
            ExpectationSetting {
                course: "navigation".to_string(),
                check: ExpectationType::Simple,
            },
        ],
    );
    let mut sources = sources(Vec::new());
    sources.directory.qualifications = vec![QualificationRecord {
        id: 7,
        title: "Navigation".to_string(),
        expires_months_default: None,
    }];

    let model = ModelBuilder::from_sources(&config, &sources)
        .unwrap()
        .build_model();
    let group = model.find_group("ESAR").unwrap();
    let titles: Vec<_> = group
        .expectations
        .iter()
        .map(|e| e.qualification.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Navigation"]);
}

#[test]
fn report_is_sorted_by_last_then_first_name() {
    let config = config();
    let sources = sources(vec![
        directory_member(1, "Young, Amy", "amy@gmail.com", &[1]),
        directory_member(2, "adams, bo", "bo@gmail.com", &[1]),
        directory_member(3, "Adams, Al", "al@gmail.com", &[1]),
    ]);
    let report = ModelBuilder::from_sources(&config, &sources)
        .unwrap()
        .model_user_report();
    let names: Vec<_> = report
        .iter()
        .map(|e| e.member.name.last_first.as_str())
        .collect();
    assert_eq!(names, vec!["Adams, Al", "adams, bo", "Young, Amy"]);
}

#[test]
fn each_member_gets_one_standing() {
    let config = config();
    let sources = sources(vec![
        // Later status group wins: trainee, so no checks apply.
        directory_member(1, "Trainee, Tia", "tia@gmail.com", &[1, 2]),
        directory_member(2, "Former, Fred", &format!("fred@{}", DOMAIN), &[3]),
        directory_member(3, "Current, Cal", &format!("cal@{}", DOMAIN), &[1]),
    ]);
    let builder = ModelBuilder::from_sources(&config, &sources).unwrap();
    let model = builder.build_model();

    let tia = &model.all_members()[0];
    assert!(tia.team_status.trainee);
    assert!(!tia.team_status.current);
    assert_eq!(tia.team_status.title, "ESAR Trainees");

    let users = builder.user_report(&model);
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].member.name.last, "Former");
    assert!(users[0]
        .concerns
        .iter()
        .any(|c| c.concern == format!("Non-member has team email fred@{}", DOMAIN)));

    let groups = builder.group_membership_report(&model);
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].concerns[0].concern,
        "Non-member belongs to group(s) ESAR Field"
    );
}

#[test]
fn ambiguous_chat_record_is_an_error_on_every_candidate() {
    let config = config();
    let mut sources = sources(vec![
        directory_member(1, "Smith, Jane", "jane1@kcesar.org", &[1]),
        directory_member(2, "Smith, Jane", "jane2@kcesar.org", &[1]),
    ]);
    sources.chat = Some(ChatSnapshot {
        users: vec![chat_user("U1", None, "Jane Smith")],
        ..ChatSnapshot::default()
    });

    let builder = ModelBuilder::from_sources(&config, &sources).unwrap();
    let model = builder.build_model();
    assert_eq!(model.len(), 2);
    assert_eq!(model.ambiguities().len(), 1);
    assert!(model.all_members().iter().all(|m| m.chat_record().is_none()));

    let report = builder.user_report(&model);
    assert_eq!(report.len(), 2);
    for entry in &report {
        let errors: Vec<_> = entry
            .concerns
            .iter()
            .filter(|c| c.level == ConcernLevel::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].platform.as_deref(), Some(CHAT));
        assert_eq!(
            errors[0].concern,
            "Chat record Jane Smith matches multiple members: Smith, Jane; Smith, Jane"
        );
    }
}

#[test]
fn training_report_uses_directory_awards() {
    let mut config = config();
    config.directory.expectations.insert(
        "ESAR".to_string(),
        vec![
            ExpectationSetting {
                course: "CPR".to_string(),
                check: ExpectationType::Simple,
            },
            ExpectationSetting {
                course: "First Aid".to_string(),
                check: ExpectationType::Simple,
            },
        ],
    );
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let mut sources = sources(vec![directory_member(1, "Smith, Jane", "jane@kcesar.org", &[1])]);
    sources.directory.qualifications = vec![
        QualificationRecord {
            id: 1,
            title: "CPR".to_string(),
            expires_months_default: Some(24),
        },
        QualificationRecord {
            id: 2,
            title: "First Aid".to_string(),
            expires_months_default: Some(24),
        },
    ];
    sources.directory.awards = vec![DirectoryAward {
        member_id: 1,
        qualification: AwardQualification {
            id: 1,
            title: "CPR".to_string(),
        },
        starts_at: now - Duration::days(300),
        ends_at: Some(now + Duration::days(60)),
    }];

    let builder = ModelBuilder::from_sources(&config, &sources).unwrap();
    let model = builder.build_model();
    let progress = builder.training_report(&model.all_members()[0], now);
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].group, "ESAR");
    let statuses: Vec<_> = progress[0].expectations.iter().map(|e| e.status).collect();
    assert_eq!(
        statuses,
        vec![ExpectationStatus::Expiring, ExpectationStatus::Missing]
    );
}
