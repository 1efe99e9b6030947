//! Diesel adapters against embedded PostgreSQL.
//!
//! Covers the behaviour the in-memory store only approximates: transactional
//! enrolment and deletion, the partial pending-due index query, and row
//! validation on the guardian mirror. Set `SKIP_TEST_CLUSTER=1` where the
//! cluster cannot start.

use chrono::{NaiveDate, TimeZone, Utc};
use immunisation::domain::ports::{
    ChildRepository, DoseRecordRepository, GuardianDirectory, NotificationLogRepository,
};
use immunisation::domain::{
    Child, ChildId, ChildRecord, DoseRecord, DoseRecordId, DoseStatus, Gender, GuardianId,
    GuardianKind, NotificationLogEntry,
};
use immunisation::outbound::persistence::{
    DbPool, DieselChildRepository, DieselDoseRecordRepository, DieselGuardianDirectory,
    DieselNotificationLogRepository, PoolConfig,
};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use postgres::{Client, NoTls};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use uuid::Uuid;

mod support;

use support::{format_postgres_error, handle_cluster_setup_failure, provision_migrated_database};

struct TestContext {
    runtime: Runtime,
    children: DieselChildRepository,
    doses: DieselDoseRecordRepository,
    guardians: DieselGuardianDirectory,
    log: DieselNotificationLogRepository,
    database_url: String,
    _database: TemporaryDatabase,
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let database = provision_migrated_database(&runtime)?;
    let database_url = database.url().to_owned();
    let pool = runtime
        .block_on(DbPool::new(
            PoolConfig::new(database_url.as_str()).with_max_size(2),
        ))
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        children: DieselChildRepository::new(pool.clone()),
        doses: DieselDoseRecordRepository::new(pool.clone()),
        guardians: DieselGuardianDirectory::new(pool.clone()),
        log: DieselNotificationLogRepository::new(pool),
        database_url,
        _database: database,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn child(name: &str) -> Child {
    Child::restore(ChildRecord {
        id: ChildId::random(),
        guardian_id: GuardianId::random(),
        name: name.to_owned(),
        date_of_birth: date(2024, 1, 1),
        gender: Gender::Female,
        blood_group: Default::default(),
        medical_history: String::new(),
    })
    .expect("valid child")
}

fn dose(child: &Child, vaccine: &str, due: NaiveDate) -> DoseRecord {
    DoseRecord::scheduled(DoseRecordId::random(), child.id(), vaccine, "", due)
}

fn seed_guardian(url: &str, id: Uuid, email: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .execute(
            "INSERT INTO guardians (id, display_name, email, kind) VALUES ($1, $2, $3, $4)",
            &[&id, &"Asha", &email, &"parent"],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(())
}

#[rstest]
fn failed_enrolment_leaves_no_child_and_no_partial_schedule(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: failed_enrolment_leaves_no_child_and_no_partial_schedule skipped");
        return;
    };

    context.runtime.block_on(async {
        let first = child("Asha");
        let taken = dose(&first, "BCG", date(2024, 1, 1));
        context
            .children
            .create_with_schedule(&first, std::slice::from_ref(&taken))
            .await
            .expect("first enrolment");

        let second = child("Meera");
        let fresh = dose(&second, "BCG", date(2024, 1, 1));
        let clash =
            DoseRecord::scheduled(taken.id(), second.id(), "OPV 0", "", date(2024, 1, 1));
        let err = context
            .children
            .create_with_schedule(&second, &[fresh.clone(), clash])
            .await
            .expect_err("duplicate dose id");

        assert_eq!(err.kind(), "query");
        assert!(ChildRepository::find_by_id(&context.children, &second.id())
            .await
            .expect("child lookup")
            .is_none());
        assert!(DoseRecordRepository::find_by_id(&context.doses, &fresh.id())
            .await
            .expect("dose lookup")
            .is_none());
        let kept = DoseRecordRepository::list_for_child(&context.doses, &first.id())
            .await
            .expect("schedule");
        assert_eq!(kept, vec![taken]);
    });
}

#[rstest]
fn delete_removes_schedule_but_keeps_the_log(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: delete_removes_schedule_but_keeps_the_log skipped");
        return;
    };

    context.runtime.block_on(async {
        let child = child("Asha");
        let bcg = dose(&child, "BCG", date(2024, 1, 1));
        context
            .children
            .create_with_schedule(&child, std::slice::from_ref(&bcg))
            .await
            .expect("enrolment");
        let sent_at = Utc
            .with_ymd_and_hms(2023, 12, 31, 9, 0, 0)
            .single()
            .expect("valid time");
        context
            .log
            .append(&NotificationLogEntry::sent(child.id(), bcg.id(), "due tomorrow", sent_at))
            .await
            .expect("append");

        assert!(context
            .children
            .delete_with_schedule(&child.id())
            .await
            .expect("delete"));
        assert!(!context
            .children
            .delete_with_schedule(&child.id())
            .await
            .expect("second delete"));

        assert!(DoseRecordRepository::find_by_id(&context.doses, &bcg.id())
            .await
            .expect("dose lookup")
            .is_none());
        let history = NotificationLogRepository::list_for_child(&context.log, &child.id())
            .await
            .expect("history");
        assert_eq!(history.len(), 1);
    });
}

#[rstest]
fn pending_snapshot_excludes_completed_doses(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: pending_snapshot_excludes_completed_doses skipped");
        return;
    };

    context.runtime.block_on(async {
        let child = child("Asha");
        let due = date(2024, 2, 12);
        let opv = dose(&child, "OPV 1", due);
        let mut rota = dose(&child, "Rota 1", due);
        let later = dose(&child, "OPV 2", date(2024, 3, 11));
        context
            .children
            .create_with_schedule(&child, &[opv.clone(), rota.clone(), later])
            .await
            .expect("enrolment");

        rota.set_status(DoseStatus::Completed, date(2024, 2, 10));
        assert!(context.doses.save_status(&rota).await.expect("save"));

        let pending = context
            .doses
            .list_pending_due_on(due)
            .await
            .expect("snapshot");
        assert_eq!(pending, vec![opv]);

        let stored = DoseRecordRepository::find_by_id(&context.doses, &rota.id())
            .await
            .expect("lookup");
        assert_eq!(stored, Some(rota));
    });
}

#[rstest]
fn guardian_mirror_rows_are_validated(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: guardian_mirror_rows_are_validated skipped");
        return;
    };

    let valid = Uuid::new_v4();
    let corrupt = Uuid::new_v4();
    seed_guardian(&context.database_url, valid, "asha@example.org").expect("seed valid");
    seed_guardian(&context.database_url, corrupt, "not-an-address").expect("seed corrupt");

    context.runtime.block_on(async {
        let guardian = context
            .guardians
            .find_by_id(&GuardianId::from_uuid(valid))
            .await
            .expect("lookup")
            .expect("guardian present");
        assert_eq!(guardian.email().as_str(), "asha@example.org");
        assert_eq!(guardian.kind(), GuardianKind::Parent);

        assert!(context
            .guardians
            .find_by_id(&GuardianId::random())
            .await
            .expect("lookup")
            .is_none());

        let err = context
            .guardians
            .find_by_id(&GuardianId::from_uuid(corrupt))
            .await
            .expect_err("corrupt row");
        assert_eq!(err.kind(), "query");
    });
}
