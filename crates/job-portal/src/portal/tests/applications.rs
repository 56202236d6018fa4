use std::sync::Arc;

use super::common::*;
use crate::portal::applications::{
    ALREADY_APPLIED, ALREADY_SELECTED, APPLICANT_ALREADY_SELECTED, APPLICATION_ALREADY_SELECTED,
    NO_VACANCIES, SELECTED,
};
use crate::portal::domain::{ApplicationId, Job, JobId, JobSeekerId, Organisation};
use crate::portal::error::PortalError;
use crate::portal::memory::InMemoryPortalStore;
use crate::portal::query::{JobOrder, Pagination};
use crate::portal::repository::{
    ApplicationRepository, JobRepository, JobSeekerRepository, RepositoryError,
};
use crate::portal::service::JobPortal;

fn hiring(vacancy: u32) -> (
    JobPortal<InMemoryPortalStore>,
    Arc<InMemoryPortalStore>,
    Organisation,
    Job,
) {
    let (portal, store) = build_portal();
    let acme = register_organisation(&portal, "Acme");
    create_domain(&portal, "Engineering");
    let job = post_job(
        &portal,
        &acme,
        new_job("Backend Dev", "Engineering", 120, vacancy),
        days_ago(1),
    );
    (portal, store, acme, job)
}

fn conflict_message(err: PortalError) -> String {
    match err {
        PortalError::Conflict(message) => message,
        other => panic!("expected a conflict, got {other:?}"),
    }
}

#[test]
fn applying_records_a_pending_application() {
    let (portal, store, _, job) = hiring(2);
    let seeker = register_seeker(&portal, "Asha");

    let application = portal
        .applications
        .apply(&job.id, &seeker.id)
        .expect("applies");

    assert!(!application.selected);
    assert_eq!(application.job_id, job.id);
    assert_eq!(
        store.applications_for_job(&job.id).expect("reads"),
        vec![application]
    );
    assert_eq!(store.fetch_job(&job.id).expect("reads").map(|j| j.vacancy), Some(2));
}

#[test]
fn applying_twice_to_the_same_job_conflicts() {
    let (portal, _, _, job) = hiring(2);
    let seeker = register_seeker(&portal, "Asha");
    portal
        .applications
        .apply(&job.id, &seeker.id)
        .expect("applies");

    let err = portal.applications.apply(&job.id, &seeker.id).unwrap_err();
    assert_eq!(conflict_message(err), ALREADY_APPLIED);
}

#[test]
fn concurrent_duplicate_applications_store_one_record() {
    for _ in 0..50 {
        let (portal, store, _, job) = hiring(2);
        let seeker = register_seeker(&portal, "Asha");

        let outcomes: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| portal.applications.apply(&job.id, &seeker.id)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("thread completes"))
                .collect()
        });

        assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
        for outcome in outcomes.into_iter().filter_map(Result::err) {
            assert_eq!(conflict_message(outcome), ALREADY_APPLIED);
        }
        assert_eq!(store.applications_for_job(&job.id).expect("reads").len(), 1);
    }
}

#[test]
fn applying_to_missing_jobs_or_as_missing_seekers_is_not_found() {
    let (portal, _, _, job) = hiring(1);
    let seeker = register_seeker(&portal, "Asha");

    assert!(matches!(
        portal.applications.apply(&JobId::generate(), &seeker.id),
        Err(PortalError::NotFound(message)) if message == "Job doesn't exist"
    ));
    assert!(matches!(
        portal
            .applications
            .apply(&job.id, &JobSeekerId::generate()),
        Err(PortalError::NotFound(message)) if message == "user doesn't exists"
    ));
}

#[test]
fn filled_jobs_reject_applications() {
    let (portal, _, _, job) = hiring(0);
    let seeker = register_seeker(&portal, "Asha");

    let err = portal.applications.apply(&job.id, &seeker.id).unwrap_err();
    assert_eq!(conflict_message(err), NO_VACANCIES);
}

#[test]
fn selected_seekers_are_told_so_even_for_filled_jobs() {
    let (portal, _, acme, job) = hiring(1);
    let filled = post_job(
        &portal,
        &acme,
        new_job("Data Engineer", "Engineering", 110, 0),
        days_ago(1),
    );
    let seeker = register_seeker(&portal, "Asha");
    let application = portal
        .applications
        .apply(&job.id, &seeker.id)
        .expect("applies");
    portal
        .applications
        .select(&acme.id, &application.id)
        .expect("selects");

    let err = portal.applications.apply(&filled.id, &seeker.id).unwrap_err();
    assert_eq!(conflict_message(err), ALREADY_SELECTED);
    let err = portal.applications.apply(&job.id, &seeker.id).unwrap_err();
    assert_eq!(conflict_message(err), ALREADY_SELECTED);
}

#[test]
fn selection_updates_seeker_job_and_application_together() {
    let (portal, store, acme, job) = hiring(2);
    let seeker = register_seeker(&portal, "Asha");
    let application = portal
        .applications
        .apply(&job.id, &seeker.id)
        .expect("applies");

    let receipt = portal
        .applications
        .select(&acme.id, &application.id)
        .expect("selects");

    assert_eq!(receipt.message, SELECTED);
    assert_eq!(receipt.remaining_vacancy, 1);
    assert!(receipt.application.selected);
    assert_eq!(
        store
            .fetch_seeker(&seeker.id)
            .expect("reads")
            .and_then(|s| s.job_selected),
        Some(job.id)
    );
    assert_eq!(store.fetch_job(&job.id).expect("reads").map(|j| j.vacancy), Some(1));
    assert!(store
        .fetch_application(&application.id)
        .expect("reads")
        .is_some_and(|a| a.selected));
}

#[test]
fn selected_seekers_cannot_apply_or_be_selected_again() {
    let (portal, _, acme, job) = hiring(3);
    let other = post_job(
        &portal,
        &acme,
        new_job("Frontend Dev", "Engineering", 100, 3),
        days_ago(1),
    );
    let seeker = register_seeker(&portal, "Asha");
    let first = portal
        .applications
        .apply(&job.id, &seeker.id)
        .expect("applies");
    let second = portal
        .applications
        .apply(&other.id, &seeker.id)
        .expect("applies");
    portal
        .applications
        .select(&acme.id, &first.id)
        .expect("selects");

    let err = portal.applications.apply(&other.id, &seeker.id).unwrap_err();
    assert_eq!(conflict_message(err), ALREADY_SELECTED);

    let err = portal
        .applications
        .select(&acme.id, &second.id)
        .unwrap_err();
    assert_eq!(conflict_message(err), APPLICANT_ALREADY_SELECTED);

    let err = portal.applications.select(&acme.id, &first.id).unwrap_err();
    assert_eq!(conflict_message(err), APPLICATION_ALREADY_SELECTED);
}

#[test]
fn the_last_seat_goes_to_the_first_selection() {
    let (portal, store, acme, job) = hiring(1);
    let asha = register_seeker(&portal, "Asha");
    let ravi = register_seeker(&portal, "Ravi");
    let asha_application = portal
        .applications
        .apply(&job.id, &asha.id)
        .expect("applies");
    let ravi_application = portal
        .applications
        .apply(&job.id, &ravi.id)
        .expect("both may apply while a seat is open");

    let receipt = portal
        .applications
        .select(&acme.id, &asha_application.id)
        .expect("selects");
    assert_eq!(receipt.remaining_vacancy, 0);

    let err = portal
        .applications
        .select(&acme.id, &ravi_application.id)
        .unwrap_err();
    assert_eq!(conflict_message(err), NO_VACANCIES);

    let ravi = store.fetch_seeker(&ravi.id).expect("reads").expect("exists");
    assert!(ravi.job_selected.is_none(), "failed selection leaves the seeker free");
    assert!(!store
        .fetch_application(&ravi_application.id)
        .expect("reads")
        .is_some_and(|a| a.selected));

    let open = portal
        .jobs
        .list_for_seekers(Pagination::default(), JobOrder::default())
        .expect("lists");
    assert!(open.iter().all(|listed| listed.id != job.id));
}

#[test]
fn selection_is_limited_to_the_owning_organisation() {
    let (portal, store, _, job) = hiring(1);
    let globex = register_organisation(&portal, "Globex");
    let seeker = register_seeker(&portal, "Asha");
    let application = portal
        .applications
        .apply(&job.id, &seeker.id)
        .expect("applies");

    assert!(matches!(
        portal.applications.select(&globex.id, &application.id),
        Err(PortalError::Unauthorized(_))
    ));
    assert_eq!(store.fetch_job(&job.id).expect("reads").map(|j| j.vacancy), Some(1));
}

#[test]
fn selecting_an_unknown_application_is_not_found() {
    let (portal, _, acme, _) = hiring(1);

    assert!(matches!(
        portal.applications.select(&acme.id, &ApplicationId::generate()),
        Err(PortalError::NotFound(message)) if message == "Job application doesn't exist"
    ));
}

#[test]
fn a_failed_final_write_rolls_back_the_earlier_steps() {
    let store = Arc::new(FailingMarkStore::default());
    let portal = portal_with(store.clone());
    let acme = register_organisation(&portal, "Acme");
    create_domain(&portal, "Engineering");
    let job = post_job(
        &portal,
        &acme,
        new_job("Backend Dev", "Engineering", 120, 1),
        days_ago(1),
    );
    let seeker = register_seeker(&portal, "Asha");
    let application = portal
        .applications
        .apply(&job.id, &seeker.id)
        .expect("applies");

    let err = portal
        .applications
        .select(&acme.id, &application.id)
        .unwrap_err();
    assert!(matches!(err, PortalError::Repository(_)));

    assert_eq!(
        store.inner.fetch_job(&job.id).expect("reads").map(|j| j.vacancy),
        Some(1)
    );
    assert!(store
        .inner
        .fetch_seeker(&seeker.id)
        .expect("reads")
        .is_some_and(|s| s.job_selected.is_none()));
}

#[test]
fn a_failed_compensation_keeps_the_original_error() {
    let store = Arc::new(FailingMarkStore {
        fail_restore: true,
        ..FailingMarkStore::default()
    });
    let portal = portal_with(store.clone());
    let acme = register_organisation(&portal, "Acme");
    create_domain(&portal, "Engineering");
    let job = post_job(
        &portal,
        &acme,
        new_job("Backend Dev", "Engineering", 120, 1),
        days_ago(1),
    );
    let seeker = register_seeker(&portal, "Asha");
    let application = portal
        .applications
        .apply(&job.id, &seeker.id)
        .expect("applies");

    let err = portal
        .applications
        .select(&acme.id, &application.id)
        .unwrap_err();
    assert!(matches!(
        err,
        PortalError::Repository(RepositoryError::Unavailable(ref message))
            if message == "write rejected"
    ));
    let stored = store
        .inner
        .fetch_seeker(&seeker.id)
        .expect("reads")
        .expect("exists");
    assert!(stored.job_selected.is_none(), "later compensations still run");
}

#[test]
fn concurrent_selections_fill_the_last_seat_once() {
    for _ in 0..50 {
        let (portal, store, acme, job) = hiring(1);
        let applications: Vec<_> = (0..8)
            .map(|n| {
                let seeker = register_seeker(&portal, &format!("Seeker {n}"));
                portal
                    .applications
                    .apply(&job.id, &seeker.id)
                    .expect("applies")
            })
            .collect();

        let outcomes: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = applications
                .iter()
                .map(|application| {
                    let portal = &portal;
                    let acme = &acme;
                    scope.spawn(move || portal.applications.select(&acme.id, &application.id))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("thread completes"))
                .collect()
        });

        let winners = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
        assert_eq!(winners, 1);
        for outcome in outcomes.into_iter().filter_map(Result::err) {
            assert_eq!(conflict_message(outcome), NO_VACANCIES);
        }
        assert_eq!(store.fetch_job(&job.id).expect("reads").map(|j| j.vacancy), Some(0));
        let selected = store
            .applications_for_job(&job.id)
            .expect("reads")
            .into_iter()
            .filter(|application| application.selected)
            .count();
        assert_eq!(selected, 1);
    }
}

#[test]
fn concurrent_selections_of_one_seeker_pick_a_single_job() {
    for _ in 0..50 {
        let (portal, store, acme, job) = hiring(2);
        let other = post_job(
            &portal,
            &acme,
            new_job("Frontend Dev", "Engineering", 100, 2),
            days_ago(1),
        );
        let seeker = register_seeker(&portal, "Asha");
        let first = portal
            .applications
            .apply(&job.id, &seeker.id)
            .expect("applies");
        let second = portal
            .applications
            .apply(&other.id, &seeker.id)
            .expect("applies");

        let (left, right) = std::thread::scope(|scope| {
            let left = scope.spawn(|| portal.applications.select(&acme.id, &first.id));
            let right = scope.spawn(|| portal.applications.select(&acme.id, &second.id));
            (
                left.join().expect("thread completes"),
                right.join().expect("thread completes"),
            )
        });

        assert_eq!(
            usize::from(left.is_ok()) + usize::from(right.is_ok()),
            1,
            "exactly one selection lands"
        );
        let loser = left.err().or(right.err()).expect("one selection fails");
        assert_eq!(conflict_message(loser), APPLICANT_ALREADY_SELECTED);

        let stored = store.fetch_seeker(&seeker.id).expect("reads").expect("exists");
        let chosen = stored.job_selected.expect("seeker is selected");
        let vacancies: u32 = [job.id, other.id]
            .iter()
            .filter_map(|id| store.fetch_job(id).expect("reads"))
            .map(|j| j.vacancy)
            .sum();
        assert_eq!(vacancies, 3, "only one seat is taken");
        assert!(chosen == job.id || chosen == other.id);
    }
}

#[test]
fn selected_applicants_are_grouped_by_job() {
    let (portal, _, acme, job) = hiring(2);
    let asha = register_seeker(&portal, "Asha");
    let ravi = register_seeker(&portal, "Ravi");
    let chosen = portal
        .applications
        .apply(&job.id, &asha.id)
        .expect("applies");
    portal
        .applications
        .apply(&job.id, &ravi.id)
        .expect("applies");
    portal
        .applications
        .select(&acme.id, &chosen.id)
        .expect("selects");

    let selected = portal
        .applications
        .selected_for_organisation(&acme.id)
        .expect("lists");
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].applications.len(), 1);
    assert_eq!(selected[0].applications[0].application.id, chosen.id);

    let pending = portal
        .jobs
        .list_for_organisation(Pagination::default(), JobOrder::default(), &acme.id)
        .expect("lists");
    assert_eq!(pending[0].applications.len(), 1, "only Ravi is still pending");
    assert_eq!(
        pending[0].applications[0].application.job_seeker_id,
        ravi.id
    );
}
