use std::sync::{Arc, Barrier};
use std::thread;

use assert_matches::assert_matches;

use appointment_cell::models::{BookingError, BookingRequest, DepartmentCode, NewAppointment};
use appointment_cell::services::BookingService;
use doctor_cell::services::{AvailabilityService, SlotCalendar};
use shared_database::Database;
use shared_models::{AppError, EventKind, DEPARTMENTS, DOCTOR_ROSTER};
use shared_utils::test_utils::{seeded_database, RecordingEventLog, TestClock};

const KAYA: &str = "Op. Dr. Mert Kaya";

fn booking_service(db: Arc<Database>) -> BookingService {
    let availability = Arc::new(AvailabilityService::new(db.clone(), SlotCalendar::default()));
    BookingService::new(db, availability)
}

fn request(doctor: &str, slot: &str) -> NewAppointment {
    NewAppointment {
        department_code: "ortopedi".to_string(),
        doctor: doctor.to_string(),
        slot: slot.to_string(),
        patient: Some("Deniz".to_string()),
    }
}

#[test]
fn test_successful_booking_returns_appointment() {
    let service = booking_service(seeded_database());
    let now = TestClock::early_morning();

    let appointment = service.book_at(request(KAYA, "2030-03-04 11:00"), now).unwrap();

    assert_eq!(appointment.doctor, KAYA);
    assert_eq!(appointment.slot, "2030-03-04 11:00");
    assert_eq!(appointment.department_code, "ortopedi");
    assert_eq!(appointment.patient.as_deref(), Some("Deniz"));
    assert_eq!(appointment.created_at, "2030-03-04T07:15:00");
    assert_eq!(appointment.id.len(), 8);
}

#[test]
fn test_doctor_must_belong_to_department() {
    let service = booking_service(seeded_database());
    let mut wrong = request("Uzm. Dr. Elif Demir", "2030-03-04 11:00");
    wrong.department_code = "ortopedi".to_string();

    assert_matches!(
        service.book_at(wrong, TestClock::early_morning()),
        Err(BookingError::DoctorNotFound)
    );
    assert_matches!(
        service.book_at(request("Dr. Nobody", "2030-03-04 11:00"), TestClock::early_morning()),
        Err(BookingError::DoctorNotFound)
    );
}

#[test]
fn test_slot_must_be_in_current_grid() {
    let service = booking_service(seeded_database());
    let now = TestClock::mid_afternoon();

    // Elapsed hour of today.
    assert_matches!(
        service.book_at(request(KAYA, "2030-03-04 10:00"), now),
        Err(BookingError::InvalidSlot)
    );
    // Outside opening hours.
    assert_matches!(
        service.book_at(request(KAYA, "2030-03-05 20:00"), now),
        Err(BookingError::InvalidSlot)
    );
    // Beyond the look-ahead window.
    assert_matches!(
        service.book_at(request(KAYA, "2030-03-09 10:00"), now),
        Err(BookingError::InvalidSlot)
    );
}

#[test]
fn test_double_booking_conflicts_and_keeps_original() {
    let service = booking_service(seeded_database());
    let now = TestClock::early_morning();

    let original = service.book_at(request(KAYA, "2030-03-05 09:00"), now).unwrap();

    let mut second = request(KAYA, "2030-03-05 09:00");
    second.patient = Some("Ece".to_string());
    assert_matches!(service.book_at(second, now), Err(BookingError::SlotNoLongerAvailable));

    let stored = service.list_appointments("ortopedi").unwrap();
    assert_eq!(stored, vec![original]);
}

#[test]
fn test_same_slot_with_other_doctor_is_allowed() {
    let service = booking_service(seeded_database());
    let now = TestClock::early_morning();

    service.book_at(request(KAYA, "2030-03-05 09:00"), now).unwrap();
    service
        .book_at(request("Uzm. Dr. Ayşe Yılmaz", "2030-03-05 09:00"), now)
        .unwrap();

    assert_eq!(service.list_appointments("ortopedi").unwrap().len(), 2);
}

#[test]
fn test_booked_slot_disappears_from_availability() {
    let db = seeded_database();
    let availability = Arc::new(AvailabilityService::new(db.clone(), SlotCalendar::default()));
    let service = BookingService::new(db, availability.clone());
    let now = TestClock::early_morning();

    let before = availability.availability_at("ortopedi", now).unwrap();
    let first_free = before[0].slots[0].clone();
    service.book_at(request(&before[0].doctor, &first_free), now).unwrap();

    let after = availability.availability_at("ortopedi", now).unwrap();
    assert!(!after[0].slots.contains(&first_free));
    assert!(after[1].slots.contains(&first_free));
    assert_eq!(after[0].slots.len(), 5);
}

#[test]
fn test_concurrent_bookers_on_separate_connections_get_one_winner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.db");

    let seed = Database::open(&path).unwrap();
    seed.seed_reference_data(DEPARTMENTS, DOCTOR_ROSTER).unwrap();
    drop(seed);

    let bookers = 6;
    let barrier = Arc::new(Barrier::new(bookers));
    let handles: Vec<_> = (0..bookers)
        .map(|i| {
            let path = path.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let service = booking_service(Arc::new(Database::open(&path).unwrap()));
                let mut req = request(KAYA, "2030-03-06 15:00");
                req.patient = Some(format!("hasta-{}", i));
                barrier.wait();
                service.book_at(req, TestClock::early_morning())
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(BookingError::SlotNoLongerAvailable)))
        .count();

    assert_eq!(winners, 1);
    assert_eq!(conflicts, bookers - 1);
}

#[test]
fn test_successful_booking_is_logged() {
    let events = RecordingEventLog::new();
    let service = booking_service(seeded_database()).with_event_log(events.clone());

    let appointment = service
        .book_at(request(KAYA, "2030-03-04 12:00"), TestClock::early_morning())
        .unwrap();
    let _ = service.book_at(request(KAYA, "2030-03-04 12:00"), TestClock::early_morning());

    let booked = events.of_kind(EventKind::Book);
    assert_eq!(booked.len(), 1);
    assert_eq!(booked[0]["id"], appointment.id);
    assert_eq!(booked[0]["dept"], "ortopedi");
}

#[test]
fn test_repeated_id_collisions_fail_as_internal_error() {
    let events = RecordingEventLog::new();
    let service = booking_service(seeded_database())
        .with_event_log(events.clone())
        .with_id_source(|| "apt-fixed".to_string());
    let now = TestClock::early_morning();

    service.book_at(request(KAYA, "2030-03-04 11:00"), now).unwrap();
    let err = service
        .book_at(request(KAYA, "2030-03-04 12:00"), now)
        .unwrap_err();

    assert_matches!(err, BookingError::IdsExhausted(3));
    assert_matches!(AppError::from(err), AppError::Internal(_));
    assert_eq!(events.of_kind(EventKind::Book).len(), 1);
}

#[test]
fn test_request_validation_trims_and_requires_fields() {
    let complete = BookingRequest {
        department: Some(DepartmentCode { code: Some(" ortopedi ".to_string()) }),
        doctor: Some(KAYA.to_string()),
        slot: Some("2030-03-04 12:00".to_string()),
        patient: Some("   ".to_string()),
    };
    let validated = complete.clone().validate().unwrap();
    assert_eq!(validated.department_code, "ortopedi");
    assert_eq!(validated.patient, None);

    let mut missing_slot = complete.clone();
    missing_slot.slot = Some(" ".to_string());
    assert_matches!(missing_slot.validate(), Err(BookingError::MissingFields));

    let mut missing_department = complete;
    missing_department.department = Some(DepartmentCode::default());
    assert_matches!(missing_department.validate(), Err(BookingError::MissingFields));
}
