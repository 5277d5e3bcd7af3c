use agri_portal_screens::{
    experts::{Availability, ConsultationStatus, ConsultationType},
    DataOrigin, ExpertScreen, FallbackWrites, FormKind, Provenance, ScreenOptions, SubmitError,
};
use agri_portal_sdk::{
    api,
    portal_sdk_test::{MockBackend, MockResult},
    Credential, StatusCode,
};
use chrono::{NaiveDate, NaiveTime};
use serde_json::{json, Value};

fn directory_body() -> Value {
    json!({
        "experts": [
            {
                "id": 11,
                "name": "Dr. Anil Kumar",
                "specialization": "Soil Science",
                "experience": "20 years",
                "contact": "anil@agri.com",
                "rating": 4.9,
                "consultation_fee": 900.0,
                "availability": "Available",
                "languages": ["Hindi"]
            },
            {
                "id": "12",
                "name": "Ms. Meera Nair",
                "specialization": "Water Management",
                "experience": "9 years",
                "contact": "meera@agri.com",
                "rating": 4.4,
                "availability": "Offline"
            },
            {
                "id": 13,
                "name": "Mr. Sunil Rao",
                "specialization": "Soil Science",
                "experience": "7 years",
                "contact": "sunil@agri.com",
                "rating": 4.1
            }
        ],
        "total": 3
    })
}

fn options() -> ScreenOptions {
    ScreenOptions::default().with_seed(7)
}

async fn live_screen(backend: &MockBackend) -> ExpertScreen {
    backend.enqueue_get(api::EXPERTS_AVAILABLE_PATH, directory_body());
    ExpertScreen::mount(backend, options()).await
}

#[tokio::test]
async fn directory_fills_missing_fields() {
    let backend = MockBackend::new();
    let screen = live_screen(&backend).await;

    assert_eq!(screen.experts_outcome().origin(), Some(DataOrigin::Live));
    let experts = screen.experts();
    assert_eq!(experts.len(), 3);
    assert_eq!(experts[0].id, "11");
    assert_eq!(experts[1].id, "12");
    assert_eq!(experts[0].consultation_fee, 900.0);
    assert!((500.0..2000.0).contains(&experts[1].consultation_fee));
    assert_eq!(experts[1].availability, Availability::Offline);
    assert_eq!(experts[2].availability, Availability::Available);
    assert!(experts.iter().all(|e| (50..250).contains(&e.reviews)));
    assert_eq!(
        experts[1].description,
        "Expert in water management with extensive field experience and proven track record."
    );
    assert_eq!(screen.consultations().len(), 2);
}

#[tokio::test]
async fn placeholders_are_deterministic_for_a_seed() {
    let first_backend = MockBackend::new();
    let first = live_screen(&first_backend).await;
    let second_backend = MockBackend::new();
    let second = live_screen(&second_backend).await;

    assert_eq!(first.experts(), second.experts());
}

#[tokio::test]
async fn roster_is_used_when_directory_fails() {
    let backend = MockBackend::new();
    backend
        .enqueue_get(
            api::EXPERTS_AVAILABLE_PATH,
            MockResult::status(StatusCode::NOT_FOUND),
        )
        .enqueue_get(
            api::CONNECT_EXPERTS_PATH,
            json!({
                "status": "success",
                "data": {
                    "experts": [
                        {"name": "Dr. Kavita Singh", "specialization": "Organic Farming", "experience": "11 years", "contact": "k@agri.com", "rating": 4.7},
                        {"name": "Mr. Arjun Das", "specialization": "Agronomy", "experience": "6 years", "contact": "a@agri.com", "rating": 4.0}
                    ],
                    "available": 2
                }
            }),
        );

    let screen = ExpertScreen::mount(&backend, options()).await;

    assert!(matches!(
        screen.experts_outcome(),
        agri_portal_screens::LoadOutcome::Live { path, .. } if *path == api::CONNECT_EXPERTS_PATH
    ));
    let experts = screen.experts();
    assert_eq!(experts[0].id, "0");
    assert_eq!(experts[1].id, "1");
    assert_eq!(&experts[0].languages[..2], ["English", "Hindi"]);
    assert_eq!(
        experts[0].achievements,
        vec!["Organic Certified", "Bio-inputs Expert", "Sustainable Methods"]
    );
    assert_eq!(
        experts[1].achievements,
        vec!["Certified Expert", "Field Experience", "Proven Results"]
    );
    assert_eq!(backend.request_count(), 2);
}

#[tokio::test]
async fn unreachable_backend_skips_roster_and_shows_demo_experts() {
    let backend = MockBackend::new();
    backend.enqueue_get(api::EXPERTS_AVAILABLE_PATH, MockResult::unreachable());

    let screen = ExpertScreen::mount(&backend, options()).await;

    assert_eq!(screen.experts_outcome().origin(), Some(DataOrigin::Fallback));
    let names: Vec<_> = screen.experts().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Dr. Rajesh Sharma", "Ms. Priya Patel"]);
    assert_eq!(backend.request_count(), 1);
}

#[tokio::test]
async fn specialization_filter_narrows_and_clears() {
    let backend = MockBackend::new();
    let mut screen = live_screen(&backend).await;

    assert_eq!(
        screen.specializations(),
        vec!["Soil Science", "Water Management"]
    );

    screen.set_specialization("Soil Science");
    let names: Vec<_> = screen
        .filtered_experts()
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["Dr. Anil Kumar", "Mr. Sunil Rao"]);

    screen.set_search("sunil");
    assert_eq!(screen.filtered_experts().len(), 1);

    screen.set_search("");
    screen.clear_specialization();
    assert_eq!(screen.filtered_experts().len(), 3);
}

#[tokio::test]
async fn booking_without_topic_sends_nothing() {
    let backend = MockBackend::new();
    let mut screen = live_screen(&backend).await;
    backend.reset();

    assert!(screen.select_expert("11"));
    let error = screen.book(&backend, None).await.expect_err("topic required");
    assert!(matches!(error, SubmitError::MissingField("topic")));
    assert_eq!(backend.request_count(), 0);
    assert_eq!(screen.consultations().len(), 2);
}

#[tokio::test]
async fn offline_expert_cannot_be_booked() {
    let backend = MockBackend::new();
    let mut screen = live_screen(&backend).await;
    backend.reset();

    assert!(screen.select_expert("12"));
    screen.booking_form.topic = "Drip layout".into();
    let error = screen.book(&backend, None).await.expect_err("offline");
    assert!(matches!(error, SubmitError::ExpertUnavailable(ref name) if name == "Ms. Meera Nair"));
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn successful_booking_is_prepended() {
    let backend = MockBackend::new();
    let mut screen = live_screen(&backend).await;
    backend.enqueue_post(
        api::CONSULTATIONS_PATH,
        json!({ "id": 501, "expert_name": "Dr. Anil Kumar", "status": "scheduled" }),
    );

    assert!(screen.select_expert("11"));
    screen.booking_form.topic = "Soil testing".into();
    screen.booking_form.preferred_date = "2025-03-04".into();
    screen.booking_form.preferred_time = "09:30".into();
    screen.booking_form.consultation_type = ConsultationType::Video;
    let before = screen.consultations().to_vec();

    let credential = Credential::bearer("farmer-token");
    let consultation = screen
        .book(&backend, Some(&credential))
        .await
        .expect("booking accepted")
        .clone();

    assert_eq!(consultation.id, "501");
    assert_eq!(
        consultation.status,
        Provenance::Confirmed(ConsultationStatus::Scheduled)
    );
    assert_eq!(
        consultation.topic,
        Provenance::Provisional("Soil testing".to_string())
    );
    assert_eq!(consultation.kind, Provenance::Provisional(ConsultationType::Video));
    let expected = NaiveDate::from_ymd_opt(2025, 3, 4)
        .expect("valid date")
        .and_time(NaiveTime::from_hms_opt(9, 30, 0).expect("valid time"));
    assert_eq!(*consultation.date.value(), Some(expected));

    assert_eq!(screen.consultations().len(), 3);
    assert_eq!(screen.consultations()[0].id, "501");
    assert_eq!(&screen.consultations()[1..], &before[..]);
    assert!(screen.selected_expert().is_none());

    let requests = backend.tracked_requests();
    let post = requests.last().expect("booking request");
    assert_eq!(post.bearer.as_deref(), Some("farmer-token"));
    let body = post.body.as_ref().expect("booking body");
    assert_eq!(body["expert_name"], "Dr. Anil Kumar");
    assert_eq!(body["consultation_type"], "video");
    assert_eq!(body["preferred_time"], "09:30");
    assert!(body.get("description").is_none());
}

#[tokio::test]
async fn unauthorized_booking_keeps_consultations() {
    let backend = MockBackend::new();
    let mut screen = live_screen(&backend).await;
    backend.enqueue_post(
        api::CONSULTATIONS_PATH,
        MockResult::status(StatusCode::UNAUTHORIZED),
    );

    assert!(screen.select_expert("13"));
    screen.booking_form.topic = "Mulching".into();
    let before = screen.consultations().to_vec();

    let error = screen.book(&backend, None).await.expect_err("401");
    assert_eq!(
        error.user_message(FormKind::Consultation),
        "Please log in to book consultations"
    );
    assert_eq!(screen.consultations(), &before[..]);
    assert!(screen.selected_expert().is_some());
}

#[tokio::test]
async fn demo_experts_accept_bookings_only_when_allowed() {
    let backend = MockBackend::new();
    backend.enqueue_get(api::EXPERTS_AVAILABLE_PATH, MockResult::unreachable());
    let mut screen = ExpertScreen::mount(&backend, options()).await;

    assert!(screen.select_expert("1"));
    screen.booking_form.topic = "Soil pH".into();
    let error = screen.book(&backend, None).await.expect_err("blocked");
    assert!(matches!(error, SubmitError::FallbackSelection));

    backend.enqueue_get(api::EXPERTS_AVAILABLE_PATH, MockResult::unreachable());
    let allow = options().with_fallback_writes(FallbackWrites::Allow);
    let mut screen = ExpertScreen::mount(&backend, allow).await;
    backend.enqueue_post(api::CONSULTATIONS_PATH, json!({ "id": 77 }));

    assert!(screen.select_expert("1"));
    screen.booking_form.topic = "Soil pH".into();
    let consultation = screen.book(&backend, None).await.expect("allowed");
    assert_eq!(
        consultation.status,
        Provenance::Provisional(ConsultationStatus::Pending)
    );
    assert_eq!(*consultation.date.value(), None);
}
