//! Expert directory and consultation booking.

use crate::{
    filter::{filter_records, FilterCriteria, Filterable},
    forms,
    loader::{Endpoint, LoadOutcome, Loader},
    Provenance, ScreenOptions, SubmitError,
};
use agri_portal_sdk::{
    api, ConsultationCreate, Credential, ExpertDirectory, ExpertRoster, PortalBackend,
    PortalResult,
};
use chrono::{Duration, NaiveDateTime, Utc};
use futures::future::BoxFuture;
use rand::{rngs::StdRng, Rng};
use tracing::{error, info};

const DEFAULT_AVATAR: &str = "👨‍🌾";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Busy,
    Offline,
}

impl Availability {
    const ALL: [Self; 3] = [Self::Available, Self::Busy, Self::Offline];

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "available" => Some(Self::Available),
            "busy" => Some(Self::Busy),
            "offline" => Some(Self::Offline),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expert {
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub experience: String,
    pub contact: String,
    pub rating: f64,
    pub reviews: u32,
    pub availability: Availability,
    pub languages: Vec<String>,
    pub consultation_fee: f64,
    pub avatar: String,
    pub description: String,
    pub achievements: Vec<String>,
}

impl Filterable for Expert {
    fn category(&self) -> &str {
        &self.specialization
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.specialization.as_str()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsultationStatus {
    Pending,
    Scheduled,
    Completed,
    Cancelled,
}

impl ConsultationStatus {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "scheduled" => Some(Self::Scheduled),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsultationType {
    #[default]
    Call,
    Video,
    Chat,
}

impl ConsultationType {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "call" => Some(Self::Call),
            "video" => Some(Self::Video),
            "chat" => Some(Self::Chat),
            _ => None,
        }
    }

    /// Wire form expected by the backend.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Video => "video",
            Self::Chat => "chat",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Consultation {
    pub id: String,
    pub expert_name: Provenance<String>,
    pub topic: Provenance<String>,
    pub status: Provenance<ConsultationStatus>,
    /// `None` when the preferred date and time did not form a valid
    /// date-time.
    pub date: Provenance<Option<NaiveDateTime>>,
    pub kind: Provenance<ConsultationType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub topic: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub preferred_date: String,
    /// `HH:MM`
    pub preferred_time: String,
    pub consultation_type: ConsultationType,
}

pub fn experts_loader() -> Loader<Expert> {
    Loader::new(Endpoint::new(api::EXPERTS_AVAILABLE_PATH, fetch_expert_directory))
        .with_secondary(Endpoint::new(api::CONNECT_EXPERTS_PATH, fetch_expert_roster))
        .with_fallback(demo_experts)
}

fn fetch_expert_directory<'a>(
    backend: &'a dyn PortalBackend,
    rng: &'a mut StdRng,
) -> BoxFuture<'a, PortalResult<Vec<Expert>>> {
    Box::pin(async move {
        let directory = api::available_experts(backend).await?;
        Ok(map_expert_directory(directory, rng))
    })
}

fn fetch_expert_roster<'a>(
    backend: &'a dyn PortalBackend,
    rng: &'a mut StdRng,
) -> BoxFuture<'a, PortalResult<Vec<Expert>>> {
    Box::pin(async move {
        let roster = api::connect_experts(backend).await?;
        Ok(map_expert_roster(roster, rng))
    })
}

fn map_expert_directory(directory: ExpertDirectory, rng: &mut StdRng) -> Vec<Expert> {
    directory
        .experts
        .into_iter()
        .map(|expert| Expert {
            id: expert.id.to_string(),
            reviews: rng.gen_range(50..250),
            availability: expert
                .availability
                .as_deref()
                .map_or(Availability::Available, |value| {
                    Availability::parse(value).unwrap_or(Availability::Offline)
                }),
            consultation_fee: expert
                .consultation_fee
                .unwrap_or_else(|| f64::from(rng.gen_range(500_u32..2000))),
            avatar: DEFAULT_AVATAR.to_string(),
            description: expert
                .description
                .unwrap_or_else(|| generated_description(&expert.specialization)),
            achievements: if expert.achievements.is_empty() {
                achievements_for(&expert.specialization)
            } else {
                expert.achievements
            },
            name: expert.name,
            specialization: expert.specialization,
            experience: expert.experience,
            contact: expert.contact,
            rating: expert.rating,
            languages: expert.languages,
        })
        .collect()
}

fn map_expert_roster(roster: ExpertRoster, rng: &mut StdRng) -> Vec<Expert> {
    roster
        .experts
        .into_iter()
        .enumerate()
        .map(|(index, expert)| {
            let mut languages = vec!["English".to_string(), "Hindi".to_string()];
            if rng.gen_bool(0.5) {
                languages.push("Regional".to_string());
            }
            Expert {
                id: index.to_string(),
                reviews: rng.gen_range(50..250),
                availability: Availability::ALL[rng.gen_range(0..Availability::ALL.len())],
                languages,
                consultation_fee: f64::from(rng.gen_range(500_u32..2000)),
                avatar: DEFAULT_AVATAR.to_string(),
                description: generated_description(&expert.specialization),
                achievements: achievements_for(&expert.specialization),
                name: expert.name,
                specialization: expert.specialization,
                experience: expert.experience,
                contact: expert.contact,
                rating: expert.rating,
            }
        })
        .collect()
}

fn generated_description(specialization: &str) -> String {
    format!(
        "Expert in {} with extensive field experience and proven track record.",
        specialization.to_lowercase()
    )
}

fn achievements_for(specialization: &str) -> Vec<String> {
    let achievements: &[&str] = match specialization {
        "Soil Science" => &["PhD in Soil Science", "100+ Soil Reports", "Research Publications"],
        "Crop Protection" => &["IPM Certified", "Pesticide Expert", "Disease Diagnostics"],
        "Water Management" => &["Irrigation Engineer", "Water Conservation", "Drip Systems"],
        "Organic Farming" => &["Organic Certified", "Bio-inputs Expert", "Sustainable Methods"],
        _ => &["Certified Expert", "Field Experience", "Proven Results"],
    };
    achievements.iter().map(|a| (*a).to_string()).collect()
}

#[must_use]
pub fn demo_experts() -> Vec<Expert> {
    vec![
        Expert {
            id: "1".into(),
            name: "Dr. Rajesh Sharma".into(),
            specialization: "Soil Science".into(),
            experience: "15 years".into(),
            contact: "expert1@agri.com".into(),
            rating: 4.8,
            reviews: 156,
            availability: Availability::Available,
            languages: vec!["English".into(), "Hindi".into()],
            consultation_fee: 800.0,
            avatar: DEFAULT_AVATAR.into(),
            description: "Leading soil scientist with expertise in soil health assessment and fertility management.".into(),
            achievements: achievements_for("Soil Science"),
        },
        Expert {
            id: "2".into(),
            name: "Ms. Priya Patel".into(),
            specialization: "Crop Protection".into(),
            experience: "12 years".into(),
            contact: "expert2@agri.com".into(),
            rating: 4.6,
            reviews: 142,
            availability: Availability::Available,
            languages: vec!["English".into(), "Hindi".into(), "Gujarati".into()],
            consultation_fee: 650.0,
            avatar: "👩‍🌾".into(),
            description: "Expert in integrated pest management and sustainable crop protection strategies.".into(),
            achievements: achievements_for("Crop Protection"),
        },
    ]
}

#[must_use]
pub fn demo_consultations() -> Vec<Consultation> {
    let now = Utc::now().naive_utc();
    vec![
        Consultation {
            id: "1".into(),
            expert_name: Provenance::Confirmed("Dr. Rajesh Sharma".into()),
            topic: Provenance::Confirmed("Soil pH Management".into()),
            status: Provenance::Confirmed(ConsultationStatus::Completed),
            date: Provenance::Confirmed(Some(now - Duration::hours(24))),
            kind: Provenance::Confirmed(ConsultationType::Video),
        },
        Consultation {
            id: "2".into(),
            expert_name: Provenance::Confirmed("Ms. Priya Patel".into()),
            topic: Provenance::Confirmed("Pest Control Strategy".into()),
            status: Provenance::Confirmed(ConsultationStatus::Scheduled),
            date: Provenance::Confirmed(Some(now + Duration::hours(48))),
            kind: Provenance::Confirmed(ConsultationType::Call),
        },
    ]
}

fn preferred_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    let text = format!("{date}T{time}");
    NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// State of the expert connect screen for one mount.
pub struct ExpertScreen {
    experts: LoadOutcome<Expert>,
    consultations: Vec<Consultation>,
    selected_expert: Option<Expert>,
    pub booking_form: BookingForm,
    criteria: FilterCriteria,
    options: ScreenOptions,
}

impl ExpertScreen {
    /// Load the expert directory and seed the user's consultations.
    pub async fn mount(backend: &dyn PortalBackend, options: ScreenOptions) -> Self {
        let mut rng = options.rng();
        let experts = experts_loader().load(backend, &mut rng).await;

        Self {
            experts,
            consultations: demo_consultations(),
            selected_expert: None,
            booking_form: BookingForm::default(),
            criteria: FilterCriteria::default(),
            options,
        }
    }

    pub fn experts(&self) -> &[Expert] {
        self.experts.records()
    }

    pub fn experts_outcome(&self) -> &LoadOutcome<Expert> {
        &self.experts
    }

    pub fn consultations(&self) -> &[Consultation] {
        &self.consultations
    }

    /// Distinct specializations in directory order.
    pub fn specializations(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for expert in self.experts() {
            if !seen.contains(&expert.specialization.as_str()) {
                seen.push(&expert.specialization);
            }
        }
        seen
    }

    pub fn set_specialization(&mut self, specialization: impl Into<String>) {
        self.criteria.category = specialization.into();
    }

    pub fn clear_specialization(&mut self) {
        self.criteria.category.clear();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.criteria.search = search.into();
    }

    pub fn filtered_experts(&self) -> Vec<&Expert> {
        filter_records(self.experts(), &self.criteria)
    }

    pub fn selected_expert(&self) -> Option<&Expert> {
        self.selected_expert.as_ref()
    }

    /// Open the booking form for the expert with `expert_id`.
    /// Returns `false` when no such expert is displayed.
    pub fn select_expert(&mut self, expert_id: &str) -> bool {
        let Some(expert) = self
            .experts()
            .iter()
            .find(|expert| expert.id == expert_id)
            .cloned()
        else {
            return false;
        };
        self.selected_expert = Some(expert);
        self.booking_form = BookingForm::default();
        true
    }

    pub fn cancel_booking(&mut self) {
        self.selected_expert = None;
        self.booking_form = BookingForm::default();
    }

    /// Book a consultation with the selected expert.
    ///
    /// On success the new consultation is at index 0 of
    /// [`Self::consultations`].
    pub async fn book(
        &mut self,
        backend: &dyn PortalBackend,
        credential: Option<&Credential>,
    ) -> Result<&Consultation, SubmitError> {
        let expert = self
            .selected_expert
            .clone()
            .ok_or(SubmitError::NoSelection)?;
        forms::require("topic", &self.booking_form.topic)?;
        if expert.availability == Availability::Offline {
            return Err(SubmitError::ExpertUnavailable(expert.name));
        }
        if self.experts.is_fallback() && self.options.blocks_fallback_writes() {
            return Err(SubmitError::FallbackSelection);
        }

        let form = &self.booking_form;
        let payload = ConsultationCreate {
            expert_name: expert.name.clone(),
            topic: form.topic.clone(),
            consultation_type: Some(form.consultation_type.as_str().to_string()),
            preferred_date: non_empty(&form.preferred_date),
            preferred_time: non_empty(&form.preferred_time),
            description: non_empty(&form.description),
        };
        let date = preferred_date_time(&form.preferred_date, &form.preferred_time);
        let kind = form.consultation_type;

        let record = api::book_consultation(backend, &payload, credential)
            .await
            .map_err(|err| {
                error!(error = %err, expert = %expert.name, "consultation booking failed");
                SubmitError::from(err)
            })?;

        let consultation = Consultation {
            id: record.id.to_string(),
            expert_name: Provenance::confirmed_or(record.expert_name, payload.expert_name),
            topic: Provenance::confirmed_or(record.topic, payload.topic),
            status: Provenance::confirmed_or(
                record.status.as_deref().and_then(ConsultationStatus::parse),
                ConsultationStatus::Pending,
            ),
            date: Provenance::Provisional(date),
            kind: Provenance::confirmed_or(
                record
                    .consultation_type
                    .as_deref()
                    .and_then(ConsultationType::parse),
                kind,
            ),
        };
        info!(consultation_id = %consultation.id, "consultation booked");

        self.consultations.insert(0, consultation);
        self.cancel_booking();
        Ok(&self.consultations[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn preferred_date_time_accepts_minutes_and_seconds() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 4)
            .expect("valid date")
            .and_time(NaiveTime::from_hms_opt(9, 30, 0).expect("valid time"));
        assert_eq!(preferred_date_time("2025-03-04", "09:30"), Some(expected));
        assert_eq!(preferred_date_time("2025-03-04", "09:30:00"), Some(expected));
        assert_eq!(preferred_date_time("", ""), None);
    }

    #[test]
    fn unknown_specialization_gets_generic_achievements() {
        assert_eq!(
            achievements_for("Horticulture"),
            vec!["Certified Expert", "Field Experience", "Proven Results"]
        );
    }

    #[test]
    fn consultation_kinds_parse_case_insensitively() {
        assert_eq!(ConsultationType::parse("Video"), Some(ConsultationType::Video));
        assert_eq!(ConsultationType::parse("call"), Some(ConsultationType::Call));
        assert_eq!(ConsultationStatus::parse("SCHEDULED"), Some(ConsultationStatus::Scheduled));
        assert_eq!(ConsultationStatus::parse("lost"), None);
    }
}
