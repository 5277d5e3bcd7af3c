//! Crop insurance marketplace: plan catalog, the user's policies and
//! claims, and the application and claim forms.

use crate::{
    filter::{filter_records, FilterCriteria, Filterable},
    forms,
    loader::{Endpoint, LoadOutcome, Loader},
    Provenance, ScreenOptions, SubmitError,
};
use agri_portal_sdk::{
    api, Credential, InsuranceCatalog, PolicyCreate, PortalBackend, PortalResult,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use futures::future::BoxFuture;
use rand::{rngs::StdRng, Rng};
use tracing::{error, info};

const POLICY_TERM_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq)]
pub struct InsurancePlan {
    pub id: String,
    pub provider: String,
    pub name: String,
    pub coverage: Vec<String>,
    /// Display text, e.g. "₹500/acre/year".
    pub premium: String,
    pub claim_ratio: String,
    pub max_coverage: u32,
    pub subsidy_available: bool,
    pub features: Vec<String>,
    pub exclusions: Vec<String>,
    pub popular: bool,
}

impl Filterable for InsurancePlan {
    fn category(&self) -> &str {
        &self.provider
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.provider.as_str()];
        fields.extend(self.coverage.iter().map(String::as_str));
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyStatus {
    Active,
    Expired,
    Claimed,
    Pending,
}

impl PolicyStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Claimed => "claimed",
            Self::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    pub id: String,
    pub policy_number: Provenance<String>,
    pub provider: Provenance<String>,
    pub crop: Provenance<String>,
    /// Acres. `NaN` when the entered area was not numeric.
    pub area: Provenance<f64>,
    pub coverage: Provenance<f64>,
    pub premium: Provenance<f64>,
    pub status: Provenance<PolicyStatus>,
    pub start_date: Provenance<NaiveDate>,
    pub end_date: Provenance<NaiveDate>,
    pub claim_amount: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimStatus {
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    Paid,
}

impl ClaimStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    pub id: Provenance<String>,
    pub policy_number: String,
    pub claim_type: Provenance<String>,
    pub damage_type: String,
    pub reported_date: Provenance<DateTime<Utc>>,
    pub status: Provenance<ClaimStatus>,
    pub claim_amount: Provenance<f64>,
    pub assessment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationForm {
    pub crop: String,
    /// Acres, as typed.
    pub area: String,
    pub location: String,
    pub soil_type: String,
    pub sowing_date: String,
    pub expected_harvest: String,
    pub bank_account: String,
    pub aadhaar: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimForm {
    pub policy_number: String,
    pub damage_type: String,
    pub damage_description: String,
    /// Rupees, as typed.
    pub estimated_loss: String,
    pub incident_date: String,
}

pub fn insurance_plans_loader() -> Loader<InsurancePlan> {
    Loader::new(Endpoint::new(api::INSURANCE_CATALOG_PATH, fetch_insurance_catalog))
        .with_fallback(demo_plans)
}

fn fetch_insurance_catalog<'a>(
    backend: &'a dyn PortalBackend,
    rng: &'a mut StdRng,
) -> BoxFuture<'a, PortalResult<Vec<InsurancePlan>>> {
    Box::pin(async move {
        let catalog = api::insurance_catalog(backend).await?;
        Ok(map_insurance_catalog(catalog, rng))
    })
}

fn map_insurance_catalog(catalog: InsuranceCatalog, rng: &mut StdRng) -> Vec<InsurancePlan> {
    catalog
        .insurance_plans
        .into_iter()
        .enumerate()
        .map(|(index, plan)| InsurancePlan {
            id: index.to_string(),
            name: format!("{} Crop Shield", plan.provider),
            coverage: plan.coverage.split(", ").map(str::to_string).collect(),
            features: features_for(&plan.coverage),
            provider: plan.provider,
            premium: plan.premium,
            claim_ratio: plan.claim_ratio,
            max_coverage: rng.gen_range(100_000..600_000),
            subsidy_available: true,
            exclusions: strings(&["War damage", "Nuclear risks", "Intentional damage"]),
            popular: index == 1,
        })
        .collect()
}

fn features_for(coverage: &str) -> Vec<String> {
    let mut features = strings(&["24/7 Claim Support", "Quick Settlement", "Digital Documentation"]);
    if coverage.contains("Weather") {
        features.push("Weather-based Claims".to_string());
    }
    if coverage.contains("Market") {
        features.push("Price Protection".to_string());
    }
    features
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

#[must_use]
pub fn demo_plans() -> Vec<InsurancePlan> {
    vec![
        InsurancePlan {
            id: "1".into(),
            provider: "National Insurance".into(),
            name: "Basic Crop Protection".into(),
            coverage: strings(&["Drought", "Flood", "Hail"]),
            premium: "₹500/acre/year".into(),
            claim_ratio: "85%".into(),
            max_coverage: 200_000,
            subsidy_available: true,
            features: strings(&["24/7 Support", "Quick Settlement", "Digital Process"]),
            exclusions: strings(&["War damage", "Nuclear risks"]),
            popular: false,
        },
        InsurancePlan {
            id: "2".into(),
            provider: "AgriSecure Plus".into(),
            name: "Comprehensive Protection".into(),
            coverage: strings(&["Weather", "Disease", "Market", "Fire"]),
            premium: "₹750/acre/year".into(),
            claim_ratio: "90%".into(),
            max_coverage: 350_000,
            subsidy_available: true,
            features: strings(&[
                "Weather Alerts",
                "Price Protection",
                "Expert Support",
                "Satellite Monitoring",
            ]),
            exclusions: strings(&["War damage", "Intentional damage"]),
            popular: true,
        },
        InsurancePlan {
            id: "3".into(),
            provider: "FarmShield Pro".into(),
            name: "Premium Coverage".into(),
            coverage: strings(&["Comprehensive Coverage", "Income Protection"]),
            premium: "₹1000/acre/year".into(),
            claim_ratio: "95%".into(),
            max_coverage: 500_000,
            subsidy_available: true,
            features: strings(&[
                "Income Guarantee",
                "Premium Support",
                "Dedicated Manager",
                "Instant Payouts",
            ]),
            exclusions: strings(&["Nuclear risks"]),
            popular: false,
        },
    ]
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn at_midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[must_use]
pub fn demo_policies() -> Vec<Policy> {
    vec![
        Policy {
            id: "1".into(),
            policy_number: Provenance::Confirmed("AGR2024001".into()),
            provider: Provenance::Confirmed("AgriSecure Plus".into()),
            crop: Provenance::Confirmed("Wheat".into()),
            area: Provenance::Confirmed(5.0),
            coverage: Provenance::Confirmed(250_000.0),
            premium: Provenance::Confirmed(3750.0),
            status: Provenance::Confirmed(PolicyStatus::Active),
            start_date: Provenance::Confirmed(date(2024, 1, 15)),
            end_date: Provenance::Confirmed(date(2024, 12, 31)),
            claim_amount: None,
        },
        Policy {
            id: "2".into(),
            policy_number: Provenance::Confirmed("NAT2023002".into()),
            provider: Provenance::Confirmed("National Insurance".into()),
            crop: Provenance::Confirmed("Rice".into()),
            area: Provenance::Confirmed(3.0),
            coverage: Provenance::Confirmed(150_000.0),
            premium: Provenance::Confirmed(1500.0),
            status: Provenance::Confirmed(PolicyStatus::Expired),
            start_date: Provenance::Confirmed(date(2023, 6, 1)),
            end_date: Provenance::Confirmed(date(2023, 12, 31)),
            claim_amount: None,
        },
    ]
}

#[must_use]
pub fn demo_claims() -> Vec<Claim> {
    vec![
        Claim {
            id: Provenance::Confirmed("1".into()),
            policy_number: "AGR2024001".into(),
            claim_type: Provenance::Confirmed("Weather Damage".into()),
            damage_type: "Flood".into(),
            reported_date: Provenance::Confirmed(at_midnight(date(2024, 2, 15))),
            status: Provenance::Confirmed(ClaimStatus::Approved),
            claim_amount: Provenance::Confirmed(45_000.0),
            assessment_date: Some(date(2024, 2, 20)),
        },
        Claim {
            id: Provenance::Confirmed("2".into()),
            policy_number: "NAT2023002".into(),
            claim_type: Provenance::Confirmed("Pest Damage".into()),
            damage_type: "Locust Attack".into(),
            reported_date: Provenance::Confirmed(at_midnight(date(2023, 11, 10))),
            status: Provenance::Confirmed(ClaimStatus::Paid),
            claim_amount: Provenance::Confirmed(25_000.0),
            assessment_date: Some(date(2023, 11, 15)),
        },
    ]
}

/// State of the crop insurance screen for one mount.
pub struct InsuranceScreen {
    plans: LoadOutcome<InsurancePlan>,
    policies: Vec<Policy>,
    claims: Vec<Claim>,
    selected_plan: Option<InsurancePlan>,
    pub application_form: ApplicationForm,
    pub claim_form: ClaimForm,
    criteria: FilterCriteria,
    options: ScreenOptions,
}

impl InsuranceScreen {
    /// Load the plan catalog and seed the user's policies and claims.
    pub async fn mount(backend: &dyn PortalBackend, options: ScreenOptions) -> Self {
        let mut rng = options.rng();
        let plans = insurance_plans_loader().load(backend, &mut rng).await;

        Self {
            plans,
            policies: demo_policies(),
            claims: demo_claims(),
            selected_plan: None,
            application_form: ApplicationForm::default(),
            claim_form: ClaimForm::default(),
            criteria: FilterCriteria::default(),
            options,
        }
    }

    pub fn plans(&self) -> &[InsurancePlan] {
        self.plans.records()
    }

    pub fn plans_outcome(&self) -> &LoadOutcome<InsurancePlan> {
        &self.plans
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.criteria.search = search.into();
    }

    /// Narrow the catalog to one provider.
    pub fn set_provider(&mut self, provider: impl Into<String>) {
        self.criteria.category = provider.into();
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear();
    }

        pub fn filtered_plans(&self) -> Vec<&InsurancePlan> {
        filter_records(self.plans(), &self.criteria)
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn selected_plan(&self) -> Option<&InsurancePlan> {
        self.selected_plan.as_ref()
    }

    /// Open the application form for the plan with `plan_id`.
    /// Returns `false` when no such plan is displayed.
    pub fn select_plan(&mut self, plan_id: &str) -> bool {
        let Some(plan) = self.plans().iter().find(|plan| plan.id == plan_id).cloned() else {
            return false;
        };
        self.selected_plan = Some(plan);
        self.application_form = ApplicationForm::default();
        true
    }

    pub fn cancel_application(&mut self) {
        self.selected_plan = None;
        self.application_form = ApplicationForm::default();
    }

    /// Open the claim form, optionally pre-filled with a policy number.
    pub fn start_claim(&mut self, policy_number: Option<&str>) {
        self.claim_form = ClaimForm {
            policy_number: policy_number.unwrap_or_default().to_string(),
            ..ClaimForm::default()
        };
    }

    pub fn cancel_claim(&mut self) {
        self.claim_form = ClaimForm::default();
    }

    /// Submit the application form for the selected plan.
    ///
    /// On success the new policy is at index 0 of [`Self::policies`].
    pub async fn apply(
        &mut self,
        backend: &dyn PortalBackend,
        credential: Option<&Credential>,
    ) -> Result<&Policy, SubmitError> {
        let plan = self.selected_plan.clone().ok_or(SubmitError::NoSelection)?;
        forms::require("crop", &self.application_form.crop)?;
        forms::require("area", &self.application_form.area)?;
        if self.plans.is_fallback() && self.options.blocks_fallback_writes() {
            return Err(SubmitError::FallbackSelection);
        }

        let area = forms::coerce_number(&self.application_form.area);
        let payload = PolicyCreate {
            policy_number: format!(
                "{}{}",
                plan.provider.chars().take(3).collect::<String>().to_uppercase(),
                Utc::now().timestamp_millis()
            ),
            crop: self.application_form.crop.clone(),
            coverage_amount: f64::from(plan.max_coverage),
            premium: forms::numeric_part(&plan.premium) * area,
        };

        let record = api::create_policy(backend, &payload, credential)
            .await
            .map_err(|err| {
                error!(error = %err, plan = %plan.name, "insurance application failed");
                SubmitError::from(err)
            })?;

        let today = Utc::now().date_naive();
        let policy = Policy {
            id: record.id.to_string(),
            policy_number: Provenance::confirmed_or(record.policy_number, payload.policy_number),
            provider: Provenance::Provisional(plan.provider),
            crop: Provenance::confirmed_or(record.crop, payload.crop),
            area: Provenance::Provisional(area),
            coverage: Provenance::confirmed_or(record.coverage_amount, payload.coverage_amount),
            premium: Provenance::confirmed_or(record.premium, payload.premium),
            status: Provenance::Provisional(PolicyStatus::Active),
            start_date: Provenance::Provisional(today),
            end_date: Provenance::Provisional(today + Duration::days(POLICY_TERM_DAYS)),
            claim_amount: None,
        };
        info!(policy_id = %policy.id, "insurance application accepted");

        self.policies.insert(0, policy);
        self.cancel_application();
        Ok(&self.policies[0])
    }

    /// Record a claim from the claim form.
    ///
    /// The backend has no claims endpoint, so the claim is kept locally and
    /// every generated field is provisional.
    pub fn file_claim(&mut self) -> Result<&Claim, SubmitError> {
        forms::require("policy_number", &self.claim_form.policy_number)?;
        forms::require("damage_type", &self.claim_form.damage_type)?;

        let now = Utc::now();
        let form = std::mem::take(&mut self.claim_form);
        let claim = Claim {
            id: Provenance::Provisional(now.timestamp_millis().to_string()),
            policy_number: form.policy_number,
            claim_type: Provenance::Provisional("Damage Claim".to_string()),
            damage_type: form.damage_type,
            reported_date: Provenance::Provisional(now),
            status: Provenance::Provisional(ClaimStatus::Submitted),
            claim_amount: Provenance::Provisional(forms::coerce_amount(&form.estimated_loss)),
            assessment_date: None,
        };
        info!(policy_number = %claim.policy_number, "claim recorded");

        self.claims.insert(0, claim);
        Ok(&self.claims[0])
    }
}
