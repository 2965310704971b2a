//! Three-step intake wizard: brand details → creator details → summary.
//!
//! `BillingWizard` is a pure aggregate: `handle` decides which events a command
//! produces and enforces step gating, `apply` folds events into state.
//! `WizardController` is the only thing callers touch; it runs handle+apply
//! and logs every transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use taag_core::{Aggregate, AggregateRoot, DomainError, Event, SessionId};

use crate::invoice::InvoiceSummary;
use crate::schema::{BrandBillingRecord, CreatorPayoutRecord, FormInput};

/// Wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Brand,
    Creator,
    Summary,
}

impl core::fmt::Display for Step {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Step::Brand => "brand",
            Step::Creator => "creator",
            Step::Summary => "summary",
        })
    }
}

/// Steps that can be re-opened from the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditTarget {
    Brand,
    Creator,
}

impl From<EditTarget> for Step {
    fn from(value: EditTarget) -> Self {
        match value {
            EditTarget::Brand => Step::Brand,
            EditTarget::Creator => Step::Creator,
        }
    }
}

/// Aggregate root: one billing session's wizard state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingWizard {
    id: SessionId,
    step: Step,
    brand: Option<BrandBillingRecord>,
    creator: Option<CreatorPayoutRecord>,
    version: u64,
}

impl BillingWizard {
    /// Fresh wizard on the brand step with no records.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            step: Step::Brand,
            brand: None,
            creator: None,
            version: 0,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn brand(&self) -> Option<&BrandBillingRecord> {
        self.brand.as_ref()
    }

    pub fn creator(&self) -> Option<&CreatorPayoutRecord> {
        self.creator.as_ref()
    }

    /// Whether `step` may be entered given the stored records.
    pub fn can_enter(&self, step: Step) -> bool {
        match step {
            Step::Brand => true,
            Step::Creator => self.brand.is_some(),
            Step::Summary => self.brand.is_some() && self.creator.is_some(),
        }
    }
}

impl AggregateRoot for BillingWizard {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: SubmitBrand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitBrand {
    pub input: FormInput,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SubmitCreator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitCreator {
    pub input: FormInput,
    pub occurred_at: DateTime<Utc>,
}

/// Command: EditStep (from the summary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditStep {
    pub target: EditTarget,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Back (creator → brand).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Back {
    pub occurred_at: DateTime<Utc>,
}

/// Command: SelectStep (tab navigation, prerequisites permitting).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStep {
    pub step: Step,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WizardCommand {
    SubmitBrand(SubmitBrand),
    SubmitCreator(SubmitCreator),
    EditStep(EditStep),
    Back(Back),
    SelectStep(SelectStep),
}

/// Event: BrandRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandRecorded {
    pub session_id: SessionId,
    pub record: BrandBillingRecord,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CreatorRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatorRecorded {
    pub session_id: SessionId,
    pub record: CreatorPayoutRecord,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StepChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepChanged {
    pub session_id: SessionId,
    pub from: Step,
    pub to: Step,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WizardEvent {
    BrandRecorded(BrandRecorded),
    CreatorRecorded(CreatorRecorded),
    StepChanged(StepChanged),
}

impl Event for WizardEvent {
    fn event_type(&self) -> &'static str {
        match self {
            WizardEvent::BrandRecorded(_) => "billing.wizard.brand_recorded",
            WizardEvent::CreatorRecorded(_) => "billing.wizard.creator_recorded",
            WizardEvent::StepChanged(_) => "billing.wizard.step_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            WizardEvent::BrandRecorded(e) => e.occurred_at,
            WizardEvent::CreatorRecorded(e) => e.occurred_at,
            WizardEvent::StepChanged(e) => e.occurred_at,
        }
    }
}

impl Aggregate for BillingWizard {
    type Command = WizardCommand;
    type Event = WizardEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            WizardEvent::BrandRecorded(e) => {
                self.brand = Some(e.record.clone());
            }
            WizardEvent::CreatorRecorded(e) => {
                self.creator = Some(e.record.clone());
            }
            WizardEvent::StepChanged(e) => {
                self.step = e.to;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            WizardCommand::SubmitBrand(cmd) => self.handle_submit_brand(cmd),
            WizardCommand::SubmitCreator(cmd) => self.handle_submit_creator(cmd),
            WizardCommand::EditStep(cmd) => self.handle_edit(cmd),
            WizardCommand::Back(cmd) => self.handle_back(cmd),
            WizardCommand::SelectStep(cmd) => self.handle_select(cmd),
        }
    }
}

impl BillingWizard {
    fn ensure_step(&self, expected: Step, action: &str) -> Result<(), DomainError> {
        if self.step != expected {
            return Err(DomainError::transition(format!(
                "{action} is only allowed on the {expected} step (current: {})",
                self.step
            )));
        }
        Ok(())
    }

    fn step_changed(&self, to: Step, occurred_at: DateTime<Utc>) -> WizardEvent {
        WizardEvent::StepChanged(StepChanged {
            session_id: self.id,
            from: self.step,
            to,
            occurred_at,
        })
    }

    fn handle_submit_brand(&self, cmd: &SubmitBrand) -> Result<Vec<WizardEvent>, DomainError> {
        self.ensure_step(Step::Brand, "submitting brand details")?;
        let record = BrandBillingRecord::parse(&cmd.input)?;

        Ok(vec![
            WizardEvent::BrandRecorded(BrandRecorded {
                session_id: self.id,
                record,
                occurred_at: cmd.occurred_at,
            }),
            self.step_changed(Step::Creator, cmd.occurred_at),
        ])
    }

    fn handle_submit_creator(&self, cmd: &SubmitCreator) -> Result<Vec<WizardEvent>, DomainError> {
        self.ensure_step(Step::Creator, "submitting creator details")?;
        if self.brand.is_none() {
            return Err(DomainError::transition(
                "creator details require stored brand details",
            ));
        }
        let record = CreatorPayoutRecord::parse(&cmd.input)?;

        Ok(vec![
            WizardEvent::CreatorRecorded(CreatorRecorded {
                session_id: self.id,
                record,
                occurred_at: cmd.occurred_at,
            }),
            self.step_changed(Step::Summary, cmd.occurred_at),
        ])
    }

    fn handle_edit(&self, cmd: &EditStep) -> Result<Vec<WizardEvent>, DomainError> {
        self.ensure_step(Step::Summary, "editing a step")?;
        Ok(vec![self.step_changed(cmd.target.into(), cmd.occurred_at)])
    }

    fn handle_back(&self, cmd: &Back) -> Result<Vec<WizardEvent>, DomainError> {
        self.ensure_step(Step::Creator, "going back")?;
        Ok(vec![self.step_changed(Step::Brand, cmd.occurred_at)])
    }

    fn handle_select(&self, cmd: &SelectStep) -> Result<Vec<WizardEvent>, DomainError> {
        if cmd.step == self.step {
            return Ok(vec![]);
        }
        if !self.can_enter(cmd.step) {
            return Err(DomainError::transition(format!(
                "cannot enter the {} step before completing the previous steps",
                cmd.step
            )));
        }
        Ok(vec![self.step_changed(cmd.step, cmd.occurred_at)])
    }
}

/// Owned copy of everything the document needs, taken on the summary step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BillingSnapshot {
    pub brand: BrandBillingRecord,
    pub creator: CreatorPayoutRecord,
    pub summary: InvoiceSummary,
}

/// Drives a [`BillingWizard`] for one session.
///
/// Every mutation goes through `&mut self`, so transitions are serialized by
/// construction.
#[derive(Debug, Clone)]
pub struct WizardController {
    wizard: BillingWizard,
}

impl WizardController {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            wizard: BillingWizard::new(session_id),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.wizard.id
    }

    pub fn step(&self) -> Step {
        self.wizard.step
    }

    pub fn version(&self) -> u64 {
        self.wizard.version
    }

    pub fn brand(&self) -> Option<&BrandBillingRecord> {
        self.wizard.brand()
    }

    pub fn creator(&self) -> Option<&CreatorPayoutRecord> {
        self.wizard.creator()
    }

    pub fn submit_brand(&mut self, input: FormInput) -> Result<Step, DomainError> {
        self.execute(WizardCommand::SubmitBrand(SubmitBrand {
            input,
            occurred_at: Utc::now(),
        }))
    }

    pub fn submit_creator(&mut self, input: FormInput) -> Result<Step, DomainError> {
        self.execute(WizardCommand::SubmitCreator(SubmitCreator {
            input,
            occurred_at: Utc::now(),
        }))
    }

    /// Re-open `target` from the summary; both records stay stored.
    pub fn edit_step(&mut self, target: EditTarget) -> Result<Step, DomainError> {
        self.execute(WizardCommand::EditStep(EditStep {
            target,
            occurred_at: Utc::now(),
        }))
    }

    /// Creator → brand, keeping the brand record.
    pub fn back(&mut self) -> Result<Step, DomainError> {
        self.execute(WizardCommand::Back(Back {
            occurred_at: Utc::now(),
        }))
    }

    pub fn select_step(&mut self, step: Step) -> Result<Step, DomainError> {
        self.execute(WizardCommand::SelectStep(SelectStep {
            step,
            occurred_at: Utc::now(),
        }))
    }

    /// Invoice breakdown for the stored brand record.
    pub fn summary(&self) -> Option<InvoiceSummary> {
        self.wizard.brand().map(InvoiceSummary::compute)
    }

    /// Owned (brand, creator, summary) triple. Only available on the summary step.
    pub fn snapshot(&self) -> Result<BillingSnapshot, DomainError> {
        if self.wizard.step != Step::Summary {
            return Err(DomainError::transition(format!(
                "a billing snapshot is only available on the summary step (current: {})",
                self.wizard.step
            )));
        }
        match (self.wizard.brand(), self.wizard.creator()) {
            (Some(brand), Some(creator)) => Ok(BillingSnapshot {
                brand: brand.clone(),
                creator: creator.clone(),
                summary: InvoiceSummary::compute(brand),
            }),
            _ => Err(DomainError::transition(
                "summary step reached without both records",
            )),
        }
    }

    fn execute(&mut self, command: WizardCommand) -> Result<Step, DomainError> {
        let session_id = self.wizard.id;
        let from = self.wizard.step;

        let events = match self.wizard.handle(&command) {
            Ok(events) => events,
            Err(err) => {
                match &err {
                    DomainError::Validation(fields) => warn!(
                        %session_id,
                        step = %from,
                        rejected = fields.len(),
                        "submission rejected"
                    ),
                    DomainError::Transition(msg) => error!(
                        %session_id,
                        step = %from,
                        reason = %msg,
                        "illegal wizard transition"
                    ),
                }
                return Err(err);
            }
        };

        for event in &events {
            self.wizard.apply(event);
        }

        info!(
            %session_id,
            from = %from,
            to = %self.wizard.step,
            version = self.wizard.version,
            "wizard transition"
        );
        Ok(self.wizard.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn controller() -> WizardController {
        WizardController::new(SessionId::new())
    }

    fn at_summary() -> WizardController {
        let mut c = controller();
        c.submit_brand(samples::brand_input()).unwrap();
        c.submit_creator(samples::creator_input()).unwrap();
        c
    }

    #[test]
    fn starts_on_brand_step_without_records() {
        let c = controller();
        assert_eq!(c.step(), Step::Brand);
        assert!(c.brand().is_none());
        assert!(c.creator().is_none());
        assert_eq!(c.version(), 0);
    }

    #[test]
    fn happy_path_reaches_summary() {
        let mut c = controller();
        assert_eq!(c.submit_brand(samples::brand_input()).unwrap(), Step::Creator);
        assert_eq!(c.submit_creator(samples::creator_input()).unwrap(), Step::Summary);

        let snapshot = c.snapshot().unwrap();
        assert_eq!(snapshot.summary.total, Decimal::from(590_000));
        assert_eq!(snapshot.creator.name(), "Ria Sharma");
        // Record + step change per submission.
        assert_eq!(c.version(), 4);
    }

    #[test]
    fn invalid_brand_stays_on_brand_step() {
        let mut c = controller();
        let err = c
            .submit_brand(samples::brand_input().with("taxId", "29abcde1234f1z5"))
            .unwrap_err();

        let fields = err.field_errors().expect("validation error");
        assert!(fields.contains("taxId"));
        assert_eq!(c.step(), Step::Brand);
        assert!(c.brand().is_none());
        assert_eq!(c.version(), 0);
    }

    #[test]
    fn invalid_creator_stays_on_creator_step() {
        let mut c = controller();
        c.submit_brand(samples::brand_input()).unwrap();
        let err = c
            .submit_creator(samples::creator_input().with("panId", "ABCD1234F"))
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains("panId"));
        assert_eq!(c.step(), Step::Creator);
        assert!(c.creator().is_none());
    }

    #[test]
    fn creator_submission_requires_brand_step_completion() {
        let mut c = controller();
        let err = c.submit_creator(samples::creator_input()).unwrap_err();
        assert!(err.is_transition());
        assert_eq!(c.step(), Step::Brand);
        assert!(c.creator().is_none());
    }

    #[test]
    fn cannot_select_later_steps_early() {
        let mut c = controller();
        assert!(c.select_step(Step::Creator).unwrap_err().is_transition());
        assert!(c.select_step(Step::Summary).unwrap_err().is_transition());

        c.submit_brand(samples::brand_input()).unwrap();
        assert!(c.select_step(Step::Summary).unwrap_err().is_transition());
        assert_eq!(c.select_step(Step::Brand).unwrap(), Step::Brand);
        assert_eq!(c.select_step(Step::Creator).unwrap(), Step::Creator);
    }

    #[test]
    fn back_keeps_brand_record() {
        let mut c = controller();
        c.submit_brand(samples::brand_input()).unwrap();
        let brand = c.brand().cloned();

        assert_eq!(c.back().unwrap(), Step::Brand);
        assert_eq!(c.brand().cloned(), brand);
        assert!(c.back().unwrap_err().is_transition());
    }

    #[test]
    fn edit_brand_overwrites_only_brand() {
        let mut c = at_summary();
        let creator_before = c.creator().cloned().unwrap();

        assert_eq!(c.edit_step(EditTarget::Brand).unwrap(), Step::Brand);
        assert!(c.creator().is_some());

        c.submit_brand(samples::brand_input().with("companyName", "Globex Media"))
            .unwrap();
        assert_eq!(c.brand().unwrap().company_name(), "Globex Media");
        assert_eq!(c.creator().cloned().unwrap(), creator_before);

        assert_eq!(c.select_step(Step::Summary).unwrap(), Step::Summary);
        assert_eq!(c.snapshot().unwrap().brand.company_name(), "Globex Media");
    }

    #[test]
    fn edit_creator_overwrites_only_creator() {
        let mut c = at_summary();
        let brand_before = c.brand().cloned().unwrap();

        c.edit_step(EditTarget::Creator).unwrap();
        c.submit_creator(samples::creator_input().with("name", "Kabir Rao"))
            .unwrap();

        assert_eq!(c.step(), Step::Summary);
        assert_eq!(c.creator().unwrap().name(), "Kabir Rao");
        assert_eq!(c.brand().cloned().unwrap(), brand_before);
    }

    #[test]
    fn edit_is_only_allowed_from_summary() {
        let mut c = controller();
        assert!(c.edit_step(EditTarget::Brand).unwrap_err().is_transition());
        c.submit_brand(samples::brand_input()).unwrap();
        assert!(c.edit_step(EditTarget::Creator).unwrap_err().is_transition());
    }

    #[test]
    fn snapshot_requires_summary_step() {
        let mut c = at_summary();
        c.edit_step(EditTarget::Creator).unwrap();
        assert!(c.snapshot().unwrap_err().is_transition());
        assert!(c.summary().is_some());
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let wizard = BillingWizard::new(SessionId::new());
        let cmd = WizardCommand::SubmitBrand(SubmitBrand {
            input: samples::brand_input(),
            occurred_at: Utc::now(),
        });

        let events1 = wizard.handle(&cmd).unwrap();
        let events2 = wizard.handle(&cmd).unwrap();
        assert_eq!(events1, events2);
        assert_eq!(wizard.version(), 0);
        assert_eq!(wizard.step(), Step::Brand);
        assert_eq!(events1[0].event_type(), "billing.wizard.brand_recorded");
    }

    #[derive(Debug, Clone)]
    enum Op {
        SubmitBrand(bool),
        SubmitCreator(bool),
        Back,
        Edit(EditTarget),
        Select(Step),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<bool>().prop_map(Op::SubmitBrand),
            any::<bool>().prop_map(Op::SubmitCreator),
            Just(Op::Back),
            prop_oneof![Just(EditTarget::Brand), Just(EditTarget::Creator)].prop_map(Op::Edit),
            prop_oneof![Just(Step::Brand), Just(Step::Creator), Just(Step::Summary)]
                .prop_map(Op::Select),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: across any sequence of operations, Creator implies a brand
        /// record and Summary implies both records.
        #[test]
        fn step_gating_holds_for_any_sequence(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let mut c = controller();

            for op in ops {
                let before_brand = c.brand().cloned();
                let before_creator = c.creator().cloned();

                let outcome = match op {
                    Op::SubmitBrand(valid) => {
                        let input = if valid {
                            samples::brand_input()
                        } else {
                            samples::brand_input().with("phone", "123")
                        };
                        c.submit_brand(input)
                    }
                    Op::SubmitCreator(valid) => {
                        let input = if valid {
                            samples::creator_input()
                        } else {
                            samples::creator_input().with("routingCode", "hdfc0000123")
                        };
                        c.submit_creator(input)
                    }
                    Op::Back => c.back(),
                    Op::Edit(target) => c.edit_step(target),
                    Op::Select(step) => c.select_step(step),
                };

                if outcome.is_err() {
                    // Rejected operations never touch stored records.
                    prop_assert_eq!(c.brand().cloned(), before_brand);
                    prop_assert_eq!(c.creator().cloned(), before_creator);
                }

                match c.step() {
                    Step::Brand => {}
                    Step::Creator => prop_assert!(c.brand().is_some()),
                    Step::Summary => {
                        prop_assert!(c.brand().is_some());
                        prop_assert!(c.creator().is_some());
                        prop_assert!(c.snapshot().is_ok());
                    }
                }
            }
        }
    }
}
