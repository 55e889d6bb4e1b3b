use std::time::{Duration, Instant};

use chrono::NaiveDate;
use chrono_tz::Europe::Istanbul;
use crossterm::event::{self, Event, KeyEvent};
use uuid::Uuid;

use crate::{
    client::{Client, ClientError},
    config::AppConfig,
    error::{AppError, Result},
    export, ui,
};

use api_types::bank::BankAccount;
use engine::{
    Currency, DueKind, DueTrigger, InstallmentUpdate, Money, PaymentPlan, PaymentProfile,
    Percentage, Pricing, ProfileDraft, ProfilePayment,
};

/// Day offset seeded when cycling onto a due type that needs one.
const DEFAULT_DAY_OFFSET: u32 = 30;

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Schedule,
    Profiles,
    Totals,
    Bank,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Self::Schedule => "Schedule",
            Self::Profiles => "Profiles",
            Self::Totals => "Totals",
            Self::Bank => "Bank",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleMode {
    List,
    Edit,
}

#[derive(Debug)]
pub struct ScheduleState {
    pub mode: ScheduleMode,
    pub selected: usize,
    /// Day-offset entry in the editor. `None` is an empty field: the plan
    /// keeps its last committed offset until a digit lands.
    pub days: Option<u32>,
    pub error: Option<String>,
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self {
            mode: ScheduleMode::List,
            selected: 0,
            days: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilesMode {
    List,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderFocus {
    Name,
    Rows,
}

#[derive(Debug)]
pub struct ProfilesState {
    pub mode: ProfilesMode,
    pub items: Vec<PaymentProfile>,
    pub selected: usize,
    pub draft: ProfileDraft,
    pub focus: BuilderFocus,
    pub row: usize,
    pub error: Option<String>,
}

impl Default for ProfilesState {
    fn default() -> Self {
        Self {
            mode: ProfilesMode::List,
            items: Vec::new(),
            selected: 0,
            draft: ProfileDraft::new(),
            focus: BuilderFocus::Name,
            row: 0,
            error: None,
        }
    }
}

impl ProfilesState {
    fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.items.len() - 1);
    }

    fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = self.selected.saturating_sub(1);
    }

    fn row_next(&mut self) {
        if self.draft.payments.is_empty() {
            return;
        }
        self.row = (self.row + 1).min(self.draft.payments.len() - 1);
    }

    fn row_prev(&mut self) {
        if self.draft.payments.is_empty() {
            return;
        }
        self.row = self.row.saturating_sub(1);
    }

    fn reset_builder(&mut self) {
        self.draft = ProfileDraft::new();
        self.focus = BuilderFocus::Name;
        self.row = 0;
        self.error = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalsMode {
    View,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingField {
    Subtotal,
    TaxRate,
}

#[derive(Debug)]
pub struct PricingForm {
    pub subtotal: String,
    pub tax_rate: String,
    pub focus: PricingField,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct TotalsState {
    pub mode: TotalsMode,
    pub form: PricingForm,
}

impl Default for TotalsState {
    fn default() -> Self {
        Self {
            mode: TotalsMode::View,
            form: PricingForm {
                subtotal: String::new(),
                tax_rate: String::new(),
                focus: PricingField::Subtotal,
                error: None,
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct BankState {
    pub items: Vec<BankAccount>,
    pub selected: usize,
    pub error: Option<String>,
}

impl BankState {
    fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.items.len() - 1);
    }

    fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = self.selected.saturating_sub(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct AppState {
    pub section: Section,
    pub plan: PaymentPlan,
    pub pricing: Pricing,
    pub schedule: ScheduleState,
    pub profiles: ProfilesState,
    pub totals: TotalsState,
    pub bank: BankState,
    pub toast: Option<ToastState>,
    pub connection_ok: bool,
}

pub struct App {
    config: AppConfig,
    client: Client,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let currency = Currency::try_from(config.currency.as_str())?;
        let subtotal: Money = config.pricing.subtotal.parse()?;
        let pricing = Pricing::new(subtotal, config.pricing.tax_rate)?;
        let plan = PaymentPlan::new(
            config.title.clone(),
            config.intro_text.clone(),
            currency,
            pricing.grand_total(),
            config.opportunity.clone(),
        );

        let state = AppState {
            section: Section::Schedule,
            plan,
            pricing,
            schedule: ScheduleState::default(),
            profiles: ProfilesState::default(),
            totals: TotalsState::default(),
            bank: BankState::default(),
            toast: None,
            connection_ok: false,
        };

        Ok(Self {
            config,
            client,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.load_profiles().await;
        self.load_bank_accounts().await;

        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            self.expire_toast();
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await?,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match crate::ui::keymap::map_key(key, self.is_editing()) {
            crate::ui::keymap::AppAction::Quit => {
                self.should_quit = true;
            }
            crate::ui::keymap::AppAction::Cancel => {
                self.handle_cancel();
            }
            crate::ui::keymap::AppAction::NextField => {
                self.advance_focus();
            }
            crate::ui::keymap::AppAction::Submit => {
                self.handle_submit().await?;
            }
            crate::ui::keymap::AppAction::Backspace => {
                self.handle_backspace();
            }
            crate::ui::keymap::AppAction::Up => {
                self.handle_up();
            }
            crate::ui::keymap::AppAction::Down => {
                self.handle_down();
            }
            crate::ui::keymap::AppAction::Input(ch) => {
                self.handle_input(ch).await?;
            }
            crate::ui::keymap::AppAction::None => {}
        }

        Ok(())
    }

    /// True while some mode captures typed characters for itself.
    fn is_editing(&self) -> bool {
        match self.state.section {
            Section::Schedule => self.state.schedule.mode == ScheduleMode::Edit,
            Section::Profiles => self.state.profiles.mode == ProfilesMode::Edit,
            Section::Totals => self.state.totals.mode == TotalsMode::Edit,
            Section::Bank => false,
        }
    }

    fn handle_cancel(&mut self) {
        match self.state.section {
            Section::Schedule => {
                self.state.schedule.mode = ScheduleMode::List;
                self.state.schedule.days = None;
                self.state.schedule.error = None;
            }
            Section::Profiles => {
                if self.state.profiles.mode == ProfilesMode::Edit {
                    self.state.profiles.mode = ProfilesMode::List;
                    self.state.profiles.reset_builder();
                }
            }
            Section::Totals => {
                self.state.totals.mode = TotalsMode::View;
                self.state.totals.form.error = None;
            }
            Section::Bank => {}
        }
    }

    fn advance_focus(&mut self) {
        match self.state.section {
            Section::Profiles if self.state.profiles.mode == ProfilesMode::Edit => {
                self.state.profiles.focus = match self.state.profiles.focus {
                    BuilderFocus::Name => BuilderFocus::Rows,
                    BuilderFocus::Rows => BuilderFocus::Name,
                };
            }
            Section::Totals if self.state.totals.mode == TotalsMode::Edit => {
                self.state.totals.form.focus = match self.state.totals.form.focus {
                    PricingField::Subtotal => PricingField::TaxRate,
                    PricingField::TaxRate => PricingField::Subtotal,
                };
            }
            _ => {}
        }
    }

    async fn handle_submit(&mut self) -> Result<()> {
        match self.state.section {
            Section::Schedule => match self.state.schedule.mode {
                ScheduleMode::List => self.enter_schedule_edit(),
                ScheduleMode::Edit => {
                    self.state.schedule.mode = ScheduleMode::List;
                    self.state.schedule.days = None;
                    self.state.schedule.error = None;
                }
            },
            Section::Profiles => match self.state.profiles.mode {
                ProfilesMode::List => self.apply_selected_profile(),
                ProfilesMode::Edit => self.save_profile().await?,
            },
            Section::Totals => {
                if self.state.totals.mode == TotalsMode::Edit {
                    self.apply_pricing();
                }
            }
            Section::Bank => self.select_bank_account(),
        }
        Ok(())
    }

    fn handle_backspace(&mut self) {
        match self.state.section {
            Section::Schedule if self.state.schedule.mode == ScheduleMode::Edit => {
                self.backspace_selected_due_days();
            }
            Section::Profiles if self.state.profiles.mode == ProfilesMode::Edit => {
                match self.state.profiles.focus {
                    BuilderFocus::Name => {
                        self.state.profiles.draft.name.pop();
                    }
                    BuilderFocus::Rows => {
                        let row = self.state.profiles.row;
                        if let Some(payment) = self.state.profiles.draft.payments.get_mut(row) {
                            payment.days = backspace_days(payment.days);
                        }
                    }
                }
            }
            Section::Totals if self.state.totals.mode == TotalsMode::Edit => {
                let form = &mut self.state.totals.form;
                match form.focus {
                    PricingField::Subtotal => {
                        form.subtotal.pop();
                    }
                    PricingField::TaxRate => {
                        form.tax_rate.pop();
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_up(&mut self) {
        match self.state.section {
            Section::Schedule => match self.state.schedule.mode {
                ScheduleMode::List => self.schedule_select_prev(),
                ScheduleMode::Edit => self.step_selected_percentage(true),
            },
            Section::Profiles => match self.state.profiles.mode {
                ProfilesMode::List => self.state.profiles.select_prev(),
                ProfilesMode::Edit => {
                    if self.state.profiles.focus == BuilderFocus::Rows {
                        self.state.profiles.row_prev();
                    }
                }
            },
            Section::Totals => self.advance_focus(),
            Section::Bank => self.state.bank.select_prev(),
        }
    }

    fn handle_down(&mut self) {
        match self.state.section {
            Section::Schedule => match self.state.schedule.mode {
                ScheduleMode::List => self.schedule_select_next(),
                ScheduleMode::Edit => self.step_selected_percentage(false),
            },
            Section::Profiles => match self.state.profiles.mode {
                ProfilesMode::List => self.state.profiles.select_next(),
                ProfilesMode::Edit => {
                    if self.state.profiles.focus == BuilderFocus::Rows {
                        self.state.profiles.row_next();
                    }
                }
            },
            Section::Totals => self.advance_focus(),
            Section::Bank => self.state.bank.select_next(),
        }
    }

    async fn handle_input(&mut self, ch: char) -> Result<()> {
        match self.state.section {
            Section::Schedule if self.state.schedule.mode == ScheduleMode::Edit => {
                self.schedule_edit_input(ch);
            }
            Section::Profiles if self.state.profiles.mode == ProfilesMode::Edit => {
                self.builder_input(ch);
            }
            Section::Totals if self.state.totals.mode == TotalsMode::Edit => {
                self.totals_input(ch);
            }
            _ => self.handle_section_key(ch).await?,
        }
        Ok(())
    }

    async fn handle_section_key(&mut self, ch: char) -> Result<()> {
        match ch {
            's' | 'S' => {
                self.state.section = Section::Schedule;
            }
            'p' | 'P' => {
                self.state.section = Section::Profiles;
            }
            't' | 'T' => {
                self.state.section = Section::Totals;
            }
            'b' | 'B' => {
                self.state.section = Section::Bank;
            }
            'r' | 'R' => {
                if matches!(self.state.section, Section::Profiles | Section::Bank) {
                    self.load_profiles().await;
                    self.load_bank_accounts().await;
                    self.show_toast("Reloaded from backend", ToastLevel::Info);
                }
            }
            'a' | 'A' => {
                if self.state.section == Section::Schedule {
                    self.add_installment();
                }
            }
            'e' | 'E' => match self.state.section {
                Section::Schedule => self.enter_schedule_edit(),
                Section::Totals => self.open_pricing_form(),
                _ => {}
            },
            'd' | 'D' => {
                if self.state.section == Section::Schedule {
                    self.delete_selected_installment();
                }
            }
            'c' | 'C' => match self.state.section {
                Section::Schedule => {
                    self.state.plan.clear_profile();
                    self.state.schedule.selected = 0;
                    self.state.schedule.error = None;
                    self.show_toast("Schedule cleared", ToastLevel::Info);
                }
                Section::Profiles => {
                    self.state.profiles.reset_builder();
                    self.state.profiles.mode = ProfilesMode::Edit;
                }
                Section::Bank => {
                    self.state.plan.clear_bank_account();
                    self.show_toast("Bank account cleared", ToastLevel::Info);
                }
                Section::Totals => {}
            },
            'v' | 'V' => {
                if self.state.section == Section::Bank {
                    let shown = !self.state.plan.show_bank_details();
                    self.state.plan.set_show_bank_details(shown);
                }
            }
            'x' | 'X' => {
                if self.state.section == Section::Schedule {
                    self.export_plan();
                }
            }
            '+' | '=' => {
                if self.state.section == Section::Schedule {
                    self.step_selected_percentage(true);
                }
            }
            '-' => {
                if self.state.section == Section::Schedule {
                    self.step_selected_percentage(false);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn schedule_edit_input(&mut self, ch: char) {
        match ch {
            '+' | '=' => self.step_selected_percentage(true),
            '-' => self.step_selected_percentage(false),
            't' | 'T' => self.cycle_selected_due_kind(),
            '0'..='9' => {
                if let Some(digit) = ch.to_digit(10) {
                    self.push_selected_due_digit(digit);
                }
            }
            _ => {}
        }
    }

    fn builder_input(&mut self, ch: char) {
        match self.state.profiles.focus {
            BuilderFocus::Name => {
                self.state.profiles.draft.name.push(ch);
            }
            BuilderFocus::Rows => match ch {
                'a' | 'A' => match self.state.profiles.draft.add_payment() {
                    Ok(()) => {
                        self.state.profiles.row = self.state.profiles.draft.payments.len() - 1;
                        self.state.profiles.error = None;
                    }
                    Err(err) => {
                        self.state.profiles.error = Some(err.to_string());
                    }
                },
                'd' | 'D' => {
                    let row = self.state.profiles.row;
                    if self.state.profiles.draft.remove_payment(row).is_ok() {
                        let len = self.state.profiles.draft.payments.len();
                        self.state.profiles.row = if len == 0 { 0 } else { row.min(len - 1) };
                        self.state.profiles.error = None;
                    }
                }
                '+' | '=' => {
                    let row = self.state.profiles.row;
                    if let Some(payment) = self.state.profiles.draft.payments.get_mut(row) {
                        payment.percentage = payment.percentage.step_up();
                    }
                }
                '-' => {
                    let row = self.state.profiles.row;
                    if let Some(payment) = self.state.profiles.draft.payments.get_mut(row) {
                        payment.percentage = payment.percentage.step_down();
                    }
                }
                't' | 'T' => {
                    let row = self.state.profiles.row;
                    if let Some(payment) = self.state.profiles.draft.payments.get_mut(row) {
                        payment.kind = next_due_kind(payment.kind);
                        if payment.kind.requires_days() {
                            if payment.days.is_none() {
                                payment.days = Some(DEFAULT_DAY_OFFSET);
                            }
                        } else {
                            payment.days = None;
                        }
                    }
                }
                '0'..='9' => {
                    let row = self.state.profiles.row;
                    if let Some(digit) = ch.to_digit(10)
                        && let Some(payment) = self.state.profiles.draft.payments.get_mut(row)
                        && payment.kind.requires_days()
                    {
                        payment.days = push_day_digit(payment.days, digit);
                    }
                }
                _ => {}
            },
        }
    }

    fn totals_input(&mut self, ch: char) {
        let form = &mut self.state.totals.form;
        match form.focus {
            PricingField::Subtotal => {
                if ch.is_ascii_digit() || ch == '.' || ch == ',' {
                    form.subtotal.push(ch);
                }
            }
            PricingField::TaxRate => {
                if ch.is_ascii_digit() && form.tax_rate.len() < 3 {
                    form.tax_rate.push(ch);
                }
            }
        }
    }

    fn enter_schedule_edit(&mut self) {
        let Some(installment) = self
            .state
            .plan
            .installments()
            .get(self.state.schedule.selected)
        else {
            return;
        };
        self.state.schedule.days = installment.due.days();
        self.state.schedule.mode = ScheduleMode::Edit;
        self.state.schedule.error = None;
    }

    fn open_pricing_form(&mut self) {
        let form = &mut self.state.totals.form;
        form.subtotal = self.state.pricing.subtotal().to_string();
        form.tax_rate = self.state.pricing.tax_rate().to_string();
        form.focus = PricingField::Subtotal;
        form.error = None;
        self.state.totals.mode = TotalsMode::Edit;
    }

    fn schedule_select_next(&mut self) {
        let len = self.state.plan.installments().len();
        if len == 0 {
            return;
        }
        self.state.schedule.selected = (self.state.schedule.selected + 1).min(len - 1);
    }

    fn schedule_select_prev(&mut self) {
        self.state.schedule.selected = self.state.schedule.selected.saturating_sub(1);
    }

    fn add_installment(&mut self) {
        match self.state.plan.add_installment() {
            Ok(_) => {
                self.state.schedule.selected = self.state.plan.installments().len() - 1;
                self.state.schedule.error = None;
            }
            Err(err) => {
                self.state.schedule.error = Some(err.to_string());
            }
        }
    }

    fn delete_selected_installment(&mut self) {
        let Some(id) = self.selected_installment_id() else {
            return;
        };
        match self.state.plan.delete_installment(id) {
            Ok(_) => {
                let len = self.state.plan.installments().len();
                self.state.schedule.selected = if len == 0 {
                    0
                } else {
                    self.state.schedule.selected.min(len - 1)
                };
                self.state.schedule.error = None;
            }
            Err(err) => {
                self.state.schedule.error = Some(err.to_string());
            }
        }
    }

    fn selected_installment_id(&self) -> Option<Uuid> {
        self.state
            .plan
            .installments()
            .get(self.state.schedule.selected)
            .map(|installment| installment.id)
    }

    fn step_selected_percentage(&mut self, up: bool) {
        let Some(installment) = self
            .state
            .plan
            .installments()
            .get(self.state.schedule.selected)
        else {
            return;
        };
        let id = installment.id;
        let next = if up {
            installment.percentage.step_up()
        } else {
            installment.percentage.step_down()
        };
        let update = InstallmentUpdate {
            percentage: Some(next),
            due: None,
        };
        match self.state.plan.update_installment(id, update) {
            Ok(_) => self.state.schedule.error = None,
            Err(err) => self.state.schedule.error = Some(err.to_string()),
        }
    }

    fn cycle_selected_due_kind(&mut self) {
        let Some(installment) = self
            .state
            .plan
            .installments()
            .get(self.state.schedule.selected)
        else {
            return;
        };
        let id = installment.id;
        let kind = next_due_kind(installment.due.kind());
        let days = if kind.requires_days() {
            installment.due.days().or(Some(DEFAULT_DAY_OFFSET))
        } else {
            None
        };
        self.state.schedule.days = days;
        self.apply_due(id, kind, days);
    }

    fn push_selected_due_digit(&mut self, digit: u32) {
        let Some(installment) = self
            .state
            .plan
            .installments()
            .get(self.state.schedule.selected)
        else {
            return;
        };
        let kind = installment.due.kind();
        if !kind.requires_days() {
            return;
        }
        let id = installment.id;
        let days = push_day_digit(self.state.schedule.days, digit);
        self.state.schedule.days = days;
        self.apply_due(id, kind, days);
    }

    fn backspace_selected_due_days(&mut self) {
        let Some(installment) = self
            .state
            .plan
            .installments()
            .get(self.state.schedule.selected)
        else {
            return;
        };
        let kind = installment.due.kind();
        if !kind.requires_days() {
            return;
        }
        let id = installment.id;
        let days = backspace_days(self.state.schedule.days);
        self.state.schedule.days = days;
        if days.is_some() {
            self.apply_due(id, kind, days);
        } else if let Err(err) = DueTrigger::from_parts(kind, None) {
            // Plan keeps the committed offset; the next digit starts fresh.
            self.state.schedule.error = Some(err.to_string());
        }
    }

    fn apply_due(&mut self, id: Uuid, kind: DueKind, days: Option<u32>) {
        match DueTrigger::from_parts(kind, days) {
            Ok(due) => {
                let update = InstallmentUpdate {
                    percentage: None,
                    due: Some(due),
                };
                match self.state.plan.update_installment(id, update) {
                    Ok(_) => self.state.schedule.error = None,
                    Err(err) => self.state.schedule.error = Some(err.to_string()),
                }
            }
            Err(err) => {
                self.state.schedule.error = Some(err.to_string());
            }
        }
    }

    fn apply_selected_profile(&mut self) {
        let Some(profile) = self.state.profiles.items.get(self.state.profiles.selected) else {
            return;
        };
        let name = profile.name.clone();
        match self.state.plan.apply_profile(profile) {
            Ok(()) => {
                self.state.schedule.selected = 0;
                self.state.schedule.error = None;
                self.state.section = Section::Schedule;
                self.show_toast(format!("Applied \"{name}\""), ToastLevel::Success);
            }
            Err(err) => {
                self.show_toast(err.to_string(), ToastLevel::Error);
            }
        }
    }

    async fn save_profile(&mut self) -> Result<()> {
        let draft = &self.state.profiles.draft;
        if let Err(err) = draft.validate() {
            self.state.profiles.error = Some(err.to_string());
            return Ok(());
        }
        if let Err(err) = draft.ensure_unique_name(&self.state.profiles.items) {
            self.state.profiles.error = Some(err.to_string());
            return Ok(());
        }

        let payload = profile_request(draft);
        match self.client.create_payment_profile(&payload).await {
            Ok(created) => {
                self.state.profiles.mode = ProfilesMode::List;
                self.state.profiles.reset_builder();
                match engine_profile(&created) {
                    Ok(profile) => {
                        let applied = self.state.plan.apply_profile(&profile);
                        self.state.profiles.items.push(profile);
                        self.state.profiles.selected = self.state.profiles.items.len() - 1;
                        match applied {
                            Ok(()) => {
                                self.state.schedule.selected = 0;
                                self.state.section = Section::Schedule;
                                self.show_toast(
                                    format!("Saved \"{}\"", created.name),
                                    ToastLevel::Success,
                                );
                            }
                            Err(err) => {
                                self.show_toast(err.to_string(), ToastLevel::Error);
                            }
                        }
                    }
                    Err(err) => {
                        self.state.profiles.error =
                            Some(format!("profile stored but unusable: {err}"));
                    }
                }
            }
            Err(err) => {
                // Keep the draft so the user can correct and retry.
                self.state.profiles.error = Some(message_for_error(err));
            }
        }
        Ok(())
    }

    fn apply_pricing(&mut self) {
        let form = &mut self.state.totals.form;
        let subtotal = match form.subtotal.trim().parse::<Money>() {
            Ok(subtotal) => subtotal,
            Err(err) => {
                form.error = Some(err.to_string());
                return;
            }
        };
        let tax_rate = match form.tax_rate.trim().parse::<u8>() {
            Ok(rate) => rate,
            Err(_) => {
                form.error = Some("invalid VAT rate".to_string());
                return;
            }
        };
        let pricing = match Pricing::new(subtotal, tax_rate) {
            Ok(pricing) => pricing,
            Err(err) => {
                form.error = Some(err.to_string());
                return;
            }
        };

        self.state.pricing = pricing;
        pricing.apply_to(&mut self.state.plan);
        self.state.totals.form.error = None;
        self.state.totals.mode = TotalsMode::View;
        self.show_toast("Totals updated", ToastLevel::Success);
    }

    fn select_bank_account(&mut self) {
        let Some(account) = self.state.bank.items.get(self.state.bank.selected) else {
            return;
        };
        let bank_name = account.bank_name.clone();
        let snapshot = bank_snapshot(account);
        self.state.plan.select_bank_account(snapshot);
        self.show_toast(format!("Selected {bank_name}"), ToastLevel::Info);
    }

    fn export_plan(&mut self) {
        if let Err(err) = self.state.plan.ensure_complete() {
            self.show_toast(err.to_string(), ToastLevel::Error);
            return;
        }
        let snapshot = self.state.plan.snapshot();
        match export::save_snapshot(&self.config.export_path, &snapshot) {
            Ok(()) => {
                tracing::info!("exported plan to {}", self.config.export_path);
                self.show_toast(
                    format!("Exported to {}", self.config.export_path),
                    ToastLevel::Success,
                );
            }
            Err(err) => {
                self.show_toast(format!("Export failed: {err}"), ToastLevel::Error);
            }
        }
    }

    async fn load_profiles(&mut self) {
        match self.client.payment_profiles().await {
            Ok(profiles) => {
                let mut items = Vec::new();
                for profile in profiles {
                    match engine_profile(&profile) {
                        Ok(converted) => items.push(converted),
                        Err(err) => {
                            tracing::warn!("skipping malformed profile {}: {err}", profile.name);
                        }
                    }
                }
                tracing::debug!("loaded {} payment profiles", items.len());
                self.state.profiles.items = items;
                self.state.profiles.selected = 0;
                self.state.profiles.error = None;
                self.state.connection_ok = true;
            }
            Err(err) => {
                let message = message_for_error(err);
                tracing::warn!("failed to load payment profiles: {message}");
                self.state.profiles.error = Some(message);
                self.state.connection_ok = false;
            }
        }
    }

    async fn load_bank_accounts(&mut self) {
        match self.client.bank_accounts().await {
            Ok(accounts) => {
                tracing::debug!("loaded {} bank accounts", accounts.len());
                self.state.bank.items = accounts;
                self.state.bank.selected = 0;
                self.state.bank.error = None;
            }
            Err(err) => {
                // Tolerated: deployments without the banks endpoint keep working.
                let message = message_for_error(err);
                tracing::warn!("failed to load bank accounts: {message}");
                self.state.bank.error = Some(message);
            }
        }
    }

    fn show_toast(&mut self, message: impl Into<String>, level: ToastLevel) {
        self.state.toast = Some(ToastState {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self) {
        if let Some(toast) = self.state.toast.as_ref()
            && toast.expires_at <= Instant::now()
        {
            self.state.toast = None;
        }
    }
}

/// Current date in the business timezone, used for due date highlighting.
pub fn today() -> NaiveDate {
    chrono::Utc::now().with_timezone(&Istanbul).date_naive()
}

fn engine_profile(
    profile: &api_types::profile::PaymentProfile,
) -> engine::ResultEngine<PaymentProfile> {
    let mut payments = profile.payments.clone();
    payments.sort_by_key(|payment| payment.order);

    let mut converted = Vec::with_capacity(payments.len());
    for payment in &payments {
        converted.push(ProfilePayment {
            percentage: Percentage::try_new(payment.percentage)?,
            kind: due_kind(payment.due_type),
            days: payment.due_days,
        });
    }

    Ok(PaymentProfile {
        id: profile.id,
        name: profile.name.clone(),
        created_at: profile.created_at,
        payments: converted,
    })
}

fn profile_request(draft: &ProfileDraft) -> api_types::profile::ProfileNew {
    let payments = draft
        .payments
        .iter()
        .enumerate()
        .map(|(i, payment)| api_types::profile::ProfilePayment {
            order: i as u32 + 1,
            percentage: payment.percentage.value(),
            due_type: due_type(payment.kind),
            due_days: payment.days,
        })
        .collect();

    api_types::profile::ProfileNew {
        name: draft.display_name(),
        payments,
    }
}

fn bank_snapshot(account: &BankAccount) -> engine::BankAccountSnapshot {
    engine::BankAccountSnapshot {
        id: account.id,
        bank_name: account.bank_name.clone(),
        account_name: account.account_name.clone(),
        iban: account.iban.clone(),
        currency: account.currency.clone(),
    }
}

fn due_kind(due_type: api_types::profile::DueType) -> DueKind {
    match due_type {
        api_types::profile::DueType::ContractDate => DueKind::ContractDate,
        api_types::profile::DueType::SetupStart => DueKind::SetupStart,
        api_types::profile::DueType::EventDelivery => DueKind::EventDelivery,
        api_types::profile::DueType::AfterDelivery => DueKind::AfterDelivery,
        api_types::profile::DueType::Custom => DueKind::Custom,
    }
}

fn due_type(kind: DueKind) -> api_types::profile::DueType {
    match kind {
        DueKind::ContractDate => api_types::profile::DueType::ContractDate,
        DueKind::SetupStart => api_types::profile::DueType::SetupStart,
        DueKind::EventDelivery => api_types::profile::DueType::EventDelivery,
        DueKind::AfterDelivery => api_types::profile::DueType::AfterDelivery,
        DueKind::Custom => api_types::profile::DueType::Custom,
    }
}

fn next_due_kind(kind: DueKind) -> DueKind {
    let all = DueKind::ALL;
    let pos = all.iter().position(|k| *k == kind).unwrap_or(0);
    all[(pos + 1) % all.len()]
}

fn push_day_digit(days: Option<u32>, digit: u32) -> Option<u32> {
    let current = days.unwrap_or(0);
    // Four digits is already an absurd offset; stop accepting input there.
    if current >= 1000 {
        return Some(current);
    }
    Some(current * 10 + digit)
}

fn backspace_days(days: Option<u32>) -> Option<u32> {
    match days {
        None => None,
        Some(d) if d < 10 => None,
        Some(d) => Some(d / 10),
    }
}

fn message_for_error(err: ClientError) -> String {
    match err {
        ClientError::Unauthorized | ClientError::Forbidden => "Not authorized.".to_string(),
        ClientError::NotFound => "Endpoint not found.".to_string(),
        ClientError::Conflict(message) => format!("Conflict: {message}"),
        ClientError::Validation(message) => format!("Validation failed: {message}"),
        ClientError::Server(message) => format!("Server error: {message}"),
        ClientError::Transport(err) => format!("Backend unreachable: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_payment(
        order: u32,
        percentage: u8,
        due_type: api_types::profile::DueType,
        due_days: Option<u32>,
    ) -> api_types::profile::ProfilePayment {
        api_types::profile::ProfilePayment {
            order,
            percentage,
            due_type,
            due_days,
        }
    }

    #[test]
    fn wire_profile_converts_in_order() {
        let profile = api_types::profile::PaymentProfile {
            id: Uuid::new_v4(),
            name: "Üç Taksit".to_string(),
            created_at: None,
            payments: vec![
                api_payment(2, 30, api_types::profile::DueType::EventDelivery, None),
                api_payment(1, 40, api_types::profile::DueType::ContractDate, None),
                api_payment(3, 30, api_types::profile::DueType::AfterDelivery, Some(30)),
            ],
        };

        let converted = engine_profile(&profile).unwrap();

        assert_eq!(converted.name, "Üç Taksit");
        assert_eq!(converted.payments.len(), 3);
        assert_eq!(converted.payments[0].percentage.value(), 40);
        assert_eq!(converted.payments[0].kind, DueKind::ContractDate);
        assert_eq!(converted.payments[2].kind, DueKind::AfterDelivery);
        assert_eq!(converted.payments[2].days, Some(30));
    }

    #[test]
    fn wire_profile_rejects_off_step_percentage() {
        let profile = api_types::profile::PaymentProfile {
            id: Uuid::new_v4(),
            name: "Broken".to_string(),
            created_at: None,
            payments: vec![api_payment(
                1,
                33,
                api_types::profile::DueType::ContractDate,
                None,
            )],
        };

        assert!(engine_profile(&profile).is_err());
    }

    #[test]
    fn request_orders_rows_one_based() {
        let mut draft = ProfileDraft::new();
        draft.name = "  Yarı  Yarıya ".to_string();
        draft.payments = vec![
            ProfilePayment {
                percentage: Percentage::try_new(50).unwrap(),
                kind: DueKind::ContractDate,
                days: None,
            },
            ProfilePayment {
                percentage: Percentage::try_new(50).unwrap(),
                kind: DueKind::AfterDelivery,
                days: Some(15),
            },
        ];

        let request = profile_request(&draft);

        assert_eq!(request.name, "Yarı Yarıya");
        assert_eq!(request.payments[0].order, 1);
        assert_eq!(request.payments[1].order, 2);
        assert_eq!(
            request.payments[1].due_type,
            api_types::profile::DueType::AfterDelivery
        );
        assert_eq!(request.payments[1].due_days, Some(15));
    }

    #[test]
    fn due_kind_mapping_round_trips() {
        for kind in DueKind::ALL {
            assert_eq!(due_kind(due_type(kind)), kind);
        }
    }

    #[test]
    fn day_digits_accumulate_and_erase() {
        assert_eq!(push_day_digit(None, 3), Some(3));
        assert_eq!(push_day_digit(Some(3), 0), Some(30));
        assert_eq!(push_day_digit(Some(1000), 5), Some(1000));
        assert_eq!(backspace_days(Some(30)), Some(3));
        assert_eq!(backspace_days(Some(3)), None);
        assert_eq!(backspace_days(None), None);
    }

    #[test]
    fn due_kinds_cycle_through_all() {
        let mut kind = DueKind::ContractDate;
        for _ in 0..DueKind::ALL.len() {
            kind = next_due_kind(kind);
        }
        assert_eq!(kind, DueKind::ContractDate);
    }

    fn editor_app() -> App {
        App::new(AppConfig::default()).unwrap()
    }

    fn committed_days(app: &App) -> Option<u32> {
        app.state.plan.installments()[0].due.days()
    }

    #[test]
    fn day_offset_accepts_fresh_digits_after_full_erase() {
        let mut app = editor_app();
        app.add_installment();
        app.enter_schedule_edit();

        // ContractDate -> SetupStart -> EventDelivery -> AfterDelivery.
        for _ in 0..3 {
            app.cycle_selected_due_kind();
        }
        assert_eq!(committed_days(&app), Some(DEFAULT_DAY_OFFSET));

        app.backspace_selected_due_days();
        assert_eq!(committed_days(&app), Some(3));

        // Erasing the last digit empties the field; the plan keeps 3 until
        // the next digit, which must not append to it.
        app.backspace_selected_due_days();
        assert_eq!(app.state.schedule.days, None);
        assert_eq!(committed_days(&app), Some(3));
        assert!(app.state.schedule.error.is_some());

        app.push_selected_due_digit(5);
        assert_eq!(committed_days(&app), Some(5));
        assert!(app.state.schedule.error.is_none());

        app.push_selected_due_digit(0);
        assert_eq!(committed_days(&app), Some(50));
    }

    #[test]
    fn reopening_the_editor_seeds_the_committed_offset() {
        let mut app = editor_app();
        app.add_installment();
        app.enter_schedule_edit();
        for _ in 0..3 {
            app.cycle_selected_due_kind();
        }
        app.backspace_selected_due_days();
        app.backspace_selected_due_days();

        app.handle_cancel();
        assert_eq!(app.state.schedule.days, None);
        assert!(app.state.schedule.error.is_none());

        app.enter_schedule_edit();
        assert_eq!(app.state.schedule.days, Some(3));
    }
}
