use chrono::NaiveDate;
use uuid::Uuid;

use engine::{
    Currency, DueKind, DueStatus, DueTrigger, EngineError, InstallmentUpdate, Money,
    OpportunityDates, PaymentPlan, PaymentProfile, Percentage, Pricing, ProfileDraft,
    ProfilePayment,
};

fn pct(value: u8) -> Percentage {
    Percentage::try_new(value).unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn try_plan(total_major: i64) -> PaymentPlan {
    PaymentPlan::new(
        "Istanbul Expo stand".to_string(),
        "Payment terms for your stand construction.".to_string(),
        Currency::Try,
        Money::from_major(total_major),
        None,
    )
}

fn add_with(plan: &mut PaymentPlan, percentage: u8, due: DueTrigger) -> Uuid {
    let id = plan.add_installment().unwrap();
    plan.update_installment(
        id,
        InstallmentUpdate {
            percentage: Some(pct(percentage)),
            due: Some(due),
        },
    )
    .unwrap();
    id
}

fn half_and_half() -> PaymentProfile {
    PaymentProfile {
        id: Uuid::new_v4(),
        name: "Yarı Yarıya".to_string(),
        created_at: None,
        payments: vec![
            ProfilePayment {
                percentage: pct(50),
                kind: DueKind::ContractDate,
                days: None,
            },
            ProfilePayment {
                percentage: pct(50),
                kind: DueKind::EventDelivery,
                days: None,
            },
        ],
    }
}

#[test]
fn three_installments_split_the_total_exactly() {
    let mut plan = try_plan(100_000);
    add_with(&mut plan, 40, DueTrigger::ContractDate);
    add_with(&mut plan, 30, DueTrigger::SetupStart);
    add_with(&mut plan, 30, DueTrigger::EventDelivery);

    assert_eq!(plan.total_percentage(), 100);
    assert!(plan.ensure_complete().is_ok());
    assert_eq!(
        plan.amounts(),
        vec![
            Money::from_major(40_000),
            Money::from_major(30_000),
            Money::from_major(30_000)
        ]
    );

    let snapshot = plan.snapshot();
    assert_eq!(snapshot.total_percentage, 100);
    assert_eq!(snapshot.installments[0].amount_minor, 40_000_00);
}

#[test]
fn allocation_follows_every_mutation() {
    let mut plan = try_plan(100_000);
    let first = add_with(&mut plan, 40, DueTrigger::ContractDate);
    assert_eq!(plan.remaining_percentage(), 60);
    assert_eq!(
        plan.ensure_complete(),
        Err(EngineError::IncompletePercentage(40))
    );

    add_with(&mut plan, 60, DueTrigger::EventDelivery);
    assert!(plan.ensure_complete().is_ok());

    plan.delete_installment(first).unwrap();
    assert_eq!(plan.total_percentage(), 60);
    assert_eq!(plan.amounts(), vec![Money::from_major(60_000)]);
}

#[test]
fn adding_past_full_allocation_is_rejected() {
    let mut plan = try_plan(100_000);
    add_with(&mut plan, 50, DueTrigger::ContractDate);
    let second = add_with(&mut plan, 50, DueTrigger::EventDelivery);

    assert_eq!(plan.add_installment(), Err(EngineError::PlanFull));

    // Freeing allocation makes adding possible again.
    plan.delete_installment(second).unwrap();
    assert!(plan.add_installment().is_ok());
}

#[test]
fn removing_an_installment_keeps_orders_contiguous() {
    let mut plan = try_plan(100_000);
    add_with(&mut plan, 40, DueTrigger::ContractDate);
    let second = add_with(&mut plan, 20, DueTrigger::SetupStart);
    add_with(&mut plan, 20, DueTrigger::EventDelivery);
    add_with(&mut plan, 20, DueTrigger::AfterDelivery { days: 30 });

    plan.delete_installment(second).unwrap();

    let rows = plan.rows();
    let orders: Vec<u32> = rows.iter().map(|row| row.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
    let shares: Vec<u8> = rows.iter().map(|row| row.percentage).collect();
    assert_eq!(shares, vec![40, 20, 20]);
}

#[test]
fn profile_divergence_flow() {
    let profile = half_and_half();
    let mut plan = try_plan(20_000);
    plan.set_opportunity(Some(OpportunityDates {
        contract_date: Some(date(2025, 3, 1)),
        event_start_date: Some(date(2025, 6, 9)),
        ..OpportunityDates::default()
    }));
    plan.apply_profile(&profile).unwrap();

    assert_eq!(plan.profile().map(|linked| linked.id), Some(profile.id));
    assert_eq!(
        plan.amounts(),
        vec![Money::from_major(10_000), Money::from_major(10_000)]
    );

    // Applied entries resolve against the opportunity straight away.
    let rows = plan.rows();
    assert_eq!(rows[0].due_date, Some(date(2025, 3, 1)));
    assert_eq!(rows[1].due_date, Some(date(2025, 6, 9)));

    // First manual edit drops the link and may overshoot the sum.
    let first = plan.installments()[0].id;
    plan.update_installment(
        first,
        InstallmentUpdate {
            percentage: Some(pct(60)),
            due: None,
        },
    )
    .unwrap();

    assert!(plan.profile().is_none());
    assert_eq!(plan.total_percentage(), 110);
    let err = plan.ensure_complete().unwrap_err();
    assert_eq!(err, EngineError::IncompletePercentage(110));
    assert_eq!(
        err.to_string(),
        "installment percentages must equal 100% (currently 110%)"
    );
}

#[test]
fn applying_a_malformed_profile_leaves_the_plan_untouched() {
    let mut broken = half_and_half();
    broken.payments[1] = ProfilePayment {
        percentage: pct(50),
        kind: DueKind::AfterDelivery,
        days: None,
    };

    let mut plan = try_plan(20_000);
    add_with(&mut plan, 40, DueTrigger::ContractDate);

    assert!(matches!(
        plan.apply_profile(&broken),
        Err(EngineError::MissingDays(_))
    ));
    assert_eq!(plan.installments().len(), 1);
    assert_eq!(plan.total_percentage(), 40);
}

#[test]
fn due_dates_resolve_from_opportunity_context() {
    let mut plan = try_plan(100_000);
    plan.set_opportunity(Some(OpportunityDates {
        contract_date: Some(date(2025, 3, 1)),
        setup_date: Some(date(2025, 5, 10)),
        event_date: Some(date(2025, 5, 15)),
        delivery_date: Some(date(2025, 1, 1)),
        ..OpportunityDates::default()
    }));

    add_with(&mut plan, 40, DueTrigger::AfterDelivery { days: 30 });
    add_with(&mut plan, 30, DueTrigger::Custom { days: 15 });
    add_with(&mut plan, 15, DueTrigger::SetupStart);
    add_with(&mut plan, 15, DueTrigger::EventDelivery);

    let rows = plan.rows();
    assert_eq!(rows[0].due_date, Some(date(2025, 1, 31)));
    assert_eq!(rows[0].description, "30 days after delivery");
    assert_eq!(rows[1].due_date, Some(date(2025, 3, 16)));
    assert_eq!(rows[1].description, "15 days after contract signing");
    // Legacy fallback fields still resolve setup/event entries.
    assert_eq!(rows[2].due_date, Some(date(2025, 5, 10)));
    assert_eq!(rows[3].due_date, Some(date(2025, 5, 15)));

    for installment in plan.installments() {
        assert_eq!(plan.status_for(installment), DueStatus::Resolved);
    }
}

#[test]
fn unresolvable_entries_classify_but_never_block_completion() {
    let mut plan = try_plan(100_000);
    add_with(&mut plan, 100, DueTrigger::AfterDelivery { days: 30 });

    // No opportunity at all.
    let installment = plan.installments()[0].clone();
    assert_eq!(plan.status_for(&installment), DueStatus::NeedsOpportunity);
    assert!(plan.ensure_complete().is_ok());

    // Opportunity present but without any delivery-side date.
    plan.set_opportunity(Some(OpportunityDates {
        contract_date: Some(date(2025, 3, 1)),
        ..OpportunityDates::default()
    }));
    assert_eq!(plan.status_for(&installment), DueStatus::NeedsSourceDate);
    assert_eq!(plan.rows()[0].due_date, None);
    assert!(plan.ensure_complete().is_ok());
}

#[test]
fn pricing_drives_the_plan_total() {
    let mut plan = try_plan(0);
    add_with(&mut plan, 50, DueTrigger::ContractDate);
    add_with(&mut plan, 50, DueTrigger::EventDelivery);

    let mut pricing = Pricing::new(Money::from_major(100_000), 20).unwrap();
    pricing.apply_to(&mut plan);
    assert_eq!(plan.total_amount(), Money::from_major(120_000));
    assert_eq!(
        plan.amounts(),
        vec![Money::from_major(60_000), Money::from_major(60_000)]
    );

    pricing.set_tax_rate(0).unwrap();
    pricing.apply_to(&mut plan);
    assert_eq!(
        plan.amounts(),
        vec![Money::from_major(50_000), Money::from_major(50_000)]
    );
}

#[test]
fn profile_draft_save_flow() {
    let mut draft = ProfileDraft::new();
    assert_eq!(draft.validate(), Err(EngineError::ProfileNameRequired));

    draft.name = "Standart Plan".to_string();
    assert_eq!(draft.validate(), Err(EngineError::ProfileEmpty));

    draft.add_payment().unwrap();
    draft
        .set_payment(
            0,
            ProfilePayment {
                percentage: pct(50),
                kind: DueKind::ContractDate,
                days: None,
            },
        )
        .unwrap();
    assert_eq!(draft.validate(), Err(EngineError::ProfilePercentage(50)));

    draft.add_payment().unwrap();
    draft
        .set_payment(
            1,
            ProfilePayment {
                percentage: pct(50),
                kind: DueKind::AfterDelivery,
                days: Some(30),
            },
        )
        .unwrap();
    assert!(draft.validate().is_ok());

    let fetched = vec![half_and_half()];
    assert!(draft.ensure_unique_name(&fetched).is_ok());
    draft.name = " yarı   yarıya ".to_string();
    assert_eq!(
        draft.ensure_unique_name(&fetched),
        Err(EngineError::ExistingKey("yarı yarıya".to_string()))
    );
}

#[test]
fn snapshot_serializes_for_export() {
    let mut plan = try_plan(100_000);
    plan.set_opportunity(Some(OpportunityDates {
        delivery_date: Some(date(2025, 1, 1)),
        ..OpportunityDates::default()
    }));
    add_with(&mut plan, 100, DueTrigger::AfterDelivery { days: 30 });
    plan.set_show_bank_details(true);

    let value = serde_json::to_value(plan.snapshot()).unwrap();
    assert_eq!(value["title"], "Istanbul Expo stand");
    assert_eq!(value["currency"], "TRY");
    assert_eq!(value["total_amount_minor"], 100_000_00i64);
    assert_eq!(value["profile_id"], serde_json::Value::Null);
    assert_eq!(value["show_bank_details"], true);

    let row = &value["installments"][0];
    assert_eq!(row["order"], 1);
    assert_eq!(row["percentage"], 100);
    assert_eq!(row["amount_minor"], 100_000_00i64);
    assert_eq!(row["due_type"], "after_delivery");
    assert_eq!(row["due_days"], 30);
    assert_eq!(row["due_date"], "2025-01-31");
}
