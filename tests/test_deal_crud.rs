//! Integration tests for Deal operations.
//!
//! Tests cover:
//! - Listing the seeded pipeline, with and without filters
//! - Updating single fields and stage/probability edits
//! - Manual entries with their defaults
//! - Pipeline totals and the weighted forecast

mod common;

use common::*;

#[test]
fn test_seeded_pipeline_keeps_insertion_order() -> anyhow::Result<()> {
    let db = create_seeded_db();

    let names: Vec<String> = db.get_deals().into_iter().map(|d| d.name).collect();
    assert_eq!(names, SEED_DEAL_NAMES);

    let seed_round = db
        .get_deal("EnergyShield Seed Round")
        .expect("Seed deal should exist");
    assert_eq!(seed_round.entity, Entity::EnergyShield);
    assert_eq!(seed_round.stage, Stage::DueDiligence);
    assert_eq!(seed_round.value, Zar::new(5_000_000));
    assert_eq!(seed_round.probability.value(), 0.5);
    assert_eq!(seed_round.next_action, "Data Room Prep");

    Ok(())
}

#[test]
fn test_list_without_filters_returns_every_row() -> anyhow::Result<()> {
    let db = create_seeded_db();

    let listed = db.list_deals(&DealFilter::default());
    assert_eq!(listed, db.get_deals());

    Ok(())
}

#[test]
fn test_list_applies_every_filter() -> anyhow::Result<()> {
    let db = create_seeded_db();

    // 1. Entity membership alone
    let bonnyvale = db.list_deals(&DealFilter {
        entities: Some(vec![Entity::Bonnyvale]),
        ..Default::default()
    });
    assert_eq!(bonnyvale.len(), 2);

    // 2. Entity membership plus a value threshold (inclusive)
    let large_bonnyvale = db.list_deals(&DealFilter {
        entities: Some(vec![Entity::Bonnyvale]),
        min_value: Some(Zar::new(450_000)),
        ..Default::default()
    });
    assert_eq!(large_bonnyvale.len(), 1);
    assert_eq!(large_bonnyvale[0].name, "Bonnyvale Off-Take");

    // 3. Probability threshold
    let likely = db.list_deals(&DealFilter {
        min_probability: Some(probability(0.7)),
        ..Default::default()
    });
    let names: Vec<&str> = likely.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(
        names,
        ["Sturrock & Robson Pilot", "Bonnyvale Off-Take", "Pineapple Export Logistics"]
    );

    // 4. An empty selection matches nothing
    let none = db.list_deals(&DealFilter {
        stages: Some(vec![]),
        ..Default::default()
    });
    assert!(none.is_empty());

    Ok(())
}

#[test]
fn test_update_stage_touches_only_that_row() -> anyhow::Result<()> {
    let db = create_seeded_db();
    let before = db.get_deals();

    let updated = db.update_deal("Bonnyvale Off-Take", DealField::Stage(Stage::Closed))?;
    assert_eq!(updated.stage, Stage::Closed);

    let after = db.get_deals();
    assert_eq!(after.len(), before.len());
    for (old, new) in before.iter().zip(&after) {
        if old.name == "Bonnyvale Off-Take" {
            assert_eq!(new.stage, Stage::Closed);
            assert_eq!(new.probability, old.probability);
            assert_eq!(new.value, old.value);
            assert_eq!(new.next_action, old.next_action);
        } else {
            assert_eq!(new, old, "Other rows must be untouched");
        }
    }

    Ok(())
}

#[test]
fn test_edit_deal_sets_stage_and_probability() -> anyhow::Result<()> {
    let db = create_seeded_db();

    let edited = db.edit_deal("JCI Sandton Expansion", Stage::Meeting, probability(0.55))?;
    assert_eq!(edited.stage, Stage::Meeting);
    assert_eq!(edited.probability.value(), 0.55);

    let reloaded = db
        .get_deal("JCI Sandton Expansion")
        .expect("Deal should still exist");
    assert_eq!(reloaded, edited);

    Ok(())
}

#[test]
fn test_update_other_fields() -> anyhow::Result<()> {
    let db = create_seeded_db();

    db.update_deal("Pineapple Export Logistics", DealField::Value(Zar::new(150_000)))?;
    db.update_deal("Pineapple Export Logistics", DealField::Entity(Entity::Vas))?;
    let updated = db.update_deal(
        "Pineapple Export Logistics",
        DealField::NextAction("Cold Chain Review".to_string()),
    )?;

    assert_eq!(updated.value, Zar::new(150_000));
    assert_eq!(updated.entity, Entity::Vas);
    assert_eq!(updated.next_action, "Cold Chain Review");

    Ok(())
}

#[test]
fn test_add_deal_applies_entry_defaults() -> anyhow::Result<()> {
    let db = create_seeded_db();

    let added = db.add_deal(make_new_deal("Secunda Tank Audit", Entity::Faft, 250_000))?;
    assert_eq!(added.name, "Secunda Tank Audit");
    assert_eq!(added.stage, Stage::Lead);
    assert_eq!(added.probability, Probability::INITIAL);
    assert_eq!(added.next_action, NewDeal::NEXT_ACTION);

    // Appended at the end
    let deals = db.get_deals();
    assert_eq!(deals.len(), 6);
    assert_eq!(deals.last().map(|d| d.name.as_str()), Some("Secunda Tank Audit"));

    Ok(())
}

#[test]
fn test_pipeline_totals_on_seed_data() -> anyhow::Result<()> {
    let db = create_seeded_db();

    assert_eq!(db.aggregate_deals(DealMetric::Value, None), 7_105_000.0);
    assert_eq!(SEED_PIPELINE_TOTAL, 7_105_000);

    let summary: PipelineSummary = db.pipeline_summary();
    assert_eq!(summary.deal_count, 5);
    assert_eq!(summary.total_value, Zar::new(SEED_PIPELINE_TOTAL));
    assert!((summary.weighted_forecast - 3_566_500.0).abs() < 1e-6);

    Ok(())
}

#[test]
fn test_weighted_forecast_is_sum_of_row_products() -> anyhow::Result<()> {
    let db = create_seeded_db();
    db.add_deal(make_new_deal("Thermal Retrofit", Entity::EnergyShield, 80_000))?;
    db.edit_deal("Bonnyvale Off-Take", Stage::Closed, probability(1.0))?;

    let literal: f64 = db.get_deals().iter().map(|d| d.weighted_value()).sum();
    let aggregated = db.aggregate_deals(DealMetric::Value, Some(DealMetric::Probability));
    assert_eq!(aggregated, literal);

    Ok(())
}

#[test]
fn test_every_probability_stays_in_unit_interval() -> anyhow::Result<()> {
    let db = create_seeded_db();
    db.add_deal(make_new_deal("Boiler 3 Service Plan", Entity::Vas, 40_000))?;
    db.promote_prospect("Apex Retail", &Promotion::new(Entity::Vas))?;

    for deal in db.get_deals() {
        let p = deal.probability.value();
        assert!((0.0..=1.0).contains(&p), "{} has probability {p}", deal.name);
    }

    Ok(())
}
