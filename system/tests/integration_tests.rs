//! Integration tests driving a fully wired system:
//! configuration → wiring → rent and upkeep → treasury → vault → snapshot.
//!
//! Each component is covered in isolation by its own crate; these tests
//! check that the pieces agree with each other once connected.

use reit_ledger::FungibleLedger;
use reit_nullables::{NullClock, NullLedger};
use reit_registry::LeaseEvent;
use reit_system::{ReitConfig, ReitSystem, SystemSnapshot};
use reit_types::{AccountId, Authority, ErrorKind, SystemClock, SECS_PER_DAY, SECS_PER_WEEK};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const START: u64 = 1_700_000_000;
const USD: u128 = 1_000_000;

type TestSystem = ReitSystem<NullLedger, NullClock>;

fn system_with(config: &ReitConfig) -> (Authority, TestSystem) {
    let auth = Authority::new();
    let system = ReitSystem::new(
        &auth,
        config,
        NullLedger::new("USD", 6),
        NullLedger::new("GPSY", 6),
        NullClock::new(START),
    )
    .expect("system wires");
    (auth, system)
}

fn system() -> (Authority, TestSystem) {
    system_with(&ReitConfig::default())
}

/// Mint `amount` stablecoin to `who` and approve `spender` for all of it.
fn fund(system: &mut TestSystem, who: &str, spender: &AccountId, amount: u128) -> AccountId {
    let who = AccountId::new(who);
    let usd = system.stablecoin_mut();
    usd.mint(&who, amount).unwrap();
    usd.approve(&who, spender, u128::MAX).unwrap();
    who
}

fn registry_account(system: &TestSystem) -> AccountId {
    system.registry().account().clone()
}

// ---------------------------------------------------------------------------
// 1. Wiring and configuration
// ---------------------------------------------------------------------------

#[test]
fn wiring_connects_registry_and_treasury() {
    let (_auth, system) = system();
    let reit = system.reit().account().clone();
    assert_eq!(system.registry().rent_recipient(), Some(&reit));
    let wiring = system.reit().wiring().expect("connected");
    assert_eq!(&wiring.registry, system.registry().account());
    assert_eq!(&wiring.vault, system.vault().account());
    assert_eq!(system.vault().asset_symbol(), "USD");
    assert_eq!(system.now().as_secs(), START);
}

#[test]
fn config_drives_component_parameters() {
    let config = ReitConfig::from_toml_str(
        r#"
        reit_account = "gypsy-reit"

        [params]
        rent_cycle_secs = 604800
        dividend_profit_bps = 2500
        vesting_precision = 1000000000
        bootstrap_share_price = 10
        "#,
    )
    .unwrap();
    let (_auth, system) = system_with(&config);

    assert_eq!(system.reit().account().as_str(), "gypsy-reit");
    assert_eq!(system.rent_engine().rent_cycle_secs(), SECS_PER_WEEK);
    assert_eq!(system.reit().split().profit_bps(), 2_500);
    assert_eq!(system.vault().precision(), 1_000_000_000);
    assert_eq!(system.backing_per_share().unwrap(), 10 * USD);
}

#[test]
fn wall_clock_system_stamps_leases_with_current_time() {
    let auth = Authority::new();
    let mut system = ReitSystem::new(
        &auth,
        &ReitConfig::default(),
        NullLedger::new("USD", 6),
        NullLedger::new("GPSY", 6),
        SystemClock,
    )
    .unwrap();
    let id = system
        .mint_property(&auth, "landlord".into(), "ipfs://cabin", 100, 1_000)
        .unwrap();
    let tenant = AccountId::new("tenant");
    let spender = system.registry().account().clone();
    system.stablecoin_mut().mint(&tenant, 100).unwrap();
    system.stablecoin_mut().approve(&tenant, &spender, 100).unwrap();

    let before = system.now();
    let receipt = system.pay_rent(&tenant, id).unwrap();
    assert!(before.as_secs() >= START);
    assert!(receipt.lease_ends.as_secs() >= before.as_secs() + system.rent_engine().rent_cycle_secs());
    assert_eq!(system.upkeep().vacated.len(), 0);
}

#[test]
fn invalid_config_is_rejected_before_wiring() {
    let mut config = ReitConfig::default();
    config.profits_wallet = config.operations_wallet.clone();
    let err = ReitSystem::new(
        &Authority::new(),
        &config,
        NullLedger::new("USD", 6),
        NullLedger::new("GPSY", 6),
        NullClock::new(START),
    )
    .err()
    .expect("shared wallet rejected");
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);

    let mut config = ReitConfig::default();
    config.params.rent_cycle_secs = 0;
    let err = ReitSystem::new(
        &Authority::new(),
        &config,
        NullLedger::new("USD", 6),
        NullLedger::new("GPSY", 6),
        NullClock::new(START),
    )
    .err()
    .expect("zero rent cycle rejected");
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
}

// ---------------------------------------------------------------------------
// 2. Rent cycle and upkeep
// ---------------------------------------------------------------------------

#[test]
fn lease_lapses_after_one_cycle_of_upkeep() {
    let (auth, mut system) = system();
    let landlord = AccountId::new("landlord");
    let id = system
        .mint_property(&auth, landlord, "ipfs://villa", 6_000, 1_000_000)
        .unwrap();
    let spender = registry_account(&system);
    let tenant = fund(&mut system, "tenant", &spender, 6_000);

    let receipt = system.pay_rent(&tenant, id).unwrap();
    assert_eq!(receipt.event, LeaseEvent::Started);
    assert_eq!(&receipt.recipient, system.reit().account());
    assert_eq!(system.cash_reserves(), 6_000);
    assert!(system.registry().occupied(id).unwrap());

    let days = system.rent_engine().config().rent_cycle_days();
    let reports = system.simulate_days(days + 1);

    let vacated: Vec<_> = reports.iter().flat_map(|r| r.vacated.iter()).collect();
    assert_eq!(vacated.len(), 1);
    assert_eq!(vacated[0].former_renter, tenant);
    assert!(!system.registry().occupied(id).unwrap());
    assert_eq!(system.registry().renter(id).unwrap(), None);
    // Every tick before the lapse saw the live lease and left it alone.
    assert!(reports[..days as usize].iter().all(|r| r.vacated.is_empty()));
}

#[test]
fn occupied_property_rejects_other_payers_until_swept() {
    let (auth, mut system) = system();
    let id = system
        .mint_property(&auth, "landlord".into(), "ipfs://loft", 1_000, 500_000)
        .unwrap();
    let spender = registry_account(&system);
    let first = fund(&mut system, "first", &spender, 10_000);
    let second = fund(&mut system, "second", &spender, 10_000);

    system.pay_rent(&first, id).unwrap();
    let err = system.pay_rent(&second, id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PropertyOccupied);
    assert_eq!(system.stablecoin().balance_of(&second), 10_000);

    // The sitting renter extends the lease by a full cycle.
    let ends = system.registry().lease_ends(id).unwrap().unwrap();
    let renewal = system.pay_rent(&first, id).unwrap();
    assert_eq!(renewal.event, LeaseEvent::Renewed);
    assert_eq!(
        renewal.lease_ends.as_secs(),
        ends.as_secs() + system.rent_engine().rent_cycle_secs()
    );

    system.simulate_days(61);
    let lease = system.pay_rent(&second, id).unwrap();
    assert_eq!(lease.event, LeaseEvent::Started);
    assert_eq!(system.registry().renter(id).unwrap(), Some(&second));
}

#[test]
fn shorter_rent_cycle_applies_to_new_leases() {
    let (auth, mut system) = system();
    let id = system
        .mint_property(&auth, "landlord".into(), "ipfs://studio", 700, 70_000)
        .unwrap();
    system.set_rent_cycle_length(&auth, SECS_PER_WEEK).unwrap();
    let spender = registry_account(&system);
    let tenant = fund(&mut system, "tenant", &spender, 700);

    let receipt = system.pay_rent(&tenant, id).unwrap();
    assert_eq!(receipt.lease_ends.as_secs(), START + SECS_PER_WEEK);

    let reports = system.simulate_days(8);
    assert_eq!(reports.iter().map(|r| r.vacated.len()).sum::<usize>(), 1);
}

#[test]
fn owner_gated_operations_reject_strangers() {
    let (auth, mut system) = system();
    let stranger = Authority::new();
    let id = system
        .mint_property(&auth, "landlord".into(), "ipfs://barn", 10, 100)
        .unwrap();

    let errors = [
        system.mint_property(&stranger, "x".into(), "ipfs://x", 1, 1).unwrap_err(),
        system.add_property(&stranger, "ipfs://y", 1, 0).unwrap_err(),
        system.appraise(&stranger, id, 1).unwrap_err(),
        system.set_rent(&stranger, id, 1).unwrap_err(),
        system.remove_property(&stranger, id).unwrap_err(),
        system.set_rent_cycle_length(&stranger, SECS_PER_DAY).unwrap_err(),
        system.update_vesting_schedule(&stranger, SECS_PER_WEEK).unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err.kind(), ErrorKind::Unauthorized, "{err}");
    }
    assert_eq!(system.number_of_properties(), 1);
}

// ---------------------------------------------------------------------------
// 3. Treasury: purchases, acquisitions, appraisals
// ---------------------------------------------------------------------------

#[test]
fn first_purchase_is_priced_at_bootstrap() {
    let (_auth, mut system) = system();
    let reit = system.reit().account().clone();
    let buyer = fund(&mut system, "buyer", &reit, 1_000 * USD);

    let purchase = system.buy(&buyer, 1_000_000).unwrap();
    assert_eq!(purchase.cost, 100 * USD);
    assert_eq!(purchase.backing_per_share, 100 * USD);
    assert_eq!(system.cash_reserves(), 100 * USD);
    assert_eq!(system.shares().balance_of(&buyer), 1_000_000);
    assert_eq!(system.backing_per_share().unwrap(), 100 * USD);
}

#[test]
fn bootstrap_purchase_with_eighteen_decimal_shares() {
    let auth = Authority::new();
    let mut system = ReitSystem::new(
        &auth,
        &ReitConfig::default(),
        NullLedger::new("USDG", 6),
        NullLedger::new("GPSY", 18),
        NullClock::new(START),
    )
    .unwrap();
    let gpsy_unit = 10u128.pow(18);
    let reit = system.reit().account().clone();
    let investor = fund(&mut system, "investor", &reit, 100_000_000);

    let purchase = system.buy(&investor, 1_000_000).unwrap();
    assert_eq!(purchase.cost, 100_000_000);
    assert_eq!(system.cash_reserves(), 100_000_000);
    assert_eq!(system.stablecoin().balance_of(&investor), 0);
    assert_eq!(system.backing_per_share().unwrap(), 100 * gpsy_unit);

    // The acquisition leaves NAV unchanged; doubling the appraisal lifts it.
    let id = system.add_property(&auth, "ipfs://duplex", 6_000, 50_000_000).unwrap();
    system.appraise(&auth, id, 100_000_000).unwrap();
    assert_eq!(system.nav().unwrap(), 150_000_000);
    assert_eq!(system.backing_per_share().unwrap(), 150 * gpsy_unit);
}

#[test]
fn acquisition_keeps_nav_and_appraisal_moves_backing() {
    let (auth, mut system) = system();
    let reit = system.reit().account().clone();
    let buyer = fund(&mut system, "buyer", &reit, 1_000 * USD);
    system.buy(&buyer, 1_000_000).unwrap();

    let id = system.add_property(&auth, "ipfs://tower", 6_000, 50 * USD).unwrap();
    assert_eq!(system.cash_reserves(), 50 * USD);
    assert_eq!(system.property_value().unwrap(), 50 * USD);
    assert_eq!(system.nav().unwrap(), 100 * USD);
    assert_eq!(
        system.stablecoin().balance_of(system.reit().operations_wallet()),
        50 * USD
    );
    assert_eq!(system.registry().get(id).unwrap().holder(), &reit);

    let change = system.appraise(&auth, id, 80 * USD).unwrap();
    assert_eq!(change.before, 50 * USD);
    assert_eq!(system.backing_per_share().unwrap(), 130 * USD);

    // New buyers pay the appraised backing.
    let purchase = system.buy(&buyer, 500_000).unwrap();
    assert_eq!(purchase.cost, 65 * USD);
    assert_eq!(system.backing_per_share().unwrap(), 130 * USD);

    system.remove_property(&auth, id).unwrap();
    assert_eq!(system.number_of_properties(), 0);
    assert_eq!(system.nav().unwrap(), 115 * USD);
}

#[test]
fn acquisition_beyond_reserves_is_rejected() {
    let (auth, mut system) = system();
    let err = system.add_property(&auth, "ipfs://castle", 1, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientReserves);
    assert_eq!(system.number_of_properties(), 0);
}

#[test]
fn total_rent_sums_live_properties() {
    let (auth, mut system) = system();
    system.mint_property(&auth, "a".into(), "ipfs://a", 6_000, 1).unwrap();
    let b = system.mint_property(&auth, "b".into(), "ipfs://b", 4_000, 1).unwrap();
    assert_eq!(system.total_rent().unwrap(), 10_000);
    system.set_rent(&auth, b, 1_000).unwrap();
    assert_eq!(system.total_rent().unwrap(), 7_000);
}

// ---------------------------------------------------------------------------
// 4. Dividends and vesting
// ---------------------------------------------------------------------------

#[test]
fn rent_dividend_vests_to_vault_holders() {
    let (auth, mut system) = system();
    let vault = system.vault().account().clone();
    let staker = fund(&mut system, "staker", &vault, 1_000_000);
    system.deposit(&staker, 1_000_000, &staker).unwrap();

    let id = system
        .mint_property(&auth, "landlord".into(), "ipfs://flat", 6_000, 1_000_000)
        .unwrap();
    let spender = registry_account(&system);
    let tenant = fund(&mut system, "tenant", &spender, 6_000);
    system.pay_rent(&tenant, id).unwrap();

    let dividend = system.send_dividend().unwrap();
    assert_eq!(dividend.total, 6_000);
    assert_eq!(dividend.to_vault, 5_400);
    assert_eq!(dividend.to_profits, 600);
    assert_eq!(system.cash_reserves(), 0);
    assert_eq!(system.stablecoin().balance_of(system.reit().profits_wallet()), 600);

    // Unscheduled profit is invisible to holders.
    assert_eq!(system.max_withdraw(&staker).unwrap(), 1_000_000);

    let schedule = system.update_vesting_schedule(&auth, SECS_PER_WEEK).unwrap();
    assert_eq!(schedule.free_assets, 5_400);
    system.clock().advance(2 * SECS_PER_WEEK);
    assert_eq!(system.vault_total_assets().unwrap(), 1_005_400);
    assert_eq!(system.max_withdraw(&staker).unwrap(), 1_005_400);

    let assets = system.redeem(&staker, 1_000_000, &staker, &staker).unwrap();
    assert_eq!(assets, 1_005_400);
    assert_eq!(system.stablecoin().balance_of(&staker), 1_005_400);
}

#[test]
fn vesting_accrues_linearly_over_the_period() {
    let (auth, mut system) = system();
    let vault = system.vault().account().clone();
    let stake = 1_000_000_000_000u128;
    let staker = fund(&mut system, "staker", &vault, stake);
    assert_eq!(system.deposit(&staker, stake, &staker).unwrap(), stake);

    // Profit arrives out of band, e.g. a direct transfer.
    system.stablecoin_mut().mint(&vault, 500_000_000).unwrap();
    let schedule = system.update_vesting_schedule(&auth, 4 * SECS_PER_WEEK).unwrap();
    assert_eq!(schedule.issuance_rate, 500_000_000 * 1_000_000 / (4 * SECS_PER_WEEK as u128));
    assert_eq!(schedule.ends.as_secs(), START + 4 * SECS_PER_WEEK);

    system.clock().advance(2 * SECS_PER_WEEK);
    let rate = system.vault().issuance_rate();
    let expected = stake + rate * (2 * SECS_PER_WEEK as u128) / 1_000_000;
    assert_eq!(system.max_withdraw(&staker).unwrap(), expected);
    assert_eq!(system.balance_of_assets(&staker).unwrap(), expected);

    // Past the end the vested profit is capped at what was scheduled.
    system.clock().advance(10 * SECS_PER_WEEK);
    assert_eq!(system.vault_total_assets().unwrap(), stake + 500_000_000);
}

#[test]
fn late_depositor_does_not_capture_vested_profit() {
    let (auth, mut system) = system();
    let vault = system.vault().account().clone();
    let early = fund(&mut system, "early", &vault, 1_000_000);
    let late = fund(&mut system, "late", &vault, 2_000_000);
    system.deposit(&early, 1_000_000, &early).unwrap();

    system.stablecoin_mut().mint(&vault, 100_000).unwrap();
    system.update_vesting_schedule(&auth, SECS_PER_WEEK).unwrap();
    system.clock().advance(SECS_PER_WEEK);

    let early_before = system.max_withdraw(&early).unwrap();
    system.deposit(&late, 1_000_000, &late).unwrap();
    assert!(system.max_withdraw(&late).unwrap() <= 1_000_000);
    assert!(system.max_withdraw(&early).unwrap() + 1 >= early_before);
}

#[test]
fn delegated_withdraw_spends_share_allowance() {
    let (_auth, mut system) = system();
    let vault = system.vault().account().clone();
    let owner = fund(&mut system, "owner", &vault, 1_000);
    let agent = AccountId::new("agent");
    system.mint_vault_shares(&owner, 1_000, &owner).unwrap();

    let err = system.withdraw(&agent, 400, &agent, &owner).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientReserves);

    system.approve_vault_shares(&owner, &agent, 400);
    assert_eq!(system.withdraw(&agent, 400, &agent, &owner).unwrap(), 400);
    assert_eq!(system.stablecoin().balance_of(&agent), 400);
    assert_eq!(system.max_redeem(&owner), 600);
}

// ---------------------------------------------------------------------------
// 5. Snapshots
// ---------------------------------------------------------------------------

#[test]
fn snapshot_captures_the_whole_system() {
    let (auth, mut system) = system();
    let reit = system.reit().account().clone();
    let buyer = fund(&mut system, "buyer", &reit, 1_000 * USD);
    system.buy(&buyer, 1_000_000).unwrap();
    let id = system.add_property(&auth, "ipfs://tower", 6_000, 40 * USD).unwrap();
    system.mint_property(&auth, "landlord".into(), "ipfs://shed", 1_000, 10).unwrap();
    let spender = registry_account(&system);
    let tenant = fund(&mut system, "tenant", &spender, 6_000);
    system.pay_rent(&tenant, id).unwrap();

    let snap = system.snapshot().unwrap();
    assert_eq!(snap.taken_at.as_secs(), START);
    assert_eq!(snap.treasury.cash_reserves, 60 * USD + 6_000);
    assert_eq!(snap.treasury.property_value, 40 * USD + 10);
    assert_eq!(snap.treasury.nav, 100 * USD + 6_010);
    assert_eq!(snap.treasury.total_rent, 7_000);
    assert_eq!(snap.treasury.circulating_shares, 1_000_000);
    assert_eq!(snap.treasury.backing_per_share, 100 * USD + 6_010);
    assert_eq!(snap.properties.len(), 2);
    assert_eq!(snap.occupied_count(), 1);
    assert_eq!(snap.vault.total_supply, 0);

    assert_eq!(SystemSnapshot::from_json(&snap.to_json().unwrap()).unwrap(), snap);
    assert_eq!(SystemSnapshot::from_bytes(&snap.to_bytes().unwrap()).unwrap(), snap);
}
