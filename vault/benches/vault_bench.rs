use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use reit_ledger::FungibleLedger;
use reit_nullables::NullLedger;
use reit_types::{AccountId, Authority, Timestamp, SECS_PER_WEEK};
use reit_vault::VestingVault;

fn vesting_vault(holders: usize) -> (Authority, VestingVault, NullLedger) {
    let auth = Authority::new();
    let mut vault = VestingVault::new(&auth, "vault".into(), "USD", 1_000_000, Timestamp::new(0)).unwrap();
    let mut usd = NullLedger::new("USD", 6);
    for i in 0..holders {
        let who = AccountId::new(format!("holder-{i}"));
        usd.mint(&who, 1_000_000_000).unwrap();
        usd.approve(&who, vault.account(), u128::MAX).unwrap();
        vault
            .deposit(&mut usd, &who, 1_000_000 + i as u128, &who, Timestamp::new(0))
            .unwrap();
    }
    usd.mint(vault.account(), 500_000_000).unwrap();
    vault
        .update_vesting_schedule(&auth, &usd, 4 * SECS_PER_WEEK, Timestamp::new(0))
        .unwrap();
    (auth, vault, usd)
}

fn bench_total_assets(c: &mut Criterion) {
    let (_auth, vault, _usd) = vesting_vault(1);
    c.bench_function("vault_total_assets", |b| {
        b.iter(|| black_box(vault.total_assets(black_box(Timestamp::new(SECS_PER_WEEK)))));
    });
}

fn bench_conversions(c: &mut Criterion) {
    let mut group = c.benchmark_group("vault_conversions");
    let (_auth, vault, _usd) = vesting_vault(16);
    let now = Timestamp::new(2 * SECS_PER_WEEK);

    for amount in [1u128, 1_000_000, u64::MAX as u128, u128::MAX / 4] {
        group.bench_with_input(BenchmarkId::new("convert_to_shares", amount), &amount, |b, &a| {
            b.iter(|| black_box(vault.convert_to_shares(black_box(a), now)));
        });
        group.bench_with_input(BenchmarkId::new("preview_withdraw", amount), &amount, |b, &a| {
            b.iter(|| black_box(vault.preview_withdraw(black_box(a), now)));
        });
    }

    group.finish();
}

fn bench_deposit_withdraw(c: &mut Criterion) {
    let (_auth, mut vault, mut usd) = vesting_vault(16);
    let who = AccountId::new("bench");
    usd.mint(&who, u64::MAX as u128).unwrap();
    usd.approve(&who, vault.account(), u128::MAX).unwrap();
    let now = Timestamp::new(SECS_PER_WEEK);

    c.bench_function("vault_deposit_withdraw", |b| {
        b.iter(|| {
            vault.deposit(&mut usd, &who, black_box(1_000_000), &who, now).unwrap();
            let max = vault.max_withdraw(&who, now).unwrap();
            vault.withdraw(&mut usd, &who, max, &who, &who, now).unwrap();
        });
    });
}

criterion_group!(benches, bench_total_assets, bench_conversions, bench_deposit_withdraw);
criterion_main!(benches);
