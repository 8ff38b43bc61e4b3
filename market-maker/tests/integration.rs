//! Curve-level scenario tests: price invariance under trading, expansion
//! schedule behavior, and state integrity across failed operations.

use curve_math::WAD;
use market_maker::{MarketError, MarketMaker};
use reserve_core::constants::SECONDS_PER_DAY;
use reserve_core::{Address, AuthorizationContext, ManualClock};

const DAILY_EXPANSION_WAD: u128 = 999_388_834_642_296_000;

fn setup(gd_supply: u128, reserve_supply: u128, ratio_ppm: u64) -> (MarketMaker, Address, ManualClock) {
    let auth = AuthorizationContext::new("reserve");
    let clock = ManualClock::new(0);
    let mut market = MarketMaker::new("reserve", DAILY_EXPANSION_WAD);
    let asset: Address = "cdai".to_string();
    market
        .initialize_token(&auth, &asset, gd_supply, reserve_supply, ratio_ppm, 8, &clock)
        .unwrap();
    (market, asset, clock)
}

#[test]
fn test_matched_buy_then_sell_returns_to_start() {
    let (mut market, asset, _) = setup(1_000_000, 1_000_000, 200_000);
    let auth = AuthorizationContext::new("reserve");

    let price_start = market.current_price_wad(&asset).unwrap();
    let gd_out = market.buy(&auth, &asset, 50_000).unwrap();
    let reserve_back = market.sell(&auth, &asset, gd_out).unwrap();

    // floors only ever shave value toward the reserve
    assert!(reserve_back <= 50_000);
    assert!(50_000 - reserve_back <= 10);

    let price_end = market.current_price_wad(&asset).unwrap();
    let tolerance = price_start / 100_000;
    assert!(price_start.abs_diff(price_end) <= tolerance.max(2));
}

#[test]
fn test_trading_never_moves_the_ratio() {
    let (mut market, asset, _) = setup(1_000_000, 1_000_000, 350_000);
    let auth = AuthorizationContext::new("reserve");

    for round in 1..=10u128 {
        let gd_out = market.buy(&auth, &asset, 1_000 * round).unwrap();
        market.sell(&auth, &asset, gd_out / 2).unwrap();
        assert_eq!(market.token(&asset).unwrap().reserve_ratio_ppm, 350_000);
    }
}

#[test]
fn test_buy_price_tracks_formula_prediction() {
    // after a buy, supply and reserve land exactly where the quote said
    let (mut market, asset, _) = setup(2_000_000, 500_000, 400_000);
    let auth = AuthorizationContext::new("reserve");

    let quote = market.buy_return(&asset, 25_000).unwrap();
    let minted = market.buy(&auth, &asset, 25_000).unwrap();
    assert_eq!(minted, quote);

    let rec = market.token(&asset).unwrap();
    assert_eq!(rec.gd_supply, 2_000_000 + quote);
    assert_eq!(rec.reserve_supply, 525_000);
}

#[test]
fn test_daily_expansion_schedule_decays_ratio() {
    let (mut market, asset, clock) = setup(1_000_000, 1_000_000, 200_000);
    let auth = AuthorizationContext::new("reserve");

    let mut previous = 200_000u64;
    for _ in 0..30 {
        clock.advance(SECONDS_PER_DAY);
        let minted = market.mint_expansion(&auth, &asset, &clock).unwrap();
        let rec = market.token(&asset).unwrap();
        assert!(rec.reserve_ratio_ppm < previous);
        assert!(minted > 0);
        previous = rec.reserve_ratio_ppm;
    }

    // thirty daily steps of ~0.0611% each
    let rec = market.token(&asset).unwrap();
    assert!(rec.reserve_ratio_ppm < 200_000);
    assert!(rec.reserve_ratio_ppm > 195_000);
}

#[test]
fn test_expansion_supply_growth_matches_ratio_contraction() {
    let (mut market, asset, clock) = setup(1_000_000, 1_000_000, 200_000);
    let auth = AuthorizationContext::new("reserve");

    clock.advance(SECONDS_PER_DAY);
    let price_before = market.current_price_wad(&asset).unwrap();
    let predicted = market.calculate_mint_expansion(&asset).unwrap();
    let minted = market.mint_expansion(&auth, &asset, &clock).unwrap();
    assert_eq!(minted, predicted);

    let price_after = market.current_price_wad(&asset).unwrap();
    let tolerance = price_before / 100_000;
    assert!(price_before.abs_diff(price_after) <= tolerance.max(2));
}

#[test]
fn test_failed_operations_leave_state_intact() {
    let (mut market, asset, clock) = setup(1_000_000, 1_000_000, 200_000);
    let auth = AuthorizationContext::new("reserve");
    let before = market.token(&asset).unwrap().clone();

    // oversell
    assert!(matches!(
        market.sell(&auth, &asset, 2_000_000),
        Err(MarketError::InsufficientSupply { .. })
    ));
    // expansion before a day has passed
    assert!(matches!(
        market.mint_expansion(&auth, &asset, &clock),
        Err(MarketError::IntervalNotElapsed { .. })
    ));
    // wrong caller
    assert!(matches!(
        market.buy(&AuthorizationContext::new("mallory"), &asset, 1_000),
        Err(MarketError::Unauthorized(_))
    ));

    let after = market.token(&asset).unwrap();
    assert_eq!(after.gd_supply, before.gd_supply);
    assert_eq!(after.reserve_supply, before.reserve_supply);
    assert_eq!(after.reserve_ratio_ppm, before.reserve_ratio_ppm);
    assert_eq!(after.last_expansion, before.last_expansion);
}

#[test]
fn test_reserve_token_round_trips_through_json() {
    let (market, asset, _) = setup(1_000_000, 1_000_000, 200_000);
    let rec = market.token(&asset).unwrap();
    let json = serde_json::to_string(rec).unwrap();
    let back: market_maker::ReserveToken = serde_json::from_str(&json).unwrap();
    assert_eq!(back.gd_supply, rec.gd_supply);
    assert_eq!(back.reserve_ratio_ppm, rec.reserve_ratio_ppm);
}

#[test]
fn test_interest_mint_scales_with_deposit() {
    let (mut market, asset, _) = setup(1_000_000, 500_000, 200_000);
    let auth = AuthorizationContext::new("reserve");

    // price-neutral: gd_out = in * S / R = in * 2
    assert_eq!(market.calculate_mint_interest(&asset, 10_000).unwrap(), 20_000);
    let minted = market.mint_interest(&auth, &asset, 10_000).unwrap();
    assert_eq!(minted, 20_000);

    // price unchanged after the mint: R/(S * ratio) = 2.5
    let price = market.current_price_wad(&asset).unwrap();
    assert_eq!(price, 5 * WAD / 2);
}
