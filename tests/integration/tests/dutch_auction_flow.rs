//! Dutch auction end to end: bids, stop price, finalization, claims, trading

use dutchsale_integration_tests::*;

/// Second bid arrives two months in and pushes the stop price to the token price
#[test]
fn test_bid_triggers_stop_price() {
    println!("========================================");
    println!("Bid triggers stop price");
    println!("========================================");

    let mut r = deploy_single_wallet();
    let auction = r.addresses().auction;
    let wallet = r.addresses().multisig;
    r.fund_native(ALICE, 1_000_000 * UNIT);
    r.fund_native(BOB, 1_000_000 * UNIT);

    start_auction(&mut r);
    assert_eq!(r.calc_token_price().unwrap(), 4000 * UNIT / 7500 + 1);

    let first = r.bid(ALICE, 100_000 * UNIT).unwrap();
    assert_eq!(first, 100_000 * UNIT);
    assert_eq!(r.calc_stop_price().unwrap(), first / 9_000_000 + 1);
    assert_eq!(r.native_balance(&auction), first);

    r.advance_blocks(BLOCKS_PER_DAY * 60);
    let price = r.calc_token_price().unwrap();
    assert_eq!(price, 4000 * UNIT / (BLOCKS_PER_DAY as u128 * 60 + 7500) + 1);

    // Only what the remaining supply can absorb at this price is taken
    let second = r.bid(BOB, 150_000 * UNIT).unwrap();
    assert_eq!(second, 9_000_000 * price - first);
    assert_eq!(r.native_balance(&BOB), 1_000_000 * UNIT - second);

    println!("  Token price: {}", price);
    println!("  Accepted:    {} + {}", first, second);

    assert_eq!(r.auction().stage(), Stage::AuctionEnded);
    assert_eq!(r.auction().final_price(), price);
    assert_eq!(r.calc_stop_price().unwrap(), price + 1);
    assert_eq!(r.auction().total_received(), first + second);

    // Closed: nothing more is accepted and nothing moves
    let before = r.clone();
    assert_eq!(r.bid(BOB, 1), Err(SaleError::InvalidStage));
    assert_eq!(r, before);

    // Proceeds and unsold tokens went to the wallet
    let sold = tokens_for(first + second, price).unwrap();
    assert_eq!(r.native_balance(&auction), 0);
    assert_eq!(r.native_balance(&wallet), first + second);
    assert_eq!(r.token_balance(&wallet), TOTAL_TOKENS - MAX_TOKENS_SOLD + MAX_TOKENS_SOLD - sold);

    let alice_tokens = r.claim_tokens(ALICE, ALICE).unwrap();
    let bob_tokens = r.claim_tokens(CAROL, BOB).unwrap();
    assert_eq!(alice_tokens, tokens_for(first, price).unwrap());
    assert_eq!(bob_tokens, tokens_for(second, price).unwrap());
    assert!(alice_tokens + bob_tokens <= sold);
    assert_eq!(r.token_balance(&BOB), bob_tokens);

    // Second claim pays nothing
    assert_eq!(r.claim_tokens(ALICE, ALICE).unwrap(), 0);
    assert!(r.auction().contribution(&ALICE).claimed);
    assert!(r.token().is_conserved());
}

#[test]
fn test_ceiling_ends_auction_and_refuses_excess() {
    let mut r = deploy_single_wallet();
    r.fund_native(ALICE, 400_000 * UNIT);
    start_auction(&mut r);

    let accepted = r.bid(ALICE, 400_000 * UNIT).unwrap();
    assert_eq!(accepted, 250_000 * UNIT);
    assert_eq!(r.native_balance(&ALICE), 150_000 * UNIT);
    assert_eq!(r.auction().stage(), Stage::AuctionEnded);
    assert_eq!(r.auction().bids().len(), 1);
    assert_eq!(r.auction().bids()[0].amount, accepted);
}

#[test]
fn test_price_decay_ends_auction_lazily() {
    let mut r = deploy_single_wallet();
    r.fund_native(ALICE, 1_000_000 * UNIT);
    start_auction(&mut r);
    r.bid(ALICE, 100_000 * UNIT).unwrap();

    // Ten years of blocks drive the curve under the stop price
    r.advance_blocks(BLOCKS_PER_DAY * 3650);
    let stop = r.calc_stop_price().unwrap();
    assert!(stop >= r.calc_token_price().unwrap());

    assert_eq!(r.bid(ALICE, UNIT), Err(SaleError::InvalidStage));
    assert_eq!(r.auction().stage(), Stage::AuctionStarted);

    assert_eq!(r.update_stage(DEPLOYER).unwrap(), Stage::AuctionEnded);
    assert_eq!(r.auction().final_price(), stop);
    assert_eq!(r.auction().end_time(), r.clock().timestamp);

    let owed = r.claim_tokens(ALICE, ALICE).unwrap();
    assert!(owed <= MAX_TOKENS_SOLD);
    assert!(r.token().is_conserved());
}

#[test]
fn test_trading_unlocks_after_waiting_period() {
    let mut r = deploy_single_wallet();
    r.fund_native(ALICE, 250_000 * UNIT);
    start_auction(&mut r);
    r.bid(ALICE, 250_000 * UNIT).unwrap();
    r.claim_tokens(ALICE, ALICE).unwrap();

    assert_eq!(r.transfer(ALICE, BOB, UNIT), Err(SaleError::TransfersLocked));

    r.advance_time(WAITING_PERIOD);
    assert_eq!(r.update_stage(BOB).unwrap(), Stage::AuctionEnded);
    r.advance_time(1);
    assert_eq!(r.update_stage(BOB).unwrap(), Stage::TradingStarted);

    r.transfer(ALICE, BOB, UNIT).unwrap();
    assert_eq!(r.token_balance(&BOB), UNIT);

    // Allowances work once trading is on
    r.approve(ALICE, CAROL, 2 * UNIT).unwrap();
    assert_eq!(r.transfer_from(CAROL, ALICE, CAROL, 3 * UNIT), Err(SaleError::InsufficientAllowance));
    r.transfer_from(CAROL, ALICE, CAROL, 2 * UNIT).unwrap();
    assert_eq!(r.token().allowance(&ALICE, &CAROL), 0);
    assert!(r.token().is_conserved());
}

#[test]
fn test_claim_before_end_rejected() {
    let mut r = deploy_single_wallet();
    r.fund_native(ALICE, UNIT);
    start_auction(&mut r);
    r.bid(ALICE, UNIT).unwrap();
    assert_eq!(r.claim_tokens(ALICE, ALICE), Err(SaleError::InvalidStage));
    assert_eq!(r.update_stage(ALICE).unwrap(), Stage::AuctionStarted);
}

#[test]
fn test_settings_change_through_wallet_only() {
    let mut r = deploy_single_wallet();
    let auction = r.addresses().auction;
    let payload = AuctionInstruction::ChangeSettings { ceiling: 100 * UNIT, price_factor: 2000 }.pack();

    // Owners cannot act for the wallet directly
    assert_eq!(r.call(OWNER_A, auction, 0, &payload), Err(SaleError::Unauthorized));

    wallet_exec(&mut r, auction, payload);
    assert_eq!(r.auction().ceiling(), 100 * UNIT);
    assert_eq!(r.auction().price_factor(), 2000);

    start_auction(&mut r);
    let late = AuctionInstruction::ChangeSettings { ceiling: UNIT, price_factor: 1 }.pack();
    let outcome = r.wallet_call(auction, 0, late).unwrap();
    assert_eq!(outcome, ExecutionOutcome::Failed(SaleError::InvalidStage));
    assert_eq!(r.auction().ceiling(), 100 * UNIT);
}

#[test]
fn test_value_sent_to_programs_is_refused() {
    let mut r = deploy_with_vesting();
    let auction = r.addresses().auction;
    let vesting = r.addresses().vestings[0];
    r.fund_native(ALICE, 300_000 * UNIT);
    start_auction(&mut r);

    // The bid amount is the only currency a bid moves
    let bid = AuctionInstruction::Bid { amount: UNIT }.pack();
    assert_eq!(r.call(ALICE, auction, 100 * UNIT, &bid), Err(SaleError::InvalidParameter));
    assert_eq!(r.native_balance(&ALICE), 300_000 * UNIT);
    r.call(ALICE, auction, 0, &bid).unwrap();
    assert_eq!(r.native_balance(&ALICE), 300_000 * UNIT - UNIT);
    assert_eq!(r.auction().contribution(&ALICE).amount, UNIT);
    assert_eq!(r.native_balance(&auction), r.auction().total_received());

    r.bid(ALICE, 250_000 * UNIT).unwrap();
    assert_eq!(r.auction().stage(), Stage::AuctionEnded);
    assert_eq!(r.native_balance(&auction), 0);

    // Nothing can strand currency in a program after the sweep
    let claim = AuctionInstruction::ClaimTokens { bidder: ALICE }.pack();
    assert_eq!(r.call(ALICE, auction, 5 * UNIT, &claim), Err(SaleError::InvalidParameter));
    assert_eq!(r.call(ALICE, auction, 7 * UNIT, &[]), Err(SaleError::InvalidParameter));
    assert_eq!(r.call(ALICE, vesting, UNIT, &[]), Err(SaleError::InvalidParameter));
    assert_eq!(r.native_balance(&auction), 0);
    assert_eq!(r.native_balance(&vesting), 0);

    r.call(ALICE, auction, 0, &claim).unwrap();
    assert!(r.auction().contribution(&ALICE).claimed);
}
