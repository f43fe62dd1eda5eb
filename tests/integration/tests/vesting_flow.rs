//! Vesting end to end: grants vest after the sale, beneficiaries and the wallet withdraw

use dutchsale_integration_tests::*;

/// Sell out at the ceiling, then let two vesting grants run
fn sold_out_with_vesting() -> Router {
    let mut r = deploy_with_vesting();
    r.fund_native(CAROL, 250_000 * UNIT);
    start_auction(&mut r);
    assert_eq!(r.bid(CAROL, 250_000 * UNIT).unwrap(), 250_000 * UNIT);
    assert_eq!(r.auction().stage(), Stage::AuctionEnded);
    r
}

#[test]
fn test_vesting_schedule() {
    println!("========================================");
    println!("Vesting");
    println!("========================================");

    let mut r = sold_out_with_vesting();
    let wallet = r.addresses().multisig;
    let vestings = r.addresses().vestings.clone();
    let (alice_vesting, bob_vesting) = (vestings[0], vestings[1]);
    let grant = 500_000 * UNIT;

    // Unsold tokens are the only ones the wallet holds
    let sold = tokens_for(250_000 * UNIT, r.auction().final_price()).unwrap();
    assert_eq!(r.token_balance(&wallet), MAX_TOKENS_SOLD - sold);
    assert_eq!(r.vesting(&alice_vesting).unwrap().total_allocated(), grant);

    // Nothing before the cliff
    assert_eq!(r.calc_max_withdraw(&alice_vesting).unwrap(), 0);
    assert_eq!(
        r.withdraw(ALICE, alice_vesting, ALICE, 1),
        Err(SaleError::NotYetVested)
    );

    r.advance_time(WAITING_PERIOD + 1);
    assert_eq!(r.update_stage(ALICE).unwrap(), Stage::TradingStarted);

    r.set_timestamp(T0 + ONE_YEAR).unwrap();
    assert_eq!(r.calc_max_withdraw(&alice_vesting).unwrap(), grant / 4);

    r.set_timestamp(T0 + 2 * ONE_YEAR).unwrap();
    let half = r.calc_max_withdraw(&alice_vesting).unwrap();
    assert_eq!(half, grant / 2);
    println!("  Withdrawable after two years: {}", half);

    assert_eq!(
        r.withdraw(ALICE, alice_vesting, ALICE, half + 1),
        Err(SaleError::InsufficientVested)
    );
    assert_eq!(r.withdraw(BOB, alice_vesting, BOB, 1), Err(SaleError::Unauthorized));

    r.withdraw(ALICE, alice_vesting, ALICE, half).unwrap();
    assert_eq!(r.calc_max_withdraw(&alice_vesting).unwrap(), 0);
    assert_eq!(r.token_balance(&ALICE), half);
    assert_eq!(r.token_balance(&alice_vesting), grant - half);
    assert_eq!(r.vesting(&alice_vesting).unwrap().withdrawn(), half);

    // The wallet takes back what is left of ALICE's grant
    let wallet_before = r.token_balance(&wallet);
    wallet_exec(&mut r, alice_vesting, VestingInstruction::Revoke.pack());
    assert_eq!(r.token_balance(&alice_vesting), 0);
    assert_eq!(r.token_balance(&wallet), wallet_before + grant - half);
    assert_eq!(r.calc_max_withdraw(&alice_vesting).unwrap(), 0);

    // And pulls BOB's vested half to itself
    wallet_exec(&mut r, bob_vesting, VestingInstruction::WalletWithdraw.pack());
    assert_eq!(r.token_balance(&wallet), wallet_before + grant - half + grant / 2);
    assert_eq!(r.calc_max_withdraw(&bob_vesting).unwrap(), 0);
    assert!(r.token().is_conserved());
}

#[test]
fn test_wallet_withdraw_needs_confirmation() {
    let mut r = sold_out_with_vesting();
    let bob_vesting = r.addresses().vestings[1];
    r.advance_time(WAITING_PERIOD + 1);
    r.update_stage(BOB).unwrap();
    r.set_timestamp(T0 + ONE_YEAR).unwrap();

    // A beneficiary cannot use the wallet path
    let payload = VestingInstruction::WalletWithdraw.pack();
    assert_eq!(r.call(BOB, bob_vesting, 0, &payload), Err(SaleError::Unauthorized));

    let (id, outcome) = r.submit_transaction(OWNER_A, bob_vesting, 0, payload).unwrap();
    assert_eq!(outcome, ExecutionOutcome::Pending);
    assert_eq!(r.calc_max_withdraw(&bob_vesting).unwrap(), 500_000 * UNIT / 4);

    assert_eq!(r.confirm_transaction(OWNER_B, id).unwrap(), ExecutionOutcome::Executed);
    assert_eq!(r.calc_max_withdraw(&bob_vesting).unwrap(), 0);
    assert_eq!(r.vesting(&bob_vesting).unwrap().withdrawn(), 500_000 * UNIT / 4);
}

#[test]
fn test_withdraw_locked_until_trading() {
    let mut r = sold_out_with_vesting();
    let alice_vesting = r.addresses().vestings[0];

    // Past the cliff but the waiting period has not run out yet
    r.advance_time(WAITING_PERIOD);
    assert!(r.calc_max_withdraw(&alice_vesting).unwrap() > 0);
    assert_eq!(
        r.withdraw(ALICE, alice_vesting, ALICE, 1),
        Err(SaleError::TransfersLocked)
    );
    assert_eq!(r.vesting(&alice_vesting).unwrap().withdrawn(), 0);
}
