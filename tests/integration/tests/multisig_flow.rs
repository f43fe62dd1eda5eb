//! Multisig wallet end to end: confirmations, administration and the daily limit

use dutchsale_integration_tests::*;

#[test]
fn test_confirmation_lifecycle() {
    let mut r = deploy_single_wallet();
    let auction = r.addresses().auction;
    let start = AuctionInstruction::StartAuction.pack();

    assert_eq!(
        r.submit_transaction(ALICE, auction, 0, start.clone()),
        Err(SaleError::Unauthorized)
    );

    let (id, outcome) = r.submit_transaction(OWNER_A, auction, 0, start).unwrap();
    assert_eq!(outcome, ExecutionOutcome::Pending);
    assert_eq!(r.multisig().confirmation_count(id).unwrap(), 1);
    assert_eq!(r.confirm_transaction(OWNER_A, id), Err(SaleError::AlreadyConfirmed));
    assert_eq!(r.revoke_confirmation(OWNER_B, id), Err(SaleError::NotConfirmed));

    r.revoke_confirmation(OWNER_A, id).unwrap();
    assert_eq!(r.multisig().confirmation_count(id).unwrap(), 0);

    assert_eq!(r.confirm_transaction(OWNER_B, id).unwrap(), ExecutionOutcome::Pending);
    assert_eq!(r.confirm_transaction(OWNER_A, id).unwrap(), ExecutionOutcome::Executed);
    assert_eq!(r.auction().stage(), Stage::AuctionStarted);

    // Executed exactly once
    assert!(r.multisig().transaction(id).unwrap().executed);
    assert_eq!(r.execute_transaction(OWNER_A, id), Err(SaleError::AlreadyExecuted));
    assert_eq!(r.revoke_confirmation(OWNER_A, id), Err(SaleError::AlreadyExecuted));
    assert_eq!(r.multisig().transaction_count(false, true), 1);
    assert_eq!(r.multisig().transaction_count(true, false), 0);
    assert_eq!(
        r.confirm_transaction(OWNER_B, 7),
        Err(SaleError::TransactionNotFound)
    );
}

#[test]
fn test_owner_administration() {
    let mut r = deploy_single_wallet();
    let wallet = r.addresses().multisig;

    // Only a confirmed self-call can administer the wallet
    let add = MultisigInstruction::AddOwner { owner: OWNER_C }.pack();
    assert_eq!(r.call(OWNER_A, wallet, 0, &add), Err(SaleError::Unauthorized));

    wallet_exec(&mut r, wallet, add);
    assert!(r.multisig().is_owner(&OWNER_C));
    assert_eq!(r.multisig().owners().len(), 3);

    wallet_exec(&mut r, wallet, MultisigInstruction::ChangeRequirement { required: 3 }.pack());
    assert_eq!(r.multisig().required(), 3);

    // Requirement above the owner count is rejected and the transaction stays pending
    let too_many = MultisigInstruction::ChangeRequirement { required: 4 }.pack();
    let outcome = r.wallet_call(wallet, 0, too_many).unwrap();
    assert_eq!(outcome, ExecutionOutcome::Failed(SaleError::InvalidRequirement));

    let replace = MultisigInstruction::ReplaceOwner { owner: OWNER_C, new_owner: CAROL }.pack();
    wallet_exec(&mut r, wallet, replace);
    assert!(r.multisig().is_owner(&CAROL));
    assert!(!r.multisig().is_owner(&OWNER_C));

    // Removing an owner lowers the requirement to fit
    wallet_exec(&mut r, wallet, MultisigInstruction::RemoveOwner { owner: CAROL }.pack());
    assert_eq!(r.multisig().owners(), &[OWNER_A, OWNER_B]);
    assert_eq!(r.multisig().required(), 2);
}

#[test]
fn test_daily_limit_for_value_transfers() {
    let mut r = deploy_single_wallet();
    let wallet = r.addresses().multisig;
    r.fund_native(ALICE, 250_000 * UNIT);
    start_auction(&mut r);
    r.bid(ALICE, 250_000 * UNIT).unwrap();
    assert_eq!(r.native_balance(&wallet), 250_000 * UNIT);

    // Without a limit a payout needs both owners
    let (id, outcome) = r.submit_transaction(OWNER_A, BOB, 10 * UNIT, Vec::new()).unwrap();
    assert_eq!(outcome, ExecutionOutcome::Pending);

    wallet_exec(&mut r, wallet, MultisigInstruction::ChangeDailyLimit { daily_limit: 100 * UNIT }.pack());
    assert_eq!(r.multisig().daily_limit(), 100 * UNIT);

    // Within the limit a single owner is enough
    assert_eq!(r.execute_transaction(OWNER_A, id).unwrap(), ExecutionOutcome::Executed);
    let (_, outcome) = r.submit_transaction(OWNER_B, BOB, 90 * UNIT, Vec::new()).unwrap();
    assert_eq!(outcome, ExecutionOutcome::Executed);
    assert_eq!(r.native_balance(&BOB), 100 * UNIT);
    assert_eq!(r.multisig().spent_today(), 100 * UNIT);

    // Limit exhausted for today
    let (next, outcome) = r.submit_transaction(OWNER_A, BOB, UNIT, Vec::new()).unwrap();
    assert_eq!(outcome, ExecutionOutcome::Pending);

    // The window rolls over after a day
    r.advance_time(24 * 60 * 60 + 1);
    assert_eq!(r.execute_transaction(OWNER_A, next).unwrap(), ExecutionOutcome::Executed);
    assert_eq!(r.native_balance(&BOB), 101 * UNIT);
}
