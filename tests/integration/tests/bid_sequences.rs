//! Random bid sequences through the router: native custody and token supply stay consistent

use dutchsale_integration_tests::*;
use proptest::prelude::*;

const BIDDERS: [Pubkey; 3] = [ALICE, BOB, CAROL];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_auction_custody_matches_accepted_bids(
        bids in proptest::collection::vec((0usize..3, 1_000u128..200_000, 0u64..100_000, 0u128..10), 1..10),
    ) {
        let mut r = deploy_single_wallet();
        let auction = r.addresses().auction;
        let wallet = r.addresses().multisig;
        for bidder in BIDDERS {
            r.fund_native(bidder, 1_000_000 * UNIT);
        }
        start_auction(&mut r);

        let mut accepted_sum = 0u128;
        for (who, amount, gap, value) in bids {
            r.advance_blocks(gap);
            let bidder = BIDDERS[who];

            // Value attached to a program call is refused and nothing moves
            if value > 0 {
                let before = r.clone();
                let payload = AuctionInstruction::Bid { amount: amount * UNIT }.pack();
                prop_assert_eq!(r.call(bidder, auction, value * UNIT, &payload), Err(SaleError::InvalidParameter));
                prop_assert_eq!(&r, &before);
            }

            match r.bid(bidder, amount * UNIT) {
                Ok(accepted) => accepted_sum += accepted,
                Err(e) => prop_assert_eq!(e, SaleError::InvalidStage),
            }
            prop_assert_eq!(r.auction().total_received(), accepted_sum);
            if r.auction().stage() == Stage::AuctionStarted {
                prop_assert_eq!(r.native_balance(&auction), accepted_sum);
            } else {
                prop_assert_eq!(r.native_balance(&auction), 0);
            }
        }

        // A century of blocks pushes the price under any stop price reachable here
        r.advance_blocks(BLOCKS_PER_DAY * 36_500);
        prop_assert!(r.update_stage(DEPLOYER).unwrap() >= Stage::AuctionEnded);
        prop_assert_eq!(r.native_balance(&auction), 0);
        prop_assert_eq!(r.native_balance(&wallet), accepted_sum);

        let mut claimed = 0u128;
        for bidder in BIDDERS {
            claimed += r.claim_tokens(bidder, bidder).unwrap();
        }
        prop_assert!(claimed <= tokens_for(accepted_sum, r.auction().final_price()).unwrap());
        prop_assert!(claimed <= MAX_TOKENS_SOLD);
        prop_assert_eq!(r.native_balance(&auction), 0);
        prop_assert!(r.token().is_conserved());
    }
}
