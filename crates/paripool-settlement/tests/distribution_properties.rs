//! Property-based tests for settlement invariants
//!
//! These tests use proptest to verify critical invariants:
//! - Exact distribution: Σ(payouts) == pool, for any vote set
//! - Remainder placement: the last qualifying vote absorbs the truncation
//! - Floor shares: every earlier winner gets exactly floor(stake·pool/total)
//! - Determinism: same round state → same plan and digest

use chrono::Utc;
use paripool_settlement::{plan_settlement, verify_exact_distribution, verify_settlement_digest};
use paripool_types::{Amount, CastVote, OptionId, Round, RoundId};
use proptest::prelude::*;

/// Strategy for a single vote: any of the four options, positive stake.
fn vote_strategy() -> impl Strategy<Value = (u8, Amount)> {
    (0u8..4, 1u64..1_000_000_000_000u64)
}

/// Build a round whose tallies and voter list mirror the given votes.
fn build_round(entries: &[(u8, Amount)]) -> (Round, Vec<CastVote>) {
    let start = Utc::now();
    let mut round = Round::open(RoundId::FIRST, start, start + chrono::Duration::hours(1));
    let mut votes = Vec::new();
    for &(option, amount) in entries {
        let vote = CastVote::dummy(option, amount);
        round.credit(vote.option, amount).unwrap();
        round.voters.push(vote.voter);
        votes.push(vote);
    }
    (round, votes)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: payouts always sum to exactly the pool.
    #[test]
    fn prop_payouts_sum_to_pool(entries in prop::collection::vec(vote_strategy(), 1..64)) {
        let (round, votes) = build_round(&entries);
        let plan = plan_settlement(&round, &votes).unwrap();

        let total: u128 = plan.payouts.iter().map(|p| u128::from(p.amount)).sum();
        prop_assert_eq!(total, u128::from(round.pool));
        prop_assert!(verify_exact_distribution(&plan).is_ok());
    }

    /// Property: exactly the winning votes are paid, in admission order,
    /// and the last of them absorbs the remainder.
    #[test]
    fn prop_absorber_is_last_winning_vote(entries in prop::collection::vec(vote_strategy(), 1..64)) {
        let (round, votes) = build_round(&entries);
        let plan = plan_settlement(&round, &votes).unwrap();

        let winners: Vec<&CastVote> = votes
            .iter()
            .filter(|vote| vote.option == plan.outcome)
            .collect();
        prop_assert_eq!(plan.payouts.len(), winners.len());
        prop_assert_eq!(plan.winner_count, winners.len());
        for (payout, vote) in plan.payouts.iter().zip(&winners) {
            prop_assert_eq!(payout.voter, vote.voter);
        }

        let absorber = winners.last().unwrap();
        prop_assert_eq!(plan.payouts.last().unwrap().voter, absorber.voter);
    }

    /// Property: every winner except the absorber receives the exact
    /// floor share; nobody is paid less than their stake.
    #[test]
    fn prop_leading_winners_get_floor_shares(entries in prop::collection::vec(vote_strategy(), 1..64)) {
        let (round, votes) = build_round(&entries);
        let plan = plan_settlement(&round, &votes).unwrap();

        let pool = u128::from(round.pool);
        let winner_total = u128::from(round.tallies.get(plan.outcome));
        let winners: Vec<&CastVote> = votes
            .iter()
            .filter(|vote| vote.option == plan.outcome)
            .collect();

        for (payout, vote) in plan.payouts.iter().zip(&winners).take(winners.len() - 1) {
            let expected = u128::from(vote.amount) * pool / winner_total;
            prop_assert_eq!(u128::from(payout.amount), expected);
        }
        for (payout, vote) in plan.payouts.iter().zip(&winners) {
            prop_assert!(payout.amount >= vote.amount, "payout below stake");
        }
    }

    /// Property: the winning option holds a strictly greater tally than
    /// every option before it and at least as much as every option after.
    #[test]
    fn prop_outcome_is_plurality_with_lowest_index_tie_break(
        entries in prop::collection::vec(vote_strategy(), 1..64),
    ) {
        let (round, votes) = build_round(&entries);
        let plan = plan_settlement(&round, &votes).unwrap();

        let winning = round.tallies.get(plan.outcome);
        for option in OptionId::ALL {
            if option.index() < plan.outcome.index() {
                prop_assert!(round.tallies.get(option) < winning);
            } else {
                prop_assert!(round.tallies.get(option) <= winning);
            }
        }
    }

    /// Property: planning is deterministic, payload and digest alike.
    #[test]
    fn prop_replanning_is_deterministic(entries in prop::collection::vec(vote_strategy(), 1..32)) {
        let (round, votes) = build_round(&entries);
        let first = plan_settlement(&round, &votes).unwrap();
        let second = plan_settlement(&round, &votes).unwrap();

        prop_assert_eq!(first.digest, second.digest);
        prop_assert_eq!(&first.payouts, &second.payouts);
        prop_assert!(verify_settlement_digest(&first));
    }
}
