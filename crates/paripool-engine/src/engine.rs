//! The `PoolEngine` facade: one value that owns the whole voting pool.
//!
//! The engine composes the deposit plane (`paripool-ledger`) and the pure
//! settlement plane (`paripool-settlement`) behind a single `&mut self`
//! surface, so every state-changing operation runs to completion as one
//! serialized step. The ordering discipline is fixed: preconditions first,
//! custody transfers under the reentry guard, state commits before outbound
//! payouts.
//!
//! Time is injected. Every time-sensitive method takes `now` as an explicit
//! argument and the engine never reads the ambient clock, which keeps round
//! windows reproducible under test.

use chrono::{DateTime, Utc};

use paripool_ledger::{custody, ConservationTracker, DepositLedger, TokenGateway};
use paripool_settlement::{
    compute_settlement_digest, plan_settlement, select_outcome, verify_exact_distribution,
};
use paripool_types::constants::OPTION_COUNT;
use paripool_types::{
    Amount, OptionId, ParipoolError, PoolConfig, PoolEvent, Result, Round, RoundId, RoundResult,
    VoteRecord, VoterId,
};

use crate::reentry::ReentryFlag;

// ═══════════════════════════════════════════════════════════════════
// 1. POOL ENGINE
// ═══════════════════════════════════════════════════════════════════

/// Round lifecycle, vote admission, settlement, and administration over a
/// token gateway.
///
/// Exactly one round is tracked at a time; starting the next round replaces
/// the aggregate wholesale. Per-participant vote slots live in the
/// [`DepositLedger`] and are reused across rounds through round-id tags, so
/// a round reset never enumerates or clears storage.
pub struct PoolEngine<G> {
    config: PoolConfig,
    round: Option<Round>,
    ledger: DepositLedger,
    conservation: ConservationTracker,
    last_result: Option<RoundResult>,
    paused: bool,
    reentry: ReentryFlag,
    gateway: G,
    events: Vec<PoolEvent>,
}

impl<G: TokenGateway> PoolEngine<G> {
    /// A fresh engine with no round scheduled and an empty event log.
    pub fn new(config: PoolConfig, gateway: G) -> Self {
        Self {
            config,
            round: None,
            ledger: DepositLedger::new(),
            conservation: ConservationTracker::new(),
            last_result: None,
            paused: false,
            reentry: ReentryFlag::new(),
            gateway,
            events: Vec::new(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // 2. ROUND LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════

    /// Open the next voting round with a fresh aggregate and the given
    /// option labels.
    ///
    /// # Errors
    /// Fails if a round is open and unfinalized, if the window is not
    /// ordered `starts_at < ends_at`, or if `ends_at` is not strictly in
    /// the future.
    pub fn start_round(
        &mut self,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        labels: [String; OPTION_COUNT],
        now: DateTime<Utc>,
    ) -> Result<RoundId> {
        if let Some(round) = &self.round {
            if !round.finalized {
                return Err(ParipoolError::RoundAlreadyOpen(round.id));
            }
        }
        if starts_at >= ends_at {
            return Err(ParipoolError::InvalidTimeRange { starts_at, ends_at });
        }
        if ends_at <= now {
            return Err(ParipoolError::EndTimeInPast { ends_at });
        }

        let id = self.round.as_ref().map_or(RoundId::FIRST, |r| r.id.next());
        self.round = Some(Round::open(id, starts_at, ends_at));
        self.config.option_labels = labels.clone();
        self.events.push(PoolEvent::RoundStarted {
            round_id: id,
            starts_at,
            ends_at,
        });
        self.events.push(PoolEvent::LabelsUpdated { labels });
        tracing::info!(
            round_id = %id,
            starts_at = %starts_at,
            ends_at = %ends_at,
            "Round started"
        );
        Ok(id)
    }

    /// Labels and capacity may only change while no round can accept votes:
    /// before the window opens, or after finalization, or with no round at
    /// all.
    fn ensure_config_unlocked(&self, now: DateTime<Utc>) -> Result<()> {
        match &self.round {
            None => Ok(()),
            Some(round) if round.finalized => Ok(()),
            Some(round) if now < round.starts_at => Ok(()),
            Some(round) => Err(ParipoolError::ConfigurationLocked(round.id)),
        }
    }

    /// Replace the four option display labels.
    ///
    /// # Errors
    /// Fails while the configuration is locked by an in-flight round.
    pub fn set_labels(
        &mut self,
        labels: [String; OPTION_COUNT],
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.ensure_config_unlocked(now)?;
        self.config.option_labels = labels.clone();
        self.events.push(PoolEvent::LabelsUpdated { labels });
        tracing::info!("Option labels updated");
        Ok(())
    }

    /// Replace the per-round participant capacity.
    ///
    /// # Errors
    /// Fails while the configuration is locked, or if `capacity` is zero.
    pub fn set_capacity(&mut self, capacity: usize, now: DateTime<Utc>) -> Result<()> {
        self.ensure_config_unlocked(now)?;
        if capacity == 0 {
            return Err(ParipoolError::ZeroCapacity);
        }
        self.config.capacity = capacity;
        self.events.push(PoolEvent::CapacityUpdated { capacity });
        tracing::info!(capacity, "Participant capacity updated");
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // 3. VOTE ADMISSION
    // ═══════════════════════════════════════════════════════════════════

    /// Admit one vote: deposit `amount` on `option` for `voter`.
    ///
    /// Every rule is checked before the custody transfer; the transfer is
    /// measured against the realized custody delta; aggregates commit only
    /// after the measurement passes. A short delivery leaves whatever the
    /// token produced in custody and changes no engine state.
    ///
    /// # Errors
    /// The first failing rule is reported: suspension, round activity,
    /// option range, zero amount, duplicate vote, capacity, pool overflow,
    /// then transfer failures.
    pub fn vote(
        &mut self,
        voter: VoterId,
        option: u8,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if self.paused {
            return Err(ParipoolError::VotingSuspended);
        }
        let capacity = self.config.capacity;
        let Some(round) = self.round.as_mut() else {
            return Err(ParipoolError::NoRound);
        };
        if !round.is_active(now) {
            return Err(ParipoolError::RoundNotActive(round.id));
        }
        let option = OptionId::try_from(option)?;
        if amount == 0 {
            return Err(ParipoolError::ZeroAmount);
        }
        self.ledger.validate(round, voter, amount, capacity)?;

        let _guard = self.reentry.enter()?;
        custody::deposit_verified(&mut self.gateway, voter, amount)?;

        // The deposit is measured in custody; commit everything.
        self.ledger.record(round, voter, option, amount)?;
        self.conservation.record_deposit(amount);
        self.conservation.verify(round.pool)?;
        self.events.push(PoolEvent::VoteRecorded {
            round_id: round.id,
            voter,
            option,
            amount,
        });
        tracing::info!(
            round_id = %round.id,
            voter = %voter,
            option = %option,
            amount,
            "Vote recorded"
        );
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // 4. SETTLEMENT
    // ═══════════════════════════════════════════════════════════════════

    /// Settle the current round once its window has passed or its vote list
    /// is at capacity.
    ///
    /// # Errors
    /// Fails if no round exists, the round is already finalized, or the
    /// round is still open with spare capacity. Settlement integrity
    /// failures leave the round open and custody untouched.
    pub fn finalize(&mut self, now: DateTime<Utc>) -> Result<RoundResult> {
        let capacity = self.config.capacity;
        let round = self.round.as_ref().ok_or(ParipoolError::NoRound)?;
        if round.finalized {
            return Err(ParipoolError::AlreadyFinalized(round.id));
        }
        if !round.has_ended(now) && !round.is_full(capacity) {
            return Err(ParipoolError::RoundStillOpen {
                ends_at: round.ends_at,
            });
        }
        self.settle_current(now)
    }

    /// Settle the current round immediately, bypassing the window and
    /// capacity gates. The settlement routine itself is the one
    /// [`finalize`](Self::finalize) uses; only the gating differs.
    ///
    /// # Errors
    /// Fails if no round exists or the round is already finalized.
    pub fn force_finalize(&mut self, now: DateTime<Utc>) -> Result<RoundResult> {
        let round = self.round.as_ref().ok_or(ParipoolError::NoRound)?;
        if round.finalized {
            return Err(ParipoolError::AlreadyFinalized(round.id));
        }
        tracing::warn!(
            round_id = %round.id,
            "Force finalize requested, bypassing window and capacity gates"
        );
        self.settle_current(now)
    }

    /// The single settlement routine: plan on an immutable view, verify the
    /// plan, commit round state and the snapshot, then pay out.
    fn settle_current(&mut self, now: DateTime<Utc>) -> Result<RoundResult> {
        let _guard = self.reentry.enter()?;

        let Some(round) = self.round.as_mut() else {
            return Err(ParipoolError::NoRound);
        };

        // A round nobody joined still closes cleanly: zero distributed,
        // zero winners, outcome from the all-zero tally scan.
        if round.pool == 0 {
            let outcome = select_outcome(&round.tallies);
            round.finalized = true;
            round.outcome = Some(outcome);
            let result = RoundResult {
                round_id: round.id,
                outcome,
                outcome_label: self.config.label(outcome).to_string(),
                distributed: 0,
                winner_count: 0,
                ended_at: round.ends_at,
                settled_at: now,
                digest: compute_settlement_digest(round.id, outcome, 0, &[]),
            };
            self.events.push(PoolEvent::RoundFinalized {
                round_id: round.id,
                outcome,
                pool: 0,
                winner_total: 0,
                winner_count: 0,
            });
            self.conservation.verify(0)?;
            tracing::info!(
                round_id = %round.id,
                outcome = %outcome,
                "Round finalized with an empty pool"
            );
            self.last_result = Some(result.clone());
            return Ok(result);
        }

        // Plan. Every integrity check runs here, before any state change.
        let votes = self.ledger.cast_votes(round);
        let plan = plan_settlement(round, &votes)?;
        verify_exact_distribution(&plan)?;

        // Commit. Round state, the snapshot, and the conservation ledger
        // all update before the first outbound transfer.
        round.finalized = true;
        round.outcome = Some(plan.outcome);
        let result = RoundResult {
            round_id: plan.round_id,
            outcome: plan.outcome,
            outcome_label: self.config.label(plan.outcome).to_string(),
            distributed: plan.pool,
            winner_count: plan.winner_count,
            ended_at: round.ends_at,
            settled_at: now,
            digest: plan.digest,
        };
        self.last_result = Some(result.clone());
        for payout in &plan.payouts {
            self.conservation.record_payout(payout.amount);
        }

        // Pay out. Outbound transfers are trusted to move the exact amount
        // or fail the call.
        for payout in &plan.payouts {
            self.gateway.transfer_out(payout.voter, payout.amount)?;
            self.events.push(PoolEvent::Payout {
                round_id: plan.round_id,
                recipient: payout.voter,
                amount: payout.amount,
            });
            tracing::debug!(
                round_id = %plan.round_id,
                recipient = %payout.voter,
                amount = payout.amount,
                "Payout transferred"
            );
        }

        self.events.push(PoolEvent::RoundFinalized {
            round_id: plan.round_id,
            outcome: plan.outcome,
            pool: plan.pool,
            winner_total: plan.winner_total,
            winner_count: plan.winner_count,
        });
        self.conservation.verify(0)?;
        tracing::info!(
            round_id = %plan.round_id,
            outcome = %plan.outcome,
            pool = plan.pool,
            winner_total = plan.winner_total,
            winner_count = plan.winner_count,
            digest = result.digest_hex(),
            "Round finalized"
        );
        Ok(result)
    }

    // ═══════════════════════════════════════════════════════════════════
    // 5. CIRCUIT BREAKER & RECOVERY
    // ═══════════════════════════════════════════════════════════════════

    /// Suspend vote admission. Settlement and round creation stay open.
    /// Idempotent; the event fires only on the transition.
    pub fn suspend_voting(&mut self) {
        if !self.paused {
            self.paused = true;
            self.events.push(PoolEvent::VotingSuspended);
            tracing::warn!("Voting suspended");
        }
    }

    /// Reopen vote admission. Idempotent; the event fires only on the
    /// transition.
    pub fn resume_voting(&mut self) {
        if self.paused {
            self.paused = false;
            self.events.push(PoolEvent::VotingResumed);
            tracing::info!("Voting resumed");
        }
    }

    /// Sweep a non-voting asset out of custody.
    ///
    /// # Errors
    /// Fails with a protected-asset error when `asset` is the voting asset,
    /// and propagates gateway failures otherwise.
    pub fn recover_foreign_asset(
        &mut self,
        asset: &str,
        to: VoterId,
        amount: Amount,
    ) -> Result<()> {
        if asset == self.gateway.asset_symbol() {
            return Err(ParipoolError::ProtectedAsset(asset.to_string()));
        }
        let _guard = self.reentry.enter()?;
        self.gateway.recover_asset(asset, to, amount)?;
        self.events.push(PoolEvent::ForeignAssetRecovered {
            asset: asset.to_string(),
            to,
            amount,
        });
        tracing::warn!(asset, to = %to, amount, "Foreign asset recovered from custody");
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // 6. READ SURFACE
    // ═══════════════════════════════════════════════════════════════════

    /// The current round aggregate, finalized or not.
    #[must_use]
    pub fn current_round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Id of the current round.
    #[must_use]
    pub fn round_id(&self) -> Option<RoundId> {
        self.round.as_ref().map(|r| r.id)
    }

    /// True while the current round can admit votes at `now`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.round.as_ref().is_some_and(|r| r.is_active(now))
    }

    /// Per-option deposit totals of the current round, in index order.
    #[must_use]
    pub fn option_totals(&self) -> Option<[Amount; OPTION_COUNT]> {
        self.round.as_ref().map(|r| r.tallies.as_array())
    }

    /// Pool total of the current round.
    #[must_use]
    pub fn pool(&self) -> Option<Amount> {
        self.round.as_ref().map(|r| r.pool)
    }

    /// Voting window of the current round as `(start, end)`.
    #[must_use]
    pub fn active_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.round.as_ref().map(Round::window)
    }

    /// The participant's vote in the current round, tag-checked; a slot
    /// carrying an older round's tag reads as absent.
    #[must_use]
    pub fn vote_of(&self, voter: VoterId) -> Option<&VoteRecord> {
        self.round
            .as_ref()
            .and_then(|r| self.ledger.vote_of(r.id, voter))
    }

    /// Snapshot of the most recently finalized round.
    #[must_use]
    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    /// Current labels and capacity.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// True while the circuit-breaker holds vote admission closed.
    #[must_use]
    pub fn voting_suspended(&self) -> bool {
        self.paused
    }

    /// The append-only event log since construction or the last drain.
    #[must_use]
    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    /// Drain the event log, handing ownership to the caller.
    pub fn take_events(&mut self) -> Vec<PoolEvent> {
        std::mem::take(&mut self.events)
    }

    /// Lifetime deposit/payout counters.
    #[must_use]
    pub fn conservation(&self) -> &ConservationTracker {
        &self.conservation
    }

    /// Direct gateway access for inspection and tests.
    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}

// ═══════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use paripool_ledger::InMemoryToken;

    fn labels() -> [String; OPTION_COUNT] {
        PoolConfig::labels_from(["North", "South", "East", "West"])
    }

    fn fresh_engine(funded: &[(VoterId, Amount)]) -> PoolEngine<InMemoryToken> {
        let mut token = InMemoryToken::new("VOTE");
        for &(voter, amount) in funded {
            token.mint(voter, amount);
        }
        PoolEngine::new(PoolConfig::default(), token)
    }

    /// Engine with one round already open, active from `now` for an hour.
    fn open_engine(funded: &[(VoterId, Amount)]) -> (PoolEngine<InMemoryToken>, DateTime<Utc>) {
        let mut engine = fresh_engine(funded);
        let now = Utc::now();
        engine
            .start_round(now, now + chrono::Duration::hours(1), labels(), now)
            .unwrap();
        (engine, now)
    }

    // ──────────────────── Round Lifecycle ────────────────────

    #[test]
    fn first_round_gets_id_one_and_emits_events() {
        let mut engine = fresh_engine(&[]);
        let now = Utc::now();
        let id = engine
            .start_round(now, now + chrono::Duration::hours(1), labels(), now)
            .unwrap();

        assert_eq!(id, RoundId::FIRST);
        assert_eq!(engine.round_id(), Some(RoundId(1)));
        assert_eq!(engine.config().option_labels[1], "South");
        let kinds: Vec<&str> = engine.events().iter().map(PoolEvent::kind).collect();
        assert_eq!(kinds, vec!["ROUND_STARTED", "LABELS_UPDATED"]);
    }

    #[test]
    fn open_round_blocks_the_next_start() {
        let (mut engine, now) = open_engine(&[]);
        let err = engine
            .start_round(now, now + chrono::Duration::hours(2), labels(), now)
            .unwrap_err();
        assert!(matches!(err, ParipoolError::RoundAlreadyOpen(RoundId(1))));
    }

    #[test]
    fn window_must_be_ordered() {
        let mut engine = fresh_engine(&[]);
        let now = Utc::now();
        let at = now + chrono::Duration::hours(1);
        let err = engine.start_round(at, at, labels(), now).unwrap_err();
        assert!(matches!(err, ParipoolError::InvalidTimeRange { .. }));
    }

    #[test]
    fn window_end_must_be_in_the_future() {
        let mut engine = fresh_engine(&[]);
        let now = Utc::now();
        let err = engine
            .start_round(
                now - chrono::Duration::hours(2),
                now - chrono::Duration::hours(1),
                labels(),
                now,
            )
            .unwrap_err();
        assert!(matches!(err, ParipoolError::EndTimeInPast { .. }));
    }

    #[test]
    fn round_ids_are_monotonic_across_rounds() {
        let (mut engine, now) = open_engine(&[]);
        engine.force_finalize(now).unwrap();
        let id = engine
            .start_round(now, now + chrono::Duration::hours(1), labels(), now)
            .unwrap();
        assert_eq!(id, RoundId(2));
    }

    #[test]
    fn activity_window_is_inclusive_at_both_ends() {
        let mut engine = fresh_engine(&[]);
        let now = Utc::now();
        let start = now + chrono::Duration::minutes(10);
        let end = now + chrono::Duration::hours(1);
        engine.start_round(start, end, labels(), now).unwrap();

        assert!(!engine.is_active(now));
        assert!(engine.is_active(start));
        assert!(engine.is_active(end));
        assert!(!engine.is_active(end + chrono::Duration::seconds(1)));
        assert_eq!(engine.active_window(), Some((start, end)));
    }

    #[test]
    fn no_round_is_never_active() {
        let engine = fresh_engine(&[]);
        assert!(!engine.is_active(Utc::now()));
        assert!(engine.current_round().is_none());
        assert!(engine.pool().is_none());
        assert!(engine.option_totals().is_none());
    }

    // ──────────────────── Configuration Guard ────────────────────

    #[test]
    fn config_changes_follow_the_lock_windows() {
        let mut engine = fresh_engine(&[]);
        let now = Utc::now();

        // No round at all: free.
        engine.set_capacity(9, now).unwrap();
        engine.set_labels(labels(), now).unwrap();

        // Scheduled but not started: free.
        let start = now + chrono::Duration::minutes(10);
        let end = now + chrono::Duration::hours(1);
        engine.start_round(start, end, labels(), now).unwrap();
        engine.set_capacity(7, now).unwrap();

        // Inside the window: locked.
        let during = now + chrono::Duration::minutes(30);
        assert!(matches!(
            engine.set_capacity(5, during).unwrap_err(),
            ParipoolError::ConfigurationLocked(RoundId(1))
        ));
        assert!(matches!(
            engine.set_labels(labels(), during).unwrap_err(),
            ParipoolError::ConfigurationLocked(RoundId(1))
        ));

        // Ended but not finalized: still locked.
        let after = now + chrono::Duration::hours(2);
        assert!(matches!(
            engine.set_capacity(5, after).unwrap_err(),
            ParipoolError::ConfigurationLocked(RoundId(1))
        ));

        // Finalized: free again.
        engine.finalize(after).unwrap();
        engine.set_capacity(5, after).unwrap();
        assert_eq!(engine.config().capacity, 5);
    }

    #[test]
    fn capacity_zero_rejected() {
        let mut engine = fresh_engine(&[]);
        let err = engine.set_capacity(0, Utc::now()).unwrap_err();
        assert!(matches!(err, ParipoolError::ZeroCapacity));
    }

    // ──────────────────── Vote Admission ────────────────────

    #[test]
    fn vote_moves_the_deposit_and_updates_every_aggregate() {
        let alice = VoterId::new();
        let (mut engine, now) = open_engine(&[(alice, 500)]);

        engine.vote(alice, 2, 120, now).unwrap();

        assert_eq!(engine.pool(), Some(120));
        assert_eq!(engine.option_totals().unwrap(), [0, 0, 120, 0]);
        assert_eq!(engine.gateway().custody_balance(), 120);
        assert_eq!(engine.gateway().balance_of(alice), 380);
        assert_eq!(engine.conservation().total_deposited(), 120);

        let record = engine.vote_of(alice).unwrap();
        assert_eq!(record.option, OptionId::ALL[2]);
        assert_eq!(record.amount, 120);
        assert_eq!(engine.events().last().unwrap().kind(), "VOTE_RECORDED");
    }

    #[test]
    fn precondition_order_starts_with_the_circuit_breaker() {
        let mut engine = fresh_engine(&[]);
        engine.suspend_voting();

        // Suspension is reported even with no round scheduled.
        let err = engine.vote(VoterId::new(), 0, 10, Utc::now()).unwrap_err();
        assert!(matches!(err, ParipoolError::VotingSuspended));

        engine.resume_voting();
        let err = engine.vote(VoterId::new(), 0, 10, Utc::now()).unwrap_err();
        assert!(matches!(err, ParipoolError::NoRound));
    }

    #[test]
    fn vote_outside_the_window_rejected() {
        let (mut engine, now) = open_engine(&[]);
        let late = now + chrono::Duration::hours(2);
        let err = engine.vote(VoterId::new(), 0, 10, late).unwrap_err();
        assert!(matches!(err, ParipoolError::RoundNotActive(RoundId(1))));
    }

    #[test]
    fn vote_option_and_amount_validated_before_any_transfer() {
        let alice = VoterId::new();
        let (mut engine, now) = open_engine(&[(alice, 100)]);

        let err = engine.vote(alice, 4, 10, now).unwrap_err();
        assert!(matches!(err, ParipoolError::InvalidOption(4)));

        let err = engine.vote(alice, 1, 0, now).unwrap_err();
        assert!(matches!(err, ParipoolError::ZeroAmount));

        // Neither attempt touched the wallet or custody.
        assert_eq!(engine.gateway().balance_of(alice), 100);
        assert_eq!(engine.gateway().custody_balance(), 0);
    }

    #[test]
    fn second_vote_rejected_regardless_of_option_or_amount() {
        let alice = VoterId::new();
        let (mut engine, now) = open_engine(&[(alice, 500)]);
        engine.vote(alice, 0, 100, now).unwrap();

        let err = engine.vote(alice, 3, 1, now).unwrap_err();
        assert!(matches!(err, ParipoolError::DuplicateVote { .. }));
        assert_eq!(engine.pool(), Some(100));
        assert_eq!(engine.gateway().balance_of(alice), 400);
    }

    #[test]
    fn capacity_blocks_the_vote_before_the_transfer() {
        let alice = VoterId::new();
        let bob = VoterId::new();
        let mut token = InMemoryToken::new("VOTE");
        token.mint(alice, 100);
        token.mint(bob, 100);
        let config = PoolConfig::new(labels(), 1).unwrap();
        let mut engine = PoolEngine::new(config, token);
        let now = Utc::now();
        engine
            .start_round(now, now + chrono::Duration::hours(1), labels(), now)
            .unwrap();

        engine.vote(alice, 0, 50, now).unwrap();
        let err = engine.vote(bob, 1, 50, now).unwrap_err();
        assert!(matches!(
            err,
            ParipoolError::CapacityReached { capacity: 1 }
        ));
        assert_eq!(engine.gateway().balance_of(bob), 100);
    }

    #[test]
    fn underfunded_wallet_fails_with_no_commit() {
        let alice = VoterId::new();
        let (mut engine, now) = open_engine(&[(alice, 10)]);

        let err = engine.vote(alice, 0, 50, now).unwrap_err();
        assert!(matches!(err, ParipoolError::InsufficientFunds { .. }));
        assert_eq!(engine.pool(), Some(0));
        assert!(engine.vote_of(alice).is_none());
        assert_eq!(engine.conservation().total_deposited(), 0);
    }

    // ──────────────────── Settlement Gating ────────────────────

    #[test]
    fn finalize_waits_for_the_window_unless_full() {
        let alice = VoterId::new();
        let (mut engine, now) = open_engine(&[(alice, 100)]);
        engine.vote(alice, 0, 100, now).unwrap();

        let err = engine.finalize(now).unwrap_err();
        assert!(matches!(err, ParipoolError::RoundStillOpen { .. }));

        let after = now + chrono::Duration::hours(2);
        let result = engine.finalize(after).unwrap();
        assert_eq!(result.distributed, 100);
    }

    #[test]
    fn capacity_reached_permits_early_finalize() {
        let alice = VoterId::new();
        let mut token = InMemoryToken::new("VOTE");
        token.mint(alice, 100);
        let config = PoolConfig::new(labels(), 1).unwrap();
        let mut engine = PoolEngine::new(config, token);
        let now = Utc::now();
        engine
            .start_round(now, now + chrono::Duration::hours(1), labels(), now)
            .unwrap();
        engine.vote(alice, 2, 100, now).unwrap();

        // The window is still open, but the vote list is full.
        let result = engine.finalize(now).unwrap();
        assert_eq!(result.outcome, OptionId::ALL[2]);
        assert_eq!(result.winner_count, 1);
    }

    #[test]
    fn finalize_requires_a_round_and_rejects_repeats() {
        let mut engine = fresh_engine(&[]);
        let now = Utc::now();
        assert!(matches!(
            engine.finalize(now).unwrap_err(),
            ParipoolError::NoRound
        ));

        engine
            .start_round(now, now + chrono::Duration::hours(1), labels(), now)
            .unwrap();
        let after = now + chrono::Duration::hours(2);
        engine.finalize(after).unwrap();
        assert!(matches!(
            engine.finalize(after).unwrap_err(),
            ParipoolError::AlreadyFinalized(RoundId(1))
        ));
        assert!(matches!(
            engine.force_finalize(after).unwrap_err(),
            ParipoolError::AlreadyFinalized(RoundId(1))
        ));
    }

    #[test]
    fn force_finalize_settles_mid_window() {
        let alice = VoterId::new();
        let (mut engine, now) = open_engine(&[(alice, 60)]);
        engine.vote(alice, 1, 60, now).unwrap();

        let result = engine.force_finalize(now).unwrap();
        assert_eq!(result.distributed, 60);
        assert_eq!(engine.gateway().balance_of(alice), 60);
        assert_eq!(engine.gateway().custody_balance(), 0);
    }

    #[test]
    fn empty_round_finalizes_with_nothing_to_distribute() {
        let (mut engine, now) = open_engine(&[]);
        let after = now + chrono::Duration::hours(2);

        let result = engine.finalize(after).unwrap();
        assert_eq!(result.distributed, 0);
        assert_eq!(result.winner_count, 0);
        assert_eq!(result.outcome, OptionId::ALL[0]);
        assert_eq!(result.outcome_label, "North");
        assert!(engine.current_round().unwrap().finalized);
        assert_eq!(
            engine.current_round().unwrap().outcome,
            Some(OptionId::ALL[0])
        );
    }

    // ──────────────────── Circuit Breaker & Recovery ────────────────────

    #[test]
    fn breaker_events_fire_only_on_transitions() {
        let mut engine = fresh_engine(&[]);
        engine.suspend_voting();
        engine.suspend_voting();
        engine.resume_voting();
        engine.resume_voting();

        let kinds: Vec<&str> = engine.events().iter().map(PoolEvent::kind).collect();
        assert_eq!(kinds, vec!["VOTING_SUSPENDED", "VOTING_RESUMED"]);
        assert!(!engine.voting_suspended());
    }

    #[test]
    fn suspension_never_blocks_settlement_or_scheduling() {
        let (mut engine, now) = open_engine(&[]);
        engine.suspend_voting();

        let after = now + chrono::Duration::hours(2);
        engine.finalize(after).unwrap();
        engine
            .start_round(after, after + chrono::Duration::hours(1), labels(), after)
            .unwrap();
        assert_eq!(engine.round_id(), Some(RoundId(2)));
        assert!(engine.voting_suspended());
    }

    #[test]
    fn foreign_asset_recovery_spares_the_voting_asset() {
        let mut token = InMemoryToken::new("VOTE");
        token.seed_foreign("AIR", 500);
        let mut engine = PoolEngine::new(PoolConfig::default(), token);
        let ops = VoterId::new();

        let err = engine.recover_foreign_asset("VOTE", ops, 1).unwrap_err();
        assert!(matches!(err, ParipoolError::ProtectedAsset(_)));

        engine.recover_foreign_asset("AIR", ops, 200).unwrap();
        assert_eq!(engine.gateway().foreign_balance("AIR"), 300);
        assert_eq!(
            engine.events().last().unwrap().kind(),
            "FOREIGN_ASSET_RECOVERED"
        );
    }

    // ──────────────────── Read Surface ────────────────────

    #[test]
    fn vote_lookup_is_scoped_to_the_current_round() {
        let alice = VoterId::new();
        let (mut engine, now) = open_engine(&[(alice, 200)]);
        engine.vote(alice, 0, 80, now).unwrap();
        let after = now + chrono::Duration::hours(2);
        engine.finalize(after).unwrap();

        // The next round reuses alice's slot; her old vote reads as absent.
        engine
            .start_round(after, after + chrono::Duration::hours(1), labels(), after)
            .unwrap();
        assert!(engine.vote_of(alice).is_none());

        engine.vote(alice, 3, 40, after).unwrap();
        let record = engine.vote_of(alice).unwrap();
        assert_eq!(record.round_id, RoundId(2));
        assert_eq!(record.amount, 40);
    }

    #[test]
    fn take_events_drains_the_log() {
        let (mut engine, _) = open_engine(&[]);
        let drained = engine.take_events();
        assert_eq!(drained.len(), 2);
        assert!(engine.events().is_empty());
    }
}
