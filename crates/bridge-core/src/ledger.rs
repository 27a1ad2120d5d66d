//! The ledger state machine.
//!
//! Every mutating call follows the same sequence: validate against the state
//! as it will be once due bids activate, perform the external effect (asset
//! transfer), record the due activations and then the call's own event, and
//! apply each record in memory as the sink accepts it. A call that fails
//! validation records nothing.
//!
//! Stake settlement is applied from the records too, so replaying a journal
//! rebuilds escrow balances along with everything else.

use bridge_primitives::{Address, AssetKind, Color, SlotId, B256, U256};
use std::borrow::Cow;
use tracing::{debug, error, info};

use crate::assets::AssetBackend;
use crate::checkpoint::{AwaitingPeriod, CheckpointLog, Period};
use crate::context::CallContext;
use crate::deposits::{Deposit, DepositLedger};
use crate::epoch::EpochScheduler;
use crate::errors::LedgerError;
use crate::events::{LedgerEvent, RecordEnvelope, RewardPayment};
use crate::governance::{GovernanceParams, ParamChange};
use crate::registry::{parse_kind, ColorEntry, ColorRegistry};
use crate::settlement::{EscrowBook, SettlementError, StakeSettlement};
use crate::sink::EventSink;
use crate::slots::{Bid, Slot, SlotTable, Takeover};

/// Pending bids that activate before a call at `height` takes effect.
#[derive(Debug)]
struct Activations {
    height: u64,
    epoch: u64,
    slot_ids: Vec<SlotId>,
}

/// Single-writer bridge ledger.
///
/// `S` receives every sealed record; `P` settles auction stake from the
/// recorded auction events.
#[derive(Debug)]
pub struct Ledger<S, P = EscrowBook> {
    params: GovernanceParams,
    scheduler: EpochScheduler,
    registry: ColorRegistry,
    deposits: DepositLedger,
    slots: SlotTable,
    checkpoints: CheckpointLog,
    settlement: P,
    sink: S,
    next_seq: u64,
    last_digest: B256,
    last_height: u64,
}

impl<S: EventSink> Ledger<S, EscrowBook> {
    /// Starts a new ledger and records its genesis.
    pub fn genesis(params: GovernanceParams, sink: S) -> Result<Self, LedgerError> {
        Self::genesis_with_settlement(params, sink, EscrowBook::new())
    }

    /// Rebuilds a ledger from previously recorded envelopes.
    pub fn replay<I>(records: I, sink: S) -> Result<Self, LedgerError>
    where
        I: IntoIterator<Item = RecordEnvelope>,
    {
        Self::replay_with_settlement(records, sink, EscrowBook::new())
    }
}

impl<S: EventSink, P: StakeSettlement> Ledger<S, P> {
    fn empty(params: GovernanceParams, sink: S, settlement: P) -> Result<Self, LedgerError> {
        params.validate()?;
        let scheduler = EpochScheduler::new(params.epoch_length, params.slot_count)?;
        Ok(Self {
            slots: SlotTable::new(params.slot_count),
            params,
            scheduler,
            registry: ColorRegistry::new(),
            deposits: DepositLedger::new(),
            checkpoints: CheckpointLog::new(),
            settlement,
            sink,
            next_seq: 0,
            last_digest: B256::ZERO,
            last_height: 0,
        })
    }

    /// Starts a new ledger with a custom settlement policy.
    pub fn genesis_with_settlement(
        params: GovernanceParams,
        sink: S,
        settlement: P,
    ) -> Result<Self, LedgerError> {
        let mut ledger = Self::empty(params.clone(), sink, settlement)?;
        ledger.commit(0, LedgerEvent::Genesis { params })?;
        info!(
            slot_count = ledger.params.slot_count,
            epoch_length = ledger.params.epoch_length,
            "ledger genesis recorded"
        );
        Ok(ledger)
    }

    /// Rebuilds a ledger with a custom settlement policy.
    ///
    /// Records are checked for sequence, digest, chaining and height order.
    /// External backends are never called; `settlement` should be the same
    /// starting policy the ledger was created with.
    pub fn replay_with_settlement<I>(records: I, sink: S, settlement: P) -> Result<Self, LedgerError>
    where
        I: IntoIterator<Item = RecordEnvelope>,
    {
        let mut records = records.into_iter();
        let first = records.next().ok_or_else(|| LedgerError::CorruptRecord {
            seq: 0,
            reason: "journal holds no genesis record".to_string(),
        })?;
        let params = match &first.event {
            LedgerEvent::Genesis { params } => params.clone(),
            other => {
                return Err(LedgerError::CorruptRecord {
                    seq: first.seq,
                    reason: format!("first record is {}, expected genesis", other.kind()),
                })
            }
        };
        let mut ledger = Self::empty(params, sink, settlement)?;
        ledger.check_link(&first)?;
        ledger.advance_chain(&first);
        for record in records {
            ledger.check_link(&record)?;
            if matches!(record.event, LedgerEvent::Genesis { .. }) {
                return Err(LedgerError::CorruptRecord {
                    seq: record.seq,
                    reason: "genesis record after the first".to_string(),
                });
            }
            ledger
                .apply(&record.event)
                .map_err(|err| LedgerError::CorruptRecord {
                    seq: record.seq,
                    reason: err.to_string(),
                })?;
            ledger.advance_chain(&record);
        }
        debug!(records = ledger.next_seq, tip = %ledger.tip_hash(), "ledger replayed");
        Ok(ledger)
    }

    fn check_link(&self, record: &RecordEnvelope) -> Result<(), LedgerError> {
        let corrupt = |reason: String| LedgerError::CorruptRecord {
            seq: record.seq,
            reason,
        };
        if record.seq != self.next_seq {
            return Err(corrupt(format!("expected sequence {}", self.next_seq)));
        }
        if record.prev_digest != self.last_digest {
            return Err(corrupt("previous digest does not chain".to_string()));
        }
        if record.height < self.last_height {
            return Err(corrupt(format!(
                "height {} is below the previous height {}",
                record.height, self.last_height
            )));
        }
        let valid = record.verify().map_err(|err| corrupt(err.to_string()))?;
        if !valid {
            return Err(corrupt("digest mismatch".to_string()));
        }
        Ok(())
    }

    fn advance_chain(&mut self, record: &RecordEnvelope) {
        self.next_seq = record.seq + 1;
        self.last_digest = record.digest;
        self.last_height = self.last_height.max(record.height);
    }

    fn commit(&mut self, height: u64, event: LedgerEvent) -> Result<(), LedgerError> {
        let envelope = RecordEnvelope::seal(self.next_seq, height, self.last_digest, event)
            .map_err(|err| LedgerError::Storage(Box::new(err)))?;
        self.sink.record(&envelope).map_err(LedgerError::Storage)?;
        if !matches!(envelope.event, LedgerEvent::Genesis { .. }) {
            self.apply(&envelope.event)
                .map_err(|err| LedgerError::CorruptRecord {
                    seq: envelope.seq,
                    reason: err.to_string(),
                })?;
        }
        self.advance_chain(&envelope);
        Ok(())
    }

    /// Commits the due activations and a record that follows a completed
    /// external transfer.
    fn commit_after_transfer(
        &mut self,
        due: Activations,
        event: LedgerEvent,
    ) -> Result<(), LedgerError> {
        let kind = event.kind();
        let height = due.height;
        self.activate(due)
            .and_then(|()| self.commit(height, event))
            .map_err(|err| {
                error!(seq = self.next_seq, kind, %err, "external transfer completed but record was not stored");
                err
            })
    }

    fn settle(&mut self, slot_id: SlotId, takeover: Takeover) {
        if let Some(bid) = &takeover.displaced {
            self.settlement.refund_bid(bid);
        }
        if let Some((owner, stake)) = takeover.previous {
            self.settlement.release(slot_id, owner, stake);
        }
    }

    fn apply(&mut self, event: &LedgerEvent) -> Result<(), LedgerError> {
        match event {
            LedgerEvent::Genesis { .. } => Err(LedgerError::CorruptRecord {
                seq: self.next_seq,
                reason: "genesis cannot be applied to a running ledger".to_string(),
            }),
            LedgerEvent::TokenRegistered { entry } => self.registry.insert(entry.clone()),
            LedgerEvent::Deposited { deposit } => self.deposits.insert(deposit.clone()),
            LedgerEvent::SlotAssigned {
                slot_id,
                owner,
                signer,
            } => {
                let takeover = self.slots.assign(*slot_id, *owner, *signer)?;
                self.settle(*slot_id, takeover);
                Ok(())
            }
            LedgerEvent::StakeFunded { account, amount } => {
                self.settlement.credit(*account, *amount);
                Ok(())
            }
            LedgerEvent::BidPlaced { slot_id, bid } => {
                self.slots.get(*slot_id)?;
                self.settlement.escrow(bid.bidder, bid.stake)?;
                if let Some(replaced) = self.slots.place_bid(*slot_id, bid.clone())? {
                    self.settlement.refund_bid(&replaced);
                }
                Ok(())
            }
            LedgerEvent::SlotActivated { slot_id, .. } => {
                let takeover = self.slots.activate(*slot_id)?;
                self.settle(*slot_id, takeover);
                Ok(())
            }
            LedgerEvent::PeriodSubmitted {
                period,
                tip,
                accrued,
                reward,
            } => {
                self.slots.get(period.submitted_by)?;
                let next = period.tip();
                if next != *tip {
                    return Err(LedgerError::CorruptRecord {
                        seq: self.next_seq,
                        reason: format!("recorded tip {} but period hashes to {}", tip, next),
                    });
                }
                self.checkpoints.append(period.clone())?;
                self.slots.accrue(period.submitted_by, *accrued)?;
                if reward.is_some() {
                    self.slots.clear_reward(period.submitted_by)?;
                }
                Ok(())
            }
            LedgerEvent::ParamChanged { change } => {
                self.params.check(change)?;
                let mut params = self.params.clone();
                params.apply(change);
                self.scheduler = EpochScheduler::new(params.epoch_length, params.slot_count)?;
                self.params = params;
                Ok(())
            }
        }
    }

    /// Bids due at `height`; fails when `height` is below a recorded height.
    fn due(&self, height: u64) -> Result<Activations, LedgerError> {
        if height < self.last_height {
            return Err(LedgerError::HeightRegressed {
                height,
                last_height: self.last_height,
            });
        }
        let epoch = self.scheduler.epoch(height);
        Ok(Activations {
            height,
            epoch,
            slot_ids: self.slots.due(epoch),
        })
    }

    /// Slot table as it will look once `due` has been activated.
    fn slots_after(&self, due: &Activations) -> Result<Cow<'_, SlotTable>, LedgerError> {
        if due.slot_ids.is_empty() {
            return Ok(Cow::Borrowed(&self.slots));
        }
        let mut slots = self.slots.clone();
        for slot_id in &due.slot_ids {
            slots.activate(*slot_id)?;
        }
        Ok(Cow::Owned(slots))
    }

    fn activate(&mut self, due: Activations) -> Result<(), LedgerError> {
        for slot_id in due.slot_ids {
            self.commit(
                due.height,
                LedgerEvent::SlotActivated {
                    slot_id,
                    epoch: due.epoch,
                },
            )?;
            debug!(slot_id, epoch = due.epoch, "pending bid activated");
        }
        Ok(())
    }

    /// Activates every pending bid whose epoch has been reached at `height`.
    ///
    /// Successful calls do this on their own before recording their event;
    /// this brings the slot table up to date without one.
    pub fn advance(&mut self, height: u64) -> Result<(), LedgerError> {
        let due = self.due(height)?;
        self.activate(due)
    }

    // ---- color registry ----

    /// Registers `asset` under the next color of `kind`. Gateway only.
    pub fn register_token(
        &mut self,
        ctx: &CallContext,
        asset: Address,
        kind: AssetKind,
    ) -> Result<Color, LedgerError> {
        let due = self.due(ctx.height)?;
        self.params.require_gateway(ctx.caller, "register_token")?;
        let entry = self.registry.prepare(asset, kind).inspect_err(|err| {
            if let LedgerError::ColorRangeExhausted { kind, allocated } = err {
                error!(%kind, allocated, %asset, "color range exhausted");
            }
        })?;
        let color = entry.color;
        self.activate(due)?;
        self.commit(ctx.height, LedgerEvent::TokenRegistered { entry })?;
        debug!(%asset, %color, %kind, "token registered");
        Ok(color)
    }

    /// Same as [`Ledger::register_token`] with a wire kind code.
    pub fn register_token_code(
        &mut self,
        ctx: &CallContext,
        asset: Address,
        kind: u8,
    ) -> Result<Color, LedgerError> {
        self.register_token(ctx, asset, parse_kind(kind)?)
    }

    /// Asset registered under `color`.
    pub fn get_token_addr(&self, color: Color) -> Result<Address, LedgerError> {
        self.registry.resolve(color)
    }

    /// Kind of a registered color.
    pub fn kind_of(&self, color: Color) -> Result<AssetKind, LedgerError> {
        self.registry.kind_of(color)
    }

    /// Color of a registered asset.
    pub fn color_of(&self, asset: &Address) -> Option<Color> {
        self.registry.color_of(asset)
    }

    /// Number of assets registered with `kind`.
    pub fn token_count(&self, kind: AssetKind) -> u32 {
        self.registry.token_count(kind)
    }

    /// Registered assets in color order.
    pub fn tokens(&self) -> impl Iterator<Item = &ColorEntry> {
        self.registry.entries()
    }

    // ---- deposits ----

    /// Pulls an asset from the caller into custody and credits `owner`.
    ///
    /// `value` is an amount for fungible colors and a token id otherwise.
    pub fn deposit<A: AssetBackend + ?Sized>(
        &mut self,
        ctx: &CallContext,
        assets: &mut A,
        owner: Address,
        value: U256,
        color: Color,
    ) -> Result<u64, LedgerError> {
        let due = self.due(ctx.height)?;
        let deposit =
            self.deposits
                .execute(&self.registry, assets, ctx.caller, owner, color, value)?;
        let deposit_id = deposit.deposit_id;
        self.commit_after_transfer(due, LedgerEvent::Deposited { deposit })?;
        debug!(deposit_id, %owner, %color, %value, "deposit accepted");
        Ok(deposit_id)
    }

    /// Storage commitment captured by a storage-bearing deposit.
    pub fn token_data(&self, deposit_id: u64) -> Result<B256, LedgerError> {
        self.deposits.token_data(deposit_id)
    }

    /// Looks up a deposit.
    pub fn deposit_record(&self, deposit_id: u64) -> Result<&Deposit, LedgerError> {
        self.deposits.get(deposit_id)
    }

    /// Number of accepted deposits.
    pub fn deposit_count(&self) -> u64 {
        self.deposits.next_id()
    }

    /// Deposits in id order.
    pub fn deposits(&self) -> impl Iterator<Item = &Deposit> {
        self.deposits.iter()
    }

    /// Amount or token count held in custody under `color`.
    pub fn custodied(&self, color: Color) -> U256 {
        self.deposits.custodied(color)
    }

    // ---- slots ----

    /// Installs an owner and signer in a slot. Gateway or operator only.
    pub fn set_slot(
        &mut self,
        ctx: &CallContext,
        slot_id: SlotId,
        owner: Address,
        signer: Address,
    ) -> Result<(), LedgerError> {
        let due = self.due(ctx.height)?;
        self.params.require_slot_admin(ctx.caller, "set_slot")?;
        self.slots.get(slot_id)?;
        self.activate(due)?;
        self.commit(
            ctx.height,
            LedgerEvent::SlotAssigned {
                slot_id,
                owner,
                signer,
            },
        )?;
        debug!(slot_id, %owner, %signer, "slot assigned");
        Ok(())
    }

    /// Credits spendable auction stake to `account`. Gateway only.
    pub fn fund_stake(
        &mut self,
        ctx: &CallContext,
        account: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let due = self.due(ctx.height)?;
        self.params.require_gateway(ctx.caller, "fund_stake")?;
        if amount.is_zero() {
            return Err(SettlementError::Rejected(format!("zero stake for {}", account)).into());
        }
        self.activate(due)?;
        self.commit(ctx.height, LedgerEvent::StakeFunded { account, amount })?;
        debug!(%account, %amount, "stake funded");
        Ok(())
    }

    /// Bids `stake` for a slot; the bid activates at the next epoch.
    ///
    /// Returns the activation epoch. The stake must already be available to
    /// the caller before any bids due at this height activate.
    pub fn bid(
        &mut self,
        ctx: &CallContext,
        slot_id: SlotId,
        signer: Address,
        stake: U256,
    ) -> Result<u64, LedgerError> {
        let due = self.due(ctx.height)?;
        self.slots_after(&due)?.check_bid(slot_id, stake)?;
        self.settlement.check_escrow(ctx.caller, stake)?;
        let bid = Bid {
            bidder: ctx.caller,
            signer,
            stake,
            activation_epoch: due.epoch + 1,
        };
        let activation_epoch = bid.activation_epoch;
        self.activate(due)?;
        self.commit(ctx.height, LedgerEvent::BidPlaced { slot_id, bid })?;
        debug!(slot_id, bidder = %ctx.caller, %stake, epoch = activation_epoch, "bid placed");
        Ok(activation_epoch)
    }

    /// Slot by id.
    pub fn slot(&self, slot_id: SlotId) -> Result<&Slot, LedgerError> {
        self.slots.get(slot_id)
    }

    /// All slots in id order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    /// True iff `caller` is the signer of the non-empty slot `slot_id`.
    pub fn is_authorized(&self, slot_id: SlotId, caller: Address) -> bool {
        self.slots.is_authorized(slot_id, caller)
    }

    /// Slot the scheduler authorizes at `height`.
    pub fn authorized_slot(&self, height: u64) -> SlotId {
        self.scheduler.authorized_slot(height)
    }

    /// Epoch containing `height`.
    pub fn epoch(&self, height: u64) -> u64 {
        self.scheduler.epoch(height)
    }

    // ---- checkpoints ----

    fn check_submission<'a>(
        &self,
        slots: &'a SlotTable,
        ctx: &CallContext,
        slot_id: SlotId,
        prev_tip: B256,
    ) -> Result<&'a Slot, LedgerError> {
        let slot = slots.get(slot_id)?;
        self.checkpoints.check_parent(prev_tip)?;
        let scheduled = self.scheduler.authorized_slot(ctx.height);
        let not_authorized = LedgerError::NotAuthorizedSlot {
            slot_id,
            caller: ctx.caller,
            scheduled,
        };
        if slot_id != scheduled {
            return Err(not_authorized);
        }
        if slot.is_empty() {
            return Err(LedgerError::EmptySlot(slot_id));
        }
        if slot.signer != ctx.caller {
            return Err(not_authorized);
        }
        let interval = self.params.parent_block_interval;
        if let Some(last) = self.checkpoints.last() {
            let next_allowed = last.height.saturating_add(interval);
            if interval > 0 && ctx.height < next_allowed {
                return Err(LedgerError::TooEarly {
                    height: ctx.height,
                    next_allowed,
                });
            }
        }
        Ok(slot)
    }

    fn next_period(&self, ctx: &CallContext, slot_id: SlotId, merkle_root: B256) -> Period {
        Period {
            period_index: self.checkpoints.period_index(),
            parent_tip: self.checkpoints.tip(),
            merkle_root,
            submitted_by: slot_id,
            signer: ctx.caller,
            height: ctx.height,
            timestamp: ctx.timestamp,
        }
    }

    /// Appends a period on top of `prev_tip` and returns the new tip.
    pub fn submit_period(
        &mut self,
        ctx: &CallContext,
        slot_id: SlotId,
        prev_tip: B256,
        merkle_root: B256,
    ) -> Result<B256, LedgerError> {
        let due = self.due(ctx.height)?;
        self.check_submission(&*self.slots_after(&due)?, ctx, slot_id, prev_tip)?;
        let period = self.next_period(ctx, slot_id, merkle_root);
        let tip = period.tip();
        let period_index = period.period_index;
        self.activate(due)?;
        self.commit(
            ctx.height,
            LedgerEvent::PeriodSubmitted {
                period,
                tip,
                accrued: self.params.period_reward,
                reward: None,
            },
        )?;
        debug!(period_index, slot_id, %tip, "period accepted");
        Ok(tip)
    }

    /// Same as [`Ledger::submit_period`], and pays the slot's accrued reward
    /// to its signer. A failed payment fails the submission.
    pub fn submit_period_for_reward<A: AssetBackend + ?Sized>(
        &mut self,
        ctx: &CallContext,
        assets: &mut A,
        slot_id: SlotId,
        prev_tip: B256,
        merkle_root: B256,
    ) -> Result<B256, LedgerError> {
        let due = self.due(ctx.height)?;
        let accrued = self.params.period_reward;
        let (beneficiary, amount) = {
            let slots = self.slots_after(&due)?;
            let slot = self.check_submission(&slots, ctx, slot_id, prev_tip)?;
            (slot.signer, slot.accrued_reward.saturating_add(accrued))
        };
        let period = self.next_period(ctx, slot_id, merkle_root);
        let tip = period.tip();
        let period_index = period.period_index;
        assets
            .pay_reward(beneficiary, amount)
            .map_err(|err| LedgerError::TransferRejected(err.to_string()))?;
        self.commit_after_transfer(
            due,
            LedgerEvent::PeriodSubmitted {
                period,
                tip,
                accrued,
                reward: Some(RewardPayment {
                    beneficiary,
                    amount,
                }),
            },
        )?;
        debug!(period_index, slot_id, %tip, %beneficiary, %amount, "period accepted with reward");
        Ok(tip)
    }

    /// Current chain tip.
    pub fn tip_hash(&self) -> B256 {
        self.checkpoints.tip()
    }

    /// Index the next period will receive.
    pub fn period_index(&self) -> u64 {
        self.checkpoints.period_index()
    }

    /// Current consensus state.
    pub fn state(&self) -> AwaitingPeriod {
        self.checkpoints.state()
    }

    /// Period at `index`.
    pub fn period(&self, index: u64) -> Option<&Period> {
        self.checkpoints.period(index)
    }

    /// All accepted periods.
    pub fn periods(&self) -> &[Period] {
        self.checkpoints.periods()
    }

    /// Height of the most recent period.
    pub fn last_period_height(&self) -> Option<u64> {
        self.checkpoints.last().map(|p| p.height)
    }

    // ---- governance ----

    fn change_param(&mut self, ctx: &CallContext, change: ParamChange) -> Result<(), LedgerError> {
        let due = self.due(ctx.height)?;
        self.params.require_gateway(ctx.caller, change.entry_point())?;
        self.params.check(&change)?;
        let entry_point = change.entry_point();
        self.activate(due)?;
        self.commit(ctx.height, LedgerEvent::ParamChanged { change })?;
        debug!(entry_point, "parameter changed");
        Ok(())
    }

    /// Applies any parameter change. Gateway only.
    pub fn set_param(&mut self, ctx: &CallContext, change: ParamChange) -> Result<(), LedgerError> {
        self.change_param(ctx, change)
    }

    /// Sets the minimum gas price. Gateway only.
    pub fn set_min_gas_price(&mut self, ctx: &CallContext, value: U256) -> Result<(), LedgerError> {
        self.change_param(ctx, ParamChange::MinGasPrice(value))
    }

    /// Sets the operator. Gateway only.
    pub fn set_operator(&mut self, ctx: &CallContext, operator: Address) -> Result<(), LedgerError> {
        self.change_param(ctx, ParamChange::Operator(operator))
    }

    /// Sets the epoch length. Gateway only; zero is rejected.
    pub fn set_epoch_length(&mut self, ctx: &CallContext, value: u32) -> Result<(), LedgerError> {
        self.change_param(ctx, ParamChange::EpochLength(value))
    }

    /// Sets the reward accrued per period. Gateway only.
    pub fn set_period_reward(&mut self, ctx: &CallContext, value: U256) -> Result<(), LedgerError> {
        self.change_param(ctx, ParamChange::PeriodReward(value))
    }

    /// Sets the minimum height distance between periods. Gateway only.
    pub fn set_parent_block_interval(
        &mut self,
        ctx: &CallContext,
        value: u64,
    ) -> Result<(), LedgerError> {
        self.change_param(ctx, ParamChange::ParentBlockInterval(value))
    }

    /// Current parameters.
    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    /// Gateway identity.
    pub fn gateway(&self) -> Address {
        self.params.gateway
    }

    /// Operator identity.
    pub fn operator(&self) -> Address {
        self.params.operator
    }

    /// Minimum gas price.
    pub fn min_gas_price(&self) -> U256 {
        self.params.min_gas_price
    }

    /// Epoch length.
    pub fn epoch_length(&self) -> u32 {
        self.params.epoch_length
    }

    /// Reward accrued per period.
    pub fn period_reward(&self) -> U256 {
        self.params.period_reward
    }

    /// Minimum height distance between periods.
    pub fn parent_block_interval(&self) -> u64 {
        self.params.parent_block_interval
    }

    // ---- plumbing ----

    /// Sequence number of the next record.
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Digest of the last recorded envelope.
    pub fn last_digest(&self) -> B256 {
        self.last_digest
    }

    /// Highest root-chain height seen in any record.
    pub fn last_height(&self) -> u64 {
        self.last_height
    }

    /// Settlement policy.
    pub fn settlement(&self) -> &P {
        &self.settlement
    }

    /// Record sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable record sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the ledger, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
