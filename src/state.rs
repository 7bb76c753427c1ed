use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo, clock::UnixTimestamp, program_error::ProgramError, pubkey::Pubkey,
};

use crate::error::RaffleError;

/// Seed of the singleton raffle PDA.
pub const RAFFLE_SEED: &[u8] = b"raffle";

/// Lifecycle of the raffle session.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaffleState {
    /// Accepting entries.
    Open,
    /// Randomness requested, waiting for the provider callback.
    Calculating,
}

/// Raffle account data: draw parameters fixed at initialization plus the
/// live session.
#[derive(BorshSerialize, BorshDeserialize, Debug)]
pub struct Raffle {
    pub is_initialized: bool,
    /// Bump of the raffle PDA.
    pub bump: u8,
    /// Minimum deposit per entry, in lamports.
    pub entrance_fee: u64,
    /// Minimum seconds between draws.
    pub interval: i64,
    /// Player capacity the account was sized for.
    pub max_players: u32,
    /// Randomness provider program.
    pub vrf_program: Pubkey,
    /// Provider queue requests are sent to.
    pub vrf_queue: Pubkey,
    /// Signer the provider delivers randomness with.
    pub callback_authority: Pubkey,
    /// Confirmation depth, passed through to the provider unchanged.
    pub min_confirmations: u8,
    /// Compute budget for the callback, passed through unchanged.
    pub callback_compute_units: u32,
    /// Current session state.
    pub state: RaffleState,
    /// Time of the last completed draw (creation time before the first).
    pub last_draw_timestamp: UnixTimestamp,
    /// Provider request id, meaningful only while Calculating.
    pub pending_request_id: u64,
    /// Winner of the most recent draw.
    pub recent_winner: Option<Pubkey>,
    /// Players of the current round, in entry order. Duplicates allowed.
    pub players: Vec<Pubkey>,
}

impl Raffle {
    /// Serialized size of everything but the player list.
    pub const BASE_LEN: usize = 1 + 1 + 8 + 8 + 4 + 32 + 32 + 32 + 1 + 4 + 1 + 8 + 8 + 33 + 4;

    /// Account size for a raffle holding up to `max_players` entries.
    pub fn space(max_players: u32) -> usize {
        Self::BASE_LEN + 32 * max_players as usize
    }

    /// Decode from raw account data. The account is allocated at full
    /// capacity, so the encoded state is followed by zero padding.
    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let raffle = Raffle::deserialize(&mut &data[..])
            .map_err(|_| ProgramError::InvalidAccountData)?;
        if !raffle.is_initialized {
            return Err(RaffleError::NotInitialized.into());
        }
        Ok(raffle)
    }

    pub fn load(account: &AccountInfo) -> Result<Self, ProgramError> {
        let data = account.try_borrow_data()?;
        Self::unpack(&data)
    }

    pub fn save(&self, account: &AccountInfo) -> Result<(), ProgramError> {
        let mut data = account.try_borrow_mut_data()?;
        self.serialize(&mut &mut data[..])?;
        Ok(())
    }

    /// True when a draw is due: the interval has elapsed, the raffle is
    /// open, the pot holds lamports, and at least one player entered.
    pub fn upkeep_needed(&self, now: UnixTimestamp, held_balance: u64) -> bool {
        let interval_elapsed = now.saturating_sub(self.last_draw_timestamp) > self.interval;
        let is_open = self.state == RaffleState::Open;
        let has_balance = held_balance > 0;
        let has_players = !self.players.is_empty();
        interval_elapsed && is_open && has_balance && has_players
    }

    /// Player at `index`, in entry order.
    pub fn player(&self, index: u32) -> Result<Pubkey, RaffleError> {
        self.players
            .get(index as usize)
            .copied()
            .ok_or(RaffleError::IndexOutOfRange)
    }

    pub fn player_count(&self) -> u32 {
        self.players.len() as u32
    }
}

/// Reply of the upkeep check, published through program return data.
#[derive(BorshSerialize, BorshDeserialize, Debug)]
pub struct UpkeepCheck {
    pub upkeep_needed: bool,
    /// Auxiliary payload to forward to PerformUpkeep. Empty today.
    pub perform_data: Vec<u8>,
}
