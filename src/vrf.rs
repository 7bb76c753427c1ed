//! Randomness provider adapter.
//!
//! The provider is an external program with its own queue accounts. The
//! raffle talks to it through one CPI: a tagged request instruction that
//! answers with a `u64` request id in program return data. Randomness comes
//! back later in a separate transaction, signed by the provider's callback
//! authority, carrying that id.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    instruction::{AccountMeta, Instruction},
    program::{get_return_data, invoke},
    program_error::ProgramError,
};

use crate::error::RaffleError;

/// Instruction tag of the provider's request entrypoint.
pub const REQUEST_RANDOMNESS_TAG: u8 = 0;

/// Every draw needs exactly one random value.
pub const NUM_RANDOM_VALUES: u8 = 1;

/// Request parameters, forwarded to the provider unchanged.
#[derive(BorshSerialize, BorshDeserialize, Debug)]
pub struct VrfRequest {
    pub min_confirmations: u8,
    pub callback_compute_units: u32,
    pub num_values: u8,
}

/// Issue one randomness request and return the provider's request id.
///
/// The payer funds the request. The raffle account rides along read-only so
/// the provider knows where to deliver the callback.
pub fn request_randomness<'a>(
    vrf_program: &AccountInfo<'a>,
    vrf_queue: &AccountInfo<'a>,
    payer: &AccountInfo<'a>,
    raffle: &AccountInfo<'a>,
    min_confirmations: u8,
    callback_compute_units: u32,
) -> Result<u64, ProgramError> {
    let params = VrfRequest {
        min_confirmations,
        callback_compute_units,
        num_values: NUM_RANDOM_VALUES,
    };
    let mut data = vec![REQUEST_RANDOMNESS_TAG];
    params.serialize(&mut data)?;

    invoke(
        &Instruction {
            program_id: *vrf_program.key,
            accounts: vec![
                AccountMeta::new(*vrf_queue.key, false),
                AccountMeta::new(*payer.key, true),
                AccountMeta::new_readonly(*raffle.key, false),
            ],
            data,
        },
        &[
            vrf_queue.clone(),
            payer.clone(),
            raffle.clone(),
            vrf_program.clone(),
        ],
    )?;

    let (responder, payload) = get_return_data().ok_or(RaffleError::InvalidVrfResponse)?;
    if responder != *vrf_program.key {
        return Err(RaffleError::InvalidVrfResponse.into());
    }
    let id: [u8; 8] = payload
        .as_slice()
        .try_into()
        .map_err(|_| RaffleError::InvalidVrfResponse)?;
    Ok(u64::from_le_bytes(id))
}

/// Reduce one 32-byte random word to a player index.
pub fn winner_index(randomness: &[u8; 32], total_players: u64) -> u64 {
    if total_players == 0 {
        return 0;
    }
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&randomness[..8]);
    u64::from_le_bytes(seed) % total_players
}
