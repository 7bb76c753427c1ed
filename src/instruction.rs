use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum RaffleInstruction {
    /// Create and configure the raffle account. All parameters are
    /// immutable afterwards.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Payer funding the raffle account
    /// 1. `[writable]` The raffle account (PDA, seed `"raffle"`)
    /// 2. `[]` Randomness provider program
    /// 3. `[]` Provider queue account
    /// 4. `[]` Provider callback authority
    /// 5. `[]` System program
    Initialize {
        /// Minimum deposit per entry, in lamports
        entrance_fee: u64,
        /// Minimum seconds between draws
        interval: i64,
        /// Player capacity to size the account for
        max_players: u32,
        /// Confirmation depth forwarded to the provider
        min_confirmations: u8,
        /// Callback compute budget forwarded to the provider
        callback_compute_units: u32,
    },

    /// Enter the raffle by depositing at least the entrance fee.
    /// Overpayment is accepted and retained.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The player entering the raffle
    /// 1. `[writable]` The raffle account
    /// 2. `[]` System program
    EnterRaffle {
        /// Deposit in lamports
        amount: u64,
    },

    /// Evaluate whether a draw is due. Read-only; the verdict is returned
    /// as borsh-encoded `UpkeepCheck` in program return data.
    ///
    /// Accounts expected:
    /// 0. `[]` The raffle account
    CheckUpkeep {},

    /// Start a draw: re-check the upkeep conditions and request one random
    /// value from the provider. Callable by anyone.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Payer for the randomness request
    /// 1. `[writable]` The raffle account
    /// 2. `[writable]` Provider queue account
    /// 3. `[]` Randomness provider program
    PerformUpkeep {
        /// Auxiliary payload from the upkeep check. Ignored.
        perform_data: Vec<u8>,
    },

    /// Deliver randomness and settle the draw. Only the configured
    /// callback authority may invoke this.
    ///
    /// Accounts expected:
    /// 0. `[signer]` Provider callback authority
    /// 1. `[writable]` The raffle account
    /// 2. `[writable]` Candidate winner accounts (one must match the drawn player)
    FulfillRandomness {
        /// Request id issued by PerformUpkeep
        request_id: u64,
        /// Random words, first one decides the winner
        randomness: Vec<[u8; 32]>,
    },
}

impl RaffleInstruction {
    /// Unpacks a byte buffer into a RaffleInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| ProgramError::InvalidInstructionData)
    }
}

/// Create an initialize instruction
pub fn initialize(
    program_id: &Pubkey,
    payer: &Pubkey,
    raffle_account: &Pubkey,
    vrf_program: &Pubkey,
    vrf_queue: &Pubkey,
    callback_authority: &Pubkey,
    entrance_fee: u64,
    interval: i64,
    max_players: u32,
    min_confirmations: u8,
    callback_compute_units: u32,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::Initialize {
        entrance_fee,
        interval,
        max_players,
        min_confirmations,
        callback_compute_units,
    }
    .try_to_vec()?;

    let accounts = vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new_readonly(*vrf_program, false),
        AccountMeta::new_readonly(*vrf_queue, false),
        AccountMeta::new_readonly(*callback_authority, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create an enter_raffle instruction
pub fn enter_raffle(
    program_id: &Pubkey,
    player: &Pubkey,
    raffle_account: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::EnterRaffle { amount }.try_to_vec()?;

    let accounts = vec![
        AccountMeta::new(*player, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create a check_upkeep instruction
pub fn check_upkeep(
    program_id: &Pubkey,
    raffle_account: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::CheckUpkeep {}.try_to_vec()?;

    let accounts = vec![AccountMeta::new_readonly(*raffle_account, false)];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create a perform_upkeep instruction
pub fn perform_upkeep(
    program_id: &Pubkey,
    payer: &Pubkey,
    raffle_account: &Pubkey,
    vrf_queue: &Pubkey,
    vrf_program: &Pubkey,
    perform_data: Vec<u8>,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::PerformUpkeep { perform_data }.try_to_vec()?;

    let accounts = vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new(*vrf_queue, false),
        AccountMeta::new_readonly(*vrf_program, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create a fulfill_randomness instruction
pub fn fulfill_randomness(
    program_id: &Pubkey,
    callback_authority: &Pubkey,
    raffle_account: &Pubkey,
    winner: &Pubkey,
    request_id: u64,
    randomness: Vec<[u8; 32]>,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::FulfillRandomness {
        request_id,
        randomness,
    }
    .try_to_vec()?;

    let accounts = vec![
        AccountMeta::new_readonly(*callback_authority, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new(*winner, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}
