use crate::error::RaffleError;
use crate::instruction::RaffleInstruction;
use crate::state::{Raffle, RaffleState, UpkeepCheck, RAFFLE_SEED};
use crate::utils;
use crate::vrf;

use borsh::BorshSerialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed, set_return_data},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_instruction,
    sysvar::{clock::Clock, rent::Rent, Sysvar},
};

pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = RaffleInstruction::unpack(instruction_data)?;

        match instruction {
            RaffleInstruction::Initialize {
                entrance_fee,
                interval,
                max_players,
                min_confirmations,
                callback_compute_units,
            } => {
                msg!("Instruction: Initialize");
                Self::process_initialize(
                    accounts,
                    entrance_fee,
                    interval,
                    max_players,
                    min_confirmations,
                    callback_compute_units,
                    program_id,
                )
            }
            RaffleInstruction::EnterRaffle { amount } => {
                msg!("Instruction: Enter Raffle");
                Self::process_enter_raffle(accounts, amount, program_id)
            }
            RaffleInstruction::CheckUpkeep {} => {
                msg!("Instruction: Check Upkeep");
                Self::process_check_upkeep(accounts, program_id)
            }
            RaffleInstruction::PerformUpkeep { perform_data } => {
                msg!("Instruction: Perform Upkeep");
                Self::process_perform_upkeep(accounts, perform_data, program_id)
            }
            RaffleInstruction::FulfillRandomness {
                request_id,
                randomness,
            } => {
                msg!("Instruction: Fulfill Randomness");
                Self::process_fulfill_randomness(accounts, request_id, randomness, program_id)
            }
        }
    }

    /// Create the raffle account and write its configuration. There are no
    /// update instructions; what is set here stands for the account's life.
    fn process_initialize(
        accounts: &[AccountInfo],
        entrance_fee: u64,
        interval: i64,
        max_players: u32,
        min_confirmations: u8,
        callback_compute_units: u32,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let vrf_program_info = next_account_info(account_info_iter)?;
        let vrf_queue_info = next_account_info(account_info_iter)?;
        let callback_authority_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !payer_info.is_signer {
            msg!("Payer must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        let (expected_raffle_pubkey, bump) = utils::find_raffle_address(program_id);
        if *raffle_info.key != expected_raffle_pubkey {
            msg!("Invalid raffle account address");
            return Err(ProgramError::InvalidArgument);
        }

        if raffle_info.owner == program_id {
            msg!("Raffle account is already initialized");
            return Err(ProgramError::AccountAlreadyInitialized);
        }

        if max_players == 0 {
            msg!("Player capacity must be at least one");
            return Err(ProgramError::InvalidArgument);
        }

        let space = Raffle::space(max_players);
        let rent_lamports = Rent::get()?.minimum_balance(space);

        invoke_signed(
            &system_instruction::create_account(
                payer_info.key,
                raffle_info.key,
                rent_lamports,
                space as u64,
                program_id,
            ),
            &[
                payer_info.clone(),
                raffle_info.clone(),
                system_program_info.clone(),
            ],
            &[&[RAFFLE_SEED, &[bump]]],
        )?;

        let clock = Clock::get()?;
        let raffle = Raffle {
            is_initialized: true,
            bump,
            entrance_fee,
            interval,
            max_players,
            vrf_program: *vrf_program_info.key,
            vrf_queue: *vrf_queue_info.key,
            callback_authority: *callback_authority_info.key,
            min_confirmations,
            callback_compute_units,
            state: RaffleState::Open,
            last_draw_timestamp: clock.unix_timestamp,
            pending_request_id: 0,
            recent_winner: None,
            players: Vec::new(),
        };
        raffle.save(raffle_info)?;

        msg!(
            "Raffle initialized: fee={} lamports, interval={}s, capacity={} players",
            entrance_fee,
            interval,
            max_players
        );
        Ok(())
    }

    fn process_enter_raffle(
        accounts: &[AccountInfo],
        amount: u64,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let player_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !player_info.is_signer {
            msg!("Player must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by the program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut raffle = Raffle::load(raffle_info)?;

        if amount < raffle.entrance_fee {
            msg!(
                "Deposit of {} lamports is below the {} lamport entrance fee",
                amount,
                raffle.entrance_fee
            );
            return Err(RaffleError::InsufficientFee.into());
        }

        if raffle.state != RaffleState::Open {
            msg!("Raffle is not open for entries");
            return Err(RaffleError::RaffleNotOpen.into());
        }

        if raffle.player_count() >= raffle.max_players {
            msg!("Raffle is full at {} players", raffle.max_players);
            return Err(RaffleError::RaffleFull.into());
        }

        // Overpayment above the fee is accepted and stays in the pot.
        invoke(
            &system_instruction::transfer(player_info.key, raffle_info.key, amount),
            &[
                player_info.clone(),
                raffle_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        raffle.players.push(*player_info.key);
        raffle.save(raffle_info)?;

        msg!(
            "Player {} entered with {} lamports, {} in the round",
            player_info.key,
            amount,
            raffle.player_count()
        );
        Ok(())
    }

    /// Evaluate the draw conditions without touching state. The verdict
    /// goes out as return data so schedulers can read it from a simulation.
    fn process_check_upkeep(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let raffle_info = next_account_info(account_info_iter)?;

        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by the program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let raffle = Raffle::load(raffle_info)?;
        let now = Clock::get()?.unix_timestamp;
        let held = utils::held_balance(raffle_info)?;
        let upkeep_needed = raffle.upkeep_needed(now, held);

        msg!(
            "Upkeep check: needed={} (elapsed={}s of {}s, balance={}, players={}, state={:?})",
            upkeep_needed,
            now.saturating_sub(raffle.last_draw_timestamp),
            raffle.interval,
            held,
            raffle.player_count(),
            raffle.state
        );

        let reply = UpkeepCheck {
            upkeep_needed,
            perform_data: Vec::new(),
        };
        set_return_data(&reply.try_to_vec()?);
        Ok(())
    }

    /// Start a draw. Anyone may call this; the re-checked conditions are
    /// the gate, and flipping to Calculating closes it behind the first
    /// caller.
    fn process_perform_upkeep(
        accounts: &[AccountInfo],
        _perform_data: Vec<u8>,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let vrf_queue_info = next_account_info(account_info_iter)?;
        let vrf_program_info = next_account_info(account_info_iter)?;

        if !payer_info.is_signer {
            msg!("Payer must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by the program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut raffle = Raffle::load(raffle_info)?;

        if raffle.vrf_program != *vrf_program_info.key || raffle.vrf_queue != *vrf_queue_info.key {
            msg!("Randomness accounts do not match the configured provider");
            return Err(RaffleError::VrfAccountMismatch.into());
        }

        let now = Clock::get()?.unix_timestamp;
        let held = utils::held_balance(raffle_info)?;
        if !raffle.upkeep_needed(now, held) {
            msg!(
                "Upkeep not needed: balance={} players={} state={:?}",
                held,
                raffle.player_count(),
                raffle.state
            );
            return Err(RaffleError::UpkeepNotNeeded.into());
        }

        let request_id = vrf::request_randomness(
            vrf_program_info,
            vrf_queue_info,
            payer_info,
            raffle_info,
            raffle.min_confirmations,
            raffle.callback_compute_units,
        )?;

        raffle.state = RaffleState::Calculating;
        raffle.pending_request_id = request_id;
        raffle.save(raffle_info)?;

        msg!("Draw requested: request id {}", request_id);
        Ok(())
    }

    /// Settle a draw from delivered randomness. Only the configured
    /// callback authority gets through, and only for the pending request.
    fn process_fulfill_randomness(
        accounts: &[AccountInfo],
        request_id: u64,
        randomness: Vec<[u8; 32]>,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;

        // Candidate winner accounts; the drawn player must be among them.
        let candidate_infos: Vec<&AccountInfo> = account_info_iter.collect();

        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by the program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut raffle = Raffle::load(raffle_info)?;

        if *authority_info.key != raffle.callback_authority {
            msg!("Callback is not from the configured authority");
            return Err(RaffleError::UnauthorizedCallback.into());
        }

        if !authority_info.is_signer {
            msg!("Callback authority must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        // Rejects stale, duplicate and unsolicited deliveries.
        if raffle.state != RaffleState::Calculating || request_id != raffle.pending_request_id {
            msg!(
                "Request id {} does not match the pending request (state={:?}, pending={})",
                request_id,
                raffle.state,
                raffle.pending_request_id
            );
            return Err(RaffleError::RequestIdMismatch.into());
        }

        let word = randomness.first().ok_or(RaffleError::EmptyRandomness)?;

        if raffle.players.is_empty() {
            msg!("No players to draw from");
            return Err(RaffleError::NoPlayers.into());
        }

        let index = vrf::winner_index(word, raffle.players.len() as u64);
        let winner = raffle.player(index as u32)?;
        msg!("Drawn index {} of {} players", index, raffle.player_count());

        let winner_info = *candidate_infos
            .iter()
            .find(|info| *info.key == winner)
            .ok_or(RaffleError::WinnerAccountMismatch)?;

        let prize = utils::held_balance(raffle_info)?;

        raffle.recent_winner = Some(winner);
        raffle.state = RaffleState::Open;
        raffle.players.clear();
        raffle.last_draw_timestamp = Clock::get()?.unix_timestamp;
        raffle.pending_request_id = 0;
        raffle.save(raffle_info)?;

        // Pay the whole pot last; a failure here unwinds the reset too.
        **raffle_info.try_borrow_mut_lamports()? = raffle_info
            .lamports()
            .checked_sub(prize)
            .ok_or(RaffleError::TransferFailed)?;
        **winner_info.try_borrow_mut_lamports()? = winner_info
            .lamports()
            .checked_add(prize)
            .ok_or(RaffleError::TransferFailed)?;

        msg!("Winner {} received {} lamports", winner, prize);
        Ok(())
    }
}
