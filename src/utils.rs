use solana_program::{
    account_info::AccountInfo, program_error::ProgramError, pubkey::Pubkey, rent::Rent,
    sysvar::Sysvar,
};

use crate::state::RAFFLE_SEED;

/// Find the program derived address of the raffle account
pub fn find_raffle_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[RAFFLE_SEED], program_id)
}

/// Lamports the raffle holds above its rent-exempt floor. This is the pot;
/// the floor stays behind so the account survives the payout.
pub fn held_balance(raffle_info: &AccountInfo) -> Result<u64, ProgramError> {
    let floor = Rent::get()?.minimum_balance(raffle_info.data_len());
    Ok(raffle_info.lamports().saturating_sub(floor))
}
