use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

/// Errors that may be returned by the raffle program.
#[derive(Error, Debug, Copy, Clone)]
pub enum RaffleError {
    #[error("Raffle account is not initialized")]
    NotInitialized,

    #[error("Deposit is below the entrance fee")]
    InsufficientFee,

    #[error("Raffle is not open")]
    RaffleNotOpen,

    #[error("Raffle is at player capacity")]
    RaffleFull,

    #[error("Upkeep conditions are not met")]
    UpkeepNotNeeded,

    #[error("No players entered")]
    NoPlayers,

    #[error("Randomness payload is empty")]
    EmptyRandomness,

    #[error("Request id does not match the pending request")]
    RequestIdMismatch,

    #[error("Callback not signed by the configured authority")]
    UnauthorizedCallback,

    #[error("Winner account does not match the drawn player")]
    WinnerAccountMismatch,

    #[error("Prize transfer failed")]
    TransferFailed,

    #[error("Player index is out of range")]
    IndexOutOfRange,

    #[error("Randomness provider returned an invalid response")]
    InvalidVrfResponse,

    #[error("Randomness accounts do not match the configured provider")]
    VrfAccountMismatch,
}

impl From<RaffleError> for ProgramError {
    fn from(e: RaffleError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for RaffleError {
    fn type_of() -> &'static str {
        "Raffle Error"
    }
}

impl PrintProgramError for RaffleError {
    fn print<E>(&self) {
        msg!(&self.to_string());
    }
}
