//! Wire command codes.

use crate::error::CodecError;

/// Command codes carried in a `HeaderFrame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit = 1,
    Ping = 2,
    CreateQueue = 3,
    ListQueue = 4,
    DeleteQueue = 5,
    Publish = 6,
    Consume = 7,
    Delete = 8,
}

impl Command {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Command::Quit),
            2 => Ok(Command::Ping),
            3 => Ok(Command::CreateQueue),
            4 => Ok(Command::ListQueue),
            5 => Ok(Command::DeleteQueue),
            6 => Ok(Command::Publish),
            7 => Ok(Command::Consume),
            8 => Ok(Command::Delete),
            other => Err(CodecError::UnknownCommand(other)),
        }
    }
}

/// Result code carried in a `ResponseHeader`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseResult {
    Ok = 1,
    Error = 2,
}

impl ResponseResult {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ResponseResult {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ResponseResult::Ok),
            2 => Ok(ResponseResult::Error),
            other => Err(CodecError::UnknownResult(other)),
        }
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
