// Constants for the PBrain interpreter

/// Default number of tape cells
pub const DEFAULT_TAPE_SIZE: usize = 64;

/// Maximum number of characters a script may write to stdout
pub const STDOUT_BUFFER_LIMIT: usize = 1024;

/// Maximum number of functions a single script may define
pub const FUNCTION_DEFINITIONS_LIMIT: usize = 128;

/// Deepest nesting of loop and function bodies at which `:` may still call
pub const CALL_DEPTH_LIMIT: usize = 1 << 16;

/// Largest cell value without overflow (signed 16-bit maximum)
pub const SHORT_MAX: u16 = i16::MAX as u16;

/// Largest cell value under byte wraparound
pub const BYTE_MAX: u16 = u8::MAX as u16;
