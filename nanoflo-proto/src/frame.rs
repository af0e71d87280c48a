/// Number of bytes in the handshake signature: `u C / F l o 0 1`.
pub const MAGIC: [u8; 8] = *b"uC/Flo01";

/// Every command on the wire, inbound or outbound, is exactly this many bytes.
pub const CMD_SIZE: usize = 8;

/// One fixed-size, zero-padded wire command: byte 0 is the command code,
/// bytes 1..8 are its operands.
pub type Command = [u8; CMD_SIZE];

/// Build a [`Command`] from a code and up to 7 operand bytes, zero-padding
/// whatever's left.
pub fn build(code: u8, operands: &[u8]) -> Command {
    debug_assert!(operands.len() <= CMD_SIZE - 1);
    let mut cmd = [0u8; CMD_SIZE];
    cmd[0] = code;
    let n = operands.len().min(CMD_SIZE - 1);
    cmd[1..1 + n].copy_from_slice(&operands[..n]);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_zero_pads() {
        let cmd = build(0x42, &[1, 2, 3]);
        assert_eq!(cmd, [0x42, 1, 2, 3, 0, 0, 0, 0]);
    }

    #[test]
    fn magic_is_eight_bytes() {
        assert_eq!(MAGIC.len(), CMD_SIZE);
    }
}
